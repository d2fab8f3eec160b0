use std::borrow::Cow;

use async_trait::async_trait;

use shared::types::Task;

use super::{ListPage, PageEffect};
use crate::api::{ApiResult, HrApi};
use crate::gate::Route;
use crate::view::{Collection, CollectionKey, Projectable, RankTable};

pub const PRIORITY_RANKS: RankTable = RankTable(&[("Low", 1), ("Medium", 2), ("High", 3)]);

pub const STATUS_RANKS: RankTable = RankTable(&[
    ("Pending", 1),
    ("In Progress", 2),
    ("On Hold", 3),
    ("Completed", 4),
    ("Cancelled", 5),
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Priority,
    Status,
}

impl Projectable for Task {
    type Field = TaskField;

    /// Title plus assignee, so either can be searched.
    fn search_key(&self) -> Cow<'_, str> {
        match &self.assigned_to_name {
            Some(name) => Cow::Owned(format!("{} {}", self.title, name)),
            None => Cow::Borrowed(&self.title),
        }
    }

    fn field_value(&self, field: TaskField) -> &str {
        match field {
            TaskField::Priority => &self.priority,
            TaskField::Status => &self.status,
        }
    }

    fn ranks(field: TaskField) -> RankTable {
        match field {
            TaskField::Priority => PRIORITY_RANKS,
            TaskField::Status => STATUS_RANKS,
        }
    }
}

#[async_trait]
impl Collection for Task {
    const KEY: CollectionKey = CollectionKey::Tasks;
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }

    async fn fetch(api: &dyn HrApi) -> ApiResult<Vec<Self>> {
        api.tasks().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Edit,
}

impl TaskAction {
    pub const ALL: [TaskAction; 1] = [Self::Edit];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Edit => "Edit",
        }
    }
}

pub type TasksPage = ListPage<Task>;

impl ListPage<Task> {
    pub fn perform(&mut self, action: TaskAction) -> PageEffect {
        let Some(task_id) = self.menu.selected().copied() else {
            return PageEffect::None;
        };
        match action {
            TaskAction::Edit => {
                self.menu.complete();
                PageEffect::Navigate(Route::EditTask(task_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Footprint, Point, Viewport};

    fn task(id: i64, title: &str, assignee: Option<&str>, priority: &str, status: &str) -> Task {
        Task {
            id,
            title: title.into(),
            description: String::new(),
            start_date: None,
            due_date: None,
            priority: priority.into(),
            status: status.into(),
            assigned_to: Some(1),
            assigned_by: Some(2),
            assigned_to_name: assignee.map(str::to_string),
            assigned_by_name: None,
            remarks: None,
        }
    }

    fn loaded() -> TasksPage {
        let mut page = TasksPage::new(Footprint::DEFAULT);
        let t = page.view.begin_load();
        page.view.finish_load(
            t,
            Ok(vec![
                task(1, "Payroll", Some("Ada Lovelace"), "High", "Completed"),
                task(2, "Onboarding", None, "Low", "In Progress"),
                task(3, "Audit", Some("Grace Hopper"), "Medium", "Pending"),
            ]),
        );
        page
    }

    fn ids(page: &TasksPage) -> Vec<i64> {
        page.view.visible().map(|t| t.id).collect()
    }

    #[test]
    fn search_covers_title_and_assignee() {
        let mut page = loaded();
        page.view.set_search("grace");
        assert_eq!(ids(&page), [3]);
        page.view.set_search("board");
        assert_eq!(ids(&page), [2]);
    }

    #[test]
    fn priority_and_status_rank_sorts() {
        let mut page = loaded();
        page.view.toggle_sort(TaskField::Priority);
        assert_eq!(ids(&page), [2, 3, 1]);

        page.view.toggle_sort(TaskField::Status);
        assert_eq!(ids(&page), [3, 2, 1]);
        page.view.toggle_sort(TaskField::Status);
        assert_eq!(ids(&page), [1, 2, 3]);
    }

    #[test]
    fn edit_navigates_to_bound_row() {
        let mut page = loaded();
        page.trigger(2, Point::new(10, 10), Viewport::new(800, 600));
        match page.perform(TaskAction::Edit) {
            PageEffect::Navigate(route) => assert_eq!(route, Route::EditTask(3)),
            other => panic!("unexpected effect {:?}", other),
        }
        assert!(!page.menu.is_open());
    }
}
