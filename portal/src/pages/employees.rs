use std::borrow::Cow;

use async_trait::async_trait;

use shared::types::{DEPARTMENTS, Employee};

use super::{ListPage, PageEffect};
use crate::api::{ApiResult, HrApi};
use crate::dispatch::ActionDispatcher;
use crate::gate::Route;
use crate::session::Session;
use crate::view::{Collection, CollectionKey, Facet, Projectable, RankTable};

/// Facet choice meaning "no department filter".
pub const ALL_DEPARTMENTS: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeField {
    Department,
}

impl Projectable for Employee {
    type Field = EmployeeField;

    fn search_key(&self) -> Cow<'_, str> {
        Cow::Owned(self.full_name())
    }

    fn field_value(&self, field: EmployeeField) -> &str {
        match field {
            EmployeeField::Department => &self.department,
        }
    }

    fn ranks(_field: EmployeeField) -> RankTable {
        RankTable(&[])
    }
}

#[async_trait]
impl Collection for Employee {
    const KEY: CollectionKey = CollectionKey::Employees;
    type Key = String;

    fn key(&self) -> String {
        self.emp_id.clone()
    }

    async fn fetch(api: &dyn HrApi) -> ApiResult<Vec<Self>> {
        api.employees().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeAction {
    View,
    Delete,
}

impl EmployeeAction {
    pub const ALL: [EmployeeAction; 2] = [Self::View, Self::Delete];

    pub fn label(&self) -> &'static str {
        match self {
            Self::View => "View",
            Self::Delete => "Delete",
        }
    }
}

pub type EmployeesPage = ListPage<Employee>;

impl ListPage<Employee> {
    /// Department filter choices, "All" first.
    pub fn department_choices() -> impl Iterator<Item = &'static str> {
        std::iter::once(ALL_DEPARTMENTS).chain(DEPARTMENTS)
    }

    pub fn department(&self) -> &str {
        self.view
            .facet()
            .map(|f| f.value.as_str())
            .unwrap_or(ALL_DEPARTMENTS)
    }

    pub fn set_department(&mut self, department: &str) {
        let facet = (department != ALL_DEPARTMENTS).then(|| Facet {
            field: EmployeeField::Department,
            value: department.to_string(),
        });
        self.view.set_facet(facet);
    }

    /// Step the department filter to the next choice.
    pub fn cycle_department(&mut self) {
        let choices: Vec<_> = Self::department_choices().collect();
        let current = choices
            .iter()
            .position(|d| *d == self.department())
            .unwrap_or(0);
        let next = choices[(current + 1) % choices.len()];
        self.set_department(next);
    }

    pub async fn perform(
        &mut self,
        action: EmployeeAction,
        api: &dyn HrApi,
        session: &Session,
    ) -> PageEffect {
        let Some(emp_id) = self.menu.selected().cloned() else {
            return PageEffect::None;
        };

        match action {
            EmployeeAction::View => {
                self.menu.complete();
                PageEffect::Navigate(Route::EmployeeDetail(emp_id))
            }
            EmployeeAction::Delete => {
                let result = ActionDispatcher::new(api, session)
                    .delete_employee(&emp_id)
                    .await;
                self.settle(&result);
                PageEffect::action(result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Footprint;

    fn employee(emp_id: &str, first: &str, last: &str, department: &str) -> Employee {
        Employee {
            emp_id: emp_id.into(),
            first_name: first.into(),
            last_name: last.into(),
            email: format!("{}@corp.io", first.to_lowercase()),
            department: department.into(),
            role: "Staff".into(),
            phone_number: None,
            address: None,
            join_date: None,
            image: None,
        }
    }

    fn loaded() -> EmployeesPage {
        let mut page = EmployeesPage::new(Footprint::DEFAULT);
        let t = page.view.begin_load();
        page.view.finish_load(
            t,
            Ok(vec![
                employee("E1", "Ada", "Lovelace", "Engineering"),
                employee("E2", "Grace", "Hopper", "Engineering"),
                employee("E3", "Mary", "Adams", "HR"),
            ]),
        );
        page
    }

    fn ids(page: &EmployeesPage) -> Vec<String> {
        page.view.visible().map(|e| e.emp_id.clone()).collect()
    }

    #[test]
    fn search_matches_full_name() {
        let mut page = loaded();
        page.view.set_search("ADA");
        assert_eq!(ids(&page), ["E1", "E3"]);
        page.view.set_search("a lov");
        assert_eq!(ids(&page), ["E1"]);
    }

    #[test]
    fn department_facet_and_all() {
        let mut page = loaded();
        page.set_department("HR");
        assert_eq!(ids(&page), ["E3"]);
        assert_eq!(page.department(), "HR");

        page.set_department(ALL_DEPARTMENTS);
        assert_eq!(ids(&page).len(), 3);
        assert_eq!(page.department(), "All");
    }

    #[test]
    fn cycling_departments_wraps_to_all() {
        let mut page = loaded();
        let mut seen = vec![page.department().to_string()];
        for _ in 0..5 {
            page.cycle_department();
            seen.push(page.department().to_string());
        }
        assert_eq!(seen, ["All", "HR", "Engineering", "Sales", "Finance", "All"]);
    }

    #[test]
    fn search_and_facet_combine() {
        let mut page = loaded();
        page.set_department("Engineering");
        page.view.set_search("grace");
        assert_eq!(ids(&page), ["E2"]);
    }
}
