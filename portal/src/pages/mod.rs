//! Page models: the state behind each screen, independent of how it is
//! drawn.

pub mod attendance;
pub mod dashboard;
pub mod employee_detail;
pub mod employees;
pub mod forms;
pub mod leaves;
pub mod login;
pub mod prediction;
pub mod tasks;

use crate::api::HrApi;
use crate::dispatch::{ActionResult, Invalidations};
use crate::gate::Route;
use crate::view::{
    ActionMenu, Collection, CollectionView, Footprint, Interaction, LoadOutcome, Point,
    Propagation, Viewport,
};

/// What the shell should do after a page handled input.
#[derive(Debug)]
pub enum PageEffect {
    None,
    Navigate(Route),
    /// An action finished. On success the shell navigates to `then` when
    /// set.
    Action {
        result: ActionResult,
        then: Option<Route>,
    },
}

impl PageEffect {
    pub fn action(result: ActionResult) -> Self {
        Self::Action { result, then: None }
    }
}

/// A list screen: one collection view plus its row action menu.
#[derive(Debug)]
pub struct ListPage<T: Collection> {
    pub view: CollectionView<T>,
    pub menu: ActionMenu<T::Key>,
    mounted: bool,
}

impl<T: Collection> ListPage<T> {
    pub fn new(footprint: Footprint) -> Self {
        Self {
            view: CollectionView::new(),
            menu: ActionMenu::new(footprint),
            mounted: false,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// First display of the page: fetch the collection once. The fetch
    /// supersedes any pending invalidation of the same collection.
    pub async fn mount(
        &mut self,
        api: &dyn HrApi,
        invalidations: &mut Invalidations,
    ) -> Option<LoadOutcome> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        invalidations.take(T::KEY);
        Some(self.view.load(api).await)
    }

    /// Leaving the page: the next visit fetches again and starts from an
    /// empty search, no facet and no sort.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.menu.close();
        self.view.reset_query();
    }

    /// Re-fetch when an action invalidated this collection.
    pub async fn sync(&mut self, api: &dyn HrApi, invalidations: &mut Invalidations) -> Option<LoadOutcome> {
        if !invalidations.take(T::KEY) {
            return None;
        }
        Some(self.view.load(api).await)
    }

    /// Open the action menu on the row at projection position `pos`.
    pub fn trigger(&mut self, pos: usize, pointer: Point, viewport: Viewport) -> Propagation {
        match self.view.visible_at(pos).map(Collection::key) {
            Some(row) => self
                .menu
                .interact(Interaction::Trigger { row, pointer }, viewport),
            None => Propagation::Continue,
        }
    }

    /// Row the open menu is bound to, if it still exists.
    pub fn selected_row(&self) -> Option<&T> {
        self.menu.selected().and_then(|key| self.view.find(key))
    }

    /// Close the menu when `result` succeeded; a failed action leaves it
    /// open on its row.
    pub fn settle(&mut self, result: &ActionResult) {
        if result.is_ok() {
            self.menu.complete();
        }
    }
}
