use std::cell::OnceCell;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::api::{ApiResult, HrApi};
use crate::view::CollectionKey;
use crate::view::projection::{Facet, Projectable, Query, SortDirective, project, toggle_sort};

/// A row type with a server endpoint that lists the whole collection.
#[async_trait]
pub trait Collection: Projectable + Sized + Send {
    const KEY: CollectionKey;

    /// Server identity of a row; menus bind to it rather than to a position
    /// that a re-fetch may move.
    type Key: Clone + PartialEq + std::fmt::Debug + Send;

    fn key(&self) -> Self::Key;

    async fn fetch(api: &dyn HrApi) -> ApiResult<Vec<Self>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    /// The last load failed; the canonical collection is empty.
    Failed,
}

/// Handed out by [`CollectionView::begin_load`]; only the latest ticket may
/// complete a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed,
    /// A newer load was started before this one finished; its result was
    /// dropped.
    Stale,
}

/// Canonical server collection plus the search/facet/sort inputs of its
/// projection.
///
/// The projection is memoised and thrown away by every setter, so reading it
/// always reflects the current `(canonical, query)` pair and nothing else.
#[derive(Debug)]
pub struct CollectionView<T: Projectable> {
    canonical: Vec<T>,
    query: Query<T::Field>,
    projection: OnceCell<Vec<usize>>,
    generation: u64,
    state: LoadState,
}

impl<T: Projectable> Default for CollectionView<T> {
    fn default() -> Self {
        Self {
            canonical: Vec::new(),
            query: Query::default(),
            projection: OnceCell::new(),
            generation: 0,
            state: LoadState::Idle,
        }
    }
}

impl<T: Projectable> CollectionView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canonical(&self) -> &[T] {
        &self.canonical
    }

    pub fn query(&self) -> &Query<T::Field> {
        &self.query
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn search(&self) -> &str {
        &self.query.search
    }

    pub fn sort(&self) -> Option<SortDirective<T::Field>> {
        self.query.sort
    }

    pub fn facet(&self) -> Option<&Facet<T::Field>> {
        self.query.facet.as_ref()
    }

    // -------------------------------------------------------------------------
    // Setters
    // -------------------------------------------------------------------------

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if self.query.search != search {
            self.query.search = search;
            self.invalidate_projection();
        }
    }

    pub fn set_facet(&mut self, facet: Option<Facet<T::Field>>) {
        if self.query.facet != facet {
            self.query.facet = facet;
            self.invalidate_projection();
        }
    }

    pub fn set_sort(&mut self, sort: Option<SortDirective<T::Field>>) {
        if self.query.sort != sort {
            self.query.sort = sort;
            self.invalidate_projection();
        }
    }

    /// Back to an empty search with no facet and no sort.
    pub fn reset_query(&mut self) {
        self.set_search(String::new());
        self.set_facet(None);
        self.set_sort(None);
    }

    /// Advance the three-state sort control for `field`.
    pub fn toggle_sort(&mut self, field: T::Field) -> Option<SortDirective<T::Field>> {
        let next = toggle_sort(self.query.sort, field);
        self.set_sort(next);
        next
    }

    // -------------------------------------------------------------------------
    // Projection
    // -------------------------------------------------------------------------

    /// Indices of the visible rows into [`CollectionView::canonical`].
    pub fn visible_indices(&self) -> &[usize] {
        self.projection
            .get_or_init(|| project(&self.canonical, &self.query))
    }

    pub fn visible(&self) -> impl Iterator<Item = &T> + '_ {
        self.visible_indices().iter().map(|&i| &self.canonical[i])
    }

    /// Row at position `pos` of the projection.
    pub fn visible_at(&self, pos: usize) -> Option<&T> {
        self.visible_indices()
            .get(pos)
            .and_then(|&i| self.canonical.get(i))
    }

    pub fn visible_len(&self) -> usize {
        self.visible_indices().len()
    }

    /// Nothing to show: drives the page's empty-state message.
    pub fn is_empty(&self) -> bool {
        self.visible_len() == 0
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.generation)
    }

    /// Complete the load identified by `ticket`.
    ///
    /// Success replaces the canonical collection wholesale; failure empties
    /// it. Either way nothing of the previous contents survives. Results for
    /// a superseded ticket are discarded.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: ApiResult<Vec<T>>) -> LoadOutcome {
        if ticket.0 != self.generation {
            debug!(
                "Dropping stale load (ticket {}, current {})",
                ticket.0, self.generation
            );
            return LoadOutcome::Stale;
        }

        self.invalidate_projection();

        match result {
            Ok(items) => {
                let count = items.len();
                self.canonical = items;
                self.state = LoadState::Ready;
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                warn!("Collection load failed: {}", e);
                self.canonical = Vec::new();
                self.state = LoadState::Failed;
                LoadOutcome::Failed
            }
        }
    }

    fn invalidate_projection(&mut self) {
        self.projection.take();
    }
}

impl<T: Collection> CollectionView<T> {
    /// Canonical row with `key`, visible or not.
    pub fn find(&self, key: &T::Key) -> Option<&T> {
        self.canonical.iter().find(|row| row.key() == *key)
    }

    /// Fetch the full collection from the server.
    pub async fn load(&mut self, api: &dyn HrApi) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = T::fetch(api).await;
        let outcome = self.finish_load(ticket, result);
        if let LoadOutcome::Loaded(count) = outcome {
            info!("Loaded {} {} rows", count, T::KEY);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::view::projection::tests::{Row, RowField, row};

    fn loaded(rows: Vec<Row>) -> CollectionView<Row> {
        let mut view = CollectionView::new();
        let t = view.begin_load();
        view.finish_load(t, Ok(rows));
        view
    }

    fn names(view: &CollectionView<Row>) -> Vec<String> {
        view.visible().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn new_view_is_idle_and_empty() {
        let view: CollectionView<Row> = CollectionView::new();
        assert_eq!(view.state(), LoadState::Idle);
        assert!(view.is_empty());
    }

    #[test]
    fn search_recomputes_projection() {
        let mut view = loaded(vec![row("Alice", "Present"), row("Bob", "Absent")]);
        assert_eq!(names(&view), ["Alice", "Bob"]);

        view.set_search("ali");
        assert_eq!(names(&view), ["Alice"]);

        view.set_search("");
        assert_eq!(names(&view), ["Alice", "Bob"]);
    }

    #[test]
    fn reset_query_clears_search_and_sort() {
        let mut view = loaded(vec![row("Bob", "Absent"), row("Alice", "Present")]);
        view.set_search("a");
        view.toggle_sort(RowField::Status);
        assert!(view.sort().is_some());

        view.reset_query();
        assert_eq!(view.search(), "");
        assert_eq!(view.sort(), None);
        assert!(view.facet().is_none());
        assert_eq!(names(&view), ["Bob", "Alice"]);
    }

    #[test]
    fn reload_recomputes_projection_with_same_query() {
        let mut view = loaded(vec![row("Alice", "Present")]);
        view.set_search("bo");
        assert!(view.is_empty());

        let t = view.begin_load();
        view.finish_load(t, Ok(vec![row("Bob", "Late"), row("Boris", "Absent")]));
        assert_eq!(names(&view), ["Bob", "Boris"]);
    }

    #[test]
    fn failed_load_empties_canonical() {
        let mut view = loaded(vec![row("Alice", "Present")]);
        let t = view.begin_load();
        let outcome = view.finish_load(t, Err(ApiError::EmptyResult("rows")));

        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(view.state(), LoadState::Failed);
        assert!(view.canonical().is_empty());
        assert!(view.is_empty());
    }

    #[test]
    fn stale_load_never_overwrites_newer_one() {
        let mut view: CollectionView<Row> = CollectionView::new();
        let first = view.begin_load();
        let second = view.begin_load();

        assert_eq!(
            view.finish_load(second, Ok(vec![row("new", "Present")])),
            LoadOutcome::Loaded(1)
        );
        assert_eq!(
            view.finish_load(first, Ok(vec![row("old", "Absent")])),
            LoadOutcome::Stale
        );
        assert_eq!(names(&view), ["new"]);
    }

    #[test]
    fn toggle_sort_three_times_restores_order() {
        let mut view = loaded(vec![
            row("a", "Absent"),
            row("b", "Present"),
            row("c", "Late"),
        ]);
        let before = names(&view);

        view.toggle_sort(RowField::Status);
        assert_eq!(names(&view), ["b", "c", "a"]);
        view.toggle_sort(RowField::Status);
        assert_eq!(names(&view), ["a", "c", "b"]);
        assert_eq!(view.toggle_sort(RowField::Status), None);
        assert_eq!(names(&view), before);
    }

    #[test]
    fn visible_at_indexes_the_projection() {
        let mut view = loaded(vec![row("Alice", "Present"), row("Bob", "Absent")]);
        view.set_search("bob");
        assert_eq!(view.visible_at(0).map(|r| r.name.as_str()), Some("Bob"));
        assert!(view.visible_at(1).is_none());
    }
}
