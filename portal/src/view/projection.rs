//! Pure projection of a canonical collection: search, facet, rank sort.

use std::borrow::Cow;
use std::fmt::Debug;

/// Ordering of known enumerated values of one field. Values missing from the
/// table rank 0, ahead of every known value in ascending order.
#[derive(Debug, Clone, Copy)]
pub struct RankTable(pub &'static [(&'static str, i32)]);

impl RankTable {
    pub fn rank(&self, value: &str) -> i32 {
        let value = value.trim();
        self.0
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(value))
            .map(|(_, rank)| *rank)
            .unwrap_or(0)
    }
}

/// A row type a collection view can search, facet and sort.
pub trait Projectable {
    /// Fields the sort control and the facet can target.
    type Field: Copy + Eq + Debug;

    /// Designated display text the search box matches against.
    fn search_key(&self) -> Cow<'_, str>;

    /// Raw value of `field` on this row.
    fn field_value(&self, field: Self::Field) -> &str;

    /// Rank table used when sorting by `field`.
    fn ranks(field: Self::Field) -> RankTable;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDirective<F> {
    pub field: F,
    pub direction: Direction,
}

impl<F: Copy + Eq> SortDirective<F> {
    pub fn ascending(field: F) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
        }
    }

    pub fn descending(field: F) -> Self {
        Self {
            field,
            direction: Direction::Descending,
        }
    }
}

/// Three-state toggle: ascending → descending → unsorted on the same field;
/// a different field starts over at ascending.
pub fn toggle_sort<F: Copy + Eq>(
    current: Option<SortDirective<F>>,
    field: F,
) -> Option<SortDirective<F>> {
    match current {
        Some(d) if d.field == field => match d.direction {
            Direction::Ascending => Some(SortDirective::descending(field)),
            Direction::Descending => None,
        },
        _ => Some(SortDirective::ascending(field)),
    }
}

/// Exact-match filter on one field, e.g. department = "Sales".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet<F> {
    pub field: F,
    pub value: String,
}

/// Every input of the projection besides the canonical rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query<F> {
    pub search: String,
    pub facet: Option<Facet<F>>,
    pub sort: Option<SortDirective<F>>,
}

impl<F> Default for Query<F> {
    fn default() -> Self {
        Self {
            search: String::new(),
            facet: None,
            sort: None,
        }
    }
}

/// Indices into `canonical`, filtered then stably sorted per `query`.
///
/// Depends on nothing but its arguments.
pub fn project<T: Projectable>(canonical: &[T], query: &Query<T::Field>) -> Vec<usize> {
    let needle = query.search.trim().to_lowercase();

    let mut visible: Vec<usize> = canonical
        .iter()
        .enumerate()
        .filter(|(_, item)| needle.is_empty() || item.search_key().to_lowercase().contains(&needle))
        .filter(|(_, item)| match &query.facet {
            Some(facet) => item.field_value(facet.field) == facet.value,
            None => true,
        })
        .map(|(i, _)| i)
        .collect();

    if let Some(directive) = query.sort {
        let table = T::ranks(directive.field);
        visible.sort_by(|&a, &b| {
            let ra = table.rank(canonical[a].field_value(directive.field));
            let rb = table.rank(canonical[b].field_value(directive.field));
            match directive.direction {
                Direction::Ascending => ra.cmp(&rb),
                Direction::Descending => rb.cmp(&ra),
            }
        });
    }

    visible
}
