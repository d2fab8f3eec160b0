pub mod menu;
pub mod model;
pub mod projection;

use std::fmt;

pub use self::menu::{ActionMenu, Footprint, Interaction, MenuState, Point, Propagation, Viewport};
pub use self::model::{Collection, CollectionView, LoadOutcome, LoadState, LoadTicket};
pub use self::projection::{
    Direction, Facet, Projectable, Query, RankTable, SortDirective, project, toggle_sort,
};

/// Server collections a page can hold and an action can invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionKey {
    Employees,
    Leaves,
    Tasks,
    Attendance,
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Employees => f.write_str("employees"),
            Self::Leaves => f.write_str("leave requests"),
            Self::Tasks => f.write_str("tasks"),
            Self::Attendance => f.write_str("attendance"),
        }
    }
}
