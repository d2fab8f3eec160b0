//! Client core of the HR portal.
//!
//! Start-up hydrates a [`session::Session`] from the persisted token, the
//! [`gate`] decides which screen may be shown, list pages hold a
//! [`view::CollectionView`] over a server collection, and state changes go
//! through [`dispatch::ActionDispatcher`], which names the collection to
//! re-fetch.

pub mod api;
pub mod dispatch;
pub mod format;
pub mod gate;
pub mod notify;
pub mod pages;
pub mod session;
pub mod validation;
pub mod view;

pub use api::{ApiError, HrApi, HttpApi};
pub use gate::Route;
pub use session::Session;
