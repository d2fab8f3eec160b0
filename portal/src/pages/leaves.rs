use std::borrow::Cow;

use async_trait::async_trait;

use shared::types::{LeaveDecision, LeaveRequest};

use super::{ListPage, PageEffect};
use crate::api::{ApiResult, HrApi};
use crate::dispatch::ActionDispatcher;
use crate::session::Session;
use crate::view::{Collection, CollectionKey, Projectable, RankTable};

pub const STATUS_RANKS: RankTable = RankTable(&[("Pending", 1), ("Approved", 2), ("Rejected", 3)]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveField {
    Status,
}

impl Projectable for LeaveRequest {
    type Field = LeaveField;

    fn search_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.full_name)
    }

    fn field_value(&self, field: LeaveField) -> &str {
        match field {
            LeaveField::Status => &self.status,
        }
    }

    fn ranks(field: LeaveField) -> RankTable {
        match field {
            LeaveField::Status => STATUS_RANKS,
        }
    }
}

#[async_trait]
impl Collection for LeaveRequest {
    const KEY: CollectionKey = CollectionKey::Leaves;
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }

    async fn fetch(api: &dyn HrApi) -> ApiResult<Vec<Self>> {
        api.leave_requests().await
    }
}

pub type LeavesPage = ListPage<LeaveRequest>;

impl ListPage<LeaveRequest> {
    /// Approve or reject the request the menu is open on.
    pub async fn decide(
        &mut self,
        decision: LeaveDecision,
        api: &dyn HrApi,
        session: &Session,
    ) -> PageEffect {
        let Some(leave_id) = self.menu.selected().copied() else {
            return PageEffect::None;
        };
        let result = ActionDispatcher::new(api, session)
            .decide_leave(leave_id, decision)
            .await;
        self.settle(&result);
        PageEffect::action(result)
    }
}
