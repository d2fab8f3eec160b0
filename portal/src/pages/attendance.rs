use std::borrow::Cow;

use async_trait::async_trait;

use shared::types::AttendanceRecord;

use super::ListPage;
use crate::api::{ApiResult, HrApi};
use crate::format;
use crate::view::{Collection, CollectionKey, Projectable, RankTable};

pub const STATUS_RANKS: RankTable =
    RankTable(&[("Present", 1), ("Late", 2), ("Absent", 3), ("On Leave", 4)]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceField {
    Status,
}

impl Projectable for AttendanceRecord {
    type Field = AttendanceField;

    fn search_key(&self) -> Cow<'_, str> {
        Cow::Owned(self.full_name())
    }

    fn field_value(&self, field: AttendanceField) -> &str {
        match field {
            AttendanceField::Status => &self.status,
        }
    }

    fn ranks(field: AttendanceField) -> RankTable {
        match field {
            AttendanceField::Status => STATUS_RANKS,
        }
    }
}

#[async_trait]
impl Collection for AttendanceRecord {
    const KEY: CollectionKey = CollectionKey::Attendance;
    /// `(emp_id, date)`; the row id is not always sent.
    type Key = (String, Option<String>);

    fn key(&self) -> Self::Key {
        (self.emp_id.clone(), self.date.clone())
    }

    async fn fetch(api: &dyn HrApi) -> ApiResult<Vec<Self>> {
        api.attendance().await
    }
}

pub type AttendancePage = ListPage<AttendanceRecord>;

/// One formatted table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRow {
    pub emp_id: String,
    pub name: String,
    pub date: String,
    pub check_in: String,
    pub check_out: String,
    pub worked: String,
    pub status: String,
}

impl From<&AttendanceRecord> for AttendanceRow {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            emp_id: record.emp_id.clone(),
            name: record.full_name(),
            date: format::date(record.date.as_deref()),
            check_in: format::clock_time(record.check_in_time.as_deref()),
            check_out: format::clock_time(record.check_out_time.as_deref()),
            worked: format::work_duration(record.total_work_hours.as_ref()),
            status: record.status.clone(),
        }
    }
}

impl ListPage<AttendanceRecord> {
    pub fn rows(&self) -> Vec<AttendanceRow> {
        self.view.visible().map(AttendanceRow::from).collect()
    }
}
