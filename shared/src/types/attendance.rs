use serde::{Deserialize, Serialize};

/// `total_work_hours` as the backend serialises a Postgres interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDuration {
    #[serde(default)]
    pub seconds: Option<i64>,
}

/// Row of `/hr/EmployeesAttendance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub emp_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default)]
    pub check_out_time: Option<String>,
    #[serde(default)]
    pub total_work_hours: Option<WorkDuration>,
    #[serde(default)]
    pub status: String,
}

impl AttendanceRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The attendance endpoint answers `{ "data": [...] }`; older deployments
/// answer with the bare array. Both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AttendanceEnvelope {
    Wrapped {
        #[serde(default)]
        data: Vec<AttendanceRecord>,
    },
    Bare(Vec<AttendanceRecord>),
}

impl AttendanceEnvelope {
    pub fn into_records(self) -> Vec<AttendanceRecord> {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(records) => records,
        }
    }
}
