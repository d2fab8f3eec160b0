use std::fmt;

use serde::{Deserialize, Serialize};

/// Leave request row of `/hr/get-all-employees-leaves`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: i64,
    #[serde(default)]
    pub emp_id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub leave_type: String,
    #[serde(default)]
    pub starting_date: Option<String>,
    #[serde(default)]
    pub ending_date: Option<String>,
    #[serde(default)]
    pub total_days: Option<i64>,
    #[serde(default)]
    pub reason: String,
    /// Kept as text: the server owns the set of statuses.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `{ "allEmployeesLeaveRequests": [...] }`
#[derive(Debug, Default, Deserialize)]
pub struct LeaveRequestsEnvelope {
    #[serde(default, rename = "allEmployeesLeaveRequests")]
    pub all_employees_leave_requests: Vec<LeaveRequest>,
}

/// Decisions an HR user can take on a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveDecision {
    Approved,
    Rejected,
}

impl LeaveDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for LeaveDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /hr/change-leave-status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveStatusChange {
    pub status: LeaveDecision,
    pub leave_id: i64,
}

/// Body of `POST /hr/change-leave-detail`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveApprover {
    pub leave_id: i64,
    pub hr_email: String,
}
