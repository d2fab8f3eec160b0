//! REST collaborator.
//!
//! [`HrApi`] is the seam every page, the session and the dispatcher talk
//! through. [`HttpApi`] is the hyper implementation; tests substitute an
//! in-memory double.

pub mod endpoints;
pub mod http;
pub mod multipart;

use async_trait::async_trait;
use hyper::StatusCode;
use thiserror::Error;

use shared::types::{
    ActiveTask, AttendanceRecord, Employee, EmployeeBasic, EmployeeOnLeave, LeaveDecision,
    LeaveRequest, LoginResponse, NewEmployee, NewTask, PredictionModel, PredictionResult,
    RecentEmployee, Task, TaskFieldUpdate,
};

pub use self::http::HttpApi;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid request uri: {0}")]
    InvalidUri(#[from] ::http::uri::InvalidUri),

    #[error("failed to build request: {0}")]
    Request(#[from] ::http::Error),

    #[error("transport error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("server responded {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0} not found")]
    EmptyResult(&'static str),

    #[error("no scoring service configured")]
    ScoringDisabled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// The backend refused the credential: the session should be dropped.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Status { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }

    /// Message suitable for a user-facing notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Transport(_) => "Could not reach the HR server".to_string(),
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Every call the portal makes against the HR backend.
///
/// List calls decode a missing collection key as an empty list; the single
/// record calls fail with [`ApiError::EmptyResult`] when nothing comes back.
#[async_trait]
pub trait HrApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse>;

    async fn employees(&self) -> ApiResult<Vec<Employee>>;
    async fn employee(&self, emp_id: &str) -> ApiResult<Employee>;
    async fn employee_basics(&self) -> ApiResult<Vec<EmployeeBasic>>;
    async fn create_employee(&self, employee: &NewEmployee) -> ApiResult<()>;
    async fn delete_employee(&self, emp_id: &str) -> ApiResult<()>;

    async fn leave_requests(&self) -> ApiResult<Vec<LeaveRequest>>;
    async fn change_leave_status(&self, leave_id: i64, decision: LeaveDecision) -> ApiResult<()>;
    async fn record_leave_approver(&self, leave_id: i64, hr_email: &str) -> ApiResult<()>;

    async fn tasks(&self) -> ApiResult<Vec<Task>>;
    async fn task(&self, task_id: i64) -> ApiResult<Task>;
    async fn create_task(&self, task: &NewTask) -> ApiResult<()>;
    async fn update_task_field(&self, update: &TaskFieldUpdate) -> ApiResult<()>;

    async fn recent_employees(&self) -> ApiResult<Vec<RecentEmployee>>;
    async fn active_tasks(&self) -> ApiResult<Vec<ActiveTask>>;
    async fn employees_on_leave(&self) -> ApiResult<Vec<EmployeeOnLeave>>;

    async fn attendance(&self) -> ApiResult<Vec<AttendanceRecord>>;

    async fn score(
        &self,
        model: PredictionModel,
        payload: &serde_json::Value,
    ) -> ApiResult<PredictionResult>;
}
