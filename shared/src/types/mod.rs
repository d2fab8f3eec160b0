pub mod attendance;
pub mod claims;
pub mod client_config;
pub mod dashboard;
pub mod employee;
pub mod json_error;
pub mod leave;
pub mod login;
pub mod prediction;
pub mod task;

pub use self::attendance::{AttendanceEnvelope, AttendanceRecord, WorkDuration};
pub use self::claims::Identity;
pub use self::dashboard::{
    ActiveTask, ActiveTasksEnvelope, EmployeeOnLeave, EmployeesOnLeaveEnvelope, RecentEmployee,
    RecentEmployeesEnvelope,
};
pub use self::employee::{
    DEPARTMENTS, Employee, EmployeeBasic, EmployeeEnvelope, EmployeesEnvelope, NewEmployee,
};
pub use self::json_error::ErrorResponse;
pub use self::leave::{
    LeaveApprover, LeaveDecision, LeaveRequest, LeaveRequestsEnvelope, LeaveStatusChange,
};
pub use self::login::{LoginData, LoginError, LoginResponse};
pub use self::prediction::{PredictionModel, PredictionResult};
pub use self::task::{
    NewTask, TASK_PRIORITIES, TASK_STATUSES, Task, TaskEnvelope, TaskFieldUpdate, TasksEnvelope,
};
