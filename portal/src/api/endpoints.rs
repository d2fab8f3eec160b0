//! Paths of the HR backend, relative to the configured base URL.

use std::borrow::Cow;

pub const LOGIN: &str = "/login-hr";

pub const EMPLOYEES: &str = "/hr/employees-list";
pub const EMPLOYEE_BASICS: &str = "/get-employee-basic_details";
pub const CREATE_EMPLOYEE: &str = "/create-employee";

pub const LEAVE_REQUESTS: &str = "/hr/get-all-employees-leaves";
pub const CHANGE_LEAVE_STATUS: &str = "/hr/change-leave-status";
pub const CHANGE_LEAVE_DETAIL: &str = "/hr/change-leave-detail";

pub const TASKS: &str = "/hr/get-all-tasks";
pub const CREATE_TASK: &str = "/hr/create-task";
pub const UPDATE_TASK_FIELD: &str = "/hr/update-task-field";

pub const RECENT_EMPLOYEES: &str = "/hr/dashboard/RecentlyJoinedEmployees";
pub const ACTIVE_TASKS: &str = "/hr/dashboard/ActiveTasks";
pub const EMPLOYEES_ON_LEAVE: &str = "/hr/dashboard/EmployeesOnLeave";

pub const ATTENDANCE: &str = "/hr/EmployeesAttendance";

fn segment(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}

pub fn employee(emp_id: &str) -> String {
    format!("/hr/employee/{}", segment(emp_id))
}

pub fn delete_employee(emp_id: &str) -> String {
    format!("/delete-employee/{}", segment(emp_id))
}

pub fn task(task_id: i64) -> String {
    format!("/tasks/get-task/{}", task_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_ids_are_encoded_as_one_segment() {
        assert_eq!(employee("EMP001"), "/hr/employee/EMP001");
        assert_eq!(delete_employee("a/b c"), "/delete-employee/a%2Fb%20c");
    }

    #[test]
    fn task_path_uses_numeric_id() {
        assert_eq!(task(42), "/tasks/get-task/42");
    }
}
