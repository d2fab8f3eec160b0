use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEmployee {
    #[serde(default)]
    pub emp_id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveTask {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeOnLeave {
    #[serde(default)]
    pub employee_name: String,
    #[serde(default)]
    pub leave_type: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentEmployeesEnvelope {
    #[serde(default, rename = "recentlyJoinedEmployeesList")]
    pub recently_joined_employees_list: Vec<RecentEmployee>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActiveTasksEnvelope {
    #[serde(default, rename = "activeTasksData")]
    pub active_tasks_data: Vec<ActiveTask>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmployeesOnLeaveEnvelope {
    #[serde(default, rename = "employeesOnLeaveData")]
    pub employees_on_leave_data: Vec<EmployeeOnLeave>,
}
