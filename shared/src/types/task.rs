use serde::{Deserialize, Serialize};

pub const TASK_PRIORITIES: [&str; 3] = ["Low", "Medium", "High"];

pub const TASK_STATUSES: [&str; 5] = ["Pending", "In Progress", "On Hold", "Completed", "Cancelled"];

/// Task row of `/hr/get-all-tasks` and `/tasks/get-task/:taskId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub assigned_to: Option<i64>,
    #[serde(default)]
    pub assigned_by: Option<i64>,
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    #[serde(default)]
    pub assigned_by_name: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// `{ "tasks": [...] }`
#[derive(Debug, Default, Deserialize)]
pub struct TasksEnvelope {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// `{ "task": [{...}] }`. The backend wraps the single row in a list.
#[derive(Debug, Default, Deserialize)]
pub struct TaskEnvelope {
    #[serde(default)]
    pub task: Vec<Task>,
}

/// Body of `POST /hr/create-task`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub due_date: String,
    pub priority: String,
    pub status: String,
    pub assigned_to: i64,
    pub assigned_by: i64,
    pub remarks: String,
}

/// Body of `POST /hr/update-task-field`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFieldUpdate {
    #[serde(rename = "taskId")]
    pub task_id: i64,
    pub field: String,
    pub value: serde_json::Value,
}
