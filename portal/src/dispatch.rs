//! State-changing calls.
//!
//! The dispatcher never patches a local collection. Each action names the
//! [`CollectionKey`] it made stale; the page marks it in [`Invalidations`]
//! and re-fetches from the server.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{error, info};

use shared::types::{LeaveDecision, NewEmployee, Task, TaskFieldUpdate};

use crate::api::{ApiError, HrApi};
use crate::format::iso_date;
use crate::session::Session;
use crate::validation::TaskDraft;
use crate::view::CollectionKey;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("you are not signed in")]
    SignedOut,

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("leave {leave_id} was {decision} but the approver could not be recorded: {source}")]
    ApproverNotRecorded {
        leave_id: i64,
        decision: LeaveDecision,
        source: ApiError,
    },

    #[error("task {task_id}: only {applied} of {total} changes were saved: {source}")]
    PartialUpdate {
        task_id: i64,
        applied: usize,
        total: usize,
        source: ApiError,
    },
}

impl ActionError {
    /// Collection the failed action still changed on the server.
    pub fn invalidates(&self) -> Option<CollectionKey> {
        match self {
            Self::ApproverNotRecorded { .. } => Some(CollectionKey::Leaves),
            Self::PartialUpdate { applied, .. } if *applied > 0 => Some(CollectionKey::Tasks),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::SignedOut => true,
            Self::Api(e) => e.is_unauthorized(),
            Self::ApproverNotRecorded { source, .. } | Self::PartialUpdate { source, .. } => {
                source.is_unauthorized()
            }
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// A successful action: what to re-fetch and what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub invalidates: CollectionKey,
    pub notice: String,
}

impl Dispatched {
    fn new(invalidates: CollectionKey, notice: impl Into<String>) -> Self {
        Self {
            invalidates,
            notice: notice.into(),
        }
    }
}

pub type ActionResult = Result<Dispatched, ActionError>;

/// Collections waiting to be re-fetched.
#[derive(Debug, Clone, Default)]
pub struct Invalidations {
    stale: BTreeSet<CollectionKey>,
}

impl Invalidations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self, key: CollectionKey) {
        self.stale.insert(key);
    }

    /// Record whatever `result` made stale, on success or failure.
    pub fn record(&mut self, result: &ActionResult) {
        let key = match result {
            Ok(done) => Some(done.invalidates),
            Err(e) => e.invalidates(),
        };
        if let Some(key) = key {
            self.invalidate(key);
        }
    }

    /// Clear and report the flag for `key`.
    pub fn take(&mut self, key: CollectionKey) -> bool {
        self.stale.remove(&key)
    }

    pub fn is_stale(&self, key: CollectionKey) -> bool {
        self.stale.contains(&key)
    }
}

pub struct ActionDispatcher<'a> {
    api: &'a dyn HrApi,
    session: &'a Session,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(api: &'a dyn HrApi, session: &'a Session) -> Self {
        Self { api, session }
    }

    /// Approve or reject a leave request, then stamp the actor as approver.
    pub async fn decide_leave(&self, leave_id: i64, decision: LeaveDecision) -> ActionResult {
        let actor = self.session.actor_email().ok_or(ActionError::SignedOut)?;

        self.api
            .change_leave_status(leave_id, decision)
            .await
            .map_err(|e| {
                error!("Changing leave {} to {} failed: {}", leave_id, decision, e);
                ActionError::Api(e)
            })?;

        if let Err(source) = self.api.record_leave_approver(leave_id, actor).await {
            error!("Recording approver of leave {} failed: {}", leave_id, source);
            return Err(ActionError::ApproverNotRecorded {
                leave_id,
                decision,
                source,
            });
        }

        info!("Leave {} {} by {}", leave_id, decision, actor);
        Ok(Dispatched::new(
            CollectionKey::Leaves,
            format!("Leave request {}", decision.as_str().to_lowercase()),
        ))
    }

    pub async fn create_task(&self, draft: TaskDraft) -> ActionResult {
        let hr_id = self
            .session
            .identity()
            .map(|i| i.hr_id)
            .ok_or(ActionError::SignedOut)?;
        let task = draft.into_new_task(hr_id);

        self.api.create_task(&task).await.map_err(|e| {
            error!("Creating task {:?} failed: {}", task.title, e);
            ActionError::Api(e)
        })?;

        info!("Task {:?} assigned to {} by {}", task.title, task.assigned_to, hr_id);
        Ok(Dispatched::new(CollectionKey::Tasks, "Task created successfully"))
    }

    /// Send one field update per field that differs from `original`.
    pub async fn update_task(&self, original: &Task, draft: &TaskDraft) -> ActionResult {
        if !self.session.is_authenticated() {
            return Err(ActionError::SignedOut);
        }

        let updates = task_updates(original, draft);
        if updates.is_empty() {
            return Ok(Dispatched::new(CollectionKey::Tasks, "No changes to save"));
        }

        let total = updates.len();
        for (applied, update) in updates.iter().enumerate() {
            if let Err(source) = self.api.update_task_field(update).await {
                error!(
                    "Updating {} of task {} failed: {}",
                    update.field, original.id, source
                );
                return Err(ActionError::PartialUpdate {
                    task_id: original.id,
                    applied,
                    total,
                    source,
                });
            }
        }

        info!("Task {} updated ({} fields)", original.id, total);
        Ok(Dispatched::new(CollectionKey::Tasks, "Task updated successfully"))
    }

    pub async fn create_employee(&self, employee: &NewEmployee) -> ActionResult {
        if !self.session.is_authenticated() {
            return Err(ActionError::SignedOut);
        }

        self.api.create_employee(employee).await.map_err(|e| {
            error!("Creating employee {} failed: {}", employee.emp_id, e);
            ActionError::Api(e)
        })?;

        info!("Employee {} created", employee.emp_id);
        Ok(Dispatched::new(
            CollectionKey::Employees,
            "Employee added successfully",
        ))
    }

    pub async fn delete_employee(&self, emp_id: &str) -> ActionResult {
        if !self.session.is_authenticated() {
            return Err(ActionError::SignedOut);
        }

        self.api.delete_employee(emp_id).await.map_err(|e| {
            error!("Deleting employee {} failed: {}", emp_id, e);
            ActionError::Api(e)
        })?;

        info!("Employee {} deleted", emp_id);
        Ok(Dispatched::new(
            CollectionKey::Employees,
            "Employee deleted successfully",
        ))
    }
}

/// Field updates turning `original` into `draft`, in form order.
pub fn task_updates(original: &Task, draft: &TaskDraft) -> Vec<TaskFieldUpdate> {
    let mut updates = Vec::new();
    let mut text = |field: &str, before: &str, after: &str| {
        if before != after {
            updates.push(TaskFieldUpdate {
                task_id: original.id,
                field: field.to_string(),
                value: serde_json::Value::from(after),
            });
        }
    };

    text("title", &original.title, &draft.title);
    text("description", &original.description, &draft.description);
    text(
        "start_date",
        &iso_date(original.start_date.as_deref()),
        &draft.start_date,
    );
    text(
        "due_date",
        &iso_date(original.due_date.as_deref()),
        &draft.due_date,
    );
    text("priority", &original.priority, &draft.priority);
    text("status", &original.status, &draft.status);
    text(
        "remarks",
        original.remarks.as_deref().unwrap_or(""),
        &draft.remarks,
    );

    if original.assigned_to != Some(draft.assigned_to) {
        updates.push(TaskFieldUpdate {
            task_id: original.id,
            field: "assigned_to".to_string(),
            value: serde_json::Value::from(draft.assigned_to),
        });
    }

    updates
}
