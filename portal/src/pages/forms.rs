//! Form screens: add employee, create task, edit task.

use tracing::warn;

use shared::types::{EmployeeBasic, Task};

use super::PageEffect;
use crate::api::HrApi;
use crate::dispatch::ActionDispatcher;
use crate::format::iso_date;
use crate::gate::Route;
use crate::session::Session;
use crate::validation::{self, FieldErrors, FieldKind, FieldRule, FormSchema, FormValues};

/// Values, inline errors and focus of one form.
#[derive(Debug, Clone)]
pub struct FormState {
    schema: FormSchema,
    values: FormValues,
    errors: FieldErrors,
    focus: usize,
}

impl FormState {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            values: schema.blank(),
            schema,
            errors: FieldErrors::new(),
            focus: 0,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused(&self) -> Option<&FieldRule> {
        self.schema.fields.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        let n = self.schema.fields.len();
        if n > 0 {
            self.focus = (self.focus + 1) % n;
        }
    }

    pub fn focus_prev(&mut self) {
        let n = self.schema.fields.len();
        if n > 0 {
            self.focus = (self.focus + n - 1) % n;
        }
    }

    fn focused_name(&self) -> Option<&'static str> {
        self.focused().map(|rule| rule.name)
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(name) = self.focused_name() {
            self.values.entry(name.to_string()).or_default().push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(name) = self.focused_name() {
            if let Some(v) = self.values.get_mut(name) {
                v.pop();
            }
        }
    }

    /// Step a choice field to its next option. Other fields are untouched.
    pub fn cycle_choice(&mut self) {
        let Some(rule) = self.focused().copied() else {
            return;
        };
        let FieldKind::OneOf(options) = rule.kind else {
            return;
        };
        let current = self.value(rule.name);
        let next = options
            .iter()
            .position(|o| *o == current)
            .map(|i| (i + 1) % options.len())
            .unwrap_or(0);
        if let Some(option) = options.get(next) {
            self.set(rule.name, *option);
        }
    }

    /// Run a typed conversion, keeping its errors for inline display.
    pub fn submit<T>(
        &mut self,
        convert: impl FnOnce(&FormValues) -> Result<T, FieldErrors>,
    ) -> Option<T> {
        match convert(&self.values) {
            Ok(value) => {
                self.errors = FieldErrors::new();
                Some(value)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.values = self.schema.blank();
        self.errors = FieldErrors::new();
        self.focus = 0;
    }
}

#[derive(Debug, Clone)]
pub struct AddEmployeePage {
    pub form: FormState,
}

impl Default for AddEmployeePage {
    fn default() -> Self {
        Self {
            form: FormState::new(validation::NEW_EMPLOYEE),
        }
    }
}

impl AddEmployeePage {
    pub async fn submit(&mut self, api: &dyn HrApi, session: &Session) -> PageEffect {
        let Some(employee) = self.form.submit(validation::new_employee) else {
            return PageEffect::None;
        };
        let result = ActionDispatcher::new(api, session)
            .create_employee(&employee)
            .await;
        if result.is_ok() {
            self.form.reset();
        }
        PageEffect::Action {
            result,
            then: Some(Route::Employees),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskFormMode {
    Create,
    Edit(i64),
}

/// Create and edit task share one form; edit pre-fills it from the task.
#[derive(Debug, Clone)]
pub struct TaskFormPage {
    pub mode: TaskFormMode,
    pub form: FormState,
    pub assignees: Vec<EmployeeBasic>,
    original: Option<Task>,
    load_error: Option<String>,
}

impl TaskFormPage {
    pub fn create() -> Self {
        Self::with_mode(TaskFormMode::Create)
    }

    pub fn edit(task_id: i64) -> Self {
        Self::with_mode(TaskFormMode::Edit(task_id))
    }

    fn with_mode(mode: TaskFormMode) -> Self {
        Self {
            mode,
            form: FormState::new(validation::TASK),
            assignees: Vec::new(),
            original: None,
            load_error: None,
        }
    }

    pub fn original(&self) -> Option<&Task> {
        self.original.as_ref()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Fetch the assignee list and, when editing, the task itself.
    pub async fn load(&mut self, api: &dyn HrApi) {
        match api.employee_basics().await {
            Ok(basics) => self.assignees = basics,
            Err(e) => {
                warn!("Assignee list failed to load: {}", e);
                self.assignees = Vec::new();
            }
        }

        if let TaskFormMode::Edit(task_id) = self.mode {
            match api.task(task_id).await {
                Ok(task) => {
                    self.prefill(&task);
                    self.original = Some(task);
                    self.load_error = None;
                }
                Err(e) => {
                    warn!("Task {} failed to load: {}", task_id, e);
                    self.load_error = Some(e.user_message());
                }
            }
        }
    }

    fn prefill(&mut self, task: &Task) {
        self.form.set("title", task.title.as_str());
        self.form.set("description", task.description.as_str());
        self.form.set("start_date", iso_date(task.start_date.as_deref()));
        self.form.set("due_date", iso_date(task.due_date.as_deref()));
        self.form.set("priority", task.priority.as_str());
        self.form.set("status", task.status.as_str());
        self.form.set(
            "assigned_to",
            task.assigned_to.map(|id| id.to_string()).unwrap_or_default(),
        );
        self.form
            .set("remarks", task.remarks.clone().unwrap_or_default());
    }

    /// Name of the selected assignee, for display next to the id.
    pub fn assignee_name(&self) -> Option<String> {
        let id: i64 = self.form.value("assigned_to").trim().parse().ok()?;
        self.assignees
            .iter()
            .find(|b| b.id == id)
            .map(EmployeeBasic::full_name)
    }

    /// Step the assignee through the basic employee list.
    pub fn cycle_assignee(&mut self) {
        if self.assignees.is_empty() {
            return;
        }
        let current: Option<i64> = self.form.value("assigned_to").trim().parse().ok();
        let next = current
            .and_then(|id| self.assignees.iter().position(|b| b.id == id))
            .map(|i| (i + 1) % self.assignees.len())
            .unwrap_or(0);
        let id = self.assignees[next].id;
        self.form.set("assigned_to", id.to_string());
    }

    pub async fn submit(&mut self, api: &dyn HrApi, session: &Session) -> PageEffect {
        let Some(draft) = self.form.submit(validation::task) else {
            return PageEffect::None;
        };
        let dispatcher = ActionDispatcher::new(api, session);
        let result = match (&self.mode, &self.original) {
            (TaskFormMode::Create, _) => dispatcher.create_task(draft).await,
            (TaskFormMode::Edit(_), Some(original)) => dispatcher.update_task(original, &draft).await,
            (TaskFormMode::Edit(task_id), None) => {
                warn!("Edit of task {} submitted before it loaded", task_id);
                return PageEffect::None;
            }
        };
        PageEffect::Action {
            result,
            then: Some(Route::Tasks),
        }
    }
}
