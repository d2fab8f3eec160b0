#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jsonwebtoken::{EncodingKey, Header};
use hyper::StatusCode;

use portal::api::{ApiError, ApiResult, HrApi};
use shared::types::*;

pub const NOW: u64 = 1_800_000_000;

pub fn identity(exp: u64) -> Identity {
    Identity {
        email: "hr@corp.io".to_string(),
        hr_id: 7,
        exp,
        iat: Some(NOW - 60),
    }
}

pub fn token(identity: &Identity) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        identity,
        &EncodingKey::from_secret(b"only-the-backend-knows"),
    )
    .unwrap()
}

pub fn leave(id: i64, name: &str, status: &str) -> LeaveRequest {
    LeaveRequest {
        id,
        emp_id: format!("E{}", id),
        full_name: name.to_string(),
        leave_type: "Casual".to_string(),
        starting_date: Some("2024-06-01".to_string()),
        ending_date: Some("2024-06-02".to_string()),
        total_days: Some(2),
        reason: "family".to_string(),
        status: status.to_string(),
        approved_by: None,
        created_at: None,
    }
}

pub fn task(id: i64, title: &str) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: "details".to_string(),
        start_date: Some("2024-05-01".to_string()),
        due_date: Some("2024-05-09".to_string()),
        priority: "Medium".to_string(),
        status: "Pending".to_string(),
        assigned_to: Some(3),
        assigned_by: Some(7),
        assigned_to_name: Some("Ada Lovelace".to_string()),
        assigned_by_name: None,
        remarks: None,
    }
}

pub fn employee(emp_id: &str, first: &str, department: &str) -> Employee {
    Employee {
        emp_id: emp_id.to_string(),
        first_name: first.to_string(),
        last_name: "Doe".to_string(),
        email: format!("{}@corp.io", first.to_lowercase()),
        department: department.to_string(),
        role: "Staff".to_string(),
        phone_number: None,
        address: None,
        join_date: None,
        image: None,
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub employees: Vec<Employee>,
    pub leaves: Vec<LeaveRequest>,
    pub tasks: Vec<Task>,
    pub attendance: Vec<AttendanceRecord>,
    pub basics: Vec<EmployeeBasic>,
    pub recent: Vec<RecentEmployee>,
    pub active: Vec<ActiveTask>,
    pub on_leave: Vec<EmployeeOnLeave>,
    pub login_token: Option<String>,
    /// Calls made, by operation name.
    pub calls: Vec<String>,
    /// Operation names that answer 500.
    pub failing: HashSet<&'static str>,
}

/// In-memory backend that applies mutations the way the real one does.
#[derive(Debug, Default, Clone)]
pub struct FakeApi {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn new(state: FakeState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn fail(&self, op: &'static str) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == op).count()
    }

    fn enter(&self, op: &'static str) -> ApiResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op.to_string());
        if state.failing.contains(op) {
            return Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("{} exploded", op),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl HrApi for FakeApi {
    async fn login(&self, _email: &str, _password: &str) -> ApiResult<LoginResponse> {
        let state = self.enter("login")?;
        match &state.login_token {
            Some(token) => Ok(LoginResponse {
                token: token.clone(),
                message: "Login successful".to_string(),
            }),
            None => Err(ApiError::Status {
                status: StatusCode::UNAUTHORIZED,
                message: "Invalid credentials".to_string(),
            }),
        }
    }

    async fn employees(&self) -> ApiResult<Vec<Employee>> {
        Ok(self.enter("employees")?.employees.clone())
    }

    async fn employee(&self, emp_id: &str) -> ApiResult<Employee> {
        self.enter("employee")?
            .employees
            .iter()
            .find(|e| e.emp_id == emp_id)
            .cloned()
            .ok_or(ApiError::EmptyResult("employee"))
    }

    async fn employee_basics(&self) -> ApiResult<Vec<EmployeeBasic>> {
        Ok(self.enter("employee_basics")?.basics.clone())
    }

    async fn create_employee(&self, employee: &NewEmployee) -> ApiResult<()> {
        let mut state = self.enter("create_employee")?;
        state.employees.push(Employee {
            emp_id: employee.emp_id.clone(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            department: employee.department.clone(),
            role: employee.role.clone(),
            phone_number: Some(employee.phone_number.clone()),
            address: Some(employee.address.clone()),
            join_date: Some(employee.join_date.clone()),
            image: None,
        });
        Ok(())
    }

    async fn delete_employee(&self, emp_id: &str) -> ApiResult<()> {
        let mut state = self.enter("delete_employee")?;
        state.employees.retain(|e| e.emp_id != emp_id);
        Ok(())
    }

    async fn leave_requests(&self) -> ApiResult<Vec<LeaveRequest>> {
        Ok(self.enter("leave_requests")?.leaves.clone())
    }

    async fn change_leave_status(&self, leave_id: i64, decision: LeaveDecision) -> ApiResult<()> {
        let mut state = self.enter("change_leave_status")?;
        let leave = state
            .leaves
            .iter_mut()
            .find(|l| l.id == leave_id)
            .ok_or(ApiError::EmptyResult("leave"))?;
        leave.status = decision.as_str().to_string();
        Ok(())
    }

    async fn record_leave_approver(&self, leave_id: i64, hr_email: &str) -> ApiResult<()> {
        let mut state = self.enter("record_leave_approver")?;
        let leave = state
            .leaves
            .iter_mut()
            .find(|l| l.id == leave_id)
            .ok_or(ApiError::EmptyResult("leave"))?;
        leave.approved_by = Some(hr_email.to_string());
        Ok(())
    }

    async fn tasks(&self) -> ApiResult<Vec<Task>> {
        Ok(self.enter("tasks")?.tasks.clone())
    }

    async fn task(&self, task_id: i64) -> ApiResult<Task> {
        self.enter("task")?
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
            .ok_or(ApiError::EmptyResult("task"))
    }

    async fn create_task(&self, new_task: &NewTask) -> ApiResult<()> {
        let mut state = self.enter("create_task")?;
        let id = state.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        state.tasks.push(Task {
            id,
            title: new_task.title.clone(),
            description: new_task.description.clone(),
            start_date: Some(new_task.start_date.clone()),
            due_date: Some(new_task.due_date.clone()),
            priority: new_task.priority.clone(),
            status: new_task.status.clone(),
            assigned_to: Some(new_task.assigned_to),
            assigned_by: Some(new_task.assigned_by),
            assigned_to_name: None,
            assigned_by_name: None,
            remarks: Some(new_task.remarks.clone()),
        });
        Ok(())
    }

    async fn update_task_field(&self, update: &TaskFieldUpdate) -> ApiResult<()> {
        let mut state = self.enter("update_task_field")?;
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == update.task_id)
            .ok_or(ApiError::EmptyResult("task"))?;
        let text = update.value.as_str().unwrap_or_default().to_string();
        match update.field.as_str() {
            "title" => task.title = text,
            "description" => task.description = text,
            "start_date" => task.start_date = Some(text),
            "due_date" => task.due_date = Some(text),
            "priority" => task.priority = text,
            "status" => task.status = text,
            "remarks" => task.remarks = Some(text),
            "assigned_to" => task.assigned_to = update.value.as_i64(),
            _ => {}
        }
        Ok(())
    }

    async fn recent_employees(&self) -> ApiResult<Vec<RecentEmployee>> {
        Ok(self.enter("recent_employees")?.recent.clone())
    }

    async fn active_tasks(&self) -> ApiResult<Vec<ActiveTask>> {
        Ok(self.enter("active_tasks")?.active.clone())
    }

    async fn employees_on_leave(&self) -> ApiResult<Vec<EmployeeOnLeave>> {
        Ok(self.enter("employees_on_leave")?.on_leave.clone())
    }

    async fn attendance(&self) -> ApiResult<Vec<AttendanceRecord>> {
        Ok(self.enter("attendance")?.attendance.clone())
    }

    async fn score(
        &self,
        model: PredictionModel,
        _payload: &serde_json::Value,
    ) -> ApiResult<PredictionResult> {
        self.enter("score")?;
        Ok(PredictionResult {
            prediction: format!("{} ok", model),
            probability: Some(0.25),
        })
    }
}
