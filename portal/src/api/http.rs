use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, Uri, header};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use shared::types::{
    ActiveTask, ActiveTasksEnvelope, AttendanceEnvelope, AttendanceRecord, Employee,
    EmployeeBasic, EmployeeEnvelope, EmployeeOnLeave, EmployeesEnvelope,
    EmployeesOnLeaveEnvelope, ErrorResponse, LeaveApprover, LeaveDecision, LeaveRequest,
    LeaveRequestsEnvelope, LeaveStatusChange, LoginData, LoginResponse, NewEmployee, NewTask,
    PredictionModel, PredictionResult, RecentEmployee, RecentEmployeesEnvelope, Task,
    TaskEnvelope, TaskFieldUpdate, TasksEnvelope,
};

use super::multipart::Multipart;
use super::{ApiError, ApiResult, HrApi, endpoints};
use crate::session::TokenStore;

const JSON: &str = "application/json";

/// Body of a request before it is handed to hyper.
enum Payload {
    Empty,
    Json(Vec<u8>),
    Multipart { content_type: String, body: Bytes },
}

/// [`HrApi`] over a hyper-util client.
///
/// Every request carries the persisted credential (when there is one) as a
/// bearer token, read from the token store at send time so a login or
/// logout is picked up by the next call.
pub struct HttpApi {
    client: Client<HttpConnector, Full<Bytes>>,
    base: String,
    scoring: Option<String>,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApi")
            .field("base", &self.base)
            .field("scoring", &self.scoring)
            .finish_non_exhaustive()
    }
}

impl HttpApi {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self {
            client,
            base: base_url.trim_end_matches('/').to_string(),
            scoring: None,
            tokens,
        }
    }

    /// Enable the prediction pages against `scoring_url`.
    pub fn with_scoring_url(mut self, scoring_url: Option<&str>) -> Self {
        self.scoring = scoring_url.map(|u| u.trim_end_matches('/').to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn bearer(&self) -> Option<String> {
        match self.tokens.load() {
            Ok(token) => token.map(|t| format!("Bearer {}", t)),
            Err(e) => {
                warn!("Could not read the stored token: {}", e);
                None
            }
        }
    }

    async fn send(&self, method: Method, url: &str, payload: Payload) -> ApiResult<Bytes> {
        let uri: Uri = url.parse()?;
        let mut builder = Request::builder()
            .method(method.clone())
            .uri(uri)
            .header(header::ACCEPT, JSON);

        if let Some(bearer) = self.bearer() {
            builder = builder.header(header::AUTHORIZATION, bearer);
        }

        let request = match payload {
            Payload::Empty => builder.body(Full::new(Bytes::new()))?,
            Payload::Json(body) => builder
                .header(header::CONTENT_TYPE, JSON)
                .body(Full::new(Bytes::from(body)))?,
            Payload::Multipart { content_type, body } => builder
                .header(header::CONTENT_TYPE, content_type)
                .body(Full::new(body))?,
        };

        debug!("{} {}", method, url);

        let response = self.client.request(request).await.map_err(|e| {
            error!("{} {} failed: {}", method, url, e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        let body = response.into_body().collect().await?.to_bytes();

        if !status.is_success() {
            let message = ErrorResponse::message_from(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            warn!("{} {} answered {}: {}", method, url, status.as_u16(), message);
            return Err(ApiError::Status { status, message });
        }

        debug!("{} {} answered {} ({} bytes)", method, url, status.as_u16(), body.len());
        Ok(body)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let body = self.send(Method::GET, &self.url(path), Payload::Empty).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, data: &B) -> ApiResult<Bytes> {
        let body = serde_json::to_vec(data)?;
        self.send(Method::POST, &self.url(path), Payload::Json(body))
            .await
    }
}

#[async_trait]
impl HrApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let data = LoginData {
            email: email.to_string(),
            password: password.to_string(),
        };
        let body = self.post_json(endpoints::LOGIN, &data).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn employees(&self) -> ApiResult<Vec<Employee>> {
        let envelope: EmployeesEnvelope = self.get_json(endpoints::EMPLOYEES).await?;
        Ok(envelope.employees)
    }

    async fn employee(&self, emp_id: &str) -> ApiResult<Employee> {
        let envelope: EmployeeEnvelope = self.get_json(&endpoints::employee(emp_id)).await?;
        Ok(envelope.employee)
    }

    async fn employee_basics(&self) -> ApiResult<Vec<EmployeeBasic>> {
        self.get_json(endpoints::EMPLOYEE_BASICS).await
    }

    async fn create_employee(&self, employee: &NewEmployee) -> ApiResult<()> {
        let image = tokio::fs::read(&employee.image).await?;

        let mut form = Multipart::new();
        for (name, value) in employee.text_fields() {
            form.text(name, value);
        }
        form.file("image", &employee.image, &image);

        let payload = Payload::Multipart {
            content_type: form.content_type(),
            body: form.finish(),
        };
        self.send(Method::POST, &self.url(endpoints::CREATE_EMPLOYEE), payload)
            .await?;
        Ok(())
    }

    async fn delete_employee(&self, emp_id: &str) -> ApiResult<()> {
        let url = self.url(&endpoints::delete_employee(emp_id));
        self.send(Method::DELETE, &url, Payload::Empty).await?;
        Ok(())
    }

    async fn leave_requests(&self) -> ApiResult<Vec<LeaveRequest>> {
        let envelope: LeaveRequestsEnvelope = self.get_json(endpoints::LEAVE_REQUESTS).await?;
        Ok(envelope.all_employees_leave_requests)
    }

    async fn change_leave_status(&self, leave_id: i64, decision: LeaveDecision) -> ApiResult<()> {
        let change = LeaveStatusChange {
            status: decision,
            leave_id,
        };
        self.post_json(endpoints::CHANGE_LEAVE_STATUS, &change)
            .await?;
        Ok(())
    }

    async fn record_leave_approver(&self, leave_id: i64, hr_email: &str) -> ApiResult<()> {
        let approver = LeaveApprover {
            leave_id,
            hr_email: hr_email.to_string(),
        };
        self.post_json(endpoints::CHANGE_LEAVE_DETAIL, &approver)
            .await?;
        Ok(())
    }

    async fn tasks(&self) -> ApiResult<Vec<Task>> {
        let envelope: TasksEnvelope = self.get_json(endpoints::TASKS).await?;
        Ok(envelope.tasks)
    }

    async fn task(&self, task_id: i64) -> ApiResult<Task> {
        let envelope: TaskEnvelope = self.get_json(&endpoints::task(task_id)).await?;
        envelope
            .task
            .into_iter()
            .next()
            .ok_or(ApiError::EmptyResult("task"))
    }

    async fn create_task(&self, task: &NewTask) -> ApiResult<()> {
        self.post_json(endpoints::CREATE_TASK, task).await?;
        Ok(())
    }

    async fn update_task_field(&self, update: &TaskFieldUpdate) -> ApiResult<()> {
        self.post_json(endpoints::UPDATE_TASK_FIELD, update).await?;
        Ok(())
    }

    async fn recent_employees(&self) -> ApiResult<Vec<RecentEmployee>> {
        let envelope: RecentEmployeesEnvelope = self.get_json(endpoints::RECENT_EMPLOYEES).await?;
        Ok(envelope.recently_joined_employees_list)
    }

    async fn active_tasks(&self) -> ApiResult<Vec<ActiveTask>> {
        let envelope: ActiveTasksEnvelope = self.get_json(endpoints::ACTIVE_TASKS).await?;
        Ok(envelope.active_tasks_data)
    }

    async fn employees_on_leave(&self) -> ApiResult<Vec<EmployeeOnLeave>> {
        let envelope: EmployeesOnLeaveEnvelope =
            self.get_json(endpoints::EMPLOYEES_ON_LEAVE).await?;
        Ok(envelope.employees_on_leave_data)
    }

    async fn attendance(&self) -> ApiResult<Vec<AttendanceRecord>> {
        let envelope: AttendanceEnvelope = self.get_json(endpoints::ATTENDANCE).await?;
        Ok(envelope.into_records())
    }

    async fn score(
        &self,
        model: PredictionModel,
        payload: &serde_json::Value,
    ) -> ApiResult<PredictionResult> {
        let base = self.scoring.as_deref().ok_or(ApiError::ScoringDisabled)?;
        let url = format!("{}{}", base, model.path());
        let body = serde_json::to_vec(payload)?;
        let body = self.send(Method::POST, &url, Payload::Json(body)).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let api = HttpApi::new("http://localhost:5000/api/", Arc::new(MemoryTokenStore::new()))
            .with_scoring_url(Some("http://localhost:8000/"));
        assert_eq!(api.base_url(), "http://localhost:5000/api");
        assert_eq!(api.url(endpoints::TASKS), "http://localhost:5000/api/hr/get-all-tasks");
        assert_eq!(api.scoring.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn bearer_follows_the_store() {
        let store = Arc::new(MemoryTokenStore::new());
        let api = HttpApi::new("http://localhost:5000/api", store.clone());
        assert_eq!(api.bearer(), None);

        store.save("abc").unwrap();
        assert_eq!(api.bearer().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn scoring_without_url_is_disabled() {
        let api = HttpApi::new("http://localhost:5000/api", Arc::new(MemoryTokenStore::new()));
        let result = tokio_test::block_on(api.score(PredictionModel::Attrition, &serde_json::json!({})));
        let err = tokio_test::assert_err!(result);
        assert!(matches!(err, ApiError::ScoringDisabled));
    }
}
