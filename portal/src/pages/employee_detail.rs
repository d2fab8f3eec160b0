use tracing::warn;

use shared::types::Employee;

use crate::api::HrApi;
use crate::format;
use crate::view::LoadState;

#[derive(Debug, Clone)]
pub struct EmployeeDetail {
    pub emp_id: String,
    pub employee: Option<Employee>,
    pub state: LoadState,
}

impl EmployeeDetail {
    pub fn new(emp_id: impl Into<String>) -> Self {
        Self {
            emp_id: emp_id.into(),
            employee: None,
            state: LoadState::Idle,
        }
    }

    pub async fn load(&mut self, api: &dyn HrApi) {
        self.state = LoadState::Loading;
        match api.employee(&self.emp_id).await {
            Ok(employee) => {
                self.employee = Some(employee);
                self.state = LoadState::Ready;
            }
            Err(e) => {
                warn!("Employee {} failed to load: {}", self.emp_id, e);
                self.employee = None;
                self.state = LoadState::Failed;
            }
        }
    }

    /// Label/value pairs shown on the profile card.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let Some(e) = &self.employee else {
            return Vec::new();
        };
        let or_dash = |v: &Option<String>| {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(format::MISSING)
                .to_string()
        };
        vec![
            ("Name", e.full_name()),
            ("Employee ID", e.emp_id.clone()),
            ("Email", e.email.clone()),
            ("Department", e.department.clone()),
            ("Role", e.role.clone()),
            ("Phone", or_dash(&e.phone_number)),
            ("Address", or_dash(&e.address)),
            ("Join Date", format::date(e.join_date.as_deref())),
        ]
    }
}
