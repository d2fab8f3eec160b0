//! Client-side route table and access gate.
//!
//! This is a UX guard, not a security boundary: it only decides whether the
//! terminal shows a protected screen or the login screen. The backend must
//! authorize every request on its own; the HTTP client forwards the token so
//! it can.

use std::fmt;

use shared::types::Identity;

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Employees,
    EmployeeDetail(String),
    AddEmployee,
    Leaves,
    Tasks,
    CreateTask,
    EditTask(i64),
    Attendance,
    PerformanceEvaluation,
    AttritionPrediction,
    NotFound,
}

impl Route {
    /// Map a path to a route. Unknown paths, and known paths with a bad id,
    /// map to [`Route::NotFound`].
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            [] | [""] => Self::Dashboard,
            ["login"] => Self::Login,
            ["employees"] => Self::Employees,
            ["employee", id] if !id.is_empty() => Self::EmployeeDetail((*id).to_string()),
            ["add-employee"] => Self::AddEmployee,
            ["leaves"] => Self::Leaves,
            ["tasks"] => Self::Tasks,
            ["create-task"] => Self::CreateTask,
            ["edit-task", id] => id.parse().map(Self::EditTask).unwrap_or(Self::NotFound),
            ["attendance"] => Self::Attendance,
            ["performance-evaluation"] => Self::PerformanceEvaluation,
            ["predict-attrition"] => Self::AttritionPrediction,
            _ => Self::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/".to_string(),
            Self::Employees => "/employees".to_string(),
            Self::EmployeeDetail(id) => format!("/employee/{}", id),
            Self::AddEmployee => "/add-employee".to_string(),
            Self::Leaves => "/leaves".to_string(),
            Self::Tasks => "/tasks".to_string(),
            Self::CreateTask => "/create-task".to_string(),
            Self::EditTask(id) => format!("/edit-task/{}", id),
            Self::Attendance => "/attendance".to_string(),
            Self::PerformanceEvaluation => "/performance-evaluation".to_string(),
            Self::AttritionPrediction => "/predict-attrition".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Everything except the login screen and the not-found screen needs an
    /// identity.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "HR Sign In",
            Self::Dashboard => "Dashboard",
            Self::Employees => "Employee List",
            Self::EmployeeDetail(_) => "Employee Details",
            Self::AddEmployee => "Add New Employee",
            Self::Leaves => "Employee Leave Requests",
            Self::Tasks => "Tasks List",
            Self::CreateTask => "Create Task",
            Self::EditTask(_) => "Edit Task",
            Self::Attendance => "Employees Attendance",
            Self::PerformanceEvaluation => "Performance Evaluation",
            Self::AttritionPrediction => "Attrition Prediction",
            Self::NotFound => "Not Found",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Entries of the side navigation, in display order.
pub const NAVIGATION: [Route; 7] = [
    Route::Dashboard,
    Route::Employees,
    Route::Attendance,
    Route::Tasks,
    Route::Leaves,
    Route::PerformanceEvaluation,
    Route::AttritionPrediction,
];

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

/// Pure guard: no identity means the visitor goes to the login screen.
pub fn authorize(identity: Option<&Identity>) -> Access {
    match identity {
        Some(_) => Access::Allow,
        None => Access::Redirect(Route::Login),
    }
}

/// Resolve the route that should actually be rendered for `requested`.
///
/// Protected routes go through [`authorize`]; a signed-in user asking for the
/// login screen lands on the dashboard instead.
pub fn resolve(requested: Route, identity: Option<&Identity>) -> Route {
    if requested == Route::Login {
        return match identity {
            Some(_) => Route::Dashboard,
            None => Route::Login,
        };
    }

    if !requested.is_protected() {
        return requested;
    }

    match authorize(identity) {
        Access::Allow => requested,
        Access::Redirect(to) => to,
    }
}
