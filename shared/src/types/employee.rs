use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Departments offered by the employee forms and the employee list facet.
pub const DEPARTMENTS: [&str; 4] = ["HR", "Engineering", "Sales", "Finance"];

/// Full employee record as returned by `/hr/employees-list` and
/// `/hr/employee/:emp_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub emp_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub join_date: Option<String>,
    /// Server-relative path of the profile picture.
    #[serde(default)]
    pub image: Option<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Row of `/get-employee-basic_details`, used to pick a task assignee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeBasic {
    pub id: i64,
    #[serde(default)]
    pub emp_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl EmployeeBasic {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// `{ "employees": [...] }`
#[derive(Debug, Default, Deserialize)]
pub struct EmployeesEnvelope {
    #[serde(default)]
    pub employees: Vec<Employee>,
}

/// `{ "employee": {...} }`
#[derive(Debug, Deserialize)]
pub struct EmployeeEnvelope {
    pub employee: Employee,
}

/// Validated content of the "add employee" form. Sent as multipart, so it is
/// not serde-serialisable.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub emp_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub department: String,
    pub role: String,
    pub phone_number: String,
    pub address: String,
    pub join_date: String,
    /// Local file uploaded as the `image` part.
    pub image: PathBuf,
}

impl NewEmployee {
    /// Text parts of the multipart body, in wire order.
    pub fn text_fields(&self) -> [(&'static str, &str); 10] {
        [
            ("emp_id", &self.emp_id),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("password", &self.password),
            ("department", &self.department),
            ("role", &self.role),
            ("phone_number", &self.phone_number),
            ("address", &self.address),
            ("join_date", &self.join_date),
        ]
    }
}
