//! Form schemas and the typed values they produce.
//!
//! A form is a table of [`FieldRule`]s. Validation either yields the typed
//! request body or a [`FieldErrors`] map that the page shows inline; a form
//! with errors is never submitted.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value};

use shared::types::{DEPARTMENTS, LoginData, NewEmployee, NewTask, TASK_PRIORITIES, TASK_STATUSES};

use crate::format::parse_date;

/// Raw text entered per field, keyed by field name.
pub type FormValues = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text { min_len: usize },
    Email,
    Integer { min: Option<i64>, max: Option<i64> },
    Number { min: Option<f64>, max: Option<f64> },
    OneOf(&'static [&'static str]),
    /// `YYYY-MM-DD`
    Date,
    /// Path to a readable local file.
    File,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule {
        name,
        label,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> FieldRule {
    FieldRule {
        name,
        label,
        kind,
        required: false,
    }
}

const TEXT: FieldKind = FieldKind::Text { min_len: 1 };

const fn int(min: i64, max: i64) -> FieldKind {
    FieldKind::Integer {
        min: Some(min),
        max: Some(max),
    }
}

const fn num_min(min: f64) -> FieldKind {
    FieldKind::Number {
        min: Some(min),
        max: None,
    }
}

const fn num(min: f64, max: f64) -> FieldKind {
    FieldKind::Number {
        min: Some(min),
        max: Some(max),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormSchema {
    pub name: &'static str,
    pub fields: &'static [FieldRule],
}

pub const LOGIN: FormSchema = FormSchema {
    name: "login",
    fields: &[
        required("email", "Email", FieldKind::Email),
        required("password", "Password", TEXT),
    ],
};

pub const NEW_EMPLOYEE: FormSchema = FormSchema {
    name: "new employee",
    fields: &[
        required("emp_id", "Employee ID", TEXT),
        required("first_name", "First Name", TEXT),
        required("last_name", "Last Name", TEXT),
        required("email", "Email", FieldKind::Email),
        required("password", "Password", FieldKind::Text { min_len: 6 }),
        required("department", "Department", FieldKind::OneOf(&DEPARTMENTS)),
        required("role", "Role", TEXT),
        required("phone_number", "Phone Number", FieldKind::Text { min_len: 10 }),
        required("address", "Address", FieldKind::Text { min_len: 4 }),
        required("join_date", "Join Date", FieldKind::Date),
        required("image", "Profile Image", FieldKind::File),
    ],
};

pub const TASK: FormSchema = FormSchema {
    name: "task",
    fields: &[
        required("title", "Title", TEXT),
        required("description", "Description", TEXT),
        required("start_date", "Start Date", FieldKind::Date),
        required("due_date", "Due Date", FieldKind::Date),
        required("priority", "Priority", FieldKind::OneOf(&TASK_PRIORITIES)),
        required("status", "Status", FieldKind::OneOf(&TASK_STATUSES)),
        required(
            "assigned_to",
            "Assign To",
            FieldKind::Integer {
                min: Some(1),
                max: None,
            },
        ),
        optional("remarks", "Remarks", FieldKind::Text { min_len: 0 }),
    ],
};

pub const ATTRITION: FormSchema = FormSchema {
    name: "attrition prediction",
    fields: &[
        required("emplyee_id", "Employee ID", TEXT),
        required("employee_name", "Employee Name", TEXT),
        required("Age", "Age", num(18.0, 65.0)),
        required("DistanceFromHome", "Distance From Home", num_min(0.0)),
        required("Education", "Education", num(1.0, 5.0)),
        required("JobSatisfaction", "Job Satisfaction", num(1.0, 5.0)),
        required("MonthlyIncome", "Monthly Income", num_min(0.0)),
        required("OverTime", "Over Time", int(0, 1)),
        required("PercentSalaryHike", "Percent Salary Hike", num_min(0.0)),
        required("TotalWorkingYears", "Total Working Years", num_min(0.0)),
        required("YearsAtCompany", "Years At Company", num_min(0.0)),
        required("WorkLifeBalance", "Work Life Balance", num(1.0, 4.0)),
    ],
};

const BUSINESS_TRAVEL: [&str; 3] = ["Travel_Rarely", "Travel_Frequently", "Non-Travel"];
const GENDERS: [&str; 2] = ["Male", "Female"];
const MARITAL_STATUSES: [&str; 3] = ["Single", "Married", "Divorced"];
const YES_NO: [&str; 2] = ["Yes", "No"];

pub const PERFORMANCE: FormSchema = FormSchema {
    name: "performance evaluation",
    fields: &[
        required("EmpID", "Employee ID", TEXT),
        required("Age", "Age", num(18.0, 65.0)),
        required("AgeGroup", "Age Group", TEXT),
        required("BusinessTravel", "Business Travel", FieldKind::OneOf(&BUSINESS_TRAVEL)),
        required("Department", "Department", TEXT),
        required("DistanceFromHome", "Distance From Home", num_min(0.0)),
        required("Education", "Education", num(1.0, 5.0)),
        required("EducationField", "Education Field", TEXT),
        required("EnvironmentSatisfaction", "Environment Satisfaction", num(1.0, 4.0)),
        required("Gender", "Gender", FieldKind::OneOf(&GENDERS)),
        required("JobRole", "Job Role", TEXT),
        required("JobInvolvement", "Job Involvement", num(1.0, 4.0)),
        required("JobLevel", "Job Level", TEXT),
        required("JobSatisfaction", "Job Satisfaction", num(1.0, 4.0)),
        required("MaritalStatus", "Marital Status", FieldKind::OneOf(&MARITAL_STATUSES)),
        required("MonthlyIncome", "Monthly Income", num_min(0.0)),
        required("SalarySlab", "Salary Slab", TEXT),
        required("NumCompaniesWorked", "Companies Worked", num_min(0.0)),
        required("OverTime", "Over Time", FieldKind::OneOf(&YES_NO)),
        required("PercentSalaryHike", "Percent Salary Hike", num_min(0.0)),
        required("StockOptionLevel", "Stock Option Level", num(0.0, 3.0)),
        required("TotalWorkingYears", "Total Working Years", num_min(0.0)),
        required("TrainingTimesLastYear", "Trainings Last Year", num_min(0.0)),
        required("YearsAtCompany", "Years At Company", num_min(0.0)),
        required("YearsInCurrentRole", "Years In Current Role", num_min(0.0)),
        required("YearsSinceLastPromotion", "Years Since Last Promotion", num_min(0.0)),
        required("YearsWithCurrManager", "Years With Current Manager", num_min(0.0)),
        required("AttendanceScore", "Attendance Score", num(1.0, 5.0)),
        required("WorkLifeBalance", "Work Life Balance", num(1.0, 4.0)),
        required("ManagerRating", "Manager Rating", num(1.0, 5.0)),
        required("Attrition", "Attrition", FieldKind::OneOf(&YES_NO)),
        required("DailyRate", "Daily Rate", num_min(0.0)),
        required("HourlyRate", "Hourly Rate", num_min(0.0)),
        required("MonthlyRate", "Monthly Rate", num_min(0.0)),
        required("RelationshipSatisfaction", "Relationship Satisfaction", num(1.0, 4.0)),
    ],
};

/// Inline messages keyed by field name, in schema order of field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl FieldRule {
    /// Message for `raw`, or `None` when the value passes.
    pub fn check(&self, raw: &str) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() {
            return self
                .required
                .then(|| format!("{} is required", self.label));
        }

        match self.kind {
            FieldKind::Text { min_len } => (value.chars().count() < min_len)
                .then(|| format!("{} must be at least {} characters", self.label, min_len)),
            FieldKind::Email => (!looks_like_email(value))
                .then(|| format!("{} must be a valid email", self.label)),
            FieldKind::Integer { min, max } => match value.parse::<i64>() {
                Ok(n) => range_message(self.label, n as f64, min.map(|m| m as f64), max.map(|m| m as f64)),
                Err(_) => Some(format!("{} must be a whole number", self.label)),
            },
            FieldKind::Number { min, max } => match value.parse::<f64>() {
                Ok(n) if n.is_finite() => range_message(self.label, n, min, max),
                _ => Some(format!("{} must be a number", self.label)),
            },
            FieldKind::OneOf(options) => (!options.contains(&value))
                .then(|| format!("{} must be one of {}", self.label, options.join(", "))),
            FieldKind::Date => parse_date(value)
                .is_none()
                .then(|| format!("{} must be a date (YYYY-MM-DD)", self.label)),
            FieldKind::File => (!Path::new(value).is_file())
                .then(|| format!("{} must be a readable file", self.label)),
        }
    }
}

fn range_message(label: &str, n: f64, min: Option<f64>, max: Option<f64>) -> Option<String> {
    if let Some(min) = min {
        if n < min {
            return Some(format!("{} must be at least {}", label, min));
        }
    }
    if let Some(max) = max {
        if n > max {
            return Some(format!("{} must be at most {}", label, max));
        }
    }
    None
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !value.chars().any(char::is_whitespace)
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Empty values for every field, for a fresh form.
    pub fn blank(&self) -> FormValues {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), String::new()))
            .collect()
    }

    pub fn validate(&self, values: &FormValues) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for rule in self.fields {
            let raw = values.get(rule.name).map(String::as_str).unwrap_or("");
            if let Some(message) = rule.check(raw) {
                errors.insert(rule.name, message);
            }
        }
        errors.into_result()
    }
}

fn text(values: &FormValues, name: &str) -> String {
    values
        .get(name)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

pub fn login(values: &FormValues) -> Result<LoginData, FieldErrors> {
    LOGIN.validate(values)?;
    Ok(LoginData {
        email: text(values, "email"),
        password: values.get("password").cloned().unwrap_or_default(),
    })
}

pub fn new_employee(values: &FormValues) -> Result<NewEmployee, FieldErrors> {
    NEW_EMPLOYEE.validate(values)?;
    Ok(NewEmployee {
        emp_id: text(values, "emp_id"),
        first_name: text(values, "first_name"),
        last_name: text(values, "last_name"),
        email: text(values, "email"),
        password: values.get("password").cloned().unwrap_or_default(),
        department: text(values, "department"),
        role: text(values, "role"),
        phone_number: text(values, "phone_number"),
        address: text(values, "address"),
        join_date: text(values, "join_date"),
        image: PathBuf::from(text(values, "image")),
    })
}

/// Task form content before the actor is stamped on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub due_date: String,
    pub priority: String,
    pub status: String,
    pub assigned_to: i64,
    pub remarks: String,
}

impl TaskDraft {
    pub fn into_new_task(self, assigned_by: i64) -> NewTask {
        NewTask {
            title: self.title,
            description: self.description,
            start_date: self.start_date,
            due_date: self.due_date,
            priority: self.priority,
            status: self.status,
            assigned_to: self.assigned_to,
            assigned_by,
            remarks: self.remarks,
        }
    }
}

pub fn task(values: &FormValues) -> Result<TaskDraft, FieldErrors> {
    TASK.validate(values)?;

    let start_date = text(values, "start_date");
    let due_date = text(values, "due_date");
    if let (Some(start), Some(due)) = (parse_date(&start_date), parse_date(&due_date)) {
        if due < start {
            let mut errors = FieldErrors::new();
            errors.insert("due_date", "Due Date cannot be before Start Date");
            return Err(errors);
        }
    }

    let mut errors = FieldErrors::new();
    let assigned_to = match text(values, "assigned_to").parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            errors.insert("assigned_to", "Assign To must be a whole number");
            0
        }
    };
    errors.into_result()?;

    Ok(TaskDraft {
        title: text(values, "title"),
        description: text(values, "description"),
        start_date,
        due_date,
        priority: text(values, "priority"),
        status: text(values, "status"),
        assigned_to,
        remarks: text(values, "remarks"),
    })
}

/// JSON body for a scoring model: numeric fields become JSON numbers, the
/// rest strings.
pub fn prediction_payload(schema: &FormSchema, values: &FormValues) -> Result<Value, FieldErrors> {
    schema.validate(values)?;

    let mut body = Map::new();
    for rule in schema.fields {
        let raw = text(values, rule.name);
        let value = match rule.kind {
            FieldKind::Integer { .. } => raw
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::String(raw)),
            FieldKind::Number { .. } => raw
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::String(raw)),
            _ => Value::String(raw),
        };
        body.insert(rule.name.to_string(), value);
    }
    Ok(Value::Object(body))
}
