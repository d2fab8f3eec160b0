use std::fmt;

use serde::{Deserialize, Serialize};

/// The two opaque scoring models the portal submits forms to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionModel {
    Attrition,
    Performance,
}

impl PredictionModel {
    /// Path segment appended to the configured scoring URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Attrition => "/predict-attrition",
            Self::Performance => "/predict-performance",
        }
    }
}

impl fmt::Display for PredictionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attrition => f.write_str("Attrition Prediction"),
            Self::Performance => f.write_str("Performance Evaluation"),
        }
    }
}

/// Scoring response. Anything beyond these two fields is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: String,
    #[serde(default)]
    pub probability: Option<f64>,
}
