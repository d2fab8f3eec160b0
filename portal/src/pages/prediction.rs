use tracing::{info, warn};

use shared::types::{PredictionModel, PredictionResult};

use super::forms::FormState;
use crate::api::{ApiResult, HrApi};
use crate::validation::{self, FormSchema};

pub fn schema_for(model: PredictionModel) -> FormSchema {
    match model {
        PredictionModel::Attrition => validation::ATTRITION,
        PredictionModel::Performance => validation::PERFORMANCE,
    }
}

/// Attrition or performance form plus the last score it received.
#[derive(Debug, Clone)]
pub struct PredictionPage {
    pub model: PredictionModel,
    pub form: FormState,
    pub result: Option<PredictionResult>,
}

impl PredictionPage {
    pub fn new(model: PredictionModel) -> Self {
        Self {
            model,
            form: FormState::new(schema_for(model)),
            result: None,
        }
    }

    /// Validate and score. `None` means the form has inline errors.
    pub async fn submit(&mut self, api: &dyn HrApi) -> Option<ApiResult<PredictionResult>> {
        let schema = schema_for(self.model);
        let payload = self
            .form
            .submit(|values| validation::prediction_payload(&schema, values))?;

        let result = api.score(self.model, &payload).await;
        match &result {
            Ok(score) => {
                info!("{}: {}", self.model, score.prediction);
                self.result = Some(score.clone());
                self.form.reset();
            }
            Err(e) => {
                warn!("{} failed: {}", self.model, e);
                self.result = None;
            }
        }
        Some(result)
    }
}
