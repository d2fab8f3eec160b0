use tracing::{error, warn};

use shared::types::LoginError;

use super::forms::FormState;
use crate::api::{ApiError, HrApi};
use crate::session::Session;
use crate::validation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The form did not validate; messages are on the form.
    Invalid,
    /// Signed in; `message` is the server's greeting.
    SignedIn { message: String },
    Failed(LoginError),
}

#[derive(Debug, Clone)]
pub struct LoginPage {
    pub form: FormState,
}

impl Default for LoginPage {
    fn default() -> Self {
        Self {
            form: FormState::new(validation::LOGIN),
        }
    }
}

impl LoginPage {
    pub async fn submit(&mut self, api: &dyn HrApi, session: &mut Session, now: u64) -> LoginOutcome {
        let Some(data) = self.form.submit(validation::login) else {
            return LoginOutcome::Invalid;
        };

        let response = match api.login(&data.email, &data.password).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Login for {} failed: {}", data.email, e);
                return LoginOutcome::Failed(login_error(e));
            }
        };

        if let Err(e) = session.sign_in(&response.token, now) {
            error!("Login for {} returned an unusable token: {}", data.email, e);
            return LoginOutcome::Failed(LoginError::InternalError);
        }

        self.form.reset();
        let message = if response.message.is_empty() {
            "Login successful".to_string()
        } else {
            response.message
        };
        LoginOutcome::SignedIn { message }
    }
}

fn login_error(e: ApiError) -> LoginError {
    match e {
        ApiError::Status { status, .. } if status == hyper::StatusCode::UNAUTHORIZED => {
            LoginError::InvalidCredentials
        }
        ApiError::Status { message, .. } => LoginError::Rejected(message),
        ApiError::Transport(_) => LoginError::ServerUnreachable,
        _ => LoginError::InternalError,
    }
}
