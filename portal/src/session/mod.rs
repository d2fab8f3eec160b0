//! Who is signed in.
//!
//! [`Session`] is the context object pages receive instead of reaching for a
//! global: it owns the decoded [`Identity`] and the [`TokenStore`] the
//! credential is persisted in.

pub mod marker;
pub mod store;

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, Validation};
use thiserror::Error;
use tracing::{debug, info, warn};

use shared::types::Identity;

pub use self::marker::SessionMarker;
pub use self::store::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("token could not be decoded: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),

    #[error("token expired at {exp}")]
    Expired { exp: u64 },

    #[error("token store error: {0}")]
    Store(#[from] std::io::Error),
}

/// Current time in Unix seconds.
pub fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Decode the claims of a credential token without verifying its signature.
///
/// The client has no key; the backend verifies the signature on every call.
/// Expiry is checked by the caller against its own clock.
pub fn decode_identity(token: &str) -> Result<Identity, SessionError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Identity>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// Decode and require `exp` to lie strictly after `now`.
pub fn validate_token(token: &str, now: u64) -> Result<Identity, SessionError> {
    let identity = decode_identity(token)?;
    if identity.is_expired_at(now) {
        return Err(SessionError::Expired { exp: identity.exp });
    }
    Ok(identity)
}

pub struct Session {
    store: Arc<dyn TokenStore>,
    identity: Option<Identity>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Unauthenticated session over `store`. Call [`Session::rehydrate`] to
    /// pick up a persisted token.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            identity: None,
        }
    }

    /// Build a session from whatever token `store` holds.
    ///
    /// A token that does not decode, or whose expiry is not after `now`, is
    /// removed from the store and the session starts signed out. Expiry is
    /// only evaluated here, never live.
    pub fn hydrate(store: Arc<dyn TokenStore>, now: u64) -> Self {
        let mut session = Self::new(store);
        session.rehydrate(now);
        session
    }

    pub fn rehydrate(&mut self, now: u64) {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No persisted token, starting signed out");
                self.identity = None;
                return;
            }
            Err(e) => {
                warn!("Failed to read persisted token: {}", e);
                self.identity = None;
                return;
            }
        };

        match validate_token(&token, now) {
            Ok(identity) => {
                info!("Restored session for {} (HR id {})", identity.email, identity.hr_id);
                self.identity = Some(identity);
            }
            Err(e) => {
                warn!("Discarding persisted token: {}", e);
                self.identity = None;
                self.discard_token();
            }
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Email stamped on actions taken by the signed-in user.
    pub fn actor_email(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.email.as_str())
    }

    /// Persist a freshly issued token and adopt its claims.
    ///
    /// Tokens that are already unusable are rejected without being stored.
    pub fn sign_in(&mut self, token: &str, now: u64) -> Result<&Identity, SessionError> {
        let identity = validate_token(token, now)?;
        self.store.save(token)?;
        info!("Signed in as {}", identity.email);
        Ok(&*self.identity.insert(identity))
    }

    /// Sign out: forget the identity and remove the persisted token.
    pub fn clear(&mut self) {
        if let Some(identity) = self.identity.take() {
            info!("Signed out {}", identity.email);
        }
        self.discard_token();
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    fn discard_token(&self) {
        if let Err(e) = self.store.remove() {
            warn!("Failed to remove persisted token: {}", e);
        }
    }
}
