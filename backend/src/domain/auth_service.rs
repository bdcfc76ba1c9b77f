//! Login gate.
//!
//! NOT a security boundary: the gate checks a single hardcoded password
//! and exists so the demo app has a login flow. It is kept out of the
//! ledger core and must never be mistaken for real authentication.

use anyhow::Result;
use log::info;
use std::sync::Arc;

use shared::AuthState;

use crate::domain::commands::auth::{LoginCommand, LoginResult};
use crate::storage::json::{JsonConnection, SessionRepository};
use crate::storage::traits::SessionStorage;

/// The one accepted password. A placeholder, not a secret.
pub const GATE_PASSWORD: &str = "admin";

/// Minimum username length accepted by the gate.
const MIN_USERNAME_LEN: usize = 3;

#[derive(Clone)]
pub struct AuthService {
    session_repository: SessionRepository,
}

impl AuthService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            session_repository: SessionRepository::new(connection),
        }
    }

    /// Attempt a login. On success the session is persisted so an app
    /// restart stays logged in; on failure the stored state is untouched.
    pub fn login(&self, command: LoginCommand) -> Result<LoginResult> {
        let username = command.username.trim();

        if username.chars().count() < MIN_USERNAME_LEN || command.password != GATE_PASSWORD {
            return Err(anyhow::anyhow!("Gunakan password \"admin\" untuk masuk."));
        }

        let auth_state = AuthState {
            is_authenticated: true,
            username: Some(username.to_string()),
        };
        self.session_repository.store_auth_state(&auth_state)?;

        info!("Logged in as {}", username);
        Ok(LoginResult { auth_state })
    }

    /// The persisted session, logged-out by default.
    pub fn current_session(&self) -> Result<AuthState> {
        self.session_repository.load_auth_state()
    }

    /// Clear the persisted session.
    pub fn logout(&self) -> Result<()> {
        self.session_repository.store_auth_state(&AuthState::default())?;
        info!("Logged out");
        Ok(())
    }
}
