use anyhow::Result;
use log::debug;
use std::sync::Arc;

use shared::AuthState;

use super::{connection::JsonConnection, AUTH_KEY};
use crate::storage::traits::SessionStorage;

/// JSON-backed session repository, kept under its own storage key so the
/// login gate never touches the ledger collections.
#[derive(Clone)]
pub struct SessionRepository {
    connection: Arc<JsonConnection>,
}

impl SessionRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }
}

impl SessionStorage for SessionRepository {
    fn load_auth_state(&self) -> Result<AuthState> {
        match self.connection.read_key(AUTH_KEY)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => {
                debug!("No stored session, defaulting to logged out");
                Ok(AuthState::default())
            }
        }
    }

    fn store_auth_state(&self, state: &AuthState) -> Result<()> {
        let blob = serde_json::to_string(state)?;
        self.connection.write_key(AUTH_KEY, &blob)
    }
}
