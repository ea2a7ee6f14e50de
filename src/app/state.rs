//! Application state management.

use std::sync::Arc;

use crate::domain::{AccessTokenVerifier, DatabaseClient};

use super::service::AppService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AppService>,
    /// Resolves the `token` header to a role
    pub token_verifier: Arc<dyn AccessTokenVerifier>,
}

impl AppState {
    /// Create a new application state
    #[must_use]
    pub fn new(
        db_client: Arc<dyn DatabaseClient>,
        token_verifier: Arc<dyn AccessTokenVerifier>,
    ) -> Self {
        Self {
            service: Arc::new(AppService::new(db_client)),
            token_verifier,
        }
    }
}
