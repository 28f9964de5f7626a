use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::auth::TokenService;
use crate::services::principals::PrincipalStore;

/// Application state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    /// Security configuration including token secret and TTL
    pub security: SecurityConfig,
    /// Token issuance and verification bound to `security`
    pub tokens: TokenService,
    /// Source of truth for account existence, status and role
    pub principals: Arc<dyn PrincipalStore>,
}

impl AppState {
    pub fn new(security: SecurityConfig, principals: Arc<dyn PrincipalStore>) -> Self {
        Self {
            tokens: TokenService::new(&security),
            security,
            principals,
        }
    }
}
