#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::{AuthError, AuthenticatedPrincipal, PrincipalId, PrincipalRecord, Role, TokenService};
pub use config::Config;
pub use error::AppError;
pub use extractors::CurrentPrincipal;
pub use middleware::{AuthMode, Authenticate, RequireRole};
pub use services::principals::{DbPrincipalStore, InMemoryPrincipalStore, PrincipalStore};
pub use state::{AppState, SecurityConfig};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    thappy_test_support::logging::init();
}
