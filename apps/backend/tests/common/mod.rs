#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::Arc;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use async_trait::async_trait;
use thappy_api::errors::domain::{DomainError, InfraErrorKind};
use thappy_api::middleware::{RequestTrace, StructuredLogger};
use thappy_api::routes;
use thappy_api::services::principals::{InMemoryPrincipalStore, PrincipalStore};
use thappy_api::{AppState, PrincipalId, PrincipalRecord, Role, SecurityConfig};
use thappy_test_support::unique_principal_id;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    thappy_test_support::logging::init();
}

/// App state backed by an in-memory store the test can mutate.
pub struct TestHarness {
    pub state: AppState,
    pub store: InMemoryPrincipalStore,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_security(SecurityConfig::ephemeral())
    }

    pub fn with_security(security: SecurityConfig) -> Self {
        let store = InMemoryPrincipalStore::new();
        let state = AppState::new(security, Arc::new(store.clone()));
        Self { state, store }
    }

    /// Register an active principal and return `(id, bearer token)`.
    pub fn principal(&self, role: Role) -> (PrincipalId, String) {
        let id = unique_principal_id(role.as_str());
        self.store.insert(PrincipalRecord::active(id.clone(), role));
        let token = self.state.tokens.issue(&id).expect("issue token");
        (PrincipalId::new(id), token)
    }
}

/// The production route table behind the production middleware stack.
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(StructuredLogger)
        .wrap(RequestTrace)
        .app_data(web::Data::new(state))
        .configure(routes::configure)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Store that can never answer.
pub struct FailingStore;

#[async_trait]
impl PrincipalStore for FailingStore {
    async fn lookup(&self, _id: &PrincipalId) -> Result<Option<PrincipalRecord>, DomainError> {
        Err(DomainError::infra(
            InfraErrorKind::DbUnavailable,
            "connection refused",
        ))
    }
}

/// Store that answers correctly, but only after `delay`.
pub struct SlowStore {
    pub inner: InMemoryPrincipalStore,
    pub delay: Duration,
}

#[async_trait]
impl PrincipalStore for SlowStore {
    async fn lookup(&self, id: &PrincipalId) -> Result<Option<PrincipalRecord>, DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.lookup(id).await
    }
}
