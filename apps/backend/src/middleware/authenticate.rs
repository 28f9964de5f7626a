//! Bearer authentication middleware.
//!
//! Every request wrapped by [`Authenticate`] re-verifies the token and
//! re-checks the account in the principal store; nothing is cached between
//! requests. On success an [`AuthenticatedPrincipal`] is placed in request
//! extensions for handlers and extractors.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Duration;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::auth::bearer::extract_bearer;
use crate::auth::{AuthError, AuthenticatedPrincipal, PrincipalId, PrincipalRecord};
use crate::error::AppError;
use crate::errors::{DomainError, InfraErrorKind};
use crate::logging::security;
use crate::services::principals::PrincipalStore;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Missing or failing credentials end the request with 401.
    Required,
    /// Missing or failing credentials continue without a principal.
    Optional,
}

#[derive(Debug, Clone, Copy)]
pub struct Authenticate {
    mode: AuthMode,
}

impl Authenticate {
    pub fn required() -> Self {
        Self {
            mode: AuthMode::Required,
        }
    }

    pub fn optional() -> Self {
        Self {
            mode: AuthMode::Optional,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateMiddleware {
            service: Rc::new(service),
            mode: self.mode,
        }))
    }
}

pub struct AuthenticateMiddleware<S> {
    service: Rc<S>,
    mode: AuthMode,
}

impl<S, B> Service<ServiceRequest> for AuthenticateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let mode = self.mode;

        Box::pin(async move {
            match authenticate(&req, mode).await {
                Ok(Some(principal)) => {
                    req.extensions_mut().insert(principal);
                }
                Ok(None) => {}
                // Rendered here so the response is built inside the trace scope.
                Err(err) => return Ok(req.error_response(err).map_into_right_body()),
            }

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Runs the full check for one request.
///
/// `Ok(None)` only happens in optional mode. A store failure is an error in
/// both modes: it says nothing about the credential, so the request is not
/// downgraded to anonymous.
pub(crate) async fn authenticate(
    req: &ServiceRequest,
    mode: AuthMode,
) -> Result<Option<AuthenticatedPrincipal>, AppError> {
    let state = app_state(req)?;

    let Some(token) = extract_bearer(req.headers()) else {
        return match mode {
            AuthMode::Required => {
                debug!(path = %req.path(), "No bearer credential on protected route");
                Err(AppError::unauthorized_missing_bearer())
            }
            AuthMode::Optional => Ok(None),
        };
    };

    match resolve_principal(&state, &token).await {
        Ok(principal) => Ok(Some(principal)),
        Err(err) if mode == AuthMode::Optional && err.is_credential_failure() => {
            debug!(reason = %err, "Optional auth: continuing without principal");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Verify `token` and confirm the account it names is present and active.
pub async fn resolve_principal(
    state: &AppState,
    token: &str,
) -> Result<AuthenticatedPrincipal, AuthError> {
    let principal_id = state
        .tokens
        .verify(token)
        .inspect_err(|err| security::token_rejected(err, token))?;

    let record = match lookup_with_timeout(
        state.principals.as_ref(),
        &principal_id,
        state.security.principal_lookup_timeout,
    )
    .await
    {
        Ok(record) => record,
        Err(err) => {
            let detail = err.to_string();
            security::principal_lookup_failed(&principal_id, &detail);
            return Err(AuthError::PrincipalLookup(detail));
        }
    };

    match record {
        None => {
            let err = AuthError::PrincipalNotFound;
            security::principal_rejected(&principal_id, &err);
            Err(err)
        }
        Some(record) if !record.active => {
            let err = AuthError::PrincipalInactive;
            security::principal_rejected(&principal_id, &err);
            Err(err)
        }
        Some(record) => Ok(record.into()),
    }
}

/// Store lookup bounded by `limit`. An elapsed deadline is an infra timeout,
/// never an absent account.
async fn lookup_with_timeout(
    store: &dyn PrincipalStore,
    id: &PrincipalId,
    limit: Duration,
) -> Result<Option<PrincipalRecord>, DomainError> {
    tokio::time::timeout(limit, store.lookup(id))
        .await
        .unwrap_or_else(|_| {
            Err(DomainError::infra(
                InfraErrorKind::Timeout,
                format!("principal lookup timed out after {limit:?}"),
            ))
        })
}

pub(crate) fn app_state(req: &ServiceRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::internal("AppState not available".to_string()))
}
