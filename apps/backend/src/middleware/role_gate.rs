//! Role gate.
//!
//! Wrap a route or scope with `RequireRole::therapist()` (or `client()`).
//! If an outer [`Authenticate`](super::Authenticate) already attached a
//! principal it is reused; otherwise the gate authenticates the request
//! itself in required mode. Either way the role check runs against the
//! role the principal store returned on this request, never a token claim.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;

use super::authenticate::{authenticate, AuthMode};
use crate::auth::{AuthenticatedPrincipal, Role};
use crate::error::AppError;
use crate::logging::security;

#[derive(Debug, Clone, Copy)]
pub struct RequireRole {
    role: Role,
}

impl RequireRole {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    pub fn therapist() -> Self {
        Self::new(Role::Therapist)
    }

    pub fn client() -> Self {
        Self::new(Role::Client)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            role: self.role,
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    role: Role,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let required = self.role;

        Box::pin(async move {
            if let Err(err) = authorize(&req, required).await {
                return Ok(req.error_response(err).map_into_right_body());
            }

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

async fn authorize(req: &ServiceRequest, required: Role) -> Result<(), AppError> {
    let attached = req.extensions().get::<AuthenticatedPrincipal>().cloned();

    let principal = match attached {
        Some(principal) => principal,
        None => {
            let principal = authenticate(req, AuthMode::Required)
                .await?
                .ok_or_else(AppError::unauthorized_missing_bearer)?;
            req.extensions_mut().insert(principal.clone());
            principal
        }
    };

    principal.require_role(required).map_err(|err| {
        security::role_denied(&principal.id, required, principal.role);
        AppError::from(err)
    })
}
