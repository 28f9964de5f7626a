use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::AuthenticatedPrincipal;
use crate::error::AppError;

/// The principal attached by `Authenticate` or `RequireRole`.
///
/// Fails with 401 when the route is not behind either middleware or the
/// request went through in optional mode without credentials. Use
/// `Option<CurrentPrincipal>` on optional routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPrincipal(pub AuthenticatedPrincipal);

impl CurrentPrincipal {
    pub fn into_inner(self) -> AuthenticatedPrincipal {
        self.0
    }
}

impl Deref for CurrentPrincipal {
    type Target = AuthenticatedPrincipal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentPrincipal {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let principal = req
            .extensions()
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or_else(AppError::unauthorized_missing_bearer);

        ready(principal)
    }
}
