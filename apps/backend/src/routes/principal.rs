use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::auth::{PrincipalId, Role};
use crate::error::AppError;
use crate::extractors::CurrentPrincipal;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub principal_id: PrincipalId,
    pub role: Role,
}

/// Returns the caller's identity as resolved on this request.
pub async fn me(principal: CurrentPrincipal) -> Result<HttpResponse, AppError> {
    let principal = principal.into_inner();

    Ok(HttpResponse::Ok().json(MeResponse {
        principal_id: principal.id,
        role: principal.role,
    }))
}

/// Routes mounted under a role-gated scope.
pub fn configure_role_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/me").route(web::get().to(me)));
}
