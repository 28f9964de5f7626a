use actix_web::HttpResponse;
use serde::Serialize;

use crate::auth::PrincipalId;
use crate::error::AppError;
use crate::extractors::CurrentPrincipal;

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Anonymous,
    Personalized,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub audience: Audience,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<PrincipalId>,
}

/// Public feed that personalizes when a valid principal is attached.
pub async fn feed(principal: Option<CurrentPrincipal>) -> Result<HttpResponse, AppError> {
    let response = match principal {
        Some(principal) => FeedResponse {
            audience: Audience::Personalized,
            principal_id: Some(principal.into_inner().id),
        },
        None => FeedResponse {
            audience: Audience::Anonymous,
            principal_id: None,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}
