use actix_web::web;

use crate::middleware::{Authenticate, RequireRole};

pub mod feed;
pub mod health;
pub mod principal;

/// Register every route with its auth middleware.
///
/// Shared by `main.rs` and the integration tests so both exercise the same
/// wiring.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    cfg.service(
        web::scope("/api")
            // Any active principal: /api/me
            .service(
                web::resource("/me")
                    .wrap(Authenticate::required())
                    .route(web::get().to(principal::me)),
            )
            // Anonymous or authenticated: /api/feed
            .service(
                web::resource("/feed")
                    .wrap(Authenticate::optional())
                    .route(web::get().to(feed::feed)),
            )
            // Therapists only: /api/therapist/**
            .service(
                web::scope("/therapist")
                    .wrap(RequireRole::therapist())
                    .configure(principal::configure_role_routes),
            )
            // Clients only: /api/client/**
            .service(
                web::scope("/client")
                    .wrap(RequireRole::client())
                    .configure(principal::configure_role_routes),
            ),
    );
}
