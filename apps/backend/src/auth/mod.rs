//! Stateless session authentication.
//!
//! Leaf-first: [`codec`] signs and verifies the wire format, [`token_service`]
//! binds it to a secret and TTL, [`bearer`] pulls credentials off requests,
//! and [`principal`] holds the typed identity the middleware attaches.

pub mod bearer;
pub mod claims;
pub mod codec;
pub mod error;
pub mod principal;
pub mod token_service;

pub use claims::Claims;
pub use error::AuthError;
pub use principal::{AuthenticatedPrincipal, PrincipalId, PrincipalRecord, Role};
pub use token_service::TokenService;
