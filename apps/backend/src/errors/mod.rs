//! Error handling for the Thappy API.

pub mod domain;
pub mod error_code;

pub use domain::{DomainError, InfraErrorKind};
pub use error_code::ErrorCode;
