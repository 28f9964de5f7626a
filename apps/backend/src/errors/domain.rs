//! Domain-level error type used by repositories and the principal store.
//!
//! HTTP-agnostic. The auth layer folds it into `AuthError::PrincipalLookup`;
//! handlers see it as `AppError`.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use sea_orm::DbErr;

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    DataCorruption,
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        let kind = match &e {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => InfraErrorKind::DbUnavailable,
            DbErr::Type(_) | DbErr::Json(_) => InfraErrorKind::DataCorruption,
            _ => InfraErrorKind::Other("db".to_string()),
        };
        DomainError::infra(kind, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::RuntimeErr;

    use super::*;

    #[test]
    fn test_connection_errors_are_unavailable() {
        let err = DomainError::from(DbErr::Conn(RuntimeErr::Internal("refused".into())));
        assert!(matches!(
            err,
            DomainError::Infra(InfraErrorKind::DbUnavailable, _)
        ));
    }

    #[test]
    fn test_other_errors_keep_detail() {
        let err = DomainError::from(DbErr::Custom("boom".into()));
        assert!(err.to_string().contains("boom"));
    }
}
