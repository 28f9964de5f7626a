//! Principal store: the source of truth for whether an account exists, is
//! active, and which role it holds.
//!
//! Consulted on every authenticated request. Implementations must be safe
//! to call concurrently and must not cache.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::auth::{PrincipalId, PrincipalRecord, Role};
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::repos::users;

#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// `Ok(None)` means the account does not exist. `Err` means the store
    /// could not answer.
    async fn lookup(&self, id: &PrincipalId) -> Result<Option<PrincipalRecord>, DomainError>;
}

/// Process-local store for development and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPrincipalStore {
    records: Arc<DashMap<PrincipalId, PrincipalRecord>>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: PrincipalRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Returns false if the principal is unknown.
    pub fn set_active(&self, id: &PrincipalId, active: bool) -> bool {
        match self.records.get_mut(id) {
            Some(mut record) => {
                record.active = active;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: &PrincipalId) -> Option<PrincipalRecord> {
        self.records.remove(id).map(|(_, record)| record)
    }
}

#[async_trait]
impl PrincipalStore for InMemoryPrincipalStore {
    async fn lookup(&self, id: &PrincipalId) -> Result<Option<PrincipalRecord>, DomainError> {
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }
}

/// Reads principals from the `users` table.
#[derive(Debug)]
pub struct DbPrincipalStore {
    conn: DatabaseConnection,
}

impl DbPrincipalStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl PrincipalStore for DbPrincipalStore {
    async fn lookup(&self, id: &PrincipalId) -> Result<Option<PrincipalRecord>, DomainError> {
        let Some(user) = users::find_user_by_id(&self.conn, id.as_str()).await? else {
            debug!(principal_id = %id, "No user row for principal");
            return Ok(None);
        };

        let role: Role = user.role.parse().map_err(|e| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("user {}: {e}", user.id),
            )
        })?;

        Ok(Some(PrincipalRecord {
            id: PrincipalId::new(user.id),
            role,
            active: user.is_active,
        }))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RuntimeErr};
    use time::OffsetDateTime;

    use super::*;
    use crate::entities::users as user_entity;

    fn user_row(id: &str, role: &str, is_active: bool) -> user_entity::Model {
        let now = OffsetDateTime::now_utc();
        user_entity::Model {
            id: id.to_string(),
            email: format!("{id}@example.test"),
            role: role.to_string(),
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_in_memory_lookup_and_deactivate() {
        let store = InMemoryPrincipalStore::new();
        let id = PrincipalId::new("u-1");
        store.insert(PrincipalRecord::active("u-1", Role::Client));

        let found = store.lookup(&id).await.unwrap().unwrap();
        assert!(found.active);
        assert_eq!(found.role, Role::Client);

        assert!(store.set_active(&id, false));
        assert!(!store.lookup(&id).await.unwrap().unwrap().active);

        assert!(store.remove(&id).is_some());
        assert_eq!(store.lookup(&id).await.unwrap(), None);
        assert!(!store.set_active(&id, true));
    }

    #[tokio::test]
    async fn test_db_store_maps_row() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row("t-7", "therapist", true)]])
            .into_connection();
        let store = DbPrincipalStore::new(conn);

        let record = store.lookup(&PrincipalId::new("t-7")).await.unwrap();
        assert_eq!(record, Some(PrincipalRecord::active("t-7", Role::Therapist)));
    }

    #[tokio::test]
    async fn test_db_store_missing_row_is_none() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user_entity::Model>::new()])
            .into_connection();
        let store = DbPrincipalStore::new(conn);

        assert_eq!(store.lookup(&PrincipalId::new("ghost")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_db_store_unknown_role_is_data_corruption() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row("u-9", "admin", true)]])
            .into_connection();
        let store = DbPrincipalStore::new(conn);

        let err = store.lookup(&PrincipalId::new("u-9")).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Infra(InfraErrorKind::DataCorruption, _)
        ));
    }

    #[tokio::test]
    async fn test_db_store_connection_error_propagates() {
        let conn = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Conn(RuntimeErr::Internal("refused".into()))])
            .into_connection();
        let store = DbPrincipalStore::new(conn);

        let result = store.lookup(&PrincipalId::new("u-1")).await;
        assert!(matches!(result, Err(DomainError::Infra(..))));
    }
}
