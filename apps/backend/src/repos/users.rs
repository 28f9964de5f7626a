//! User repository functions (generic over ConnectionTrait).

use sea_orm::{ConnectionTrait, EntityTrait};

use crate::entities::users;
use crate::errors::domain::DomainError;

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
) -> Result<Option<User>, DomainError> {
    let user = users::Entity::find_by_id(user_id.to_string())
        .one(conn)
        .await?;
    Ok(user.map(User::from))
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
