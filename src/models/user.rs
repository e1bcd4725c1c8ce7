use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user as returned by the API. The password hash is never part
/// of this shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Internal login projection: just enough to verify a password. Not
/// serializable, so it cannot leak into a response by accident.
#[derive(Debug, FromRow)]
pub struct Credential {
    pub id: Uuid,
    pub password_hash: String,
}

impl User {
    pub fn new(name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            avatar: None,
            created_at: Utc::now(),
        }
    }
}
