use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Credential row. Never serialized back to clients.
#[derive(Debug, Clone, FromRow)]
pub struct DbLogin {
    pub email: String,
    pub hash: String,
}

/// Profile row, returned as-is by sign-in, register and profile lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub entries: i64,
    pub joined: DateTime<Utc>,
}
