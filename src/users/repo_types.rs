use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `users` table, also the JSON shape returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,              // assigned by the store
    pub username: String,
    pub password: String,     // plaintext, compared as-is on login
}
