use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::User;
use crate::error::RepoError;

/// Data access for the `users` table. One statement per call, no transactions.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, RepoError>;
    async fn get_by_id(&self, id: i32) -> Result<User, RepoError>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
    /// Returns the generated id.
    async fn create(&self, username: &str, password: &str) -> Result<i32, RepoError>;
    /// Returns the affected-row count; 0 means no such user.
    async fn update(&self, id: i32, username: &str, password: &str) -> Result<u64, RepoError>;
    /// Returns the affected-row count; 0 means no such user.
    async fn delete(&self, id: i32) -> Result<u64, RepoError>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let users = sqlx::query_as::<_, User>(r#"SELECT id, username, password FROM users"#)
            .fetch_all(&self.db)
            .await?;
        Ok(users)
    }

    async fn get_by_id(&self, id: i32) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, username: &str, password: &str) -> Result<i32, RepoError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (username, password)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(password)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn update(&self, id: i32, username: &str, password: &str) -> Result<u64, RepoError> {
        let res = sqlx::query(
            r#"
            UPDATE users
               SET username = $1, password = $2
             WHERE id = $3
            "#,
        )
        .bind(username)
        .bind(password)
        .bind(id)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected())
    }

    async fn delete(&self, id: i32) -> Result<u64, RepoError> {
        let res = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}
