use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;

use super::models::User;
use crate::db::{with_deadline, StoreError};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn insert(&self, user: &User) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
    query_timeout: Duration,
}

impl PgUserRepository {
    pub fn new(db: PgPool, query_timeout: Duration) -> Self {
        Self { db, query_timeout }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        with_deadline(
            self.query_timeout,
            "find_user_by_email",
            sqlx::query_as::<_, User>(
                r#"
                SELECT user_id, email, name, password_hash, created_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.db),
        )
        .await
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let query = sqlx::query(
            r#"
            INSERT INTO users (user_id, email, name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&user.user_id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at);

        match tokio::time::timeout(self.query_timeout, query.execute(&self.db)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(StoreError::from_insert(e, "email")),
            Err(_) => Err(StoreError::Timeout { operation: "insert_user" }),
        }
    }
}
