use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::contact::{ContactMessage, NewContactMessage},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Stores one message and returns the persisted row.
    async fn create_contact_message(&self, msg: &NewContactMessage) -> Result<ContactMessage, AppError>;
}

#[async_trait]
impl<T: ContactRepository + ?Sized> ContactRepository for Arc<T> {
    async fn create_contact_message(&self, msg: &NewContactMessage) -> Result<ContactMessage, AppError> {
        (**self).create_contact_message(msg).await
    }
}

impl SqlxContactRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_contact_message(&self, msg: &NewContactMessage) -> Result<ContactMessage, AppError> {
        let saved = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, message)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, message, created_at
            "#
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}
