use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::{project::Project, skill::Skill},
    errors::AppError,
    repositories::sqlx_repo::SqlxContentRepo,
};

/// Read-only access to the showcase records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// All projects, newest first
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;

    /// All skills, by category then name
    async fn list_skills(&self) -> Result<Vec<Skill>, AppError>;

    async fn check_connection(&self) -> Result<(), AppError>;
}

#[async_trait]
impl<T: ContentRepository + ?Sized> ContentRepository for Arc<T> {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        (**self).list_projects().await
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        (**self).list_skills().await
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }
}

impl SqlxContentRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContentRepo { pool }
    }
}

#[async_trait]
impl ContentRepository for SqlxContentRepo {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, tech_stack, github_url, live_url,
                   image_url, featured, created_at, updated_at
            FROM projects
            ORDER BY created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        let skills = sqlx::query_as::<_, Skill>(
            r#"
            SELECT id, name, category, level, created_at, updated_at
            FROM skills
            ORDER BY category ASC, name ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(skills)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
