use tracing::error;

use crate::{
    entities::{project::Project, skill::Skill},
    errors::AppError,
    repositories::content::ContentRepository,
};

pub struct ContentHandler<R>
where
    R: ContentRepository,
{
    pub content_repo: R,
}

impl<R> ContentHandler<R>
where
    R: ContentRepository,
{
    pub fn new(content_repo: R) -> Self {
        ContentHandler { content_repo }
    }

    /// Lists every project, newest first
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let mut projects = self.content_repo.list_projects().await
            .inspect_err(|e| error!("Error fetching projects: {}", e))?;

        projects.sort_by(Project::newest_first);
        Ok(projects)
    }

    /// Lists every skill ordered by category, then name
    pub async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        let mut skills = self.content_repo.list_skills().await
            .inspect_err(|e| error!("Error fetching skills: {}", e))?;

        skills.sort_by(Skill::catalog_order);
        Ok(skills)
    }

    pub async fn store_status(&self) -> &'static str {
        match self.content_repo.check_connection().await {
            Ok(()) => "OK",
            Err(_) => "Unavailable",
        }
    }
}
