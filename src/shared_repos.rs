use crate::repositories::sqlx_repo::{SqlxContactRepo, SqlxContentRepo};

#[derive(Clone)]
pub struct SharedRepositories {
    pub content_repo: SqlxContentRepo,
    pub contact_repo: SqlxContactRepo,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        let content_repo = SqlxContentRepo::new(pool.clone());
        let contact_repo = SqlxContactRepo::new(pool);

        SharedRepositories {
            content_repo,
            contact_repo,
        }
    }
}
