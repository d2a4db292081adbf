pub mod contact;
pub mod content;
pub mod sqlx_repo;
