use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod client;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, mail, web};

use mail::MailTransport;
use repositories::{contact::ContactRepository, content::ContentRepository};
use settings::ContactPolicy;
use shared_repos::SharedRepositories;
use use_cases::{contact::ContactHandler, content::ContentHandler};

pub type SharedContentRepo = Arc<dyn ContentRepository>;
pub type SharedContactRepo = Arc<dyn ContactRepository>;
pub type SharedMailer = Arc<dyn MailTransport>;

pub type AppContentHandler = ContentHandler<SharedContentRepo>;
pub type AppContactHandler = ContactHandler<SharedContactRepo, SharedMailer>;

pub struct AppState {
    pub content_handler: AppContentHandler,
    pub contact_handler: AppContactHandler,
    pub mail_verified: bool,
}

impl AppState {
    pub fn new(
        config: &settings::AppConfig,
        pool: sqlx::PgPool,
        mailer: Option<SharedMailer>,
        mail_verified: bool,
    ) -> Self {
        let repos = SharedRepositories::new(pool);

        Self::from_parts(
            Arc::new(repos.content_repo),
            Arc::new(repos.contact_repo),
            mailer,
            config.contact_policy,
        )
        .with_mail_verified(mail_verified)
    }

    /// Wires the handlers from already-built collaborators.
    pub fn from_parts(
        content_repo: SharedContentRepo,
        contact_repo: SharedContactRepo,
        mailer: Option<SharedMailer>,
        policy: ContactPolicy,
    ) -> Self {
        AppState {
            content_handler: ContentHandler::new(content_repo),
            contact_handler: ContactHandler::new(contact_repo, mailer, policy),
            mail_verified: false,
        }
    }

    pub fn with_mail_verified(mut self, verified: bool) -> Self {
        self.mail_verified = verified;
        self
    }

    pub fn mail_status(&self) -> &'static str {
        match (&self.contact_handler.mailer, self.mail_verified) {
            (None, _) => "Not configured",
            (Some(_), true) => "OK",
            (Some(_), false) => "Unverified",
        }
    }
}
