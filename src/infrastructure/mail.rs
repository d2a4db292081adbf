use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use derive_more::Display;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::{entities::contact::ContactEmail, settings::MailSettings};

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Invalid mail address: {_0}")]
    InvalidAddress(String),

    #[display("Failed to build message: {_0}")]
    Build(String),

    #[display("SMTP transport error: {_0}")]
    Transport(String),

    #[display("Mail server did not accept the connection check")]
    NotReady,

    #[display("Mail transport is shut down")]
    Closed,
}

impl std::error::Error for MailError {}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        MailError::Transport(err.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        MailError::Build(err.to_string())
    }
}

/// Outbound delivery for contact notifications.
///
/// One instance is built at startup and shared by every request.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Checks that the server is reachable and accepts the credentials.
    async fn verify(&self) -> Result<(), MailError>;

    async fn send(&self, email: &ContactEmail) -> Result<(), MailError>;

    /// After shutdown every `send` fails with [`MailError::Closed`].
    async fn shutdown(&self);
}

#[async_trait]
impl<T: MailTransport + ?Sized> MailTransport for Arc<T> {
    async fn verify(&self) -> Result<(), MailError> {
        (**self).verify().await
    }

    async fn send(&self, email: &ContactEmail) -> Result<(), MailError> {
        (**self).send(email).await
    }

    async fn shutdown(&self) {
        (**self).shutdown().await
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
    closed: AtomicBool,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let sender = Mailbox::new(Some(settings.sender_name.clone()), parse_address(&settings.user)?);
        let recipient = match &settings.recipient {
            Some(addr) => Mailbox::new(None, parse_address(addr)?),
            None => sender.clone(),
        };

        let credentials = Credentials::new(settings.user.clone(), settings.pass.clone());
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.relay)?
            .credentials(credentials);
        if let Some(port) = settings.port {
            builder = builder.port(port);
        }

        Ok(SmtpMailer {
            transport: builder.build(),
            sender,
            recipient,
            closed: AtomicBool::new(false),
        })
    }

    /// The visitor's address is free text. When it does not parse the
    /// message goes out without `Reply-To`; the address is still in the body.
    fn compose(&self, email: &ContactEmail) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone());

        match parse_address(&email.reply_to) {
            Ok(addr) => {
                builder = builder.reply_to(Mailbox::new(Some(email.reply_to_name.clone()), addr));
            }
            Err(e) => warn!("Sending contact notification without Reply-To: {}", e),
        }

        Ok(builder
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?)
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn verify(&self) -> Result<(), MailError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(MailError::Closed);
        }
        match self.transport.test_connection().await? {
            true => Ok(()),
            false => Err(MailError::NotReady),
        }
    }

    async fn send(&self, email: &ContactEmail) -> Result<(), MailError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(MailError::Closed);
        }
        let message = self.compose(email)?;
        self.transport.send(message).await?;
        Ok(())
    }

    async fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("Mail transport shut down");
        }
    }
}

fn parse_address(raw: &str) -> Result<Address, MailError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| MailError::InvalidAddress(format!("{raw}: {e}")))
}

/// Startup readiness check. A failure is logged and never aborts the process;
/// later sends are handled on their own.
pub async fn verify_on_startup(mailer: &dyn MailTransport) -> bool {
    match mailer.verify().await {
        Ok(()) => {
            info!("📧 Mail transport ready");
            true
        }
        Err(e) => {
            warn!("Mail transport verification failed: {}", e);
            false
        }
    }
}
