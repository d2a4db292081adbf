use tracing::{error, info, warn};

use crate::{
    entities::contact::{ContactEmail, ContactForm, ContactReceipt, NewContactMessage},
    errors::AppError,
    mail::MailTransport,
    repositories::contact::ContactRepository,
    settings::ContactPolicy,
};

pub struct ContactHandler<R, M>
where
    R: ContactRepository,
    M: MailTransport,
{
    pub contact_repo: R,
    pub mailer: Option<M>,
    pub policy: ContactPolicy,
}

impl<R, M> ContactHandler<R, M>
where
    R: ContactRepository,
    M: MailTransport,
{
    pub fn new(contact_repo: R, mailer: Option<M>, policy: ContactPolicy) -> Self {
        ContactHandler { contact_repo, mailer, policy }
    }

    /// Validates a submission and performs the side effects of the
    /// configured policy: at most one store write and at most one email.
    ///
    /// Under [`ContactPolicy::StoreAndNotify`] the stored row is the source of
    /// truth and the notification is best effort; a failed send is logged and
    /// the stored message is still reported.
    pub async fn submit(&self, form: ContactForm) -> Result<ContactReceipt, AppError> {
        let new_msg = NewContactMessage::try_from(form)?;

        match self.policy {
            ContactPolicy::Store => self.store(&new_msg).await,
            ContactPolicy::Mail => {
                self.deliver(&new_msg).await?;
                Ok(ContactReceipt::mailed())
            }
            ContactPolicy::StoreAndNotify => {
                let receipt = self.store(&new_msg).await?;
                if self.mailer.is_some() {
                    if let Err(e) = self.deliver(&new_msg).await {
                        warn!("Contact message stored but notification failed: {}", e);
                    }
                }
                Ok(receipt)
            }
        }
    }

    async fn store(&self, msg: &NewContactMessage) -> Result<ContactReceipt, AppError> {
        let saved = self.contact_repo.create_contact_message(msg).await
            .inspect_err(|e| error!("CONTACT POST ERROR: {}", e))?;

        info!(id = %saved.id, "Contact message stored");
        Ok(ContactReceipt::stored(saved))
    }

    async fn deliver(&self, msg: &NewContactMessage) -> Result<(), AppError> {
        let mailer = self.mailer.as_ref().ok_or_else(|| {
            error!("Contact delivery requested but no mail transport is configured");
            AppError::Delivery("mail transport not configured".into())
        })?;

        let email = ContactEmail::from(msg);
        mailer.send(&email).await
            .inspect_err(|e| error!("Contact email delivery failed: {}", e))?;

        info!("Contact notification sent");
        Ok(())
    }
}
