use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    client::{api::PortfolioClient, timer::Delay},
    entities::contact::ContactForm,
};

pub const SUCCESS_STATUS: &str = "Message sent successfully";
pub const FAILURE_STATUS: &str = "Failed to send message";
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Editable state of the contact form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    pub fn reset(&mut self) {
        *self = ContactFields::default();
    }

    fn to_form(&self) -> ContactForm {
        ContactForm::new(self.name.clone(), self.email.clone(), self.message.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn success() -> Self {
        StatusMessage { kind: StatusKind::Success, text: SUCCESS_STATUS.to_string() }
    }

    fn failure() -> Self {
        StatusMessage { kind: StatusKind::Failure, text: FAILURE_STATUS.to_string() }
    }
}

#[derive(Default)]
struct StatusSlot {
    current: Option<StatusMessage>,
    generation: u64,
}

pub struct SubmitReport {
    pub status: StatusMessage,
    /// Resolves once the status has expired.
    pub expiry: JoinHandle<()>,
}

pub struct ContactFormController<C, D>
where
    C: PortfolioClient,
    D: Delay,
{
    client: Arc<C>,
    delay: Arc<D>,
    status: Arc<Mutex<StatusSlot>>,
    ttl: Duration,
}

impl<C, D> ContactFormController<C, D>
where
    C: PortfolioClient,
    D: Delay,
{
    pub fn new(client: Arc<C>, delay: Arc<D>) -> Self {
        ContactFormController {
            client,
            delay,
            status: Arc::new(Mutex::new(StatusSlot::default())),
            ttl: STATUS_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The transient notification currently shown, if any.
    pub fn status(&self) -> Option<StatusMessage> {
        self.status.lock().current.clone()
    }

    /// Sends the form. On success the fields are cleared; on failure they are
    /// kept for another attempt. Either way the resulting status expires on
    /// its own after the configured TTL.
    pub async fn submit(&self, fields: &mut ContactFields) -> SubmitReport {
        self.status.lock().current = None;

        let status = match self.client.submit_contact(&fields.to_form()).await {
            Ok(ack) if ack.success => {
                fields.reset();
                StatusMessage::success()
            }
            Ok(ack) => {
                warn!("Contact submission rejected: {:?}", ack.message);
                StatusMessage::failure()
            }
            Err(e) => {
                warn!("Contact submission failed: {}", e);
                StatusMessage::failure()
            }
        };

        let generation = {
            let mut slot = self.status.lock();
            slot.generation += 1;
            slot.current = Some(status.clone());
            slot.generation
        };

        SubmitReport {
            status,
            expiry: self.schedule_expiry(generation),
        }
    }

    fn schedule_expiry(&self, generation: u64) -> JoinHandle<()> {
        let delay = self.delay.clone();
        let slot = self.status.clone();
        let ttl = self.ttl;

        tokio::spawn(async move {
            delay.sleep(ttl).await;

            let mut slot = slot.lock();
            // A newer status owns the slot now
            if slot.generation == generation {
                slot.current = None;
            } else {
                debug!("Skipping expiry of superseded status");
            }
        })
    }
}
