use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::REQUIRED_FIELDS_MESSAGE;

/// Contact form payload as it arrives over the wire.
///
/// Every field is optional at the type level so a missing field surfaces as
/// a validation error rather than a JSON decoding error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(required(message = "All fields are required"), length(min = 1, message = "All fields are required"))]
    pub name: Option<String>,

    #[validate(required(message = "All fields are required"), length(min = 1, message = "All fields are required"))]
    pub email: Option<String>,

    #[validate(required(message = "All fields are required"), length(min = 1, message = "All fields are required"))]
    pub message: Option<String>,
}

impl ContactForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        ContactForm {
            name: Some(name.into()),
            email: Some(email.into()),
            message: Some(message.into()),
        }
    }

    /// Trims every field so whitespace-only input counts as empty.
    pub fn normalized(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        ContactForm {
            name: trim(self.name),
            email: trim(self.email),
            message: trim(self.message),
        }
    }
}

/// A validated submission, ready to be stored or mailed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl TryFrom<ContactForm> for NewContactMessage {
    type Error = validator::ValidationErrors;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let form = form.normalized();
        form.validate()?;

        match (form.name, form.email, form.message) {
            (Some(name), Some(email), Some(message)) => Ok(NewContactMessage { name, email, message }),
            _ => {
                let mut errors = validator::ValidationErrors::new();
                errors.add("form", validator::ValidationError::new("required").with_message(REQUIRED_FIELDS_MESSAGE.into()));
                Err(errors)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Notification email built from a submission. Sender and recipient are
/// supplied by the mail transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEmail {
    pub subject: String,
    pub body: String,
    pub reply_to_name: String,
    pub reply_to: String,
}

impl From<&NewContactMessage> for ContactEmail {
    fn from(msg: &NewContactMessage) -> Self {
        ContactEmail {
            subject: format!("New Portfolio Message from {}", msg.name),
            body: format!(
                "Name: {}\nEmail: {}\nMessage:\n{}\n",
                msg.name, msg.email, msg.message
            ),
            reply_to_name: msg.name.clone(),
            reply_to: msg.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactReceipt {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ContactMessage>,
}

impl ContactReceipt {
    pub fn stored(data: ContactMessage) -> Self {
        ContactReceipt {
            success: true,
            message: "Message received successfully".to_string(),
            data: Some(data),
        }
    }

    pub fn mailed() -> Self {
        ContactReceipt {
            success: true,
            message: "Message sent successfully".to_string(),
            data: None,
        }
    }

    pub fn is_stored(&self) -> bool {
        self.data.is_some()
    }
}
