use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;
use crate::{FieldError, ValidationErrors};

pub const CONTACT_ACKNOWLEDGEMENT: &str =
    "Thank you for your message! We will get back to you within 24 hours.";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContactPreference {
    #[default]
    Email,
    Phone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInquiry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub preferred_contact: ContactPreference,
}

fn default_subject() -> String {
    "general".to_string()
}

impl ContactInquiry {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        errors.require("email", &self.email);
        errors.require("message", &self.message);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InquiryReceipt {
    pub id: Uuid,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

/// Validates a newsletter address the way the signup form does.
pub fn validate_newsletter_email(email: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if email.is_empty() {
        errors.push(FieldError::new("email", "Please enter your email address"));
    } else if !email.contains('@') {
        errors.push(FieldError::new("email", "Please enter a valid email address"));
    }
    errors.into_result()
}

/// Simulated front desk for contact messages and newsletter signups.
/// Nothing is sent anywhere; submissions are acknowledged after a delay.
pub struct InquiryDesk {
    contact_delay: Duration,
    newsletter_delay: Duration,
}

impl InquiryDesk {
    pub fn new(contact_delay: Duration, newsletter_delay: Duration) -> Self {
        Self { contact_delay, newsletter_delay }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub async fn submit_contact(&self, inquiry: &ContactInquiry) -> Result<InquiryReceipt, ValidationErrors> {
        inquiry.validate()?;
        tokio::time::sleep(self.contact_delay).await;

        let receipt = InquiryReceipt {
            id: Uuid::new_v4(),
            message: CONTACT_ACKNOWLEDGEMENT.to_string(),
            received_at: Utc::now(),
        };
        tracing::info!("Contact inquiry {} received (subject: {})", receipt.id, inquiry.subject);
        Ok(receipt)
    }

    pub async fn subscribe(&self, email: &str) -> Result<(), ValidationErrors> {
        validate_newsletter_email(email)?;
        tokio::time::sleep(self.newsletter_delay).await;
        tracing::info!("Newsletter subscription recorded");
        Ok(())
    }
}

impl Default for InquiryDesk {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000), Duration::from_millis(2000))
    }
}
