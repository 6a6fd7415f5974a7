//! Contact-form use-cases backing the public pages.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use domains::{AppError, ContactRepo, ContactSubmission, Result, ValidationErrors};

use crate::validate;

const MAX_MESSAGE_LEN: usize = 4000;

/// Public contact form input.
#[derive(Debug, Clone, Default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

pub struct ContactService {
    contacts: Arc<dyn ContactRepo>,
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactRepo>) -> Self {
        Self { contacts }
    }

    /// Stores a contact-form submission for the back-office to read.
    pub async fn submit(&self, input: ContactMessage) -> Result<ContactSubmission> {
        let mut errors = ValidationErrors::new();
        if input.name.trim().is_empty() {
            errors.push("name", "name is required");
        }
        if !validate::is_valid_email(input.email.trim()) {
            errors.push("email", "enter a valid email address");
        }
        if input.subject.trim().is_empty() {
            errors.push("subject", "subject is required");
        }
        let message = input.message.trim();
        if message.is_empty() {
            errors.push("message", "message is required");
        } else if message.len() > MAX_MESSAGE_LEN {
            errors.push(
                "message",
                format!("message must be at most {MAX_MESSAGE_LEN} characters"),
            );
        }
        errors.into_result()?;

        let submission = self
            .contacts
            .insert(ContactSubmission {
                id: Uuid::now_v7(),
                name: input.name.trim().to_string(),
                email: input.email.trim().to_string(),
                subject: input.subject.trim().to_string(),
                message: message.to_string(),
                is_read: false,
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!(subject = %submission.subject, "contact submission received");
        Ok(submission)
    }
}
