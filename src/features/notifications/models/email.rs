use std::borrow::Cow;

use validator::{Validate, ValidationError};

use crate::core::error::{AppError, Result};
use crate::shared::validation::{check_mailbox, check_mailbox_list, split_addresses};

/// A single outgoing HTML email
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct EmailMessage {
    /// Bare address or `Name <address>`
    #[validate(custom(function = "validate_sender"))]
    pub from: String,
    /// One or more addresses separated by commas
    #[validate(custom(function = "validate_recipient_list"))]
    pub to: String,
    /// Sent as stored, may be empty
    pub subject: String,
    pub html_body: String,
}

impl EmailMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }

    /// Individual addresses of the `to` line
    pub fn recipients(&self) -> impl Iterator<Item = &str> {
        split_addresses(&self.to)
    }

    /// Check the addresses parse the way the SMTP transport will parse them
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))
    }
}

fn validate_sender(from: &str) -> std::result::Result<(), ValidationError> {
    check_mailbox(from).map_err(|_| {
        let mut error = ValidationError::new("sender_invalid");
        error.message = Some(Cow::from("Invalid sender address"));
        error
    })
}

fn validate_recipient_list(to: &str) -> std::result::Result<(), ValidationError> {
    check_mailbox_list(to).map_err(|message| {
        let mut error = ValidationError::new("recipient_invalid");
        error.message = Some(Cow::from(message));
        error
    })
}
