use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::features::clients::Client;
use crate::features::files::models::File;
use crate::shared::constants::AUDIT_NOTIFICATION_SENT;

/// Contact addresses of the client owning a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContact {
    pub name: String,
    pub first_email: String,
    pub second_email: Option<String>,
}

impl From<&Client> for ClientContact {
    fn from(client: &Client) -> Self {
        Self {
            name: client.client_name.clone(),
            first_email: client.first_email.clone(),
            second_email: client.second_email.clone(),
        }
    }
}

/// Everything the expiry job needs to remind someone about one file
#[derive(Debug, Clone)]
pub struct FileReminder {
    pub file_id: Uuid,
    pub file_name: String,
    pub expired_date: DateTime<Utc>,
    pub reminder_subject: String,
    pub reminder_body: String,
    pub inline_email: Option<String>,
    pub client: Option<ClientContact>,
}

impl FileReminder {
    pub fn new(file: File, client: Option<&Client>) -> Self {
        Self {
            file_id: file.id,
            file_name: file.file_name,
            expired_date: file.expired_date,
            reminder_subject: file.reminder_subject,
            reminder_body: file.reminder_body,
            inline_email: file.email,
            client: client.map(ClientContact::from),
        }
    }

    /// Resolve the `To` line for this file.
    ///
    /// A linked client wins: its primary and secondary addresses joined by `", "`,
    /// with a blank secondary dropped. Otherwise the file's inline address.
    /// `None` when no usable address exists.
    pub fn recipient(&self) -> Option<String> {
        match &self.client {
            Some(contact) => {
                let addresses: Vec<&str> = [
                    Some(contact.first_email.as_str()),
                    contact.second_email.as_deref(),
                ]
                .into_iter()
                .flatten()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();

                if addresses.is_empty() {
                    None
                } else {
                    Some(addresses.join(", "))
                }
            }
            None => self
                .inline_email
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    /// Audit log line written after a successful dispatch
    pub fn audit_description(&self, recipient: &str) -> String {
        match &self.client {
            Some(contact) => {
                format!("{} {} ({})", AUDIT_NOTIFICATION_SENT, contact.name, recipient)
            }
            None => format!("{} {}", AUDIT_NOTIFICATION_SENT, recipient),
        }
    }
}
