use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use fake::faker::address::en::StreetName;
use fake::faker::company::en::{CompanyName, Industry};
use fake::faker::lorem::en::Sentence;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::clients::Client;
use crate::features::files::models::File;
use crate::features::notifications::models::{EmailMessage, FileReminder, SelectionWindow};
use crate::features::notifications::ports::{AuditReporter, ExpiringFileSource, Notifier};

/// A file row with generated content, no client and no inline email
#[allow(dead_code)]
pub fn file_expiring_at(expired_date: DateTime<Utc>) -> File {
    let now = Utc::now();
    let id = Uuid::new_v4();
    File {
        id,
        file_name: format!("SIUP {}", CompanyName().fake::<String>()),
        client_id: None,
        email: None,
        master_id: Uuid::new_v4(),
        publish_date: expired_date - Duration::days(365),
        expired_date,
        reminder_subject: Sentence(3..6).fake(),
        reminder_body: format!("<p>{}</p>", Sentence(8..12).fake::<String>()),
        file_url: format!("{}.pdf", id),
        created_at: now,
        updated_at: now,
    }
}

/// An active client with the given addresses and generated details
#[allow(dead_code)]
pub fn client_with_emails(first_email: &str, second_email: Option<&str>) -> Client {
    let now = Utc::now();
    Client {
        id: Uuid::new_v4(),
        client_name: CompanyName().fake(),
        first_email: first_email.to_string(),
        second_email: second_email.map(str::to_string),
        first_phone: PhoneNumber().fake(),
        second_phone: None,
        address: StreetName().fake(),
        business_type: Industry().fake(),
        status: true,
        created_at: now,
        updated_at: now,
    }
}

#[allow(dead_code)]
pub fn reminder_for_client(
    expired_date: DateTime<Utc>,
    first_email: &str,
    second_email: Option<&str>,
) -> FileReminder {
    let client = client_with_emails(first_email, second_email);
    let mut file = file_expiring_at(expired_date);
    file.client_id = Some(client.id);
    FileReminder::new(file, Some(&client))
}

#[allow(dead_code)]
pub fn reminder_with_inline_email(expired_date: DateTime<Utc>, email: Option<&str>) -> FileReminder {
    let mut file = file_expiring_at(expired_date);
    file.email = email.map(str::to_string);
    FileReminder::new(file, None)
}

/// File source that filters a fixed set of reminders by the requested window
#[allow(dead_code)]
pub struct InMemoryFileSource {
    reminders: Vec<FileReminder>,
    fail: bool,
    calls: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
}

#[allow(dead_code)]
impl InMemoryFileSource {
    pub fn new(reminders: Vec<FileReminder>) -> Self {
        Self {
            reminders,
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExpiringFileSource for InMemoryFileSource {
    async fn find_files_expiring_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FileReminder>> {
        self.calls.lock().unwrap().push((start, end));

        if self.fail {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let window = SelectionWindow { start, end };
        Ok(self
            .reminders
            .iter()
            .filter(|r| window.contains(r.expired_date))
            .cloned()
            .collect())
    }
}

/// Notifier that records messages and fails for chosen `to` lines
#[allow(dead_code)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<EmailMessage>>,
    failing_recipients: HashSet<String>,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_recipients: HashSet::new(),
        }
    }

    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            failing_recipients: recipients.iter().map(|r| r.to_string()).collect(),
            ..Self::new()
        }
    }

    /// Messages that were accepted
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        if self.failing_recipients.contains(&message.to) {
            return Err(AppError::Mail(format!(
                "Connection refused while sending to {}",
                message.to
            )));
        }

        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Audit reporter that keeps entries in memory
#[allow(dead_code)]
pub struct RecordingAuditReporter {
    entries: Mutex<Vec<String>>,
    fail: bool,
}

#[allow(dead_code)]
impl RecordingAuditReporter {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditReporter for RecordingAuditReporter {
    async fn record(&self, description: &str) -> Result<()> {
        if self.fail {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }

        self.entries.lock().unwrap().push(description.to_string());
        Ok(())
    }
}
