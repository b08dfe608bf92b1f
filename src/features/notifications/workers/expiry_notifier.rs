use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use cron::Schedule;
use tokio::task::JoinSet;
use tokio::time::sleep;

use crate::core::config::{MailConfig, NotificationConfig};
use crate::core::error::Result;
use crate::features::notifications::models::{
    DispatchOutcome, EmailMessage, FileReminder, SelectionWindow, TickSummary,
};
use crate::features::notifications::ports::{AuditReporter, ExpiringFileSource, Notifier};

/// Runtime knobs of the expiry notifier
#[derive(Debug, Clone)]
pub struct ExpiryNotifierSettings {
    pub schedule: Schedule,
    /// Length of the trailing selection window
    pub window: Duration,
    pub from_address: String,
    /// Staging redirect: replaces every resolved recipient
    pub recipient_override: Option<String>,
}

impl ExpiryNotifierSettings {
    pub fn from_config(notification: &NotificationConfig, mail: &MailConfig) -> Self {
        Self {
            schedule: notification.schedule.clone(),
            window: notification.window,
            from_address: mail.from_address.clone(),
            recipient_override: notification.recipient_override.clone(),
        }
    }
}

/// Background worker that reminds clients about expiring files.
///
/// Each tick selects files whose expiry date falls in `[now - window, now]`,
/// sends one email per file concurrently, and appends an audit row for every
/// successful send. Failed sends are logged and dropped; the next tick will
/// select the file again if it is still inside the window.
pub struct ExpiryNotifier {
    source: Arc<dyn ExpiringFileSource>,
    notifier: Arc<dyn Notifier>,
    audit: Arc<dyn AuditReporter>,
    settings: ExpiryNotifierSettings,
}

impl ExpiryNotifier {
    pub fn new(
        source: Arc<dyn ExpiringFileSource>,
        notifier: Arc<dyn Notifier>,
        audit: Arc<dyn AuditReporter>,
        settings: ExpiryNotifierSettings,
    ) -> Self {
        Self {
            source,
            notifier,
            audit,
            settings,
        }
    }

    /// Run the notifier on its cron schedule until the process exits
    pub async fn run(&self) {
        tracing::info!(
            "Starting expiry notifier worker (window: {}h, schedule: {})",
            self.settings.window.num_hours(),
            self.settings.schedule
        );

        let mut last_run = None;

        loop {
            let Some((next, delay)) = next_run(&self.settings.schedule, Utc::now(), last_run)
            else {
                tracing::warn!("Notification schedule has no upcoming run, stopping worker");
                return;
            };

            tracing::debug!("Next expiry scan at {}", next);
            sleep(delay).await;
            last_run = Some(next);

            match self.run_tick(Utc::now()).await {
                Ok(summary) => tracing::info!(
                    "Expiry scan finished: window={}, selected={}, sent={}, failed={}, skipped={}, audit_failures={}",
                    summary.window,
                    summary.selected,
                    summary.sent,
                    summary.failed,
                    summary.skipped,
                    summary.audit_failures
                ),
                Err(e) => tracing::error!("Expiry scan failed: {:?}", e),
            }
        }
    }

    /// Run a single tick and wait for every dispatch it started
    pub async fn run_tick(&self, now: DateTime<Utc>) -> Result<TickSummary> {
        let window = SelectionWindow::ending_at(now, self.settings.window);

        let reminders = self
            .source
            .find_files_expiring_between(window.start, window.end)
            .await?;

        let mut summary = TickSummary::new(window, reminders.len());

        if reminders.is_empty() {
            tracing::debug!("No files expiring in {}", window);
            return Ok(summary);
        }

        tracing::info!("Sending reminders for {} expiring files", reminders.len());

        let mut tasks = JoinSet::new();

        for reminder in reminders {
            let Some(message) = self.build_message(&reminder) else {
                tracing::warn!(
                    "File {} ({}) has no contact email, skipping reminder",
                    reminder.file_id,
                    reminder.file_name
                );
                summary.record(&DispatchOutcome::Skipped {
                    file_id: reminder.file_id,
                });
                continue;
            };

            tasks.spawn(dispatch(
                Arc::clone(&self.notifier),
                Arc::clone(&self.audit),
                reminder,
                message,
            ));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => summary.record(&outcome),
                Err(e) => {
                    tracing::error!("Reminder dispatch task aborted: {}", e);
                    summary.record_lost_task();
                }
            }
        }

        Ok(summary)
    }

    fn build_message(&self, reminder: &FileReminder) -> Option<EmailMessage> {
        let recipient = reminder.recipient()?;
        let to = self.settings.recipient_override.clone().unwrap_or(recipient);

        Some(EmailMessage::new(
            self.settings.from_address.clone(),
            to,
            reminder.reminder_subject.clone(),
            reminder.reminder_body.clone(),
        ))
    }
}

/// Send one reminder and audit it on success
async fn dispatch(
    notifier: Arc<dyn Notifier>,
    audit: Arc<dyn AuditReporter>,
    reminder: FileReminder,
    message: EmailMessage,
) -> DispatchOutcome {
    let file_id = reminder.file_id;

    let sent = match message.ensure_valid() {
        Ok(()) => notifier.send(&message).await,
        Err(e) => Err(e),
    };

    if let Err(e) = sent {
        tracing::error!(
            "Failed to send reminder for file {} to {}: {}",
            file_id,
            message.to,
            e
        );
        return DispatchOutcome::Failed {
            file_id,
            recipient: message.to,
            error: e.to_string(),
        };
    }

    tracing::debug!(
        "Reminder sent for file {} ({}, expires {}) to {}",
        file_id,
        reminder.file_name,
        reminder.expired_date,
        message.to
    );

    let description = reminder.audit_description(&message.to);
    let audited = match audit.record(&description).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Failed to write audit entry for file {}: {:?}", file_id, e);
            false
        }
    };

    DispatchOutcome::Sent {
        file_id,
        recipient: message.to,
        audited,
    }
}

/// Next cron occurrence and how long to wait for it from `now`.
///
/// The occurrence is strictly after both `now` and `last_run`, so a wall clock
/// that lags the sleep timer cannot fire the same occurrence twice.
fn next_run(
    schedule: &Schedule,
    now: DateTime<Utc>,
    last_run: Option<DateTime<Utc>>,
) -> Option<(DateTime<Utc>, std::time::Duration)> {
    let after = last_run.map_or(now, |last| last.max(now));
    let next = schedule.after(&after).next()?;
    let delay = (next - now).to_std().unwrap_or_default();
    Some((next, delay))
}
