//! Collaborators of the expiry job.
//!
//! The job only sees these traits; Postgres, SMTP and the audit table are
//! injected at startup so ticks can run against in-memory fakes in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::error::Result;
use crate::features::notifications::models::{EmailMessage, FileReminder};

/// Read side of the file registry
#[async_trait]
pub trait ExpiringFileSource: Send + Sync {
    /// Files whose expiry date lies in `[start, end]`, joined with their client
    async fn find_files_expiring_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FileReminder>>;
}

/// Outbound email transport
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Append-only audit log
#[async_trait]
pub trait AuditReporter: Send + Sync {
    async fn record(&self, description: &str) -> Result<()>;
}
