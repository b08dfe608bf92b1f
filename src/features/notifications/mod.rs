pub mod models;
pub mod ports;
pub mod workers;

pub use ports::{AuditReporter, ExpiringFileSource, Notifier};
pub use workers::ExpiryNotifier;
