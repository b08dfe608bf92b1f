//! Outgoing mail
//!
//! SMTP delivery of reminder emails over lettre's async transport.

mod smtp_client;

pub use smtp_client::SmtpMailer;
