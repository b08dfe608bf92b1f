//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for external services such as outgoing mail.

pub mod mail;
