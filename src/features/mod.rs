pub mod clients;
pub mod files;
pub mod health;
pub mod notifications;
pub mod reports;
