mod expiry_notifier;

pub use expiry_notifier::{ExpiryNotifier, ExpiryNotifierSettings};
