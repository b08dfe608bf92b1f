mod email;
mod outcome;
mod reminder;
mod window;

pub use email::EmailMessage;
pub use outcome::{DispatchOutcome, TickSummary};
pub use reminder::{ClientContact, FileReminder};
pub use window::SelectionWindow;
