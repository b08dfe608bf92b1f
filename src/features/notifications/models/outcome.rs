use uuid::Uuid;

use crate::features::notifications::models::SelectionWindow;

/// Result of one per-file unit of work inside a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Email handed to the transport; `audited` is false when the audit insert failed
    Sent {
        file_id: Uuid,
        recipient: String,
        audited: bool,
    },
    /// Validation or transport failure, not retried
    Failed {
        file_id: Uuid,
        recipient: String,
        error: String,
    },
    /// No usable contact address
    Skipped { file_id: Uuid },
}

/// Counts for one tick, logged when the tick completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    pub window: SelectionWindow,
    pub selected: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
    pub audit_failures: usize,
}

impl TickSummary {
    pub fn new(window: SelectionWindow, selected: usize) -> Self {
        Self {
            window,
            selected,
            sent: 0,
            failed: 0,
            skipped: 0,
            audit_failures: 0,
        }
    }

    pub fn record(&mut self, outcome: &DispatchOutcome) {
        match outcome {
            DispatchOutcome::Sent { audited, .. } => {
                self.sent += 1;
                if !audited {
                    self.audit_failures += 1;
                }
            }
            DispatchOutcome::Failed { .. } => self.failed += 1,
            DispatchOutcome::Skipped { .. } => self.skipped += 1,
        }
    }

    /// A dispatch task that panicked or was cancelled before reporting
    pub fn record_lost_task(&mut self) {
        self.failed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_summary_counts_each_outcome() {
        let window = SelectionWindow::ending_at(Utc::now(), Duration::hours(24));
        let mut summary = TickSummary::new(window, 5);

        summary.record(&DispatchOutcome::Sent {
            file_id: Uuid::new_v4(),
            recipient: "a@pt-maju.co.id".to_string(),
            audited: true,
        });
        summary.record(&DispatchOutcome::Sent {
            file_id: Uuid::new_v4(),
            recipient: "b@pt-maju.co.id".to_string(),
            audited: false,
        });
        summary.record(&DispatchOutcome::Failed {
            file_id: Uuid::new_v4(),
            recipient: "c@pt-maju.co.id".to_string(),
            error: "connection refused".to_string(),
        });
        summary.record(&DispatchOutcome::Skipped {
            file_id: Uuid::new_v4(),
        });
        summary.record_lost_task();

        assert_eq!(summary.selected, 5);
        assert_eq!(summary.sent, 2);
        assert_eq!(summary.audit_failures, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 1);
    }
}
