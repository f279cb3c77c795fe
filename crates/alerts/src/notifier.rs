//! The report task run on each trigger.

use crate::report::format_report;
use crate::telegram::{deliver, MessageSender};
use rates_core::{Credentials, RateSnapshot};
use rates_feeds::RateSource;
use tracing::{info, warn};

/// Result of one report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub snapshot: RateSnapshot,
    pub delivered: bool,
}

/// Fetches rates, formats the report and sends it to the configured chat.
pub struct ReportTask<R, S> {
    source: R,
    sender: S,
    chat_id: String,
}

impl<R: RateSource, S: MessageSender> ReportTask<R, S> {
    pub fn new(source: R, sender: S, credentials: &Credentials) -> Self {
        Self {
            source,
            sender,
            chat_id: credentials.chat_id().to_string(),
        }
    }

    /// Run fetch, format and send once. Failures are logged, never returned.
    pub async fn run(&self) -> ReportOutcome {
        info!("Running scheduled report: collecting rates...");

        let snapshot = self.source.snapshot().await;
        let available = snapshot.available_count();
        if available < 3 {
            warn!("Only {}/3 rates available, sending with placeholders", available);
        }

        let text = format_report(&snapshot);
        let delivered = deliver(&self.sender, &self.chat_id, &text).await;

        ReportOutcome {
            snapshot,
            delivered,
        }
    }
}
