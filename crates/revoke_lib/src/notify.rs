use crate::display::explorer_url;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use web3::types::H256;

/// Where the user facing message should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Sent once a transaction is broadcast, before it is confirmed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedNotice {
    /// Unique per flow invocation, lets the sink update the same toast later
    pub correlation_token: Uuid,
    pub chain_id: u64,
    pub tx_hash: H256,
    pub method: &'static str,
    pub submitted_at: DateTime<Utc>,
}

impl SubmittedNotice {
    pub fn new(chain_id: u64, tx_hash: H256, method: &'static str) -> Self {
        Self {
            correlation_token: Uuid::new_v4(),
            chain_id,
            tx_hash,
            method,
            submitted_at: Utc::now(),
        }
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify_submitted(&self, notice: &SubmittedNotice);

    fn notify_error(&self, message: &str, placement: Placement);
}

/// Writes notifications to the log, linking transactions to the block explorer when known
#[derive(Debug, Clone, Default)]
pub struct LogNotificationSink {
    block_explorer_url: Option<String>,
}

impl LogNotificationSink {
    pub fn new(block_explorer_url: Option<String>) -> Self {
        Self { block_explorer_url }
    }
}

impl NotificationSink for LogNotificationSink {
    fn notify_submitted(&self, notice: &SubmittedNotice) {
        let tx_hash = format!("{:#x}", notice.tx_hash);
        match self
            .block_explorer_url
            .as_deref()
            .and_then(|base| explorer_url(base, "tx", &tx_hash))
        {
            Some(link) => log::info!(
                "[{}] Transaction submitted: {} - {}",
                notice.correlation_token,
                notice.method,
                link
            ),
            None => log::info!(
                "[{}] Transaction submitted: {} - {}",
                notice.correlation_token,
                notice.method,
                tx_hash
            ),
        }
    }

    fn notify_error(&self, message: &str, placement: Placement) {
        log::error!("{message} ({placement:?})");
    }
}
