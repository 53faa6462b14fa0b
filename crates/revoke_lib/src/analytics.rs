use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const REVOKED_ERC20_ALLOWANCE: &str = "Revoked ERC20 allowance";
pub const UPDATED_ERC20_ALLOWANCE: &str = "Updated ERC20 allowance";
pub const REVOKED_ERC721_ALLOWANCE: &str = "Revoked ERC721 allowance";

pub type Properties = BTreeMap<String, Value>;

/// Fire and forget event log
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, event_name: &str, properties: &Properties);
}

/// Emits every event as a single JSON line on the `analytics` log target
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAnalyticsSink;

impl AnalyticsSink for LogAnalyticsSink {
    fn record(&self, event_name: &str, properties: &Properties) {
        log::info!(
            target: "analytics",
            "{}",
            json!({ "event": event_name, "properties": properties })
        );
    }
}

/// Events are dropped, for users that opted out
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalyticsSink;

impl AnalyticsSink for NoopAnalyticsSink {
    fn record(&self, _event_name: &str, _properties: &Properties) {}
}
