//! Fire-and-forget telemetry events.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

pub type Params = Vec<(&'static str, Value)>;

/// Receives `game_start`, `game_over` and `bird_select`. Must not fail.
pub trait Analytics {
    fn track(&mut self, event: &'static str, params: Params);
}

/// Writes each event to the log under the `analytics` target.
#[derive(Debug, Default)]
pub struct LogAnalytics;

impl Analytics for LogAnalytics {
    fn track(&mut self, event: &'static str, params: Params) {
        let fields = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(target: "analytics", event, "{fields}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_display_plainly() {
        assert_eq!(Value::from(15u32).to_string(), "15");
        assert_eq!(Value::from("festive").to_string(), "festive");
    }

    #[test]
    fn log_sink_accepts_events_without_subscriber() {
        let mut a = LogAnalytics;
        a.track("bird_select", vec![("bird_type", "advanced".into())]);
    }
}
