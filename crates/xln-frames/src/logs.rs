use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity attached to every runtime log entry, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Subsystem that produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Consensus,
    Account,
    Jurisdiction,
    Evm,
    Network,
    Ui,
    System,
}

impl LogCategory {
    pub const ALL: [LogCategory; 7] = [
        LogCategory::Consensus,
        LogCategory::Account,
        LogCategory::Jurisdiction,
        LogCategory::Evm,
        LogCategory::Network,
        LogCategory::Ui,
        LogCategory::System,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogCategory::Consensus => "consensus",
            LogCategory::Account => "account",
            LogCategory::Jurisdiction => "jurisdiction",
            LogCategory::Evm => "evm",
            LogCategory::Network => "network",
            LogCategory::Ui => "ui",
            LogCategory::System => "system",
        }
    }
}

macro_rules! impl_name_parsing {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let wanted = raw.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|item| item.as_str() == wanted)
                    .ok_or_else(|| format!("unknown {} '{}'", $what, raw))
            }
        }
    };
}

impl_name_parsing!(LogLevel, "log level");
impl_name_parsing!(LogCategory, "log category");

/// One structured log record emitted while a frame was being produced.
/// Entries keep creation order inside their frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub category: LogCategory,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl LogEntry {
    pub fn new(level: LogLevel, category: LogCategory, message: impl Into<String>) -> Self {
        Self {
            level,
            category,
            message: message.into(),
            entity_id: None,
            data: None,
        }
    }

    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
