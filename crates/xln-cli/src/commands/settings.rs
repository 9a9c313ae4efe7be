//! `xln-inspect settings` commands.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::{Number, Value, json};
use xln_inspect::{EventBridge, FsSettingsStore, PanelEvent, SettingsHandle, topics};

use crate::config::InspectConfig;
use crate::opts::InspectOpts;
use crate::output::{print_empty, print_success};

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the settings document, or one top-level field
    Get { field: Option<String> },

    /// Set a top-level field; VALUE is JSON, a bare word is taken as a string
    Set { field: String, value: String },

    /// Restore defaults
    Reset,
}

pub fn cmd_settings(opts: &InspectOpts, config: &InspectConfig, cmd: &SettingsCommand) -> Result<()> {
    let store = FsSettingsStore::open(&config.settings_dir)
        .with_context(|| format!("open settings at {}", config.settings_dir.display()))?;
    let bridge = EventBridge::new();
    let changed: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = changed.clone();
    let _changes = bridge.subscribe(topics::SETTINGS_CHANGED, move |event: &PanelEvent| {
        if let PanelEvent::SettingsChanged { key, .. } = event {
            sink.lock().unwrap().push(key.clone());
        }
    });
    let mut handle = SettingsHandle::load(Arc::new(store), bridge)?;

    match cmd {
        SettingsCommand::Get { field: None } => {
            print_success(opts, serde_json::to_value(handle.current())?, None, vec![])
        }
        SettingsCommand::Get { field: Some(field) } => match handle.get(field)? {
            Some(value) => print_success(opts, value, None, vec![]),
            None => print_empty(opts, &format!("setting '{field}' is not set"), None),
        },
        SettingsCommand::Set { field, value } => {
            handle
                .set(field, parse_value(value))
                .with_context(|| format!("set '{field}'"))?;
            let changed = changed.lock().unwrap().clone();
            let warnings = if changed.is_empty() {
                vec!["value unchanged".to_string()]
            } else {
                vec![]
            };
            let data = handle.get(field)?.unwrap_or(Value::Null);
            print_success(opts, data, Some(json!({ "changed": changed })), warnings)
        }
        SettingsCommand::Reset => {
            handle.reset()?;
            print_success(
                opts,
                Value::String("settings reset to defaults".into()),
                None,
                vec![],
            )
        }
    }
}

fn parse_value(raw: &str) -> Value {
    match serde_json::from_str(raw) {
        // Decimal text is kept verbatim by the parser; store the f64 spelling
        // so `1.50` decodes the same as `1.5`.
        Ok(Value::Number(number)) if number.is_f64() => {
            match number.as_f64().and_then(Number::from_f64) {
                Some(canonical) => Value::Number(canonical),
                None => Value::Number(number),
            }
        }
        Ok(value) => value,
        Err(_) => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_words_become_strings() {
        assert_eq!(parse_value("light"), json!("light"));
        assert_eq!(parse_value("1.5"), json!(1.5));
        assert_eq!(parse_value("1.50"), json!(1.5));
        assert_eq!(parse_value("100000000000000000000"), serde_json::from_str::<Value>("100000000000000000000").unwrap());
        assert_eq!(parse_value("{\"a\":true}"), json!({"a": true}));
    }
}
