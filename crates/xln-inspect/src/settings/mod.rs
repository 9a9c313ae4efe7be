//! Dashboard settings and the key/value store they persist into.
//!
//! The store itself is dumb JSON-per-key. `SettingsHandle` owns the typed view,
//! writes it back on every change and announces the change on the bridge.

mod fs;
mod mem;

pub use fs::FsSettingsStore;
pub use mem::MemSettingsStore;

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::bridge::{EventBridge, PanelEvent};
use crate::filter::LogFilter;

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Storage key under which the dashboard settings document lives.
pub const DASHBOARD_SETTINGS_KEY: &str = "xln.dashboard.settings";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings key '{0}'")]
    InvalidKey(String),
    #[error("settings document must be a JSON object")]
    NotAnObject,
}

pub(crate) fn io_error(path: impl Into<PathBuf>, err: std::io::Error) -> SettingsError {
    SettingsError::Io {
        path: path.into(),
        source: err,
    }
}

/// Persistent key/value storage for JSON documents.
pub trait SettingsStore: Send + Sync {
    fn load(&self, key: &str) -> SettingsResult<Option<Value>>;
    fn save(&self, key: &str, value: &Value) -> SettingsResult<()>;
    fn remove(&self, key: &str) -> SettingsResult<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// User-facing dashboard preferences.
///
/// Fields written by other consumers of the same document are kept in
/// `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardSettings {
    pub theme: Theme,
    pub ui_scale: f64,
    /// Whether panels start out following the live frame.
    pub follow_live: bool,
    pub log_filter: LogFilter,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            ui_scale: 1.0,
            follow_live: true,
            log_filter: LogFilter::default(),
            extra: Map::new(),
        }
    }
}

impl DashboardSettings {
    fn to_object(&self) -> SettingsResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(object) => Ok(object),
            _ => Err(SettingsError::NotAnObject),
        }
    }
}

/// Typed, bridge-aware access to the persisted dashboard settings.
pub struct SettingsHandle {
    store: Arc<dyn SettingsStore>,
    bridge: EventBridge<PanelEvent>,
    key: String,
    current: DashboardSettings,
}

impl SettingsHandle {
    /// Loads settings under [`DASHBOARD_SETTINGS_KEY`]. A missing document
    /// yields defaults. Fields that fail to decode fall back to their default
    /// one by one; every other field, foreign ones included, is kept.
    pub fn load(store: Arc<dyn SettingsStore>, bridge: EventBridge<PanelEvent>) -> SettingsResult<Self> {
        Self::load_key(store, bridge, DASHBOARD_SETTINGS_KEY)
    }

    pub fn load_key(
        store: Arc<dyn SettingsStore>,
        bridge: EventBridge<PanelEvent>,
        key: &str,
    ) -> SettingsResult<Self> {
        let current = match store.load(key)? {
            Some(value) => decode_stored(key, value)?,
            None => DashboardSettings::default(),
        };
        Ok(Self {
            store,
            bridge,
            key: key.to_string(),
            current,
        })
    }

    pub fn current(&self) -> &DashboardSettings {
        &self.current
    }

    /// Top-level field by its wire name, including unknown fields.
    pub fn get(&self, field: &str) -> SettingsResult<Option<Value>> {
        Ok(self.current.to_object()?.remove(field))
    }

    /// Sets one top-level field by wire name. The new document must still
    /// decode as settings; otherwise nothing changes.
    pub fn set(&mut self, field: &str, value: Value) -> SettingsResult<()> {
        let mut object = self.current.to_object()?;
        object.insert(field.to_string(), value);
        let next: DashboardSettings = serde_json::from_value(Value::Object(object))?;
        self.replace(next)
    }

    /// Applies `edit` to a copy of the settings, then persists and announces
    /// every top-level field that changed.
    pub fn update(&mut self, edit: impl FnOnce(&mut DashboardSettings)) -> SettingsResult<()> {
        let mut next = self.current.clone();
        edit(&mut next);
        self.replace(next)
    }

    /// Restores defaults, drops foreign fields too, and publishes a reset.
    pub fn reset(&mut self) -> SettingsResult<()> {
        self.current = DashboardSettings::default();
        self.store.remove(&self.key)?;
        self.bridge.emit(&PanelEvent::SettingsReset);
        Ok(())
    }

    fn replace(&mut self, next: DashboardSettings) -> SettingsResult<()> {
        let before = self.current.to_object()?;
        let after = next.to_object()?;
        self.store.save(&self.key, &Value::Object(after.clone()))?;
        self.current = next;

        let removed: Vec<String> = before
            .keys()
            .filter(|field| !after.contains_key(*field))
            .cloned()
            .collect();
        for (field, value) in after {
            if before.get(&field) != Some(&value) {
                self.bridge.emit(&PanelEvent::SettingsChanged { key: field, value });
            }
        }
        for field in removed {
            self.bridge.emit(&PanelEvent::SettingsChanged {
                key: field,
                value: Value::Null,
            });
        }
        Ok(())
    }
}

/// Decodes a stored document field by field so one bad value cannot take the
/// rest of the document down with it.
fn decode_stored(key: &str, raw: Value) -> SettingsResult<DashboardSettings> {
    let err = match serde_json::from_value(raw.clone()) {
        Ok(settings) => return Ok(settings),
        Err(err) => err,
    };
    let Value::Object(fields) = raw else {
        log::warn!("settings '{key}' is not an object, using defaults: {err}");
        return Ok(DashboardSettings::default());
    };

    let mut accepted = DashboardSettings::default().to_object()?;
    for (field, value) in fields {
        let mut candidate = accepted.clone();
        candidate.insert(field.clone(), value);
        match serde_json::from_value::<DashboardSettings>(Value::Object(candidate.clone())) {
            Ok(_) => accepted = candidate,
            Err(err) => log::warn!("settings '{key}': field '{field}' unreadable, using default: {err}"),
        }
    }
    Ok(serde_json::from_value(Value::Object(accepted))?)
}

impl std::fmt::Debug for SettingsHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsHandle")
            .field("key", &self.key)
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::topics;
    use serde_json::json;
    use std::sync::Mutex;
    use xln_frames::LogLevel;

    fn captured(bridge: &EventBridge<PanelEvent>) -> Arc<Mutex<Vec<PanelEvent>>> {
        let seen: Arc<Mutex<Vec<PanelEvent>>> = Arc::default();
        for topic in [topics::SETTINGS_CHANGED, topics::SETTINGS_RESET] {
            let sink = seen.clone();
            // Handlers stay registered for the lifetime of the bridge.
            let _ = bridge.subscribe(topic, move |event| sink.lock().unwrap().push(event.clone()));
        }
        seen
    }

    #[test]
    fn missing_document_loads_defaults() {
        let store = Arc::new(MemSettingsStore::new());
        let handle = SettingsHandle::load(store, EventBridge::new()).unwrap();
        assert_eq!(handle.current(), &DashboardSettings::default());
    }

    #[test]
    fn foreign_fields_round_trip() {
        let store = Arc::new(MemSettingsStore::new());
        store
            .save(
                DASHBOARD_SETTINGS_KEY,
                &json!({"theme": "light", "layout": {"panels": ["logs", "graph"]}}),
            )
            .unwrap();

        let mut handle = SettingsHandle::load(store.clone(), EventBridge::new()).unwrap();
        assert_eq!(handle.current().theme, Theme::Light);
        handle.set("uiScale", json!(1.25)).unwrap();

        let stored = store.load(DASHBOARD_SETTINGS_KEY).unwrap().unwrap();
        assert_eq!(stored["layout"], json!({"panels": ["logs", "graph"]}));
        assert_eq!(stored["uiScale"], json!(1.25));
        assert_eq!(stored["theme"], json!("light"));
    }

    #[test]
    fn changes_are_announced_per_field() {
        let bridge = EventBridge::new();
        let seen = captured(&bridge);
        let mut handle =
            SettingsHandle::load(Arc::new(MemSettingsStore::new()), bridge.clone()).unwrap();

        handle
            .update(|s| {
                s.theme = Theme::Light;
                s.log_filter.toggle_level(LogLevel::Debug);
            })
            .unwrap();

        let keys: Vec<String> = seen
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                PanelEvent::SettingsChanged { key, .. } => Some(key.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(keys, vec!["theme", "logFilter"]);
    }

    #[test]
    fn invalid_value_leaves_settings_untouched() {
        let store = Arc::new(MemSettingsStore::new());
        let mut handle = SettingsHandle::load(store.clone(), EventBridge::new()).unwrap();
        assert!(handle.set("theme", json!("neon")).is_err());
        assert_eq!(handle.current().theme, Theme::Dark);
        assert!(store.load(DASHBOARD_SETTINGS_KEY).unwrap().is_none());
    }

    #[test]
    fn reset_clears_store_and_publishes() {
        let bridge = EventBridge::new();
        let seen = captured(&bridge);
        let store = Arc::new(MemSettingsStore::new());
        let mut handle = SettingsHandle::load(store.clone(), bridge).unwrap();
        handle.set("theme", json!("light")).unwrap();
        handle.reset().unwrap();

        assert_eq!(handle.current(), &DashboardSettings::default());
        assert!(store.load(DASHBOARD_SETTINGS_KEY).unwrap().is_none());
        assert_eq!(seen.lock().unwrap().last(), Some(&PanelEvent::SettingsReset));
    }

    #[test]
    fn unreadable_document_falls_back_to_defaults() {
        let store = Arc::new(MemSettingsStore::new());
        store.save(DASHBOARD_SETTINGS_KEY, &json!({"uiScale": "big"})).unwrap();
        let handle = SettingsHandle::load(store.clone(), EventBridge::new()).unwrap();
        assert_eq!(handle.current().ui_scale, 1.0);

        store.save(DASHBOARD_SETTINGS_KEY, &json!("not an object")).unwrap();
        let handle = SettingsHandle::load(store, EventBridge::new()).unwrap();
        assert_eq!(handle.current(), &DashboardSettings::default());
    }

    #[test]
    fn bad_field_does_not_drop_the_rest_of_the_document() {
        let store = Arc::new(MemSettingsStore::new());
        store
            .save(
                DASHBOARD_SETTINGS_KEY,
                &json!({
                    "uiScale": "big",
                    "followLive": false,
                    "logFilter": 5,
                    "layout": {"panels": ["logs"]}
                }),
            )
            .unwrap();

        let mut handle = SettingsHandle::load(store.clone(), EventBridge::new()).unwrap();
        assert_eq!(handle.current().ui_scale, 1.0);
        assert!(!handle.current().follow_live);
        assert_eq!(handle.current().log_filter, LogFilter::default());
        handle.set("theme", json!("light")).unwrap();

        let stored = store.load(DASHBOARD_SETTINGS_KEY).unwrap().unwrap();
        assert_eq!(stored["layout"], json!({"panels": ["logs"]}));
        assert_eq!(stored["theme"], json!("light"));
        assert_eq!(stored["followLive"], json!(false));
        assert_eq!(stored["uiScale"], json!(1.0));
    }

    #[test]
    fn removed_fields_are_announced_as_null() {
        let bridge = EventBridge::new();
        let seen = captured(&bridge);
        let store = Arc::new(MemSettingsStore::new());
        store
            .save(DASHBOARD_SETTINGS_KEY, &json!({"layout": {"panels": []}}))
            .unwrap();
        let mut handle = SettingsHandle::load(store.clone(), bridge).unwrap();

        handle
            .update(|s| {
                s.extra.remove("layout");
            })
            .unwrap();

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[PanelEvent::SettingsChanged {
                key: "layout".into(),
                value: Value::Null
            }]
        );
        let stored = store.load(DASHBOARD_SETTINGS_KEY).unwrap().unwrap();
        assert!(stored.get("layout").is_none());
    }
}
