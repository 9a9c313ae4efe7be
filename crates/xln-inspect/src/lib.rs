//! Read-side engine shared by every inspection panel: time-travel resolution
//! over the frame history, keyed-collection normalization, log filtering, and
//! the event bridge panels use to talk to each other.
//!
//! Everything on the data path (`resolve`, `normalize`, `filter`) is pure and
//! total: missing data comes back as `None` or an empty list, never an error.

pub mod bridge;
pub mod collection;
pub mod filter;
pub mod format;
pub mod settings;
pub mod time;

pub use bridge::{EventBridge, PanelEvent, Subscription, topics};
pub use collection::{
    ReplicaKey, entity_id_of, entity_ids, normalize, normalize_value, replicas_for_entity,
    split_replica_key,
};
pub use filter::{EmptyState, FilterOutcome, LogFilter, LogTally, filter};
pub use settings::{
    DashboardSettings, FsSettingsStore, MemSettingsStore, SettingsError, SettingsHandle,
    SettingsStore, Theme,
};
pub use time::{TimeCursor, TimeView, resolve, resolve_view};
