//! Log viewer filtering over a frame's structured log entries.
//!
//! An entry is visible when its level and category are both active, its
//! message contains the search text (case-insensitive, empty matches all),
//! and it belongs to the selected entity when one is set. Order is preserved
//! and nothing is deduplicated.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use xln_frames::{LogCategory, LogEntry, LogLevel};

/// Per-panel filter configuration. Never stored inside a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub active_levels: BTreeSet<LogLevel>,
    pub active_categories: BTreeSet<LogCategory>,
    #[serde(default)]
    pub search_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl Default for LogFilter {
    /// info and above, every category.
    fn default() -> Self {
        Self {
            active_levels: [LogLevel::Info, LogLevel::Warn, LogLevel::Error]
                .into_iter()
                .collect(),
            active_categories: LogCategory::ALL.into_iter().collect(),
            search_text: String::new(),
            entity_id: None,
        }
    }
}

impl LogFilter {
    /// Every level and category, no search, no entity: passes everything.
    pub fn all() -> Self {
        Self {
            active_levels: LogLevel::ALL.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Adds the level if absent, removes it if present. Returns whether it is now active.
    pub fn toggle_level(&mut self, level: LogLevel) -> bool {
        toggle(&mut self.active_levels, level)
    }

    pub fn toggle_category(&mut self, category: LogCategory) -> bool {
        toggle(&mut self.active_categories, category)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn set_entity(&mut self, entity_id: Option<String>) {
        self.entity_id = entity_id;
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.matcher().matches(entry)
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher {
            filter: self,
            needle: self.search_text.to_lowercase(),
        }
    }

    /// Runs the filter and keeps the total so the caller can tell an empty
    /// frame from a filter that hides everything.
    pub fn apply<'a>(&self, entries: &'a [LogEntry]) -> FilterOutcome<'a> {
        FilterOutcome {
            visible: filter(entries, self),
            total: entries.len(),
        }
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, item: T) -> bool {
    if set.remove(&item) {
        false
    } else {
        set.insert(item);
        true
    }
}

struct Matcher<'a> {
    filter: &'a LogFilter,
    needle: String,
}

impl Matcher<'_> {
    fn matches(&self, entry: &LogEntry) -> bool {
        self.filter.active_levels.contains(&entry.level)
            && self.filter.active_categories.contains(&entry.category)
            && (self.needle.is_empty() || entry.message.to_lowercase().contains(&self.needle))
            && self
                .filter
                .entity_id
                .as_deref()
                .is_none_or(|wanted| entry.entity_id.as_deref() == Some(wanted))
    }
}

/// Visible subset of `entries`, in original order.
pub fn filter<'a>(entries: &'a [LogEntry], config: &LogFilter) -> Vec<&'a LogEntry> {
    let matcher = config.matcher();
    entries.iter().filter(|entry| matcher.matches(entry)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome<'a> {
    pub visible: Vec<&'a LogEntry>,
    pub total: usize,
}

/// What the log panel should say when it has nothing or something to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The frame has no log entries at all.
    NoEntries,
    /// Entries exist but the active filter hides all of them.
    NoMatches { total: usize },
    Visible(usize),
}

impl FilterOutcome<'_> {
    pub fn empty_state(&self) -> EmptyState {
        match (self.total, self.visible.len()) {
            (0, _) => EmptyState::NoEntries,
            (total, 0) => EmptyState::NoMatches { total },
            (_, shown) => EmptyState::Visible(shown),
        }
    }

    pub fn hidden(&self) -> usize {
        self.total - self.visible.len()
    }
}

impl EmptyState {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            EmptyState::NoEntries => Some("no log entries in frame"),
            EmptyState::NoMatches { .. } => Some("no log entries match the active filter"),
            EmptyState::Visible(_) => None,
        }
    }
}

/// Per-level and per-category counts for toolbar badges. Counts ignore the
/// active filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogTally {
    pub by_level: BTreeMap<LogLevel, usize>,
    pub by_category: BTreeMap<LogCategory, usize>,
}

impl LogTally {
    pub fn of(entries: &[LogEntry]) -> Self {
        let mut tally = Self::default();
        for entry in entries {
            *tally.by_level.entry(entry.level).or_default() += 1;
            *tally.by_category.entry(entry.category).or_default() += 1;
        }
        tally
    }

    pub fn level(&self, level: LogLevel) -> usize {
        self.by_level.get(&level).copied().unwrap_or(0)
    }

    pub fn category(&self, category: LogCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}
