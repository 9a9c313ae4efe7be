//! Selection-scoped fetch state.
//!
//! Every selection change bumps a generation counter. A response carries the
//! ticket it was issued under and is only committed if that ticket is still
//! current, so a slow response for entity A can never land on the panel after
//! the user switched to entity B.

use serde::Serialize;

use crate::error::FetchError;
use crate::source::InsuranceLine;

/// Issued for each request; must be handed back with its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    entity_id: String,
}

impl FetchTicket {
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What the insurance panel renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InsuranceView {
    /// Nothing selected.
    Idle,
    /// The jurisdiction has no insurance feature.
    Unavailable { entity_id: String },
    Loading { entity_id: String },
    Loaded {
        entity_id: String,
        lines: Vec<InsuranceLine>,
    },
    Failed { entity_id: String, message: String },
}

impl InsuranceView {
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            InsuranceView::Idle => None,
            InsuranceView::Unavailable { entity_id }
            | InsuranceView::Loading { entity_id }
            | InsuranceView::Loaded { entity_id, .. }
            | InsuranceView::Failed { entity_id, .. } => Some(entity_id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsuranceTracker {
    generation: u64,
    selected: Option<String>,
    view: InsuranceView,
}

impl Default for InsuranceTracker {
    fn default() -> Self {
        Self {
            generation: 0,
            selected: None,
            view: InsuranceView::Idle,
        }
    }
}

impl InsuranceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &InsuranceView {
        &self.view
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Switches to `entity_id` and invalidates every outstanding ticket.
    pub fn select(&mut self, entity_id: &str) -> FetchTicket {
        self.selected = Some(entity_id.to_string());
        self.issue(entity_id.to_string())
    }

    /// Re-issues a request for the current selection, e.g. after a failure.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        let entity_id = self.selected.clone()?;
        Some(self.issue(entity_id))
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.view = InsuranceView::Idle;
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Records the outcome of a request. Returns `false` (and changes
    /// nothing) when the ticket has been superseded.
    pub fn commit(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<InsuranceLine>, FetchError>,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let entity_id = ticket.entity_id.clone();
        self.view = match result {
            Ok(lines) => InsuranceView::Loaded { entity_id, lines },
            Err(err) => InsuranceView::Failed {
                entity_id,
                message: err.to_string(),
            },
        };
        true
    }

    /// Marks the current request as answered by "feature unavailable".
    pub fn commit_unavailable(&mut self, ticket: &FetchTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.view = InsuranceView::Unavailable {
            entity_id: ticket.entity_id.clone(),
        };
        true
    }

    fn issue(&mut self, entity_id: String) -> FetchTicket {
        self.generation += 1;
        self.view = InsuranceView::Loading {
            entity_id: entity_id.clone(),
        };
        FetchTicket {
            generation: self.generation,
            entity_id,
        }
    }
}
