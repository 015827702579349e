// src/filter/store.rs

use crate::errors::FilterError;
use crate::filter::selection::{Dimension, FilterSelection, FilterUpdate};
use tracing::debug;

/// Owner of the live filter inputs plus the "filter panel open" flag.
/// Handed to whoever needs it; there is no shared global instance.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    selection: FilterSelection,
    panel_open: bool,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// A copy for a modal to edit before committing.
    pub fn draft(&self) -> FilterSelection {
        self.selection.clone()
    }

    pub fn apply_filter(&mut self, dimension: Dimension, value: &str) -> Result<(), FilterError> {
        self.selection
            .apply_filter(dimension, value)
            .inspect_err(|e| debug!(error = %e, "filter value rejected"))
    }

    pub fn update(&mut self, update: FilterUpdate) -> Result<(), FilterError> {
        self.selection
            .update(update)
            .inspect_err(|e| debug!(error = %e, "filter update rejected"))
    }

    pub fn search_query(&self) -> &str {
        self.selection.search_query()
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.selection.set_search_query(query);
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn set_panel_open(&mut self, open: bool) {
        self.panel_open = open;
    }

    /// Replaces the modal-owned dimensions with `draft` in one step.
    pub fn commit_draft(&mut self, draft: &FilterSelection) {
        self.selection.adopt_modal_dimensions(draft);
    }

    pub fn reset_filters(&mut self) {
        self.selection.reset();
        self.panel_open = false;
    }

    /// Like `reset_filters`, but the organization type and search text survive.
    pub fn clear_all_filters(&mut self) {
        self.selection.clear_keeping_type_and_search();
        self.panel_open = false;
    }

    pub fn is_filter_active(&self) -> bool {
        self.panel_open
            || self.selection.search_term().is_some()
            || self.selection.has_active_dimensions()
    }
}
