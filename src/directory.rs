// src/directory.rs

use crate::domain::{OrgId, OrganizationRecord};
use crate::errors::FilterError;
use crate::filter::{evaluate, preview_count, Dimension, FilterSelection, FilterStore, FilterUpdate};
use crate::selection::SelectionCoordinator;
use crate::source::{load_dataset, CancellationToken, RecordSource};

/// The state list and map views read from: the canonical collection, the
/// filter store, the derived filtered view and the open detail card.
///
/// Every mutation goes through here so the filtered view is recomputed in
/// full and the selection re-checked against it.
#[derive(Debug, Default)]
pub struct Directory {
    dataset: Option<Vec<OrganizationRecord>>,
    filtered: Option<Vec<OrganizationRecord>>,
    store: FilterStore,
    selection: SelectionCoordinator,
    was_active: bool,
}

impl Directory {
    pub fn new(store: FilterStore) -> Self {
        let was_active = store.is_filter_active();
        Self {
            dataset: None,
            filtered: None,
            store,
            selection: SelectionCoordinator::new(),
            was_active,
        }
    }

    /// Replaces the canonical collection and recomputes the view.
    pub fn load(&mut self, dataset: Vec<OrganizationRecord>) {
        self.dataset = Some(dataset);
        self.refresh();
    }

    /// Fetches, merges and commits a dataset unless `token` is cancelled
    /// first. Returns whether anything was committed.
    pub fn load_from<S>(&mut self, source: &S, token: &CancellationToken) -> bool
    where
        S: RecordSource + ?Sized,
    {
        let Some(dataset) = load_dataset(source, token) else {
            return false;
        };
        if token.is_cancelled() {
            return false;
        }
        self.load(dataset);
        true
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Canonical collection; empty until the first load.
    pub fn all_destinations(&self) -> &[OrganizationRecord] {
        self.dataset.as_deref().unwrap_or_default()
    }

    /// `None` while loading, which consumers must keep apart from an empty
    /// result.
    pub fn filtered_destinations(&self) -> Option<&[OrganizationRecord]> {
        self.filtered.as_deref()
    }

    pub fn is_filter_active(&self) -> bool {
        self.store.is_filter_active()
    }

    pub fn filters(&self) -> &FilterStore {
        &self.store
    }

    pub fn apply_filter(&mut self, dimension: Dimension, value: &str) -> Result<(), FilterError> {
        self.store.apply_filter(dimension, value)?;
        self.refresh();
        Ok(())
    }

    pub fn update_filter(&mut self, update: FilterUpdate) -> Result<(), FilterError> {
        self.store.update(update)?;
        self.refresh();
        Ok(())
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.store.set_search_query(query);
        self.refresh();
    }

    pub fn set_filter_panel_open(&mut self, open: bool) {
        self.store.set_panel_open(open);
        self.refresh();
    }

    pub fn commit_draft(&mut self, draft: &FilterSelection) {
        self.store.commit_draft(draft);
        self.refresh();
    }

    pub fn reset_filters(&mut self) {
        self.store.reset_filters();
        self.refresh();
    }

    pub fn clear_all_filters(&mut self) {
        self.store.clear_all_filters();
        self.refresh();
    }

    /// Result count for a selection that is not live yet; no state changes.
    pub fn get_filtered_count(&self, hypothetical: &FilterSelection) -> usize {
        preview_count(self.all_destinations(), hypothetical)
    }

    pub fn selected(&self) -> Option<&OrganizationRecord> {
        self.selection.selected()
    }

    /// Opens the detail card for `id` if it is in the current view.
    /// Also used to follow a relationship link from one card to another.
    pub fn select(&mut self, id: &OrgId) -> bool {
        let found = self
            .filtered
            .as_deref()
            .and_then(|view| view.iter().find(|org| &org.id == id))
            .cloned();
        match found {
            Some(org) => {
                self.selection.select(org);
                true
            }
            None => false,
        }
    }

    pub fn close_selection(&mut self) {
        self.selection.close();
    }

    fn refresh(&mut self) {
        if let Some(dataset) = self.dataset.as_deref() {
            let view = evaluate(dataset, self.store.selection());
            self.selection.revalidate(&view);
            self.filtered = Some(view);
        }

        let active = self.store.is_filter_active();
        if active != self.was_active {
            self.selection.close();
            self.was_active = active;
        }
    }
}
