// src/selection.rs

use crate::domain::{OrgId, OrganizationRecord};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(OrganizationRecord),
}

/// Tracks the one organization whose detail card is open.
#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    state: SelectionState,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected(&self) -> Option<&OrganizationRecord> {
        match &self.state {
            SelectionState::Selected(org) => Some(org),
            SelectionState::Unselected => None,
        }
    }

    /// Works from either state, so following a relationship link moves
    /// straight from one organization to the next.
    pub fn select(&mut self, org: OrganizationRecord) {
        self.state = SelectionState::Selected(org);
    }

    pub fn close(&mut self) {
        self.state = SelectionState::Unselected;
    }

    /// Drops the selection when its id is no longer part of `view`.
    /// Returns true if the selection was cleared.
    pub fn revalidate(&mut self, view: &[OrganizationRecord]) -> bool {
        let Some(current) = self.selected() else {
            return false;
        };
        if contains(view, &current.id) {
            return false;
        }
        debug!(id = %current.id, "selection left the filtered view, clearing");
        self.close();
        true
    }
}

fn contains(view: &[OrganizationRecord], id: &OrgId) -> bool {
    view.iter().any(|org| &org.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrgKind, PostalAddress};

    fn org(id: i64) -> OrganizationRecord {
        OrganizationRecord {
            id: OrgId::Int(id),
            name: format!("Org {id}"),
            kind: OrgKind::Restaurant,
            borough: None,
            address: PostalAddress::default(),
            meal_count: None,
            website: None,
            writeup: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn reselect_without_passing_through_unselected() {
        let mut coordinator = SelectionCoordinator::new();
        coordinator.select(org(1));
        coordinator.select(org(2));
        assert_eq!(coordinator.selected().map(|o| o.id.clone()), Some(OrgId::Int(2)));
    }

    #[test]
    fn revalidate_keeps_members_and_drops_strangers() {
        let mut coordinator = SelectionCoordinator::new();
        coordinator.select(org(1));

        assert!(!coordinator.revalidate(&[org(1), org(2)]));
        assert!(coordinator.selected().is_some());

        assert!(coordinator.revalidate(&[org(2)]));
        assert_eq!(coordinator.state(), &SelectionState::Unselected);

        assert!(!coordinator.revalidate(&[]));
    }
}
