use serde::{Deserialize, Serialize};
use shared::domain::{ChartOfAccount, Invoice, Office, OfficeId, Property};

/// UI filter state. Every criterion is AND-composed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// `None` means no office is selected and every office is shown.
    pub office_id: Option<OfficeId>,
    pub show_inactive: bool,
    /// Case-insensitive free-text criterion.
    pub search: Option<String>,
}

impl FilterState {
    pub fn for_office(office_id: OfficeId) -> Self {
        Self {
            office_id: Some(office_id),
            ..Self::default()
        }
    }

    pub fn admits<E: Scoped>(&self, entity: &E) -> bool {
        if !self.show_inactive && !entity.is_active() {
            return false;
        }
        if let Some(office_id) = self.office_id {
            if entity.office_id() != Some(office_id) {
                return false;
            }
        }
        match self.normalized_search() {
            Some(needle) => entity.matches_search(&needle),
            None => true,
        }
    }

    fn normalized_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .map(str::to_lowercase)
    }

    /// Drops an office selection that no longer exists in `offices`.
    /// Returns the stale id when a reset happened.
    pub fn reconcile(&mut self, offices: &[Office]) -> Option<OfficeId> {
        let selected = self.office_id?;
        if offices.iter().any(|office| office.id == selected) {
            return None;
        }
        self.office_id = None;
        Some(selected)
    }
}

/// Entity that belongs to an office and can be toggled active/inactive.
pub trait Scoped {
    fn office_id(&self) -> Option<OfficeId>;
    fn is_active(&self) -> bool;
    /// `needle` is already trimmed and lowercased.
    fn matches_search(&self, needle: &str) -> bool;
}

fn contains_lower(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Scoped for Invoice {
    fn office_id(&self) -> Option<OfficeId> {
        self.office_id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_lower(&self.invoice_number, needle)
            || self
                .lines
                .iter()
                .any(|line| contains_lower(&line.description, needle))
    }
}

impl Scoped for ChartOfAccount {
    fn office_id(&self) -> Option<OfficeId> {
        self.office_id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_lower(&self.account_number, needle) || contains_lower(&self.description, needle)
    }
}

impl Scoped for Property {
    fn office_id(&self) -> Option<OfficeId> {
        self.office_id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_lower(&self.property_code, needle)
            || contains_lower(&self.address.one_line(), needle)
            || self
                .amenities
                .iter()
                .any(|amenity| contains_lower(amenity, needle))
    }
}

/// Pure filter over the full collection; input order is preserved.
pub fn project<E: Scoped + Clone>(all: &[E], filter: &FilterState) -> Vec<E> {
    all.iter()
        .filter(|entity| filter.admits(*entity))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "tests/projection_tests.rs"]
mod tests;
