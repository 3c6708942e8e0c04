//! The zone currently displayed on the map.

use atlas_common::{DivisionLevel, ZoneId};

/// Level, parent and display name of the current view.
///
/// `parent_id` is `None` only for the root view, which lists the regions of
/// the whole country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub level: DivisionLevel,
    pub parent_id: Option<ZoneId>,
    pub name: String,
}

impl NavigationState {
    /// Root view: every region of the country.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            level: DivisionLevel::root(),
            parent_id: None,
            name: name.into(),
        }
    }

    pub fn new(level: DivisionLevel, parent_id: ZoneId, name: impl Into<String>) -> Self {
        Self {
            level,
            parent_id: Some(parent_id),
            name: name.into(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.level == DivisionLevel::root() && self.parent_id.is_none()
    }

    /// Label of the zone enclosing the listed zones.
    pub fn scope_label(&self) -> &'static str {
        if self.parent_id.is_none() {
            return DivisionLevel::Country.label();
        }
        match self.level {
            DivisionLevel::Departement => DivisionLevel::Region.label(),
            DivisionLevel::Arrondissement => DivisionLevel::Departement.label(),
            other => other.label(),
        }
    }
}
