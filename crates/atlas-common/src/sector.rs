//! Production sectors used as statistics filters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Identifier of a production sector.
pub type SectorId = i64;

/// Default overlay colour when a sector carries none.
pub const DEFAULT_SECTOR_COLOR: &str = "#10b981";

/// A production sector (crop, livestock or fishery).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sector {
    pub id: SectorId,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl Sector {
    /// Broad family of the sector, matched loosely on its category text.
    pub fn family(&self) -> SectorFamily {
        SectorFamily::classify(&self.category)
    }

    /// Whether the sector belongs to `category`, ignoring case.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_uppercase() == category.to_uppercase()
    }

    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_SECTOR_COLOR)
    }
}

/// Sector families shown as tabs and category buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectorFamily {
    Agriculture,
    Elevage,
    Peche,
    Other,
}

impl SectorFamily {
    /// Tabs of the evolution chart, in display order.
    pub const TABS: [SectorFamily; 3] = [
        SectorFamily::Agriculture,
        SectorFamily::Elevage,
        SectorFamily::Peche,
    ];

    pub fn classify(category: &str) -> Self {
        let upper = category.to_uppercase();
        if upper.contains("AGRICULTURE") {
            SectorFamily::Agriculture
        } else if upper.contains("ELEVAGE") || upper.contains("ÉLEVAGE") {
            SectorFamily::Elevage
        } else if upper.contains("PECHE") || upper.contains("PÊCHE") {
            SectorFamily::Peche
        } else {
            SectorFamily::Other
        }
    }

    /// Category key as the API spells it.
    pub fn key(&self) -> &'static str {
        match self {
            SectorFamily::Agriculture => "AGRICULTURE",
            SectorFamily::Elevage => "ELEVAGE",
            SectorFamily::Peche => "PECHE",
            SectorFamily::Other => "AUTRE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectorFamily::Agriculture => "Agriculture",
            SectorFamily::Elevage => "Élevage",
            SectorFamily::Peche => "Pêche",
            SectorFamily::Other => "Autre",
        }
    }
}

/// Parses a tab name (`agriculture`, `élevage`, `peche`, ...).
impl FromStr for SectorFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match SectorFamily::classify(s.trim()) {
            SectorFamily::Other => Err(format!("unknown sector family: {}", s)),
            family => Ok(family),
        }
    }
}

/// Filter catalogue returned by `/api/filters`: sectors grouped by category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SectorCatalog(pub BTreeMap<String, Vec<Sector>>);

impl SectorCatalog {
    /// All sectors in category order.
    pub fn all(&self) -> Vec<&Sector> {
        self.0.values().flatten().collect()
    }

    /// Sectors to display, optionally narrowed to one category.
    pub fn displayed(&self, category: Option<&str>) -> Vec<&Sector> {
        match category {
            Some(cat) => self.all().into_iter().filter(|s| s.in_category(cat)).collect(),
            None => self.all(),
        }
    }

    pub fn find(&self, id: SectorId) -> Option<&Sector> {
        self.0.values().flatten().find(|s| s.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SectorCatalog {
        serde_json::from_str(
            r##"{
                "AGRICULTURE": [{"id": 1, "name": "Cacao", "category": "AGRICULTURE", "color": "#7c2d12"}],
                "PECHE": [{"id": 7, "name": "Tilapia", "category": "Peche"}]
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_family() {
        assert_eq!("peche".parse(), Ok(SectorFamily::Peche));
        assert_eq!("Élevage".parse(), Ok(SectorFamily::Elevage));
        assert!("mines".parse::<SectorFamily>().is_err());
    }

    #[test]
    fn test_catalog_flatten_and_filter() {
        let catalog = catalog();
        assert_eq!(catalog.all().len(), 2);
        let peche = catalog.displayed(Some("peche"));
        assert_eq!(peche.len(), 1);
        assert_eq!(peche[0].name, "Tilapia");
        assert_eq!(catalog.displayed(None).len(), 2);
    }

    #[test]
    fn test_default_color() {
        let catalog = catalog();
        assert_eq!(catalog.find(7).unwrap().color_or_default(), DEFAULT_SECTOR_COLOR);
        assert_eq!(catalog.find(1).unwrap().color_or_default(), "#7c2d12");
    }

    #[test]
    fn test_family_classification() {
        assert_eq!(SectorFamily::classify("Élevage bovin"), SectorFamily::Elevage);
        assert_eq!(SectorFamily::classify("AGRICULTURE"), SectorFamily::Agriculture);
        assert_eq!(SectorFamily::classify("mines"), SectorFamily::Other);
    }
}
