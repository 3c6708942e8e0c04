//! Statistics payloads from the map API.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::{FeatureCollection, Sector, SectorFamily};

/// Response of `/api/map/data`: overlay geometry plus the stats behind it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapData {
    pub geojson: FeatureCollection,
    #[serde(default)]
    pub stats: Option<GlobalStats>,
    #[serde(default)]
    pub sector: Option<Sector>,
}

/// Headline figures for a zone (`/api/stats/global`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GlobalStats {
    #[serde(default)]
    pub total_producers: Option<u64>,
    #[serde(default)]
    pub top_products: Vec<TopProduct>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopProduct {
    pub name: String,
    pub volume: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// One bar of the comparison chart (`/api/stats/comparison`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonEntry {
    pub name: String,
    pub value: f64,
}

/// Per-sector volume for a zone (`/api/zone/stats`, `/api/zone/details`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneStatDetail {
    pub sector: String,
    #[serde(default)]
    pub category: Option<String>,
    pub volume: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Yearly volumes per sector (`/api/stats/evolution`).
///
/// Each row of `data` holds a `year` key plus one numeric key per sector.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Evolution {
    #[serde(default)]
    pub data: Vec<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub sectors: Vec<String>,
    /// Sector name to category key.
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

impl Evolution {
    /// Sectors whose category equals `category`.
    pub fn sectors_in_category(&self, category: &str) -> Vec<String> {
        self.categories
            .iter()
            .filter(|(_, cat)| cat.as_str() == category)
            .map(|(sector, _)| sector.clone())
            .collect()
    }

    /// Number of sectors under `category`, shown next to each tab.
    pub fn category_count(&self, category: &str) -> usize {
        self.categories.values().filter(|c| c.as_str() == category).count()
    }

    /// (year, volume) points for one sector; rows missing the sector are skipped.
    pub fn series(&self, sector: &str) -> Vec<(String, f64)> {
        self.data
            .iter()
            .filter_map(|row| {
                let year = match row.get("year")? {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let value = row.get(sector)?.as_f64()?;
                Some((year, value))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Everything shown in the zone detail panel and the full report.
///
/// Each part is optional: a failed request leaves its section empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ZoneReport {
    pub global: Option<GlobalStats>,
    pub evolution: Option<Evolution>,
    #[serde(default)]
    pub comparison: Vec<ComparisonEntry>,
}

impl ZoneReport {
    pub fn is_empty(&self) -> bool {
        self.global.is_none() && self.evolution.is_none() && self.comparison.is_empty()
    }
}

/// Which sectors of an evolution chart are plotted.
///
/// Switching tab selects every sector of the new category.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionSelection {
    pub tab: String,
    available: Vec<String>,
    selected: Vec<String>,
}

impl EvolutionSelection {
    /// The first tab, with all of its sectors selected.
    pub fn first_tab(evolution: &Evolution) -> Self {
        Self::for_family(evolution, SectorFamily::TABS[0])
    }

    pub fn for_family(evolution: &Evolution, family: SectorFamily) -> Self {
        Self::new(evolution, family.key())
    }

    pub fn new(evolution: &Evolution, tab: impl Into<String>) -> Self {
        let tab = tab.into();
        let available = evolution.sectors_in_category(&tab);
        Self {
            tab,
            selected: available.clone(),
            available,
        }
    }

    pub fn switch_tab(&mut self, evolution: &Evolution, tab: impl Into<String>) {
        *self = Self::new(evolution, tab);
    }

    pub fn family(&self) -> SectorFamily {
        SectorFamily::classify(&self.tab)
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, sector: &str) -> bool {
        self.selected.iter().any(|s| s == sector)
    }

    pub fn toggle(&mut self, sector: &str) {
        if self.is_selected(sector) {
            self.selected.retain(|s| s != sector);
        } else if self.available.iter().any(|s| s == sector) {
            self.selected.push(sector.to_string());
        }
    }

    /// Select everything, or nothing when everything is already selected.
    pub fn toggle_all(&mut self) {
        if self.selected.len() == self.available.len() {
            self.selected.clear();
        } else {
            self.selected = self.available.clone();
        }
    }
}
