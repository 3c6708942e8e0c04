//! GeoJSON zone geometry as returned by the map API.
//!
//! The map API answers zone queries with a GeoJSON `FeatureCollection` whose
//! features are administrative polygons. Each feature's properties identify
//! the zone, its level and parent, and (for sector overlays) a production
//! value with its unit.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::DivisionLevel;

/// Identifier of an administrative zone in the map API.
pub type ZoneId = i64;

/// A GeoJSON FeatureCollection of zones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Add features to the collection.
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Find a feature by zone id.
    pub fn find(&self, id: ZoneId) -> Option<&Feature> {
        self.features.iter().find(|f| f.properties.id == id)
    }

    /// Largest overlay value in the collection, used to scale colours.
    ///
    /// Returns 1.0 when no feature carries a positive value so the ratio
    /// `value / max` stays defined.
    pub fn max_value(&self) -> f64 {
        let max = self
            .features
            .iter()
            .filter_map(|f| f.properties.value)
            .fold(0.0_f64, f64::max);
        if max > 0.0 {
            max
        } else {
            1.0
        }
    }

    /// Combined extent of every feature as (min_lon, min_lat, max_lon, max_lat).
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.features
            .iter()
            .filter_map(|f| f.bounds())
            .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A single zone feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ZoneId>,

    pub properties: ZoneProperties,

    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl Feature {
    /// Create a feature without geometry.
    pub fn new(properties: ZoneProperties) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: Some(properties.id),
            properties,
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Extent of the feature's geometry, used to frame the map on click.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let geometry = self.geometry.as_ref()?;
        let mut iter = geometry.positions();
        let first = iter.next()?;
        Some(iter.fold(
            (first[0], first[1], first[0], first[1]),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p[0]), min_y.min(p[1]), max_x.max(p[0]), max_y.max(p[1]))
            },
        ))
    }
}

/// Properties attached to each zone feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneProperties {
    pub id: ZoneId,
    pub name: String,
    pub level: DivisionLevel,
    #[serde(default)]
    pub parent_id: Option<ZoneId>,

    /// Production value when a sector overlay is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Any other property the API sends along.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ZoneProperties {
    pub fn new(id: ZoneId, name: impl Into<String>, level: DivisionLevel) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            parent_id: None,
            value: None,
            unit: None,
            extra: HashMap::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: ZoneId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_value(mut self, value: f64, unit: impl Into<String>) -> Self {
        self.value = Some(value);
        self.unit = Some(unit.into());
        self
    }
}

/// Polygon geometries used for administrative zones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon {
        /// Linear rings, exterior first, as [longitude, latitude] pairs.
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Iterate over every vertex of the geometry.
    pub fn positions(&self) -> Box<dyn Iterator<Item = &[f64; 2]> + '_> {
        match self {
            Geometry::Polygon { coordinates } => Box::new(coordinates.iter().flatten()),
            Geometry::MultiPolygon { coordinates } => {
                Box::new(coordinates.iter().flatten().flatten())
            }
        }
    }
}

/// A zone returned by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: ZoneId,
    pub name: String,
    pub level: DivisionLevel,
    #[serde(default)]
    pub parent_id: Option<ZoneId>,
}
