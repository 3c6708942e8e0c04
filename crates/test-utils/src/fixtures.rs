//! Common test fixtures for zone-atlas tests.
//!
//! A small slice of the Cameroonian hierarchy:
//!
//! ```text
//! Cameroun
//! ├── Centre (5)
//! │   ├── Mfoundi (12)
//! │   │   ├── Yaoundé I (101)
//! │   │   └── Yaoundé II (102)
//! │   └── Lekié (13)
//! ├── Littoral (6)
//! │   └── Wouri (20)
//! └── Nord (7)
//! ```

use atlas_common::{
    DivisionLevel, Feature, FeatureCollection, Geometry, ZoneId, ZoneProperties,
};
use serde_json::{json, Value};

/// Root display name used throughout the tests.
pub const ROOT_NAME: &str = "Cameroun";

pub mod ids {
    pub const CENTRE: i64 = 5;
    pub const LITTORAL: i64 = 6;
    pub const NORD: i64 = 7;
    pub const MFOUNDI: i64 = 12;
    pub const LEKIE: i64 = 13;
    pub const WOURI: i64 = 20;
    pub const YAOUNDE_I: i64 = 101;
    pub const YAOUNDE_II: i64 = 102;

    pub const SECTOR_CACAO: i64 = 1;
    pub const SECTOR_CAFE: i64 = 2;
    pub const SECTOR_TILAPIA: i64 = 7;
}

/// Credentials accepted by the fake backend.
pub mod auth {
    pub const EMAIL: &str = "awa@mail.cm";
    pub const PASSWORD: &str = "secret1";
    pub const OTP: &str = "123456";
    pub const TOKEN: &str = "test-token";
}

fn square(x: f64, y: f64) -> Geometry {
    Geometry::Polygon {
        coordinates: vec![vec![[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]]],
    }
}

fn zone(id: ZoneId, name: &str, level: DivisionLevel, parent: Option<ZoneId>) -> Feature {
    let mut props = ZoneProperties::new(id, name, level);
    props.parent_id = parent;
    Feature::new(props).with_geometry(square(id as f64 / 10.0, id as f64 / 20.0))
}

/// Children of `parent` at `level`, or an empty collection.
pub fn zones(level: DivisionLevel, parent: Option<ZoneId>) -> FeatureCollection {
    use DivisionLevel::*;
    let features = match (level, parent) {
        (Region, _) => vec![
            zone(ids::CENTRE, "Centre", Region, None),
            zone(ids::LITTORAL, "Littoral", Region, None),
            zone(ids::NORD, "Nord", Region, None),
        ],
        (Departement, Some(ids::CENTRE)) => vec![
            zone(ids::MFOUNDI, "Mfoundi", Departement, Some(ids::CENTRE)),
            zone(ids::LEKIE, "Lekié", Departement, Some(ids::CENTRE)),
        ],
        (Departement, Some(ids::LITTORAL)) => {
            vec![zone(ids::WOURI, "Wouri", Departement, Some(ids::LITTORAL))]
        }
        (Arrondissement, Some(ids::MFOUNDI)) => vec![
            zone(ids::YAOUNDE_I, "Yaoundé I", Arrondissement, Some(ids::MFOUNDI)),
            zone(ids::YAOUNDE_II, "Yaoundé II", Arrondissement, Some(ids::MFOUNDI)),
        ],
        _ => Vec::new(),
    };
    FeatureCollection::new().with_features(features)
}

pub fn regions() -> FeatureCollection {
    zones(DivisionLevel::Region, None)
}

/// Zones of a view with overlay values for `sector_id`.
///
/// The last zone of each collection has no production, so styling tests
/// always see both shaded and muted zones.
pub fn overlay_zones(
    sector_id: i64,
    level: DivisionLevel,
    parent: Option<ZoneId>,
) -> FeatureCollection {
    let mut collection = zones(level, parent);
    let count = collection.features.len();
    for (i, feature) in collection.features.iter_mut().enumerate() {
        let value = if i + 1 == count {
            0.0
        } else {
            (sector_id * 100 * (i as i64 + 1)) as f64
        };
        feature.properties.value = Some(value);
        feature.properties.unit = Some("t".to_string());
    }
    collection
}

pub fn sector_catalog_json() -> Value {
    json!({
        "AGRICULTURE": [
            {"id": ids::SECTOR_CACAO, "name": "Cacao", "category": "AGRICULTURE", "color": "#7c2d12"},
            {"id": ids::SECTOR_CAFE, "name": "Café", "category": "AGRICULTURE", "color": "#92400e"}
        ],
        "PECHE": [
            {"id": ids::SECTOR_TILAPIA, "name": "Tilapia", "category": "PECHE"}
        ]
    })
}

pub fn sector_json(sector_id: i64) -> Value {
    sector_catalog_json()
        .as_object()
        .into_iter()
        .flat_map(|m| m.values())
        .filter_map(|v| v.as_array())
        .flatten()
        .find(|s| s["id"] == sector_id)
        .cloned()
        .unwrap_or(Value::Null)
}

pub fn map_data_json(sector_id: i64, level: DivisionLevel, parent: Option<ZoneId>) -> Value {
    json!({
        "geojson": overlay_zones(sector_id, level, parent),
        "stats": {"total_producers": 1520, "top_products": [{"name": "Cacao", "volume": 300.0, "unit": "t"}]},
        "sector": sector_json(sector_id),
    })
}

pub fn global_stats_json(zone_id: ZoneId) -> Value {
    json!({
        "zone_id": zone_id,
        "total_producers": 1520,
        "top_products": [
            {"name": "Cacao", "volume": 12500.0, "unit": "t"},
            {"name": "Tilapia", "volume": 430.5, "unit": "t"}
        ]
    })
}

pub fn evolution_json() -> Value {
    json!({
        "data": [
            {"year": 2021, "Cacao": 11000.0, "Café": 800.0, "Tilapia": 400.0},
            {"year": 2022, "Cacao": 11800.0, "Café": 760.0, "Tilapia": 410.0},
            {"year": 2023, "Cacao": 12500.0, "Café": 820.0, "Tilapia": 430.5}
        ],
        "sectors": ["Cacao", "Café", "Tilapia"],
        "categories": {"Cacao": "AGRICULTURE", "Café": "AGRICULTURE", "Tilapia": "PECHE"}
    })
}

pub fn comparison_json() -> Value {
    json!([
        {"name": "Mfoundi", "value": 7200.0},
        {"name": "Lekié", "value": 5300.0}
    ])
}

pub fn zone_stats_json(zone_id: ZoneId) -> Value {
    if zone_id == ids::NORD {
        return json!([]);
    }
    json!([
        {"sector": "Cacao", "category": "AGRICULTURE", "volume": 7200.0, "unit": "t"},
        {"sector": "Tilapia", "category": "PECHE", "volume": 120.0, "unit": "t"}
    ])
}

/// Zones whose name contains `q`, ignoring case.
pub fn search_json(q: &str) -> Value {
    let q = q.to_lowercase();
    let all = [
        (ids::CENTRE, "Centre", "REGION", None),
        (ids::LITTORAL, "Littoral", "REGION", None),
        (ids::NORD, "Nord", "REGION", None),
        (ids::MFOUNDI, "Mfoundi", "DEPARTEMENT", Some(ids::CENTRE)),
        (ids::LEKIE, "Lekié", "DEPARTEMENT", Some(ids::CENTRE)),
        (ids::WOURI, "Wouri", "DEPARTEMENT", Some(ids::LITTORAL)),
        (ids::YAOUNDE_I, "Yaoundé I", "ARRONDISSEMENT", Some(ids::MFOUNDI)),
        (ids::YAOUNDE_II, "Yaoundé II", "ARRONDISSEMENT", Some(ids::MFOUNDI)),
    ];
    Value::Array(
        all.iter()
            .filter(|(_, name, _, _)| name.to_lowercase().contains(&q))
            .map(|(id, name, level, parent)| {
                json!({"id": id, "name": name, "level": level, "parent_id": parent})
            })
            .collect(),
    )
}

pub fn user_json() -> Value {
    json!({
        "id": 1,
        "email": auth::EMAIL,
        "firstName": "Awa",
        "lastName": "Ndam",
        "role": "USER"
    })
}

pub fn auth_response_json() -> Value {
    json!({
        "token": auth::TOKEN,
        "refreshToken": "refresh-token",
        "user": user_json()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_is_consistent() {
        let departements = zones(DivisionLevel::Departement, Some(ids::CENTRE));
        assert_eq!(departements.len(), 2);
        assert!(departements
            .features
            .iter()
            .all(|f| f.properties.parent_id == Some(ids::CENTRE)));
        assert!(zones(DivisionLevel::Arrondissement, Some(ids::LEKIE)).is_empty());
    }

    #[test]
    fn test_overlay_has_muted_zone() {
        let overlay = overlay_zones(ids::SECTOR_CACAO, DivisionLevel::Region, None);
        let values: Vec<f64> = overlay
            .features
            .iter()
            .map(|f| f.properties.value.unwrap())
            .collect();
        assert_eq!(values, vec![100.0, 200.0, 0.0]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        assert_eq!(search_json("yaoundé").as_array().unwrap().len(), 2);
        assert_eq!(search_json("xyz").as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_sector_lookup() {
        assert_eq!(sector_json(ids::SECTOR_TILAPIA)["name"], "Tilapia");
        assert!(sector_json(99).is_null());
    }
}
