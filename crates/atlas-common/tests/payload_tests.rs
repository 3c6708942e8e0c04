//! Decoding of API payloads as served by the map and backend APIs.

use atlas_common::{
    AuthResponse, ComparisonEntry, DivisionLevel, Evolution, EvolutionSelection, FeatureCollection,
    GlobalStats, MapData, Role, SearchResult, SectorCatalog, SectorFamily, ZoneStatDetail,
};
use test_utils::{fixtures, ids};

// ============================================================================
// Map API
// ============================================================================

#[test]
fn test_zone_collection_roundtrips_through_json() {
    let json = serde_json::to_value(fixtures::regions()).unwrap();
    assert_eq!(json["type"], "FeatureCollection");
    assert_eq!(json["features"][0]["properties"]["level"], "REGION");

    let decoded: FeatureCollection = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, fixtures::regions());
    assert!(decoded.bounds().is_some());
}

#[test]
fn test_map_data_payload() {
    let data: MapData = serde_json::from_value(fixtures::map_data_json(
        ids::SECTOR_CACAO,
        DivisionLevel::Departement,
        Some(ids::CENTRE),
    ))
    .unwrap();

    assert_eq!(data.geojson.len(), 2);
    assert_eq!(data.geojson.max_value(), 100.0);
    assert_eq!(data.sector.as_ref().map(|s| s.id), Some(ids::SECTOR_CACAO));
    assert_eq!(data.stats.as_ref().and_then(|s| s.total_producers), Some(1520));
}

#[test]
fn test_map_data_for_unknown_sector_has_no_sector() {
    let data: MapData =
        serde_json::from_value(fixtures::map_data_json(99, DivisionLevel::Region, None)).unwrap();
    assert!(data.sector.is_none());
}

#[test]
fn test_filter_catalogue_payload() {
    let catalog: SectorCatalog = serde_json::from_value(fixtures::sector_catalog_json()).unwrap();
    assert_eq!(catalog.all().len(), 3);
    let tilapia = catalog.find(ids::SECTOR_TILAPIA).unwrap();
    assert_eq!(tilapia.family(), SectorFamily::Peche);
    assert_eq!(tilapia.color_or_default(), atlas_common::DEFAULT_SECTOR_COLOR);
}

#[test]
fn test_stats_payloads() {
    let global: GlobalStats =
        serde_json::from_value(fixtures::global_stats_json(ids::CENTRE)).unwrap();
    assert_eq!(global.top_products.len(), 2);
    assert_eq!(global.extra["zone_id"], ids::CENTRE);

    let comparison: Vec<ComparisonEntry> =
        serde_json::from_value(fixtures::comparison_json()).unwrap();
    assert_eq!(comparison[0].name, "Mfoundi");

    let details: Vec<ZoneStatDetail> =
        serde_json::from_value(fixtures::zone_stats_json(ids::CENTRE)).unwrap();
    assert_eq!(details[0].unit.as_deref(), Some("t"));
}

#[test]
fn test_evolution_tabs() {
    let evolution: Evolution = serde_json::from_value(fixtures::evolution_json()).unwrap();
    assert_eq!(evolution.category_count("AGRICULTURE"), 2);
    assert_eq!(evolution.series("Tilapia").last(), Some(&("2023".to_string(), 430.5)));

    let mut selection = EvolutionSelection::new(&evolution, "AGRICULTURE");
    assert_eq!(selection.selected().len(), 2);
    selection.toggle("Café");
    assert!(!selection.is_selected("Café"));
    selection.toggle("Tilapia");
    assert!(!selection.is_selected("Tilapia"), "sector of another tab");

    selection.switch_tab(&evolution, "PECHE");
    assert_eq!(selection.selected(), &["Tilapia".to_string()]);
    selection.toggle_all();
    assert!(selection.selected().is_empty());
}

#[test]
fn test_search_results_payload() {
    let results: Vec<SearchResult> = serde_json::from_value(fixtures::search_json("yao")).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| r.level == DivisionLevel::Arrondissement && r.parent_id == Some(ids::MFOUNDI)));
}

// ============================================================================
// Backend API
// ============================================================================

#[test]
fn test_auth_response_payload() {
    let auth: AuthResponse = serde_json::from_value(fixtures::auth_response_json()).unwrap();
    assert_eq!(auth.token, test_utils::fixtures::auth::TOKEN);
    assert_eq!(auth.refresh_token.as_deref(), Some("refresh-token"));
    assert_eq!(auth.user.role, Role::User);
    assert_eq!(auth.user.display_name(), "Awa Ndam");
    assert_eq!(auth.user.initial(), 'A');
}
