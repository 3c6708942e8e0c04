//! MapApi against the fake map service.

use std::time::Duration;

use atlas_client::{AtlasSource, ClientConfig, MapApi};
use atlas_common::{AtlasError, DivisionLevel};
use test_utils::{assert_query_has, ids, FakeApi};

async fn setup() -> (FakeApi, MapApi) {
    let fake = FakeApi::spawn().await;
    let api = MapApi::new(&ClientConfig {
        map_url: fake.map_url(),
        backend_url: fake.backend_url(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    (fake, api)
}

// ============================================================================
// Zones
// ============================================================================

#[tokio::test]
async fn test_root_zones_omit_parent_id() {
    let (fake, api) = setup().await;

    let zones = api.zones(DivisionLevel::Region, None).await.unwrap();
    assert_eq!(zones.len(), 3);

    let requests = fake.requests_to("/api/gis/zones");
    assert_eq!(requests.len(), 1);
    assert_query_has!(requests[0], "level", "REGION");
    assert_eq!(requests[0].param("parent_id"), None);
}

#[tokio::test]
async fn test_child_zones_send_parent_id() {
    let (fake, api) = setup().await;

    let zones = api
        .zones(DivisionLevel::Departement, Some(ids::CENTRE))
        .await
        .unwrap();
    let names: Vec<&str> = zones.features.iter().map(|f| f.properties.name.as_str()).collect();
    assert_eq!(names, vec!["Mfoundi", "Lekié"]);

    let request = &fake.requests_to("/api/gis/zones")[0];
    assert_query_has!(request, "level", "DEPARTEMENT");
    assert_query_has!(request, "parent_id", "5");
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let (fake, api) = setup().await;
    fake.fail("/api/gis/zones");

    let err = api.zones(DivisionLevel::Region, None).await.unwrap_err();
    assert_eq!(err.http_status_code(), Some(500));
    assert_eq!(err.user_message(), "Erreur interne");
}

#[tokio::test]
async fn test_timeout_maps_to_timeout_error() {
    let fake = FakeApi::spawn().await;
    fake.delay("/api/gis/zones", Duration::from_millis(500));
    let api = MapApi::new(&ClientConfig {
        map_url: fake.map_url(),
        timeout: Duration::from_millis(100),
        ..Default::default()
    })
    .unwrap();

    let err = api.zones(DivisionLevel::Region, None).await.unwrap_err();
    assert!(matches!(err, AtlasError::Timeout), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_service() {
    let api = MapApi::new(&ClientConfig {
        map_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(2),
        ..Default::default()
    })
    .unwrap();
    let err = api.zones(DivisionLevel::Region, None).await.unwrap_err();
    assert!(matches!(err, AtlasError::Http(_) | AtlasError::Timeout), "got {:?}", err);
}

// ============================================================================
// Overlay and filters
// ============================================================================

#[tokio::test]
async fn test_map_data_query_and_payload() {
    let (fake, api) = setup().await;

    let data = api
        .map_data(ids::SECTOR_CACAO, DivisionLevel::Departement, Some(ids::CENTRE))
        .await
        .unwrap();
    assert_eq!(data.geojson.len(), 2);
    assert_eq!(data.sector.unwrap().name, "Cacao");

    let request = &fake.requests_to("/api/map/data")[0];
    assert_query_has!(request, "sector_id", "1");
    assert_query_has!(request, "level", "DEPARTEMENT");
    assert_query_has!(request, "parent_id", "5");
}

#[tokio::test]
async fn test_filters_with_and_without_parent() {
    let (fake, api) = setup().await;

    let catalog = api.filters(None).await.unwrap();
    assert_eq!(catalog.all().len(), 3);
    api.filters(Some(ids::CENTRE)).await.unwrap();

    let requests = fake.requests_to("/api/filters");
    assert_eq!(requests[0].query, None);
    assert_query_has!(requests[1], "parent_id", "5");
}

// ============================================================================
// Statistics
// ============================================================================

#[tokio::test]
async fn test_report_fetches_three_endpoints() {
    let (fake, api) = setup().await;

    let report = api.report(ids::CENTRE).await.unwrap();
    assert_eq!(report.global.unwrap().total_producers, Some(1520));
    assert_eq!(report.evolution.unwrap().sectors.len(), 3);
    assert_eq!(report.comparison.len(), 2);

    for path in ["/api/stats/global", "/api/stats/evolution", "/api/stats/comparison"] {
        let requests = fake.requests_to(path);
        assert_eq!(requests.len(), 1, "{}", path);
        assert_query_has!(requests[0], "zone_id", "5");
    }
}

#[tokio::test]
async fn test_report_fails_when_one_part_fails() {
    let (fake, api) = setup().await;
    fake.fail("/api/stats/evolution");
    assert!(api.report(ids::CENTRE).await.is_err());
}

#[tokio::test]
async fn test_zone_stats_and_details() {
    let (fake, api) = setup().await;

    assert_eq!(api.zone_stats(ids::CENTRE).await.unwrap().len(), 2);
    assert!(api.zone_details(ids::NORD).await.unwrap().is_empty());

    assert_query_has!(fake.requests_to("/api/zone/stats")[0], "zone_id", "5");
    assert_query_has!(fake.requests_to("/api/zone/details")[0], "zone_id", "7");
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_short_search_sends_nothing() {
    let (fake, api) = setup().await;

    assert!(api.search("y").await.unwrap().is_empty());
    assert!(api.search("  y ").await.unwrap().is_empty());
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn test_search_encodes_query() {
    let (fake, api) = setup().await;

    let results = api.search("Yaoundé").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_query_has!(fake.requests_to("/api/gis/search")[0], "q", "Yaoundé");
}

#[tokio::test]
async fn test_search_query_with_spaces_round_trips() {
    let (fake, api) = setup().await;

    let results = api.search("Yaoundé II").await.unwrap();
    assert_eq!(results.len(), 1);

    let request = &fake.requests_to("/api/gis/search")[0];
    assert!(request.query.as_deref().is_some_and(|q| !q.contains(' ')));
    assert_query_has!(request, "q", "Yaoundé II");
}

#[tokio::test]
async fn test_source_trait_delegates() {
    let (fake, api) = setup().await;
    let source: &dyn AtlasSource = &api;

    let zones = source
        .zones(DivisionLevel::Arrondissement, Some(ids::MFOUNDI))
        .await
        .unwrap();
    assert_eq!(zones.len(), 2);
    assert_eq!(fake.requests().len(), 1);
}
