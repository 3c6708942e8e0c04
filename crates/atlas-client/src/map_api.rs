//! Client for the geospatial and statistics service.
//!
//! Every endpoint lives under `/api/...` on the map service's origin, so the
//! path of the configured base URL is ignored.

use std::time::Instant;

use atlas_common::{
    AtlasError, AtlasResult, ComparisonEntry, DivisionLevel, Evolution, FeatureCollection,
    GlobalStats, MapData, SearchResult, SectorCatalog, SectorId, ZoneId, ZoneReport,
    ZoneStatDetail,
};
use metrics::{counter, histogram};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::{parse_base, ClientConfig};
use crate::http::{build_client, read_json, transport_error};

/// Queries shorter than this return no results without a request.
pub const MIN_SEARCH_LEN: usize = 2;

/// Query parameters for `/api/gis/zones`.
///
/// `parent_id` is dropped at the root level, which always lists every region.
pub fn zones_query(level: DivisionLevel, parent_id: Option<ZoneId>) -> Vec<(&'static str, String)> {
    let mut query = vec![("level", level.to_string())];
    push_parent(&mut query, level, parent_id);
    query
}

/// Query parameters for `/api/map/data`.
pub fn map_data_query(
    sector_id: SectorId,
    level: DivisionLevel,
    parent_id: Option<ZoneId>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("sector_id", sector_id.to_string()), ("level", level.to_string())];
    push_parent(&mut query, level, parent_id);
    query
}

fn push_parent(query: &mut Vec<(&'static str, String)>, level: DivisionLevel, parent_id: Option<ZoneId>) {
    if level == DivisionLevel::root() {
        return;
    }
    if let Some(id) = parent_id {
        query.push(("parent_id", id.to_string()));
    }
}

fn zone_query(zone_id: ZoneId) -> [(&'static str, String); 1] {
    [("zone_id", zone_id.to_string())]
}

#[derive(Debug, Clone)]
pub struct MapApi {
    client: Client,
    base: Url,
}

impl MapApi {
    pub fn new(config: &ClientConfig) -> AtlasResult<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            base: parse_base("map_url", &config.map_url)?,
        })
    }

    /// Zone geometry of one level, optionally under a parent zone.
    #[instrument(skip(self))]
    pub async fn zones(
        &self,
        level: DivisionLevel,
        parent_id: Option<ZoneId>,
    ) -> AtlasResult<FeatureCollection> {
        let zones: FeatureCollection = self
            .get("zones", "/api/gis/zones", &zones_query(level, parent_id))
            .await?;
        debug!(count = zones.len(), "Fetched zones");
        Ok(zones)
    }

    /// Zones of a view coloured by one sector, with its stats.
    #[instrument(skip(self))]
    pub async fn map_data(
        &self,
        sector_id: SectorId,
        level: DivisionLevel,
        parent_id: Option<ZoneId>,
    ) -> AtlasResult<MapData> {
        self.get("map_data", "/api/map/data", &map_data_query(sector_id, level, parent_id))
            .await
    }

    /// Sector catalogue, optionally restricted to sectors present under a zone.
    #[instrument(skip(self))]
    pub async fn filters(&self, parent_id: Option<ZoneId>) -> AtlasResult<SectorCatalog> {
        let query: Vec<(&str, String)> = parent_id
            .map(|id| ("parent_id", id.to_string()))
            .into_iter()
            .collect();
        self.get("filters", "/api/filters", &query).await
    }

    #[instrument(skip(self))]
    pub async fn global_stats(&self, zone_id: ZoneId) -> AtlasResult<GlobalStats> {
        self.get("stats_global", "/api/stats/global", &zone_query(zone_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn evolution(&self, zone_id: ZoneId) -> AtlasResult<Evolution> {
        self.get("stats_evolution", "/api/stats/evolution", &zone_query(zone_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn comparison(&self, zone_id: ZoneId) -> AtlasResult<Vec<ComparisonEntry>> {
        self.get("stats_comparison", "/api/stats/comparison", &zone_query(zone_id))
            .await
    }

    /// Global, evolution and comparison stats, fetched concurrently.
    ///
    /// Fails as a whole when any of the three requests fails.
    #[instrument(skip(self))]
    pub async fn report(&self, zone_id: ZoneId) -> AtlasResult<ZoneReport> {
        let (global, evolution, comparison) = tokio::try_join!(
            self.global_stats(zone_id),
            self.evolution(zone_id),
            self.comparison(zone_id),
        )?;
        Ok(ZoneReport {
            global: Some(global),
            evolution: Some(evolution),
            comparison,
        })
    }

    /// Per-sector volumes of a zone, shown when a zone is clicked under a filter.
    #[instrument(skip(self))]
    pub async fn zone_stats(&self, zone_id: ZoneId) -> AtlasResult<Vec<ZoneStatDetail>> {
        self.get("zone_stats", "/api/zone/stats", &zone_query(zone_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn zone_details(&self, zone_id: ZoneId) -> AtlasResult<Vec<ZoneStatDetail>> {
        self.get("zone_details", "/api/zone/details", &zone_query(zone_id))
            .await
    }

    /// Zones whose name matches `query`.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> AtlasResult<Vec<SearchResult>> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LEN {
            debug!("Search query too short, skipping request");
            return Ok(Vec::new());
        }
        self.get("search", "/api/gis/search", &[("q", query.to_string())])
            .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> AtlasResult<T> {
        let url = self
            .base
            .join(path)
            .map_err(|e| AtlasError::Config(format!("Invalid map API path {}: {}", path, e)))?;

        counter!("atlas_map_requests_total", "endpoint" => endpoint).increment(1);
        let start = Instant::now();

        let result = match self.client.get(url).query(query).send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(transport_error(e)),
        };

        histogram!("atlas_map_request_duration_ms", "endpoint" => endpoint)
            .record(start.elapsed().as_secs_f64() * 1000.0);
        if let Err(e) = &result {
            counter!("atlas_map_request_errors_total", "endpoint" => endpoint).increment(1);
            warn!(endpoint, status = e.http_status_code(), error = %e, "Map API request failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zones_query_suppresses_parent_at_root() {
        assert_eq!(
            zones_query(DivisionLevel::Region, Some(5)),
            vec![("level", "REGION".to_string())]
        );
        assert_eq!(
            zones_query(DivisionLevel::Departement, Some(5)),
            vec![("level", "DEPARTEMENT".to_string()), ("parent_id", "5".to_string())]
        );
        assert_eq!(
            zones_query(DivisionLevel::Arrondissement, None),
            vec![("level", "ARRONDISSEMENT".to_string())]
        );
    }

    #[test]
    fn test_map_data_query() {
        assert_eq!(
            map_data_query(3, DivisionLevel::Departement, Some(5)),
            vec![
                ("sector_id", "3".to_string()),
                ("level", "DEPARTEMENT".to_string()),
                ("parent_id", "5".to_string())
            ]
        );
        assert_eq!(map_data_query(3, DivisionLevel::Region, None).len(), 2);
    }

    #[test]
    fn test_base_path_is_ignored() {
        let api = MapApi::new(&ClientConfig {
            map_url: "http://maps.example.org/api/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            api.base.join("/api/gis/zones").unwrap().as_str(),
            "http://maps.example.org/api/gis/zones"
        );
    }
}
