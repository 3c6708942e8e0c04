//! Data source seam used by the dashboard to run fetch commands.

use async_trait::async_trait;

use atlas_common::{
    AtlasResult, DivisionLevel, FeatureCollection, MapData, SearchResult, SectorCatalog,
    SectorId, ZoneId, ZoneReport, ZoneStatDetail,
};

use crate::MapApi;

/// Everything the interactive dashboard reads from the map service.
#[async_trait]
pub trait AtlasSource: Send + Sync {
    async fn zones(
        &self,
        level: DivisionLevel,
        parent_id: Option<ZoneId>,
    ) -> AtlasResult<FeatureCollection>;

    async fn map_data(
        &self,
        sector_id: SectorId,
        level: DivisionLevel,
        parent_id: Option<ZoneId>,
    ) -> AtlasResult<MapData>;

    async fn filters(&self, parent_id: Option<ZoneId>) -> AtlasResult<SectorCatalog>;

    async fn zone_stats(&self, zone_id: ZoneId) -> AtlasResult<Vec<ZoneStatDetail>>;

    async fn report(&self, zone_id: ZoneId) -> AtlasResult<ZoneReport>;

    async fn zone_details(&self, zone_id: ZoneId) -> AtlasResult<Vec<ZoneStatDetail>>;

    async fn search(&self, query: &str) -> AtlasResult<Vec<SearchResult>>;
}

#[async_trait]
impl AtlasSource for MapApi {
    async fn zones(
        &self,
        level: DivisionLevel,
        parent_id: Option<ZoneId>,
    ) -> AtlasResult<FeatureCollection> {
        MapApi::zones(self, level, parent_id).await
    }

    async fn map_data(
        &self,
        sector_id: SectorId,
        level: DivisionLevel,
        parent_id: Option<ZoneId>,
    ) -> AtlasResult<MapData> {
        MapApi::map_data(self, sector_id, level, parent_id).await
    }

    async fn filters(&self, parent_id: Option<ZoneId>) -> AtlasResult<SectorCatalog> {
        MapApi::filters(self, parent_id).await
    }

    async fn zone_stats(&self, zone_id: ZoneId) -> AtlasResult<Vec<ZoneStatDetail>> {
        MapApi::zone_stats(self, zone_id).await
    }

    async fn report(&self, zone_id: ZoneId) -> AtlasResult<ZoneReport> {
        MapApi::report(self, zone_id).await
    }

    async fn zone_details(&self, zone_id: ZoneId) -> AtlasResult<Vec<ZoneStatDetail>> {
        MapApi::zone_details(self, zone_id).await
    }

    async fn search(&self, query: &str) -> AtlasResult<Vec<SearchResult>> {
        MapApi::search(self, query).await
    }
}
