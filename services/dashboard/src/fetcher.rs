//! Executes fetch commands against the map service.
//!
//! All commands of a batch run concurrently. Results are applied to the
//! [`MapView`] in completion order; the view's tickets decide whether a
//! result is still wanted.

use std::sync::Arc;

use atlas_client::AtlasSource;
use atlas_common::{
    AtlasResult, FeatureCollection, MapData, SectorCatalog, ZoneReport, ZoneStatDetail,
};
use drilldown::{FetchCommand, MapView, RequestTicket};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, instrument};

/// Result of one command, tagged with its ticket.
#[derive(Debug)]
pub enum FetchOutcome {
    Zones(RequestTicket, AtlasResult<FeatureCollection>),
    MapData(RequestTicket, AtlasResult<MapData>),
    Filters(RequestTicket, AtlasResult<SectorCatalog>),
    ZoneStats(RequestTicket, AtlasResult<Vec<ZoneStatDetail>>),
    Report(RequestTicket, AtlasResult<ZoneReport>),
}

impl FetchOutcome {
    /// Hand the result to the view. Returns false if it was stale.
    pub fn apply(self, view: &mut MapView) -> bool {
        match self {
            FetchOutcome::Zones(ticket, result) => view.apply_zones(ticket, result),
            FetchOutcome::MapData(ticket, result) => view.apply_map_data(ticket, result),
            FetchOutcome::Filters(ticket, result) => view.apply_filters(ticket, result),
            FetchOutcome::ZoneStats(ticket, result) => view.apply_zone_stats(ticket, result),
            FetchOutcome::Report(ticket, result) => view.apply_report(ticket, result),
        }
    }
}

#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn AtlasSource>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn AtlasSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<dyn AtlasSource> {
        &self.source
    }

    /// Run one command.
    pub async fn execute(&self, command: FetchCommand) -> FetchOutcome {
        let source = &self.source;
        match command {
            FetchCommand::Zones {
                ticket,
                level,
                parent_id,
            } => FetchOutcome::Zones(ticket, source.zones(level, parent_id).await),
            FetchCommand::MapData {
                ticket,
                sector_id,
                level,
                parent_id,
            } => FetchOutcome::MapData(ticket, source.map_data(sector_id, level, parent_id).await),
            FetchCommand::Filters { ticket, parent_id } => {
                FetchOutcome::Filters(ticket, source.filters(parent_id).await)
            }
            FetchCommand::ZoneStats { ticket, zone_id } => {
                FetchOutcome::ZoneStats(ticket, source.zone_stats(zone_id).await)
            }
            FetchCommand::Report { ticket, zone_id } => {
                FetchOutcome::Report(ticket, source.report(zone_id).await)
            }
        }
    }

    /// Run a batch of commands and apply every result to `view`.
    ///
    /// Returns the number of results that were applied.
    #[instrument(skip_all, fields(commands = commands.len()))]
    pub async fn run(&self, view: &mut MapView, commands: Vec<FetchCommand>) -> usize {
        let mut pending: FuturesUnordered<_> = commands
            .into_iter()
            .map(|command| self.execute(command))
            .collect();

        let mut applied = 0;
        while let Some(outcome) = pending.next().await {
            if outcome.apply(view) {
                applied += 1;
            }
        }
        debug!(applied, "Fetch batch complete");
        applied
    }
}
