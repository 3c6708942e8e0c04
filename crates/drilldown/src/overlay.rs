//! Sector filter overlay.
//!
//! While a sector is selected the map shows `/api/map/data` geometry, coloured
//! by the sector's production value, instead of the plain drill-down zones.

use atlas_common::{GlobalStats, MapData, Sector, SectorId};
use tracing::{debug, warn};

use crate::command::{FetchCommand, RequestTicket, TicketGate, TicketIssuer};
use crate::NavigationState;

#[derive(Debug, Default)]
pub struct SectorOverlay {
    active: Option<SectorId>,
    data: Option<MapData>,
    gate: TicketGate,
    issuer: TicketIssuer,
}

impl SectorOverlay {
    pub fn new(issuer: TicketIssuer) -> Self {
        Self {
            issuer,
            ..Self::default()
        }
    }

    pub fn active(&self) -> Option<SectorId> {
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Toggle a sector: selecting the active sector clears the filter.
    ///
    /// Returns the overlay fetch to run, if any.
    pub fn select(&mut self, sector_id: SectorId, view: &NavigationState) -> Option<FetchCommand> {
        if self.active == Some(sector_id) {
            self.clear();
            return None;
        }
        self.active = Some(sector_id);
        self.refresh(view)
    }

    /// Drop the filter and any overlay data.
    pub fn clear(&mut self) {
        if let Some(sector_id) = self.active.take() {
            debug!(sector_id, "Sector filter cleared");
        }
        self.data = None;
        self.gate.cancel();
    }

    /// Re-issue the overlay fetch for `view` when a filter is active.
    pub fn refresh(&mut self, view: &NavigationState) -> Option<FetchCommand> {
        let sector_id = self.active?;
        let ticket = self.issuer.next();
        self.gate.track(ticket);
        Some(FetchCommand::MapData {
            ticket,
            sector_id,
            level: view.level,
            parent_id: view.parent_id,
        })
    }

    /// Apply an overlay response. Stale tickets are ignored and return false.
    ///
    /// A failed fetch drops the overlay data so nothing stale is displayed.
    pub fn apply<E: std::fmt::Display>(
        &mut self,
        ticket: RequestTicket,
        result: Result<MapData, E>,
    ) -> bool {
        if !self.gate.settle(ticket) {
            debug!(%ticket, "Discarding stale overlay response");
            return false;
        }
        match result {
            Ok(data) => self.data = Some(data),
            Err(e) => {
                warn!(%ticket, error = %e, "Failed to load sector overlay");
                self.data = None;
            }
        }
        true
    }

    pub fn data(&self) -> Option<&MapData> {
        self.data.as_ref()
    }

    pub fn stats(&self) -> Option<&GlobalStats> {
        self.data.as_ref().and_then(|d| d.stats.as_ref())
    }

    pub fn sector(&self) -> Option<&Sector> {
        self.data.as_ref().and_then(|d| d.sector.as_ref())
    }

    pub fn is_loading(&self) -> bool {
        self.gate.is_pending()
    }
}
