//! Dashboard map state: navigation, overlay and the data they display.
//!
//! `MapView` owns the [`DrillDownController`] and the [`SectorOverlay`] and
//! keeps the fetched data in sync with them. Each operation returns the
//! fetch commands it produced; the caller runs them and hands the results
//! back through the `apply_*` methods together with the command's ticket.

use atlas_common::{
    style::{tooltip, zone_style, OverlayStyle},
    DivisionLevel, Feature, FeatureCollection, MapData, SearchResult, Sector, SectorCatalog,
    SectorId, Theme, ZoneId, ZoneProperties, ZoneReport, ZoneStatDetail, ZoneStyle,
};
use tracing::{debug, warn};

use crate::command::{CommandQueue, FetchCommand, RequestTicket, TicketGate, TicketIssuer};
use crate::controller::{Breadcrumb, DrillDownController};
use crate::dispatch::{dispatch_click, ClickAction, HoverAction};
use crate::{DrillDownError, History, NavigationState, SectorOverlay};

/// A zone ready for display.
#[derive(Debug, Clone)]
pub struct StyledZone<'a> {
    pub feature: &'a Feature,
    pub style: ZoneStyle,
    pub tooltip: String,
}

pub struct MapView {
    controller: DrillDownController,
    overlay: SectorOverlay,
    queue: CommandQueue,
    issuer: TicketIssuer,

    zones: Option<FeatureCollection>,
    zones_gate: TicketGate,
    displayed: Option<FeatureCollection>,

    filters: SectorCatalog,
    filters_gate: TicketGate,
    filter_category: Option<String>,

    selected_zone: Option<ZoneProperties>,
    zone_stats: Vec<ZoneStatDetail>,
    zone_stats_gate: TicketGate,

    panel_open: bool,
    report: Option<ZoneReport>,
    report_gate: TicketGate,

    hovered: Option<String>,
}

impl MapView {
    pub fn new(root_name: impl Into<String>) -> Self {
        let issuer = TicketIssuer::new();
        let queue = CommandQueue::new();
        let mut controller = DrillDownController::new(root_name, issuer.clone());
        controller.subscribe(Box::new(queue.clone()));

        Self {
            controller,
            overlay: SectorOverlay::new(issuer.clone()),
            queue,
            issuer,
            zones: None,
            zones_gate: TicketGate::default(),
            displayed: None,
            filters: SectorCatalog::default(),
            filters_gate: TicketGate::default(),
            filter_category: None,
            selected_zone: None,
            zone_stats: Vec::new(),
            zone_stats_gate: TicketGate::default(),
            panel_open: false,
            report: None,
            report_gate: TicketGate::default(),
            hovered: None,
        }
    }

    /// Initial fetches for the root view.
    pub fn start(&mut self) -> Vec<FetchCommand> {
        let command = self.controller.refresh();
        self.zones_gate.track(command.ticket());
        self.request_filters();
        self.queue.drain()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Handle a click on a zone of the map.
    pub fn click(&mut self, properties: &ZoneProperties) -> Vec<FetchCommand> {
        match dispatch_click(properties, self.overlay.is_active()) {
            ClickAction::DrillDown { id, name, level } => self.open_zone(id, &name, level),
            ClickAction::OpenZoneStats(zone) => {
                let ticket = self.issuer.next();
                self.zone_stats_gate.track(ticket);
                self.zone_stats.clear();
                let zone_id = zone.id;
                self.selected_zone = Some(zone);
                self.queue.push(FetchCommand::ZoneStats { ticket, zone_id });
                self.queue.drain()
            }
        }
    }

    /// Drill into a zone regardless of the overlay mode.
    pub fn open_zone(&mut self, id: ZoneId, name: &str, level: DivisionLevel) -> Vec<FetchCommand> {
        let previous_parent = self.controller.current().parent_id;
        if let Some(command) = self.controller.drill_down(id, name, level) {
            self.view_changed(previous_parent, command);
        }
        self.queue.drain()
    }

    /// Navigate into a zone picked from search results.
    pub fn open_search_result(&mut self, result: &SearchResult) -> Vec<FetchCommand> {
        self.open_zone(result.id, &result.name, result.level)
    }

    pub fn jump_to_history(&mut self, index: usize) -> Result<Vec<FetchCommand>, DrillDownError> {
        let previous_parent = self.controller.current().parent_id;
        let command = self.controller.jump_to_history(index)?;
        self.view_changed(previous_parent, command);
        Ok(self.queue.drain())
    }

    /// Go up one level; at the root this is a full [`reset`](Self::reset).
    pub fn back(&mut self) -> Vec<FetchCommand> {
        if self.controller.history().is_empty() {
            return self.reset();
        }
        let previous_parent = self.controller.current().parent_id;
        let command = self.controller.back();
        self.view_changed(previous_parent, command);
        self.queue.drain()
    }

    /// Return to the root view, dropping the filter and any open modal.
    pub fn reset(&mut self) -> Vec<FetchCommand> {
        self.clear_overlay_state();
        let previous_parent = self.controller.current().parent_id;
        let command = self.controller.reset();
        self.view_changed(previous_parent, command);
        self.queue.drain()
    }

    fn view_changed(&mut self, previous_parent: Option<ZoneId>, command: FetchCommand) {
        self.zones_gate.track(command.ticket());

        if previous_parent != self.controller.current().parent_id {
            self.request_filters();
        }
        if let Some(command) = self.overlay.refresh(self.controller.current()) {
            self.queue.push(command);
        }

        self.panel_open = self.controller.detail_panel_visible();
        self.report = None;
        if self.panel_open {
            self.request_report();
        } else {
            self.report_gate.cancel();
        }
    }

    fn request_filters(&mut self) {
        let ticket = self.issuer.next();
        self.filters_gate.track(ticket);
        self.queue.push(FetchCommand::Filters {
            ticket,
            parent_id: self.controller.current().parent_id,
        });
    }

    fn request_report(&mut self) {
        if let Some(zone_id) = self.controller.current().parent_id {
            let ticket = self.issuer.next();
            self.report_gate.track(ticket);
            self.queue.push(FetchCommand::Report { ticket, zone_id });
        }
    }

    // ------------------------------------------------------------------
    // Sector overlay
    // ------------------------------------------------------------------

    /// Toggle a sector filter.
    pub fn select_sector(&mut self, sector_id: SectorId) -> Vec<FetchCommand> {
        match self.overlay.select(sector_id, self.controller.current()) {
            Some(command) => self.queue.push(command),
            None => self.clear_overlay_state(),
        }
        self.queue.drain()
    }

    pub fn clear_sector(&mut self) {
        self.clear_overlay_state();
    }

    fn clear_overlay_state(&mut self) {
        self.overlay.clear();
        self.selected_zone = None;
        self.zone_stats.clear();
        self.zone_stats_gate.cancel();
        self.displayed = self.zones.clone();
    }

    /// Narrow the filter list to one category, or show all with `None`.
    pub fn set_filter_category(&mut self, category: Option<String>) {
        self.filter_category = match (category, self.filter_category.take()) {
            (Some(new), Some(old)) if new.eq_ignore_ascii_case(&old) => None,
            (new, _) => new,
        };
    }

    // ------------------------------------------------------------------
    // Panels
    // ------------------------------------------------------------------

    pub fn hover(&mut self, action: HoverAction) {
        self.hovered = match action {
            HoverAction::Enter { name } => Some(name),
            HoverAction::Leave => None,
        };
    }

    pub fn close_zone_stats(&mut self) {
        self.selected_zone = None;
        self.zone_stats.clear();
        self.zone_stats_gate.cancel();
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    /// Reopen the detail panel; only possible away from the root view.
    pub fn open_panel(&mut self) -> Vec<FetchCommand> {
        if self.controller.detail_panel_visible() && !self.panel_open {
            self.panel_open = true;
            if self.report.is_none() {
                self.request_report();
            }
        }
        self.queue.drain()
    }

    // ------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------

    /// Apply a zone geometry response. Returns false for stale tickets.
    ///
    /// A failure keeps whatever was displayed before.
    pub fn apply_zones<E: std::fmt::Display>(
        &mut self,
        ticket: RequestTicket,
        result: Result<FeatureCollection, E>,
    ) -> bool {
        if !self.zones_gate.settle(ticket) {
            debug!(%ticket, "Discarding stale zones response");
            return false;
        }
        match result {
            Ok(zones) => {
                debug!(%ticket, count = zones.len(), "Zones loaded");
                if !self.overlay.is_active() {
                    self.displayed = Some(zones.clone());
                }
                self.zones = Some(zones);
            }
            Err(e) => warn!(%ticket, error = %e, "Failed to load zones"),
        }
        true
    }

    pub fn apply_map_data<E: std::fmt::Display>(
        &mut self,
        ticket: RequestTicket,
        result: Result<MapData, E>,
    ) -> bool {
        if !self.overlay.apply(ticket, result) {
            return false;
        }
        self.displayed = self.overlay.data().map(|d| d.geojson.clone());
        true
    }

    pub fn apply_filters<E: std::fmt::Display>(
        &mut self,
        ticket: RequestTicket,
        result: Result<SectorCatalog, E>,
    ) -> bool {
        if !self.filters_gate.settle(ticket) {
            debug!(%ticket, "Discarding stale filters response");
            return false;
        }
        self.filters = match result {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(%ticket, error = %e, "Failed to load filters");
                SectorCatalog::default()
            }
        };
        true
    }

    pub fn apply_zone_stats<E: std::fmt::Display>(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<ZoneStatDetail>, E>,
    ) -> bool {
        if !self.zone_stats_gate.settle(ticket) {
            debug!(%ticket, "Discarding stale zone stats response");
            return false;
        }
        match result {
            Ok(stats) => self.zone_stats = stats,
            Err(e) => warn!(%ticket, error = %e, "Failed to load zone stats"),
        }
        true
    }

    pub fn apply_report<E: std::fmt::Display>(
        &mut self,
        ticket: RequestTicket,
        result: Result<ZoneReport, E>,
    ) -> bool {
        if !self.report_gate.settle(ticket) {
            debug!(%ticket, "Discarding stale report response");
            return false;
        }
        match result {
            Ok(report) => self.report = Some(report),
            Err(e) => warn!(%ticket, error = %e, "Failed to load panel stats"),
        }
        true
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn current(&self) -> &NavigationState {
        self.controller.current()
    }

    pub fn history(&self) -> &History {
        self.controller.history()
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.controller.breadcrumbs()
    }

    pub fn scope_label(&self) -> &'static str {
        self.controller.scope_label()
    }

    /// Geometry currently on the map: overlay data when a filter is active,
    /// drill-down zones otherwise.
    pub fn displayed(&self) -> Option<&FeatureCollection> {
        self.displayed.as_ref()
    }

    pub fn zones(&self) -> Option<&FeatureCollection> {
        self.zones.as_ref()
    }

    pub fn overlay(&self) -> &SectorOverlay {
        &self.overlay
    }

    pub fn active_sector(&self) -> Option<&Sector> {
        let id = self.overlay.active()?;
        self.overlay
            .sector()
            .filter(|s| s.id == id)
            .or_else(|| self.filters.find(id))
    }

    pub fn filters(&self) -> &SectorCatalog {
        &self.filters
    }

    pub fn filter_category(&self) -> Option<&str> {
        self.filter_category.as_deref()
    }

    /// Sectors listed in the filter panel.
    pub fn displayed_sectors(&self) -> Vec<&Sector> {
        self.filters.displayed(self.filter_category.as_deref())
    }

    pub fn selected_zone(&self) -> Option<&ZoneProperties> {
        self.selected_zone.as_ref()
    }

    pub fn zone_stats(&self) -> &[ZoneStatDetail] {
        &self.zone_stats
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_open && self.controller.detail_panel_visible()
    }

    pub fn report(&self) -> Option<&ZoneReport> {
        self.report.as_ref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.zones_gate.is_pending() || self.overlay.is_loading()
    }

    /// Displayed zones with their computed style and tooltip.
    pub fn styled_zones(&self, theme: Theme) -> Vec<StyledZone<'_>> {
        let Some(collection) = self.displayed.as_ref() else {
            return Vec::new();
        };
        let overlay_active = self.overlay.is_active();
        let overlay = overlay_active.then(|| OverlayStyle {
            sector_color: self.active_sector().and_then(|s| s.color.as_deref()),
            max_value: collection.max_value(),
        });
        collection
            .features
            .iter()
            .map(|feature| StyledZone {
                feature,
                style: zone_style(feature, overlay, theme),
                tooltip: tooltip(feature, overlay_active),
            })
            .collect()
    }
}
