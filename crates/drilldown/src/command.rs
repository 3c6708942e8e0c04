//! Fetch commands emitted on state changes.
//!
//! Commands carry a [`RequestTicket`]. Results are fed back with the same
//! ticket and applied only if no newer command was issued on the same
//! channel, so a slow response can never overwrite a more recent one.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use atlas_common::{DivisionLevel, SectorId, ZoneId};

/// Sequence number of a fetch command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing tickets; clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct TicketIssuer(Arc<AtomicU64>);

impl TicketIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> RequestTicket {
        RequestTicket(self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Tracks the latest ticket of one channel.
#[derive(Debug, Clone, Default)]
pub struct TicketGate {
    latest: Option<RequestTicket>,
    settled: bool,
}

impl TicketGate {
    /// Record a newly issued ticket; earlier ones become stale.
    pub fn track(&mut self, ticket: RequestTicket) {
        self.latest = Some(ticket);
        self.settled = false;
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest == Some(ticket)
    }

    /// Mark `ticket` as answered. Returns false for stale tickets.
    pub fn settle(&mut self, ticket: RequestTicket) -> bool {
        if self.is_current(ticket) {
            self.settled = true;
            true
        } else {
            false
        }
    }

    /// Forget the channel, making every outstanding ticket stale.
    pub fn cancel(&mut self) {
        self.latest = None;
        self.settled = false;
    }

    /// A request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.latest.is_some() && !self.settled
    }
}

/// A request the dashboard must perform against the map API.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchCommand {
    /// Zone geometry for the current view (`/api/gis/zones`).
    Zones {
        ticket: RequestTicket,
        level: DivisionLevel,
        parent_id: Option<ZoneId>,
    },
    /// Sector overlay for the current view (`/api/map/data`).
    MapData {
        ticket: RequestTicket,
        sector_id: SectorId,
        level: DivisionLevel,
        parent_id: Option<ZoneId>,
    },
    /// Filter catalogue for the current parent zone (`/api/filters`).
    Filters {
        ticket: RequestTicket,
        parent_id: Option<ZoneId>,
    },
    /// Per-sector volumes of a clicked zone (`/api/zone/stats`).
    ZoneStats { ticket: RequestTicket, zone_id: ZoneId },
    /// Global, evolution and comparison stats for the detail panel.
    Report { ticket: RequestTicket, zone_id: ZoneId },
}

impl FetchCommand {
    pub fn ticket(&self) -> RequestTicket {
        match self {
            FetchCommand::Zones { ticket, .. }
            | FetchCommand::MapData { ticket, .. }
            | FetchCommand::Filters { ticket, .. }
            | FetchCommand::ZoneStats { ticket, .. }
            | FetchCommand::Report { ticket, .. } => *ticket,
        }
    }

    /// Short channel name for logs.
    pub fn channel(&self) -> &'static str {
        match self {
            FetchCommand::Zones { .. } => "zones",
            FetchCommand::MapData { .. } => "map_data",
            FetchCommand::Filters { .. } => "filters",
            FetchCommand::ZoneStats { .. } => "zone_stats",
            FetchCommand::Report { .. } => "report",
        }
    }
}

/// Receives every command emitted by a controller.
pub trait FetchObserver: Send + Sync {
    fn notify(&self, command: &FetchCommand);
}

/// Observer that queues commands until they are drained.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    inner: Arc<Mutex<VecDeque<FetchCommand>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: FetchCommand) {
        self.lock().push_back(command);
    }

    /// Take every queued command in emission order.
    pub fn drain(&self) -> Vec<FetchCommand> {
        self.lock().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<FetchCommand>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FetchObserver for CommandQueue {
    fn notify(&self, command: &FetchCommand) {
        self.push(command.clone());
    }
}
