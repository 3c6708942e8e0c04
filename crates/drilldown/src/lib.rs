//! Drill-down navigation over administrative zones.
//!
//! The crate holds the client-side state of the dashboard map:
//! - [`NavigationState`] and its [`History`]
//! - the [`DrillDownController`] state machine (REGION → DEPARTEMENT → ARRONDISSEMENT)
//! - the sector [`SectorOverlay`]
//! - click dispatch between navigation and statistics modes
//! - [`MapView`], which ties them together and applies fetch results
//!
//! Nothing here performs I/O. Every state change emits a [`FetchCommand`]
//! that the caller executes and feeds back with its [`RequestTicket`].

pub mod command;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod overlay;
pub mod state;
pub mod view;

pub use command::{CommandQueue, FetchCommand, FetchObserver, RequestTicket, TicketGate, TicketIssuer};
pub use controller::{Breadcrumb, DrillDownController};
pub use dispatch::{dispatch_click, dispatch_hover, ClickAction, HoverAction};
pub use error::DrillDownError;
pub use history::History;
pub use overlay::SectorOverlay;
pub use state::NavigationState;
pub use view::{MapView, StyledZone};

/// Display name of the root view.
pub const DEFAULT_ROOT_NAME: &str = "Cameroun";
