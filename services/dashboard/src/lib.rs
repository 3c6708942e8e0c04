//! Terminal dashboard over the zone-atlas services.
//!
//! Library half of the `atlas` binary: configuration, session handling,
//! fetch execution, console rendering and the interactive browser.

pub mod app;
pub mod browse;
pub mod config;
pub mod fetcher;
pub mod report;
pub mod session;

pub use app::App;
pub use browse::{parse_command, BrowseCommand, Browser, Step};
pub use config::{AtlasConfig, FileConfig, Overrides};
pub use fetcher::{FetchOutcome, Fetcher};
pub use session::{guard, Access, Route, Session, SessionStore};
