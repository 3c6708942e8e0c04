//! Common types and utilities shared across the zone-atlas crates.

pub mod error;
pub mod level;
pub mod sector;
pub mod stats;
pub mod style;
pub mod user;
pub mod zone;

pub use error::{AtlasError, AtlasResult};
pub use level::{DivisionLevel, ParseLevelError};
pub use sector::{Sector, SectorCatalog, SectorFamily, SectorId, DEFAULT_SECTOR_COLOR};
pub use stats::{
    ComparisonEntry, Evolution, EvolutionSelection, GlobalStats, MapData, TopProduct,
    ZoneReport, ZoneStatDetail,
};
pub use style::{format_volume, tooltip, zone_style, Color, OverlayStyle, Theme, ZoneStyle};
pub use user::{AuthResponse, LoginRequest, OtpRequest, RegisterRequest, Role, User};
pub use zone::{Feature, FeatureCollection, Geometry, SearchResult, ZoneId, ZoneProperties};
