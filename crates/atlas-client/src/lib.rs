//! HTTP clients for the zone-atlas services.
//!
//! - [`MapApi`]: zone geometry, sector overlays, filters and statistics
//! - [`AuthApi`]: login, registration, OTP verification and the current user
//!
//! Both clients share one [`ClientConfig`] and report failures as
//! [`atlas_common::AtlasError`].

pub mod auth_api;
pub mod config;
mod http;
pub mod map_api;
pub mod source;

pub use auth_api::{AuthApi, RegisterResponse};
pub use config::{ClientConfig, DEFAULT_BACKEND_URL, DEFAULT_MAP_URL, DEFAULT_TIMEOUT_SECS};
pub use map_api::{map_data_query, zones_query, MapApi, MIN_SEARCH_LEN};
pub use source::AtlasSource;
