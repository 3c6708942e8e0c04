//! Shared test utilities for the zone-atlas workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Fixtures for a small slice of the Cameroonian zone hierarchy
//! - A fake map and backend API served over HTTP ([`mock_api::FakeApi`])
//! - Temporary directory helpers
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! ```ignore
//! use test_utils::{fixtures, FakeApi};
//!
//! let api = FakeApi::spawn().await;
//! let client = MapApi::new(&api.map_url(), timeout)?;
//! ```

pub mod fixtures;
pub mod mock_api;
pub mod paths;

pub use fixtures::{ids, ROOT_NAME};
pub use mock_api::{FakeApi, RecordedRequest};
pub use paths::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(0.7, style.fill_opacity, 1e-9); // passes
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert that a query string recorded by [`FakeApi`] carries `key=value`.
///
/// ```ignore
/// assert_query_has!(request, "level", "DEPARTEMENT");
/// ```
#[macro_export]
macro_rules! assert_query_has {
    ($request:expr, $key:expr, $value:expr) => {{
        let request = &$request;
        match request.param($key) {
            Some(v) if v == $value => {}
            other => panic!(
                "expected `{}={}` in query of {}, found {:?} (query: {:?})",
                $key, $value, request.path, other, request.query
            ),
        }
    }};
}
