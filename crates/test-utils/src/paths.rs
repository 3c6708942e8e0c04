//! Path helpers for tests that touch the filesystem.

use std::path::PathBuf;

/// Returns the workspace root directory.
///
/// Walks up from the test-utils manifest directory (`crates/test-utils`).
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Path of the sample dashboard configuration shipped with the service.
pub fn sample_config_path() -> PathBuf {
    workspace_root()
        .join("services")
        .join("dashboard")
        .join("config")
        .join("atlas.yaml")
}

/// Creates a temporary directory, removed when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Creates a temporary directory whose name starts with `prefix`.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// A session file path inside a fresh temporary directory.
///
/// The directory must be kept alive for as long as the path is used.
pub fn temp_session_path() -> (tempfile::TempDir, PathBuf) {
    let dir = temp_test_dir_with_prefix("atlas_session_");
    let path = dir.path().join("session.json");
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_sample_config_exists() {
        assert!(sample_config_path().exists());
    }

    #[test]
    fn test_temp_session_path() {
        let (dir, path) = temp_session_path();
        assert!(dir.path().exists());
        assert!(path.starts_with(dir.path()));
        assert!(!path.exists());
    }
}
