//! Configuration file location

use std::path::{Path, PathBuf};

/// Application name used for platform directories
const APP_NAME: &str = "apitest";

/// Get the default configuration file path
///
/// Platform-specific:
/// - Linux: `~/.config/apitest/config.toml`
/// - macOS: `~/Library/Application Support/apitest/config.toml`
/// - Windows: `%APPDATA%\apitest\config\config.toml`
pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Resolve `path` against the directory containing `anchor`
///
/// Absolute paths are returned unchanged. Suite files use this to locate
/// their fixture files.
pub fn relative_to(anchor: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    anchor
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(path)
}
