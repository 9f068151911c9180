//! File persistence helpers.
//!
//! Handles loading and saving JSON state to disk.

use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Ledger file name.
pub const LEDGER_FILE_NAME: &str = "tve_failures.json";

/// Returns the default state directory.
///
/// - macOS: `~/Library/Application Support/tvecheck`
/// - Linux: `~/.local/share/tvecheck`
/// - Windows: `%LOCALAPPDATA%\tvecheck`
pub fn default_state_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tvecheck"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default ledger file path.
pub fn default_ledger_path() -> PathBuf {
    default_state_dir().join(LEDGER_FILE_NAME)
}

// ============================================================================
// File Operations
// ============================================================================

/// Saves data to a JSON file.
///
/// Creates parent directories if they don't exist and writes via a temp
/// file + rename, so readers never see a half-written file.
///
/// # Errors
///
/// Serialization or filesystem errors.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(data)?;

    let temp_path = temp_path_for(path);
    tokio::fs::write(&temp_path, &json).await?;
    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }

    debug!(path = %path.display(), bytes = json.len(), "JSON file saved");
    Ok(())
}

/// Loads data from a JSON file.
///
/// # Errors
///
/// Filesystem errors (including not found) or malformed JSON.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    debug!(path = %path.display(), "Loading JSON file");

    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;

    debug!(path = %path.display(), "JSON file loaded");
    Ok(data)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// ============================================================================
// Tests
// ============================================================================
