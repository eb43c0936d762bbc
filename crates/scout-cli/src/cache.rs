//! On-disk cache of the raw schedule payload.
//!
//! The payload is stored exactly as the API returned it so a cached run and
//! a live run parse the same bytes.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Loads the cached payload.
///
/// Returns `None` if the file doesn't exist.
/// Returns an error if the file exists but is unreadable/unparseable.
pub fn load(path: &Path) -> Result<Option<Value>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let payload: Value = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse cache {}", path.display()))?;
            Ok(Some(payload))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read cache {}", path.display())),
    }
}

/// Writes the payload, creating parent directories as needed.
pub fn save(path: &Path, payload: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create cache directory")?;
    }
    let json = serde_json::to_string_pretty(payload).context("failed to serialize schedule")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write cache {}", path.display()))?;
    tracing::debug!(path = %path.display(), "cached schedule");
    Ok(())
}
