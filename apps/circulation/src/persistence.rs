//! Snapshot file handling.

use std::{fs, path::Path};

use anyhow::Context;
use catalog::{Catalog, CatalogSnapshot};

/// Loads a catalog from a snapshot file. Returns `None` if the file does
/// not exist.
pub fn load_snapshot(path: &Path) -> anyhow::Result<Option<Catalog>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot = CatalogSnapshot::from_json(&json)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
    let catalog = Catalog::restore(snapshot)
        .with_context(|| format!("Failed to restore snapshot {}", path.display()))?;
    Ok(Some(catalog))
}

/// Writes a snapshot file, replacing any previous one.
pub fn save_snapshot(path: &Path, snapshot: &CatalogSnapshot) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = snapshot.to_json()?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}
