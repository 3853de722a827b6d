//! Subcommand implementations

use anyhow::{bail, Context, Result};
use joymap_core::storage_utils::device_file_name;
use joymap_core::{ButtonMap, Device};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn load(path: &Path) -> Result<ButtonMap> {
    ButtonMap::from_file(path).with_context(|| format!("reading {}", path.display()))
}

/// One line per device plus one per calibrated axis
pub fn summarize(map: &ButtonMap) -> Vec<String> {
    let mut lines = Vec::new();
    for device in map.devices() {
        lines.push(device.to_string());
        for axis in device.configuration.axes() {
            lines.push(format!(
                "    axis {}: center {}, range {}",
                axis.index, axis.center, axis.range
            ));
        }
    }
    lines
}

/// Fail if any device entry had to be dropped while loading
pub fn check(map: &ButtonMap) -> Result<String> {
    let report = format!("{} devices read, {} skipped", map.len(), map.skipped());
    if map.skipped() > 0 {
        bail!(report);
    }
    Ok(report)
}

pub fn dump_json(map: &ButtonMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(map.devices())?)
}

/// Re-write `file` (or `output`) in canonical form
///
/// Rewriting the input in place would drop entries that failed to load, so
/// that needs `force` when anything was skipped.
pub fn normalize(
    file: &Path,
    output: Option<&Path>,
    force: bool,
    indent: usize,
) -> Result<(PathBuf, ButtonMap)> {
    let map = load(file)?;
    if output.is_none() && map.skipped() > 0 && !force {
        bail!(
            "{} unreadable devices in {} would be dropped; use --output or --force",
            map.skipped(),
            file.display()
        );
    }

    let target = output.unwrap_or(file).to_path_buf();
    map.to_file(&target, indent)
        .with_context(|| format!("writing {}", target.display()))?;
    Ok((target, map))
}

/// Write each device to its own button map under `dir`
///
/// Devices whose names sanitize to the same file get `_2`, `_3`, ...
pub fn export(map: &ButtonMap, dir: &Path, indent: usize) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let mut used = HashSet::new();
    for device in map.devices() {
        let path = unique_path(dir, &device_file_name(device), &mut used);
        single(device)
            .to_file(&path, indent)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(device = %device.name, path = %path.display(), "Exported device");
        written.push(path);
    }
    Ok(written)
}

fn unique_path(dir: &Path, file_name: &str, used: &mut HashSet<PathBuf>) -> PathBuf {
    let path = dir.join(file_name);
    if used.insert(path.clone()) {
        return path;
    }

    let (stem, ext) = file_name.rsplit_once('.').unwrap_or((file_name, "xml"));
    (2..)
        .map(|n| dir.join(format!("{}_{}.{}", stem, n, ext)))
        .find(|candidate| used.insert(candidate.clone()))
        .unwrap_or(path)
}

fn single(device: &Device) -> ButtonMap {
    let mut map = ButtonMap::new();
    map.add_device(device.clone());
    map
}
