//! Recursive directory mirroring for the core support files.

use crate::Result;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Counts produced by [`mirror_tree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub files: usize,
}

/// Copies every file under `src` into `dest`, creating directories as needed.
///
/// Existing destination files are overwritten; destination entries missing
/// from `src` are left in place. A missing `src` is a no-op.
pub fn mirror_tree(src: &Path, dest: &Path) -> Result<MirrorReport> {
    let mut report = MirrorReport::default();
    if !src.exists() {
        debug!(path = %src.display(), "Mirror source missing, skipping");
        return Ok(report);
    }

    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create directory: {}", dest.display()))?;

    for entry in WalkDir::new(src)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to walk {}", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).with_context(|| {
                format!("Failed to create directory: {}", target.display())
            })?;
        } else if entry.path().is_file() {
            // Symlinked files are copied by content.
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            report.files += 1;
        } else {
            debug!(path = %entry.path().display(), "Skipping non-file entry");
        }
    }

    Ok(report)
}

/// Sets mode 755 on every file under `dir`, best-effort.
///
/// Failures are logged and returned as warnings; they never abort the install.
#[cfg(unix)]
pub fn mark_executable(dir: &Path) -> Vec<String> {
    use std::os::unix::fs::PermissionsExt;

    chmod_each(dir, |path| {
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
    })
}

#[cfg(unix)]
fn chmod_each(dir: &Path, chmod: impl Fn(&Path) -> std::io::Result<()>) -> Vec<String> {
    let mut warnings = Vec::new();
    if !dir.exists() {
        return warnings;
    }

    for entry in WalkDir::new(dir).min_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Could not read bin entry");
                warnings.push(format!("Could not read bin entry: {e}"));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if let Err(e) = chmod(path) {
            warn!(path = %path.display(), error = %e, "Could not chmod bin file");
            warnings.push(format!("Could not chmod {}: {e}", path.display()));
        }
    }
    warnings
}

/// Permission bits do not exist on this platform; nothing to do.
#[cfg(not(unix))]
pub fn mark_executable(dir: &Path) -> Vec<String> {
    debug!(path = %dir.display(), "Skipping chmod on platform without permission bits");
    Vec::new()
}
