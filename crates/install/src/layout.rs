//! Source and destination directory layout for an install run.

use crate::Result;
use std::path::{Path, PathBuf};

/// Core subtree name, both in the source checkout and under the Vibe home.
pub const CORE_DIR: &str = "get-shit-done";

/// Core subdirectories mirrored verbatim.
pub const MIRRORED_CORE_DIRS: [&str; 3] = ["bin", "templates", "references"];

/// Resolved paths for one install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    source_root: PathBuf,
    vibe_home: PathBuf,
}

impl InstallLayout {
    pub fn new(source_root: impl Into<PathBuf>, vibe_home: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            vibe_home: vibe_home.into(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn vibe_home(&self) -> &Path {
        &self.vibe_home
    }

    // --- Source side ---

    pub fn commands_source(&self) -> PathBuf {
        self.source_root.join("commands").join("gsd")
    }

    pub fn agents_source(&self) -> PathBuf {
        self.source_root.join("agents")
    }

    pub fn core_source(&self, sub: &str) -> PathBuf {
        self.source_root.join(CORE_DIR).join(sub)
    }

    pub fn workflows_source(&self) -> PathBuf {
        self.core_source("workflows")
    }

    // --- Destination side ---

    pub fn skills_dir(&self) -> PathBuf {
        self.vibe_home.join("skills")
    }

    pub fn agents_dir(&self) -> PathBuf {
        self.vibe_home.join("agents")
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.vibe_home.join("prompts")
    }

    pub fn core_dest(&self) -> PathBuf {
        self.vibe_home.join(CORE_DIR)
    }

    pub fn core_dest_sub(&self, sub: &str) -> PathBuf {
        self.core_dest().join(sub)
    }

    pub fn workflows_dest(&self) -> PathBuf {
        self.core_dest_sub("workflows")
    }

    /// Every fixed destination directory, parents before children.
    pub fn directories(&self) -> Vec<PathBuf> {
        vec![
            self.skills_dir(),
            self.agents_dir(),
            self.prompts_dir(),
            self.core_dest(),
            self.core_dest_sub("bin"),
            self.workflows_dest(),
            self.core_dest_sub("templates"),
            self.core_dest_sub("references"),
        ]
    }
}

/// Returns the user's home directory.
///
/// An empty value is treated as unset so the install target never becomes
/// a relative `.vibe`.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .filter(|home| !home.as_os_str().is_empty())
        .ok_or_else(|| anyhow::anyhow!("home directory not found"))
}

/// Resolves the Vibe home: an explicit path, then `VIBE_HOME`, then `~/.vibe`.
pub fn resolve_vibe_home(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(custom) = std::env::var_os("VIBE_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(custom));
    }
    Ok(home_dir()?.join(".vibe"))
}
