//! Project planning config (`.planning/config.json`).

use serde_json::Value;
use std::fs;
use std::path::Path;

/// Config location relative to the repository root.
pub const CONFIG_PATH: &str = ".planning/config.json";

/// Parsed planning config. Only the auto-sync flag is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningConfig(Value);

impl PlanningConfig {
    /// Reads and parses the config; a missing or malformed file yields `None`.
    pub fn load(path: &Path) -> Option<Self> {
        let text = fs::read_to_string(path).ok()?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok().map(Self)
    }

    /// True when `pr_branch.auto_sync` or `pr_branch_auto_sync` is JSON `true`.
    ///
    /// Either shape enables sync; neither takes precedence.
    pub fn auto_sync(&self) -> bool {
        let nested = self.0.pointer("/pr_branch/auto_sync") == Some(&Value::Bool(true));
        let flat = self.0.get("pr_branch_auto_sync") == Some(&Value::Bool(true));
        nested || flat
    }
}
