//! Install reporting types.

use serde::{Deserialize, Serialize};

/// Report for one conversion or copy step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteReport {
    /// Number of files written
    pub written: usize,
    /// Names of the artifacts produced, in processing order
    pub items: Vec<String>,
    /// Non-fatal warnings
    pub warnings: Vec<String>,
}

impl WriteReport {
    pub(crate) fn record(&mut self, item: impl Into<String>) {
        self.written += 1;
        self.items.push(item.into());
    }
}

/// Outcome of a complete install run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallReport {
    /// Host runtime the files were installed for
    pub runtime: String,
    pub success: bool,
    /// Fixed directories that did not exist before this run
    pub directories_created: Vec<String>,
    pub core_files: WriteReport,
    pub skills: WriteReport,
    pub agents: WriteReport,
    pub workflows: WriteReport,
}

impl InstallReport {
    /// Returns every warning collected across steps.
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        [
            &self.core_files,
            &self.skills,
            &self.agents,
            &self.workflows,
        ]
        .into_iter()
        .flat_map(|r| r.warnings.iter().map(String::as_str))
    }

    /// Generates a formatted summary for display.
    pub fn format_summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Installed for {}\n", self.runtime));
        out.push_str(&format!(
            "  Directories: {} created\n",
            self.directories_created.len()
        ));
        out.push_str(&format!("  Core files:  {} copied\n", self.core_files.written));
        out.push_str(&format!("  Skills:      {} written\n", self.skills.written));
        out.push_str(&format!("  Agents:      {} written\n", self.agents.written));
        out.push_str(&format!("  Workflows:   {} patched\n", self.workflows.written));
        out
    }
}
