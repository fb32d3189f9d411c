//! Install orchestration: directories, core mirror, then the three converters.

use crate::agents::{convert_agents, DEFAULT_AGENT_MODEL};
use crate::layout::{InstallLayout, MIRRORED_CORE_DIRS};
use crate::mirror::{mark_executable, mirror_tree};
use crate::report::{InstallReport, WriteReport};
use crate::rewrite::{HomeTokens, RewritePipeline};
use crate::skills::convert_commands;
use crate::tools::ToolMap;
use crate::workflows::patch_workflows;
use crate::Result;
use anyhow::Context;
use std::fs;
use tracing::info;

/// Host runtime targeted by this installer.
pub const RUNTIME: &str = "vibe";

/// Runs the install steps in a fixed order.
///
/// There is no rollback: an error leaves whatever was already written in
/// place and is returned to the caller.
#[derive(Debug, Clone)]
pub struct Installer {
    layout: InstallLayout,
    pipeline: RewritePipeline,
    agent_model: String,
}

impl Installer {
    /// Installer with the default home tokens, tool map and agent model.
    pub fn new(layout: InstallLayout) -> Result<Self> {
        let pipeline = RewritePipeline::new(HomeTokens::default(), ToolMap::default())?;
        Ok(Self::with_pipeline(layout, pipeline))
    }

    pub fn with_pipeline(layout: InstallLayout, pipeline: RewritePipeline) -> Self {
        Self {
            layout,
            pipeline,
            agent_model: DEFAULT_AGENT_MODEL.to_string(),
        }
    }

    pub fn with_agent_model(mut self, model: impl Into<String>) -> Self {
        self.agent_model = model.into();
        self
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    pub fn install(&self) -> Result<InstallReport> {
        info!(
            source = %self.layout.source_root().display(),
            target = %self.layout.vibe_home().display(),
            "Starting GSD Vibe installation..."
        );

        let directories_created = self.ensure_directories()?;
        let core_files = self.copy_core_files()?;

        info!("Converting commands to skills...");
        let skills = convert_commands(
            &self.layout.commands_source(),
            &self.layout.skills_dir(),
            &self.pipeline,
        )?;

        info!("Converting agents...");
        let agents = convert_agents(
            &self.layout.agents_source(),
            &self.layout.prompts_dir(),
            &self.layout.agents_dir(),
            &self.agent_model,
        )?;

        info!("Patching workflows...");
        let workflows = patch_workflows(
            &self.layout.workflows_source(),
            &self.layout.workflows_dest(),
            &self.pipeline,
        )?;

        info!("Installation complete");
        Ok(InstallReport {
            runtime: RUNTIME.to_string(),
            success: true,
            directories_created,
            core_files,
            skills,
            agents,
            workflows,
        })
    }

    /// Creates the fixed destination directories, returning the ones that were new.
    fn ensure_directories(&self) -> Result<Vec<String>> {
        info!("Setting up directories...");
        let mut created = Vec::new();
        for dir in self.layout.directories() {
            if dir.exists() {
                continue;
            }
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            info!(path = %dir.display(), "Created directory");
            created.push(dir.display().to_string());
        }
        Ok(created)
    }

    fn copy_core_files(&self) -> Result<WriteReport> {
        info!("Copying core GSD files...");
        let mut report = WriteReport::default();
        for sub in MIRRORED_CORE_DIRS {
            let mirrored = mirror_tree(
                &self.layout.core_source(sub),
                &self.layout.core_dest_sub(sub),
            )?;
            report.written += mirrored.files;
            if mirrored.files > 0 {
                report.items.push(sub.to_string());
            }
        }
        report
            .warnings
            .extend(mark_executable(&self.layout.core_dest_sub("bin")));
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsd_test_utils::SourceTreeFixture;

    fn installer_for(fixture: &SourceTreeFixture) -> Result<Installer> {
        Installer::new(InstallLayout::new(
            fixture.source_root(),
            fixture.vibe_home(),
        ))
    }

    #[test]
    fn install_creates_fixed_tree_even_from_empty_source() -> Result<()> {
        let fixture = SourceTreeFixture::new()?;
        let installer = installer_for(&fixture)?;
        let report = installer.install()?;

        assert_eq!(report.runtime, "vibe");
        assert!(report.success);
        assert_eq!(report.directories_created.len(), 8);
        for dir in installer.layout().directories() {
            assert!(dir.is_dir(), "missing {}", dir.display());
        }
        Ok(())
    }

    #[test]
    fn second_run_creates_no_directories() -> Result<()> {
        let fixture = SourceTreeFixture::new()?;
        let installer = installer_for(&fixture)?;
        installer.install()?;
        let again = installer.install()?;
        assert!(again.directories_created.is_empty());
        Ok(())
    }

    #[test]
    fn agent_model_is_configurable() -> Result<()> {
        let fixture = SourceTreeFixture::new()?;
        fixture.write_agent("gsd-debugger", "---\nname: gsd-debugger\n---\nDebug.\n")?;
        let installer = installer_for(&fixture)?.with_agent_model("devstral-latest");
        installer.install()?;

        let config = fs::read_to_string(fixture.vibe_home().join("agents/gsd-debugger.toml"))?;
        assert!(config.contains("active_model = \"devstral-latest\""));
        Ok(())
    }
}
