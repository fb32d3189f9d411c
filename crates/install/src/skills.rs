//! Command definitions → Vibe skills.

use crate::report::WriteReport;
use crate::rewrite::RewritePipeline;
use crate::utils::{file_stem, markdown_files, read_document, write_document};
use crate::Result;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::info;

/// Prefix for generated skill identifiers.
pub const SKILL_PREFIX: &str = "gsd-";

/// File name of the skill document inside each skill directory.
pub const SKILL_FILE: &str = "SKILL.md";

/// Skill identifier for a command file stem.
pub fn skill_id(stem: &str) -> String {
    format!("{SKILL_PREFIX}{stem}")
}

/// Converts every command in `commands_dir` into `<skills_root>/gsd-<stem>/SKILL.md`.
pub fn convert_commands(
    commands_dir: &Path,
    skills_root: &Path,
    pipeline: &RewritePipeline,
) -> Result<WriteReport> {
    let mut report = WriteReport::default();

    for path in markdown_files(commands_dir)? {
        let skill = skill_id(&file_stem(&path)?);
        let skill_dir = skills_root.join(&skill);
        fs::create_dir_all(&skill_dir).with_context(|| {
            format!("Failed to create skill directory: {}", skill_dir.display())
        })?;

        let content = read_document(&path)?;
        write_document(&skill_dir.join(SKILL_FILE), &pipeline.skill(&content))?;

        info!(skill = %skill, "Created skill");
        report.record(skill);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::HomeTokens;
    use crate::tools::ToolMap;
    use tempfile::tempdir;

    fn pipeline() -> RewritePipeline {
        RewritePipeline::new(HomeTokens::default(), ToolMap::default()).unwrap()
    }

    #[test]
    fn writes_one_skill_per_command() -> Result<()> {
        let tmp = tempdir()?;
        let commands = tmp.path().join("commands");
        let skills = tmp.path().join("skills");
        fs::create_dir_all(&commands)?;
        fs::create_dir_all(&skills)?;
        fs::write(
            commands.join("foo.md"),
            "---\nname: gsd:foo\nallowed-tools:\n  - Bash\n  - Read\n---\nDo foo.\n",
        )?;
        fs::write(commands.join("bar.md"), "---\nname: gsd:bar\n---\n")?;
        fs::write(commands.join("README.txt"), "ignored")?;

        let report = convert_commands(&commands, &skills, &pipeline())?;
        assert_eq!(report.written, 2);
        assert_eq!(report.items, vec!["gsd-bar", "gsd-foo"]);

        let foo = fs::read_to_string(skills.join("gsd-foo/SKILL.md"))?;
        assert!(foo.contains("name: gsd-foo\nuser-invocable: true\n"));
        assert!(foo.contains("  - bash\n  - read_file\n"));
        assert!(skills.join("gsd-bar/SKILL.md").exists());
        Ok(())
    }

    #[test]
    fn rerun_overwrites_and_keeps_stale_skills() -> Result<()> {
        let tmp = tempdir()?;
        let commands = tmp.path().join("commands");
        let skills = tmp.path().join("skills");
        fs::create_dir_all(&commands)?;
        fs::create_dir_all(skills.join("gsd-retired"))?;
        fs::write(commands.join("foo.md"), "v1")?;
        convert_commands(&commands, &skills, &pipeline())?;
        fs::write(commands.join("foo.md"), "v2")?;
        convert_commands(&commands, &skills, &pipeline())?;

        assert_eq!(fs::read_to_string(skills.join("gsd-foo/SKILL.md"))?, "v2");
        assert!(skills.join("gsd-retired").exists());
        Ok(())
    }

    #[test]
    fn missing_commands_dir_writes_nothing() -> Result<()> {
        let tmp = tempdir()?;
        let report = convert_commands(&tmp.path().join("absent"), tmp.path(), &pipeline())?;
        assert_eq!(report, WriteReport::default());
        Ok(())
    }
}
