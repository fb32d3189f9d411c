//! Workflow documents patched for Vibe.

use crate::report::WriteReport;
use crate::rewrite::RewritePipeline;
use crate::utils::{markdown_files, read_document, write_document};
use crate::Result;
use anyhow::Context;
use std::path::Path;
use tracing::info;

/// Patches every workflow in `src_dir` and writes it to `dest_dir` under the same name.
pub fn patch_workflows(
    src_dir: &Path,
    dest_dir: &Path,
    pipeline: &RewritePipeline,
) -> Result<WriteReport> {
    let mut report = WriteReport::default();

    for path in markdown_files(src_dir)? {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid workflow file name: {}", path.display()))?
            .to_string();

        let content = read_document(&path)?;
        write_document(&dest_dir.join(&file_name), &pipeline.workflow(&content))?;

        info!(workflow = %file_name, "Patched workflow");
        report.record(file_name);
    }

    Ok(report)
}
