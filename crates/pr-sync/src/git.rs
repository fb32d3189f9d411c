//! Minimal git queries needed by the hook.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// Read-only view of the repository the hook runs in.
#[cfg_attr(test, automock)]
pub trait Repository {
    /// Absolute path of the working tree root, if inside a repository.
    fn toplevel(&self) -> Option<PathBuf>;

    /// Short name of the checked-out branch; `None` when HEAD is detached.
    fn current_branch(&self, root: &Path) -> Option<String>;
}

/// [`Repository`] backed by the `git` executable.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    /// Directory to run git in; the process cwd when unset.
    pub cwd: Option<PathBuf>,
}

impl GitCli {
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }

    /// Runs git and returns trimmed stdout when it succeeds with output.
    fn capture(&self, cwd: Option<&Path>, args: &[&str]) -> Option<String> {
        let mut cmd = Command::new("git");
        cmd.args(args).stdin(Stdio::null()).stderr(Stdio::null());
        if let Some(dir) = cwd.or(self.cwd.as_deref()) {
            cmd.current_dir(dir);
        }

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                debug!(error = %e, ?args, "Failed to run git");
                return None;
            }
        };
        if !output.status.success() {
            debug!(status = ?output.status, ?args, "git exited unsuccessfully");
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!stdout.is_empty()).then_some(stdout)
    }
}

impl Repository for GitCli {
    fn toplevel(&self) -> Option<PathBuf> {
        self.capture(None, &["rev-parse", "--show-toplevel"])
            .map(PathBuf::from)
    }

    fn current_branch(&self, root: &Path) -> Option<String> {
        self.capture(Some(root), &["symbolic-ref", "--short", "HEAD"])
    }
}
