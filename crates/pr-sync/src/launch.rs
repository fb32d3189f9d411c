//! Spawn-and-abandon process launch.
//!
//! Unlike a scoped child process, a detached launch is never waited on and
//! its exit status is never observed. The child keeps running after the
//! hook exits.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// Everything needed to start the companion tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
    /// Added on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

/// Starts processes without waiting for them.
#[cfg_attr(test, automock)]
pub trait Launcher {
    /// Starts `spec` and returns as soon as the process exists.
    fn spawn_detached(&self, spec: &LaunchSpec) -> io::Result<()>;
}

/// [`Launcher`] that starts a real process with stdio discarded.
///
/// On Unix the child gets its own process group so terminal signals aimed at
/// the committing shell do not reach it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedLauncher;

impl Launcher for DetachedLauncher {
    fn spawn_detached(&self, spec: &LaunchSpec) -> io::Result<()> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.cwd)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd.spawn()?;
        debug!(pid = child.id(), program = ?spec.program, "Dispatched background process");
        // Dropping the handle neither kills nor waits for the child.
        drop(child);
        Ok(())
    }
}
