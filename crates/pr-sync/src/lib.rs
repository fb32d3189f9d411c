//! Background PR-branch sync for GSD projects.
//!
//! Installed as a git `post-commit` hook. After each commit on a feature
//! branch it starts `gsd-tools.js pr-branch` in the background when the
//! project's `.planning/config.json` enables auto-sync. The hook never
//! fails the commit: every unmet precondition ends the run quietly.

#![deny(unsafe_code)]

pub mod config;
pub mod git;
pub mod hook;
pub mod launch;

pub use config::{PlanningConfig, CONFIG_PATH};
pub use git::{GitCli, Repository};
pub use hook::{is_reentrant, HookSettings, Outcome, PrSyncHook, Skip, REENTRANCY_ENV};
pub use launch::{DetachedLauncher, LaunchSpec, Launcher};

/// Runs the hook against the real git CLI and process table.
///
/// The re-entrancy marker is read from the environment and the companion
/// tool is resolved relative to the running executable.
pub fn run_from_env() -> Outcome {
    let marker = std::env::var_os(REENTRANCY_ENV);
    let settings = HookSettings::from_current_exe();
    PrSyncHook::new(GitCli::default(), DetachedLauncher, settings).run(marker.as_deref())
}
