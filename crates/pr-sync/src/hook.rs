//! Post-commit decision logic.
//!
//! Each precondition is a step returning `Result<_, Skip>`; the first unmet
//! one ends the run. Only a fully satisfied chain reaches the launcher.

use crate::config::{PlanningConfig, CONFIG_PATH};
use crate::git::Repository;
use crate::launch::{LaunchSpec, Launcher};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Set in the companion's environment so commits it makes do not re-trigger the hook.
pub const REENTRANCY_ENV: &str = "GSD_PR_SYNC_RUNNING";

/// Branches that are never synced.
pub const PROTECTED_BRANCHES: [&str; 2] = ["main", "master"];

/// Argument passed to the companion tool.
pub const COMPANION_COMMAND: &str = "pr-branch";

/// Why the hook stopped without dispatching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Skip {
    #[error("already running inside a PR sync (GSD_PR_SYNC_RUNNING=1)")]
    Reentrant,
    #[error("not inside a git repository")]
    NoRepository,
    #[error("HEAD is detached")]
    DetachedHead,
    #[error("branch '{0}' is protected")]
    ProtectedBranch(String),
    #[error("no readable config at {}", .0.display())]
    ConfigUnavailable(PathBuf),
    #[error("auto-sync is disabled")]
    AutoSyncDisabled,
    #[error("companion tool not found at {}", .0.display())]
    CompanionMissing(PathBuf),
}

/// Result of one hook run. Every variant maps to exit status 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(Skip),
    Dispatched(LaunchSpec),
    /// All preconditions held but the process could not be started.
    LaunchFailed(String),
}

/// True when the re-entrancy marker is set to `1`.
pub fn is_reentrant(marker: Option<&OsStr>) -> bool {
    marker == Some(OsStr::new("1"))
}

/// Static inputs of the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookSettings {
    /// Companion script to start.
    pub companion: PathBuf,
    /// Interpreter for the companion script; the script runs directly when unset.
    pub interpreter: Option<OsString>,
    pub protected_branches: Vec<String>,
    /// Config path relative to the repository root.
    pub config_path: PathBuf,
}

impl HookSettings {
    /// Settings for a hook installed in `hook_dir`; the companion lives at
    /// `<hook_dir>/../get-shit-done/bin/gsd-tools.js`.
    pub fn for_hook_dir(hook_dir: &Path) -> Self {
        Self {
            companion: hook_dir
                .join("..")
                .join("get-shit-done")
                .join("bin")
                .join("gsd-tools.js"),
            interpreter: Some("node".into()),
            protected_branches: PROTECTED_BRANCHES.iter().map(|b| b.to_string()).collect(),
            config_path: PathBuf::from(CONFIG_PATH),
        }
    }

    /// Settings relative to the running executable.
    ///
    /// If the executable cannot be located the companion path is left empty,
    /// which the companion check treats as missing.
    pub fn from_current_exe() -> Self {
        match std::env::current_exe() {
            Ok(exe) => Self::for_hook_dir(exe.parent().unwrap_or(Path::new("."))),
            Err(e) => {
                debug!(error = %e, "Could not locate hook executable");
                Self {
                    companion: PathBuf::new(),
                    ..Self::for_hook_dir(Path::new("."))
                }
            }
        }
    }
}

/// The post-commit hook with injectable git access and process launch.
pub struct PrSyncHook<R, L> {
    repo: R,
    launcher: L,
    settings: HookSettings,
}

impl<R: Repository, L: Launcher> PrSyncHook<R, L> {
    pub fn new(repo: R, launcher: L, settings: HookSettings) -> Self {
        Self {
            repo,
            launcher,
            settings,
        }
    }

    /// Runs every step and dispatches the companion when all pass.
    pub fn run(&self, marker: Option<&OsStr>) -> Outcome {
        let spec = match self.plan(marker) {
            Ok(spec) => spec,
            Err(skip) => {
                debug!(reason = %skip, "Skipping PR branch sync");
                return Outcome::Skipped(skip);
            }
        };

        match self.launcher.spawn_detached(&spec) {
            Ok(()) => Outcome::Dispatched(spec),
            Err(e) => {
                debug!(error = %e, "Failed to start PR branch sync");
                Outcome::LaunchFailed(e.to_string())
            }
        }
    }

    /// Evaluates the preconditions in order, returning the launch to perform.
    pub fn plan(&self, marker: Option<&OsStr>) -> Result<LaunchSpec, Skip> {
        if is_reentrant(marker) {
            return Err(Skip::Reentrant);
        }

        let root = self.repo.toplevel().ok_or(Skip::NoRepository)?;
        self.check_branch(&root)?;
        self.check_config(&root)?;
        let companion = self.companion()?;

        let (program, mut args) = match &self.settings.interpreter {
            Some(interpreter) => (interpreter.clone(), vec![companion.into_os_string()]),
            None => (companion.into_os_string(), Vec::new()),
        };
        args.push(COMPANION_COMMAND.into());

        Ok(LaunchSpec {
            program,
            args,
            cwd: root,
            env: vec![(REENTRANCY_ENV.to_string(), "1".to_string())],
        })
    }

    fn check_branch(&self, root: &Path) -> Result<(), Skip> {
        let branch = self.repo.current_branch(root).ok_or(Skip::DetachedHead)?;
        if self.settings.protected_branches.contains(&branch) {
            return Err(Skip::ProtectedBranch(branch));
        }
        Ok(())
    }

    fn check_config(&self, root: &Path) -> Result<(), Skip> {
        let path = root.join(&self.settings.config_path);
        let config = PlanningConfig::load(&path).ok_or(Skip::ConfigUnavailable(path))?;
        if !config.auto_sync() {
            return Err(Skip::AutoSyncDisabled);
        }
        Ok(())
    }

    fn companion(&self) -> Result<PathBuf, Skip> {
        let companion = &self.settings.companion;
        if companion.as_os_str().is_empty() || !companion.exists() {
            return Err(Skip::CompanionMissing(companion.clone()));
        }
        Ok(companion.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use crate::launch::MockLauncher;
    use std::fs;
    use tempfile::TempDir;

    /// Repository root with a config plus an installed hook directory.
    struct HookSandbox {
        tmp: TempDir,
    }

    impl HookSandbox {
        fn new() -> Self {
            Self {
                tmp: tempfile::tempdir().unwrap(),
            }
        }

        fn repo_root(&self) -> PathBuf {
            self.tmp.path().join("repo")
        }

        fn hook_dir(&self) -> PathBuf {
            self.tmp.path().join("vibe/hooks")
        }

        fn write_config(&self, json: &str) {
            let path = self.repo_root().join(CONFIG_PATH);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, json).unwrap();
        }

        fn install_companion(&self) -> PathBuf {
            let settings = HookSettings::for_hook_dir(&self.hook_dir());
            fs::create_dir_all(self.hook_dir()).unwrap();
            fs::create_dir_all(settings.companion.parent().unwrap()).unwrap();
            fs::write(&settings.companion, "// gsd-tools").unwrap();
            settings.companion
        }

        fn settings(&self) -> HookSettings {
            HookSettings::for_hook_dir(&self.hook_dir())
        }

        fn repo_on_branch(&self, branch: Option<&'static str>) -> MockRepository {
            let root = self.repo_root();
            let mut repo = MockRepository::new();
            repo.expect_toplevel()
                .times(1)
                .returning(move || Some(root.clone()));
            repo.expect_current_branch()
                .times(1)
                .returning(move |_| branch.map(str::to_string));
            repo
        }
    }

    #[test]
    fn reentrant_marker_short_circuits_before_git() {
        let sandbox = HookSandbox::new();
        // No expectations: any call on the mocks would panic.
        let hook = PrSyncHook::new(MockRepository::new(), MockLauncher::new(), sandbox.settings());

        assert_eq!(
            hook.run(Some(OsStr::new("1"))),
            Outcome::Skipped(Skip::Reentrant)
        );
    }

    #[test]
    fn marker_with_other_value_does_not_short_circuit() {
        let sandbox = HookSandbox::new();
        let mut repo = MockRepository::new();
        repo.expect_toplevel().times(1).returning(|| None);
        let hook = PrSyncHook::new(repo, MockLauncher::new(), sandbox.settings());

        assert_eq!(
            hook.run(Some(OsStr::new("0"))),
            Outcome::Skipped(Skip::NoRepository)
        );
    }

    #[test]
    fn outside_repository_skips() {
        let sandbox = HookSandbox::new();
        let mut repo = MockRepository::new();
        repo.expect_toplevel().times(1).returning(|| None);
        let hook = PrSyncHook::new(repo, MockLauncher::new(), sandbox.settings());

        assert_eq!(hook.run(None), Outcome::Skipped(Skip::NoRepository));
    }

    #[test]
    fn detached_head_skips() {
        let sandbox = HookSandbox::new();
        let hook = PrSyncHook::new(
            sandbox.repo_on_branch(None),
            MockLauncher::new(),
            sandbox.settings(),
        );
        assert_eq!(hook.run(None), Outcome::Skipped(Skip::DetachedHead));
    }

    #[test]
    fn protected_branches_skip() {
        for branch in ["main", "master"] {
            let sandbox = HookSandbox::new();
            sandbox.write_config(r#"{"pr_branch": {"auto_sync": true}}"#);
            sandbox.install_companion();
            let hook = PrSyncHook::new(
                sandbox.repo_on_branch(Some(branch)),
                MockLauncher::new(),
                sandbox.settings(),
            );
            assert_eq!(
                hook.run(None),
                Outcome::Skipped(Skip::ProtectedBranch(branch.to_string()))
            );
        }
    }

    #[test]
    fn missing_config_skips() {
        let sandbox = HookSandbox::new();
        sandbox.install_companion();
        let hook = PrSyncHook::new(
            sandbox.repo_on_branch(Some("feature/login")),
            MockLauncher::new(),
            sandbox.settings(),
        );
        assert_eq!(
            hook.run(None),
            Outcome::Skipped(Skip::ConfigUnavailable(
                sandbox.repo_root().join(CONFIG_PATH)
            ))
        );
    }

    #[test]
    fn malformed_config_skips() {
        let sandbox = HookSandbox::new();
        sandbox.write_config("{ pr_branch: ");
        let hook = PrSyncHook::new(
            sandbox.repo_on_branch(Some("feature/login")),
            MockLauncher::new(),
            sandbox.settings(),
        );
        assert!(matches!(
            hook.run(None),
            Outcome::Skipped(Skip::ConfigUnavailable(_))
        ));
    }

    #[test]
    fn disabled_auto_sync_skips() {
        let sandbox = HookSandbox::new();
        sandbox.write_config(r#"{"pr_branch": {"auto_sync": false}}"#);
        sandbox.install_companion();
        let hook = PrSyncHook::new(
            sandbox.repo_on_branch(Some("feature/login")),
            MockLauncher::new(),
            sandbox.settings(),
        );
        assert_eq!(hook.run(None), Outcome::Skipped(Skip::AutoSyncDisabled));
    }

    #[test]
    fn missing_companion_skips() {
        let sandbox = HookSandbox::new();
        sandbox.write_config(r#"{"pr_branch_auto_sync": true}"#);
        let hook = PrSyncHook::new(
            sandbox.repo_on_branch(Some("feature/login")),
            MockLauncher::new(),
            sandbox.settings(),
        );
        assert_eq!(
            hook.run(None),
            Outcome::Skipped(Skip::CompanionMissing(sandbox.settings().companion))
        );
    }

    #[test]
    fn empty_companion_path_skips() {
        let sandbox = HookSandbox::new();
        sandbox.write_config(r#"{"pr_branch_auto_sync": true}"#);
        let settings = HookSettings {
            companion: PathBuf::new(),
            ..sandbox.settings()
        };
        let hook = PrSyncHook::new(
            sandbox.repo_on_branch(Some("feature/login")),
            MockLauncher::new(),
            settings,
        );
        assert_eq!(
            hook.run(None),
            Outcome::Skipped(Skip::CompanionMissing(PathBuf::new()))
        );
    }

    #[test]
    fn enabled_feature_branch_dispatches_exactly_once() {
        let sandbox = HookSandbox::new();
        sandbox.write_config(r#"{"pr_branch": {"auto_sync": true}}"#);
        let companion = sandbox.install_companion();
        let root = sandbox.repo_root();

        let expected = LaunchSpec {
            program: "node".into(),
            args: vec![companion.clone().into_os_string(), "pr-branch".into()],
            cwd: root.clone(),
            env: vec![("GSD_PR_SYNC_RUNNING".to_string(), "1".to_string())],
        };

        let mut launcher = MockLauncher::new();
        let want = expected.clone();
        launcher
            .expect_spawn_detached()
            .withf(move |spec| *spec == want)
            .times(1)
            .returning(|_| Ok(()));

        let hook = PrSyncHook::new(
            sandbox.repo_on_branch(Some("feature/login")),
            launcher,
            sandbox.settings(),
        );
        assert_eq!(hook.run(None), Outcome::Dispatched(expected));
    }

    #[test]
    fn direct_companion_without_interpreter() {
        let sandbox = HookSandbox::new();
        sandbox.write_config(r#"{"pr_branch_auto_sync": true}"#);
        let companion = sandbox.install_companion();
        let settings = HookSettings {
            interpreter: None,
            ..sandbox.settings()
        };
        let hook = PrSyncHook::new(
            sandbox.repo_on_branch(Some("gsd/phase-2")),
            MockLauncher::new(),
            settings,
        );

        let spec = hook.plan(None).unwrap();
        assert_eq!(spec.program, companion.into_os_string());
        assert_eq!(spec.args, vec![OsString::from("pr-branch")]);
    }

    #[test]
    fn launch_failure_is_reported_not_raised() {
        let sandbox = HookSandbox::new();
        sandbox.write_config(r#"{"pr_branch_auto_sync": true}"#);
        sandbox.install_companion();

        let mut launcher = MockLauncher::new();
        launcher
            .expect_spawn_detached()
            .times(1)
            .returning(|_| Err(std::io::Error::from(std::io::ErrorKind::NotFound)));

        let hook = PrSyncHook::new(
            sandbox.repo_on_branch(Some("feature/login")),
            launcher,
            sandbox.settings(),
        );
        assert!(matches!(hook.run(None), Outcome::LaunchFailed(_)));
    }

    #[test]
    fn companion_is_resolved_next_to_hook_dir() {
        let settings = HookSettings::for_hook_dir(Path::new("/home/u/.vibe/hooks"));
        assert_eq!(
            settings.companion,
            PathBuf::from("/home/u/.vibe/hooks/../get-shit-done/bin/gsd-tools.js")
        );
        assert_eq!(settings.protected_branches, vec!["main", "master"]);
    }
}
