//! Shared test utilities for the gsd-vibe crates.
//!
//! Provides environment-variable guards and a fixture that lays out a GSD
//! source checkout next to an empty Vibe home.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = gsd_test_utils::set_env_var("MY_VAR", Some("value"));
/// // MY_VAR is set to "value"
/// // When _guard drops, MY_VAR is restored to its original value
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// A GSD source checkout and a Vibe home inside one tempdir.
///
/// The source root exists but is empty; the Vibe home is not created so
/// tests can observe directory creation.
pub struct SourceTreeFixture {
    pub tempdir: tempfile::TempDir,
    source_root: PathBuf,
    vibe_home: PathBuf,
}

impl SourceTreeFixture {
    /// Creates:
    /// - `<tmp>/gsd/` (source root)
    ///
    /// and reserves `<tmp>/home/.vibe` as the Vibe home.
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let source_root = tempdir.path().join("gsd");
        let vibe_home = tempdir.path().join("home/.vibe");
        std::fs::create_dir_all(&source_root)?;
        Ok(Self {
            tempdir,
            source_root,
            vibe_home,
        })
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn vibe_home(&self) -> &Path {
        &self.vibe_home
    }

    /// Writes `rel` under the source root, creating parent directories.
    pub fn write_source(&self, rel: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.source_root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Writes `commands/gsd/<name>.md`.
    pub fn write_command(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        self.write_source(&format!("commands/gsd/{name}.md"), content)
    }

    /// Writes `agents/<name>.md`.
    pub fn write_agent(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        self.write_source(&format!("agents/{name}.md"), content)
    }

    /// Writes `get-shit-done/workflows/<name>.md`.
    pub fn write_workflow(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        self.write_source(&format!("get-shit-done/workflows/{name}.md"), content)
    }

    /// Writes `get-shit-done/<sub>/<rel>`, e.g. `bin/gsd-tools.js`.
    pub fn write_core(&self, sub: &str, rel: &str, content: &str) -> std::io::Result<PathBuf> {
        self.write_source(&format!("get-shit-done/{sub}/{rel}"), content)
    }

    /// Reads a file relative to the Vibe home.
    pub fn read_installed(&self, rel: &str) -> std::io::Result<String> {
        std::fs::read_to_string(self.vibe_home.join(rel))
    }
}
