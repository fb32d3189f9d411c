//! `gsd-pr-sync`: git post-commit hook entry point.
//!
//! Always exits 0 and prints nothing unless `GSD_HOOK_LOG` holds a tracing
//! filter, in which case diagnostics go to stderr.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GSD_HOOK_LOG";

fn main() {
    // A panic must not turn into a failed commit or a noisy backtrace.
    std::panic::set_hook(Box::new(|_| {}));

    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    let outcome = std::panic::catch_unwind(gsd_pr_sync::run_from_env);
    tracing::debug!(?outcome, "PR sync hook finished");
}
