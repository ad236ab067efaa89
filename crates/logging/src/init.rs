use tracing_subscriber::FmtSubscriber;

use crate::verbosity::Verbosity;

/// Installs a process-global `tracing` subscriber at the given verbosity.
///
/// Safe to call more than once (e.g. from multiple test binaries); later
/// calls after the first successful one are no-ops.
pub fn init(verbosity: Verbosity) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(verbosity.level_filter())
        .with_target(false)
        .finish();
    // A second installation attempt in the same process is expected in test
    // binaries that each call `init`; only the first one can win.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_does_not_panic_on_repeated_calls() {
        init(Verbosity::Debug);
        init(Verbosity::Quiet);
    }
}
