/// Callback-based progress/diagnostics sink for a build.
///
/// Modeled as a configuration struct of boxed closures rather than a trait
/// object passed down every call site: a build only ever has one reporter,
/// and a struct lets callers wire up only the callbacks they care about
/// while leaving the rest as no-ops.
pub struct BuildReporter {
    on_error: Box<dyn FnMut(&crate::error::JigdoError) + Send>,
    on_info: Box<dyn FnMut(&str) + Send>,
    on_progress: Box<dyn FnMut(u64, u64) + Send>,
}

impl BuildReporter {
    /// Builds a reporter from explicit callbacks.
    pub fn new(
        on_error: impl FnMut(&crate::error::JigdoError) + Send + 'static,
        on_info: impl FnMut(&str) + Send + 'static,
        on_progress: impl FnMut(u64, u64) + Send + 'static,
    ) -> Self {
        Self {
            on_error: Box::new(on_error),
            on_info: Box::new(on_info),
            on_progress: Box::new(on_progress),
        }
    }

    /// Reports a non-fatal error (e.g. an excluded candidate).
    pub fn error(&mut self, err: &crate::error::JigdoError) {
        (self.on_error)(err);
    }

    /// Reports an informational message.
    pub fn info(&mut self, message: &str) {
        (self.on_info)(message);
    }

    /// Reports progress: `bytes_done` of `bytes_total` image bytes consumed.
    pub fn progress(&mut self, bytes_done: u64, bytes_total: u64) {
        (self.on_progress)(bytes_done, bytes_total);
    }
}

impl Default for BuildReporter {
    /// A reporter that forwards errors and info to `tracing` and drops
    /// progress updates.
    fn default() -> Self {
        Self::new(
            |err| tracing::warn!(error = %err, "non-fatal build error"),
            |message| tracing::info!("{message}"),
            |_, _| {},
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn progress_callback_observes_updates() {
        let seen = Arc::new(AtomicU64::new(0));
        let seen_in_closure = seen.clone();
        let mut reporter = BuildReporter::new(
            |_| {},
            |_| {},
            move |done, _total| seen_in_closure.store(done, Ordering::SeqCst),
        );
        reporter.progress(42, 100);
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn default_reporter_does_not_panic() {
        let mut reporter = BuildReporter::default();
        reporter.info("hello");
        reporter.progress(1, 2);
    }
}
