/// Errors raised while computing or loading a [`crate::FileSummary`].
///
/// An I/O error here is the trigger for a candidate being marked
/// *excluded*: callers catch [`SummaryError::Io`], exclude the file, and
/// continue the run.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    /// Reading the candidate file failed.
    #[error("reading candidate file failed: {0}")]
    Io(#[from] std::io::Error),

    /// The cache payload for this file could not be decoded; treated as a
    /// cache miss by callers, never propagated as fatal.
    #[error("cache payload malformed: {0}")]
    MalformedPayload(&'static str),
}
