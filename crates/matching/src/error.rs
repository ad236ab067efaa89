/// Errors raised while matching an image against a candidate pool.
#[derive(Debug, thiserror::Error)]
pub enum MatchingError {
    /// Reading the image stream failed; the run cannot continue.
    #[error("reading image stream failed: {0}")]
    ImageIo(#[from] std::io::Error),
}
