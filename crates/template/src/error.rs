/// Errors raised while writing or parsing a template container.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A codec failed to compress or decompress a part.
    #[error("compression failed: {0}")]
    Compress(#[from] jigdo_compress::error::CompressError),

    /// Writing the container to its output sink failed.
    #[error("writing template output failed: {0}")]
    OutputIo(#[from] std::io::Error),

    /// A descriptor table entry or part header did not decode cleanly.
    #[error("malformed container data: {0}")]
    Malformed(&'static str),
}
