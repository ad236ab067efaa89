use jigdo_cache::CacheError;
use jigdo_matching::MatchingError;
use jigdo_summary::SummaryError;
use jigdo_template::TemplateError;

use crate::config::ConfigError;

/// Errors a template build can fail with.
///
/// Every variant except [`Self::ConfigError`] can only occur once the build
/// is underway; `ConfigError` is raised from [`crate::BuildConfig::new`]
/// before any I/O happens.
#[derive(Debug, thiserror::Error)]
pub enum JigdoError {
    /// Reading the image stream failed.
    #[error("reading the image failed: {0}")]
    BadImage(#[source] std::io::Error),

    /// A candidate file could not be read; the file is excluded and the
    /// build continues without it.
    #[error("candidate {leafname:?} could not be read: {source}")]
    BadCandidate {
        /// The candidate's leafname.
        leafname: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The cache store's on-disk state was corrupt beyond recovery.
    #[error("cache store corrupt: {0}")]
    CacheCorrupt(#[source] CacheError),

    /// A cache read or write failed for reasons other than corruption.
    #[error("cache I/O failed: {0}")]
    CacheIO(#[source] CacheError),

    /// Compressing a literal run or the descriptor table failed.
    #[error("compression failed: {0}")]
    CompressionError(#[source] jigdo_compress::error::CompressError),

    /// Writing the template to its destination failed.
    #[error("writing the template failed: {0}")]
    OutputIO(#[source] std::io::Error),

    /// The build configuration itself was invalid. Fatal at startup, before
    /// any I/O happens.
    #[error("invalid configuration: {0}")]
    ConfigError(#[from] ConfigError),
}

impl From<MatchingError> for JigdoError {
    fn from(err: MatchingError) -> Self {
        match err {
            MatchingError::ImageIo(source) => Self::BadImage(source),
        }
    }
}

impl From<TemplateError> for JigdoError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::Compress(source) => Self::CompressionError(source),
            TemplateError::OutputIo(source) => Self::OutputIO(source),
            TemplateError::Malformed(reason) => {
                Self::OutputIO(std::io::Error::other(reason))
            }
        }
    }
}

impl From<CacheError> for JigdoError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::MalformedRecord(_) => Self::CacheCorrupt(err),
            CacheError::Store(_) => Self::CacheIO(err),
        }
    }
}

/// Maps a per-candidate [`SummaryError`] to the leafname it was raised for.
/// Callers use this to build [`JigdoError::BadCandidate`] without losing the
/// identity of the failing file.
#[must_use]
pub fn bad_candidate(leafname: &str, err: SummaryError) -> JigdoError {
    match err {
        SummaryError::Io(source) => JigdoError::BadCandidate {
            leafname: leafname.to_string(),
            source,
        },
        SummaryError::MalformedPayload(reason) => JigdoError::BadCandidate {
            leafname: leafname.to_string(),
            source: std::io::Error::other(reason),
        },
    }
}
