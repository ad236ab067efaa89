use tracing::level_filters::LevelFilter;

/// How much ambient detail matching/caching should emit, mirroring the
/// familiar `-v`/`-vv`/`-vvv` step count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Warnings and errors only.
    #[default]
    Quiet,
    /// Adds per-run summary events (matches found, bytes literal).
    Normal,
    /// Adds per-candidate decision events (promoted, confirmed, rejected).
    Verbose,
    /// Adds per-byte-level detail (window slides, cache hit/miss).
    Debug,
}

impl Verbosity {
    /// Builds a level from a `-v` repeat count, saturating at [`Self::Debug`].
    #[must_use]
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Quiet,
            1 => Self::Normal,
            2 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// The `tracing` level filter this verbosity corresponds to.
    #[must_use]
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::WARN,
            Self::Normal => LevelFilter::INFO,
            Self::Verbose => LevelFilter::DEBUG,
            Self::Debug => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_count_saturates_at_debug() {
        assert_eq!(Verbosity::from_count(0), Verbosity::Quiet);
        assert_eq!(Verbosity::from_count(3), Verbosity::Debug);
        assert_eq!(Verbosity::from_count(99), Verbosity::Debug);
    }

    #[test]
    fn ordering_increases_with_detail() {
        assert!(Verbosity::Quiet < Verbosity::Normal);
        assert!(Verbosity::Normal < Verbosity::Verbose);
        assert!(Verbosity::Verbose < Verbosity::Debug);
    }

    #[test]
    fn level_filter_matches_expected_tracing_level() {
        assert_eq!(Verbosity::Quiet.level_filter(), LevelFilter::WARN);
        assert_eq!(Verbosity::Debug.level_filter(), LevelFilter::TRACE);
    }
}
