use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use rayon::prelude::*;

use jigdo_cache::CacheStore;
use jigdo_summary::{CandidateIndex, FileSummary, SharedSummary};

use crate::config::ConfigError;
use crate::error::bad_candidate;
use crate::reporter::BuildReporter;

/// One candidate file named on the command line, before it has been
/// summarized.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Absolute path to read the file from.
    pub path: PathBuf,
    /// Stable identity key used to address it in the cache and template.
    pub leafname: String,
    /// Size in bytes, as reported by the filesystem when the caller listed it.
    pub size: u64,
    /// Last-modified time, as reported by the filesystem.
    pub mtime: u32,
}

/// Result of summarizing one candidate: either a ready, not-yet-shared
/// [`FileSummary`] plus its leading rolling-checksum value, or the reason it
/// was excluded. `FileSummary` is kept by value here (not wrapped in its
/// usual `Rc<RefCell<_>>`) because `Rc` is not `Send` and this result
/// crosses the rayon thread boundary; the wrapping happens back on the
/// collecting thread.
enum ScanResult {
    Ready(FileSummary, u32),
    Excluded(String, jigdo_summary::SummaryError),
}

/// Rejects, fatally, any candidate whose size already exceeds
/// `buffer_limit`: such a file can never be fully buffered while undecided,
/// so it could never be matched. Checked up front, before any candidate is
/// read, so a misconfigured run fails immediately rather than quietly
/// dropping a candidate later.
fn check_sizes(files: &[CandidateFile], buffer_limit: usize) -> Result<(), ConfigError> {
    for file in files {
        if file.size > buffer_limit as u64 {
            return Err(ConfigError::CandidateExceedsBufferLimit {
                leafname: file.leafname.clone(),
                size: file.size,
                buffer_limit,
            });
        }
    }
    Ok(())
}

fn scan_one(file: &CandidateFile, w: u32, b: u32, cache: Option<&CacheStore>, now: u32) -> ScanResult {
    let mut summary = FileSummary::new(file.path.clone(), file.leafname.clone(), file.size, file.mtime, w, b);
    match summary.rsum0(cache, now) {
        Ok(rsum0) => ScanResult::Ready(summary, rsum0.value()),
        Err(err) => ScanResult::Excluded(file.leafname.clone(), err),
    }
}

/// Summarizes every candidate and builds the rolling-checksum index the
/// matcher probes against.
///
/// Every candidate's size is checked against `buffer_limit` first; one that
/// is too large to ever be matched fails the whole call with
/// [`ConfigError::CandidateExceedsBufferLimit`] before any file is read.
/// Past that point, summarization runs in parallel across candidates
/// (mirroring the way a per-file digest batch is spread across a rayon pool
/// elsewhere in this workspace): each candidate's pre-scan result is
/// computed independently and an I/O failure on one candidate excludes only
/// that candidate, reported through `reporter`, without aborting the scan.
/// The index itself is then built serially, since insertion is not safely
/// shared across threads.
///
/// `cache` is consulted (and, for newly-computed windows, updated) if
/// caching is enabled; the embedded store tolerates concurrent `find`/`insert`
/// calls from multiple threads.
///
/// # Errors
///
/// Returns [`ConfigError::CandidateExceedsBufferLimit`] if any candidate's
/// size exceeds `buffer_limit`.
pub fn build_candidate_index(
    files: &[CandidateFile],
    w: u32,
    b: u32,
    buffer_limit: usize,
    cache: Option<&CacheStore>,
    now: u32,
    reporter: &mut BuildReporter,
) -> Result<CandidateIndex, ConfigError> {
    check_sizes(files, buffer_limit)?;

    let results: Vec<ScanResult> = files
        .par_iter()
        .map(|file| scan_one(file, w, b, cache, now))
        .collect();

    let mut index = CandidateIndex::new();
    for result in results {
        match result {
            ScanResult::Ready(summary, rsum0_value) => {
                let summary: SharedSummary = Rc::new(RefCell::new(summary));
                index.insert(rsum0_value, summary);
            }
            ScanResult::Excluded(leafname, err) => {
                jigdo_logging::candidate_excluded(&leafname, &err.to_string());
                reporter.error(&bad_candidate(&leafname, err));
            }
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jigdo_test_support::Fixture;

    #[test]
    fn builds_index_entry_per_readable_candidate() {
        let mut fixture = Fixture::new();
        fixture.candidate("a.bin", b"AAAABBBB".to_vec());
        fixture.candidate("b.bin", b"CCCCDDDD".to_vec());
        let files: Vec<CandidateFile> = fixture
            .candidate_paths()
            .into_iter()
            .map(|path| {
                let leafname = path.file_name().unwrap().to_string_lossy().into_owned();
                let size = std::fs::metadata(&path).unwrap().len();
                CandidateFile { path, leafname, size, mtime: 0 }
            })
            .collect();

        let mut reporter = BuildReporter::default();
        let index = build_candidate_index(&files, 4, 8, 1 << 20, None, 0, &mut reporter).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn oversize_candidate_is_rejected_at_startup() {
        let mut fixture = Fixture::new();
        fixture.candidate("big.bin", vec![0u8; 64]);
        let path = fixture.candidate_paths().remove(0);
        let files = vec![CandidateFile {
            path,
            leafname: "big.bin".to_string(),
            size: 64,
            mtime: 0,
        }];

        let mut reporter = BuildReporter::default();
        let err = build_candidate_index(&files, 4, 8, 16, None, 0, &mut reporter).unwrap_err();
        assert!(matches!(err, ConfigError::CandidateExceedsBufferLimit { .. }));
    }

    #[test]
    fn unreadable_candidate_is_excluded_not_fatal() {
        let files = vec![CandidateFile {
            path: PathBuf::from("/nonexistent/path/ghost.bin"),
            leafname: "ghost.bin".to_string(),
            size: 8,
            mtime: 0,
        }];

        let mut reporter = BuildReporter::default();
        let index = build_candidate_index(&files, 4, 8, 1 << 20, None, 0, &mut reporter).unwrap();
        assert!(index.is_empty());
    }
}
