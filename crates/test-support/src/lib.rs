#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! Shared on-disk fixture builders for the image/candidate-file tests
//! scattered across this workspace: a scratch directory, a handful of
//! candidate files with known contents, and an image assembled by
//! concatenating literal filler with copies of those candidates.
//!
//! # See also
//!
//! - `jigdo-matching`, `jigdo-template`, and `jigdo-core` for the tests this
//!   crate backs.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use jigdo_checksums::strong::Md5;

/// A scratch directory plus the candidate files written into it, kept alive
/// for the lifetime of a test.
pub struct Fixture {
    dir: tempfile::TempDir,
    candidates: Vec<(String, Vec<u8>)>,
}

impl Fixture {
    /// Creates an empty fixture with a fresh temporary directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create fixture temp dir"),
            candidates: Vec::new(),
        }
    }

    /// Directory backing this fixture's files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a candidate file named `leafname` with exactly `bytes`,
    /// returning its path. Remembers the content so [`Self::image_of`] can
    /// later reference it by name.
    pub fn candidate(&mut self, leafname: &str, bytes: impl Into<Vec<u8>>) -> PathBuf {
        let bytes = bytes.into();
        let path = self.dir.path().join(leafname);
        File::create(&path)
            .and_then(|mut f| f.write_all(&bytes))
            .expect("write fixture candidate file");
        self.candidates.push((leafname.to_string(), bytes));
        path
    }

    /// Paths of every candidate file written so far, in creation order.
    #[must_use]
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        self.candidates
            .iter()
            .map(|(name, _)| self.dir.path().join(name))
            .collect()
    }

    /// Returns the remembered content of a candidate previously written via
    /// [`Self::candidate`].
    #[must_use]
    pub fn candidate_bytes(&self, leafname: &str) -> &[u8] {
        self.candidates
            .iter()
            .find(|(name, _)| name == leafname)
            .map(|(_, bytes)| bytes.as_slice())
            .expect("candidate previously written to this fixture")
    }

    /// Builds an image by concatenating `pieces`, where each piece is either
    /// literal filler bytes or a reference to a previously-written candidate
    /// by leafname. Returns the assembled bytes and their MD5 digest.
    #[must_use]
    pub fn assemble_image(&self, pieces: &[ImagePiece<'_>]) -> (Vec<u8>, [u8; 16]) {
        let mut image = Vec::new();
        for piece in pieces {
            match piece {
                ImagePiece::Literal(bytes) => image.extend_from_slice(bytes),
                ImagePiece::Candidate(leafname) => image.extend_from_slice(self.candidate_bytes(leafname)),
            }
        }
        let digest = Md5::digest(&image);
        (image, digest)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// One piece of an assembled test image.
pub enum ImagePiece<'a> {
    /// Literal filler bytes, matching no candidate.
    Literal(&'a [u8]),
    /// A copy of a candidate previously written to the same [`Fixture`].
    Candidate(&'a str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_literal_and_candidate_pieces_in_order() {
        let mut fixture = Fixture::new();
        fixture.candidate("f.bin", b"CANDIDATE".to_vec());

        let (image, digest) = fixture.assemble_image(&[
            ImagePiece::Literal(b"prefix-"),
            ImagePiece::Candidate("f.bin"),
            ImagePiece::Literal(b"-suffix"),
        ]);

        assert_eq!(image, b"prefix-CANDIDATE-suffix");
        assert_eq!(digest, Md5::digest(b"prefix-CANDIDATE-suffix"));
    }

    #[test]
    fn candidate_paths_preserves_creation_order() {
        let mut fixture = Fixture::new();
        fixture.candidate("a", b"1".to_vec());
        fixture.candidate("b", b"22".to_vec());

        let paths = fixture.candidate_paths();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("a"));
        assert!(paths[1].ends_with("b"));
    }
}
