use std::io::{self, Read};

use jigdo_checksums::strong::Md5;

/// Wraps a reader, folding every byte it yields into a running whole-file
/// digest as a side effect of reading.
///
/// The matcher consumes an image through this wrapper so the final
/// [`DescriptorEntry::ImageInfo`](crate::descriptor::DescriptorEntry::ImageInfo)
/// digest can be computed in the same pass, without re-reading the image.
pub struct DigestingReader<R> {
    inner: R,
    hasher: Md5,
}

impl<R: Read> DigestingReader<R> {
    /// Wraps `inner`, starting from an empty digest.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Md5::new(),
        }
    }

    /// Consumes the wrapper, returning the digest of every byte read so far.
    /// Bytes never read (if the caller stopped early) are not included.
    #[must_use]
    pub fn into_digest(self) -> [u8; 16] {
        self.hasher.finalize()
    }
}

impl<R: Read> Read for DigestingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn digest_matches_direct_computation() {
        let data = b"some bytes to digest while reading".to_vec();
        let mut reader = DigestingReader::new(Cursor::new(data.clone()));
        let mut sink = Vec::new();
        reader.read_to_end(&mut sink).unwrap();
        assert_eq!(sink, data);
        assert_eq!(reader.into_digest(), Md5::digest(&data));
    }

    #[test]
    fn partial_read_only_digests_what_was_consumed() {
        let data = b"0123456789".to_vec();
        let mut reader = DigestingReader::new(Cursor::new(data.clone()));
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(reader.into_digest(), Md5::digest(&data[..4]));
    }
}
