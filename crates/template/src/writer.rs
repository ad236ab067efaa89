use std::io::Write;

use jigdo_checksums::strong::Md5;
use jigdo_matching::MatchEvent;

use crate::codec::Codec;
use crate::container::{header_line, Trailer};
use crate::descriptor::{DescriptorEntry, DescriptorTable};
use crate::error::TemplateError;
use crate::framing::PartHeader;

/// Builds a `.template` container from a stream of [`MatchEvent`]s.
///
/// Literal bytes are accumulated and flushed as compressed parts once the
/// codec's chunk boundary is crossed (or a match interrupts the run, or the
/// image ends); matched regions contribute no bytes at all, only a
/// descriptor entry pointing at the candidate file.
pub struct TemplateWriter<W> {
    out: W,
    codec: Codec,
    block_len: u32,
    literal_buf: Vec<u8>,
    descriptors: DescriptorTable,
    declared_total: u64,
    written_total: u64,
}

impl<W: Write> TemplateWriter<W> {
    /// Creates a writer, writing the container's header line immediately.
    /// `declared_total` is the image's full size, known upfront from the
    /// source being scanned; `block_len` is `B`, recorded in the
    /// descriptor table's `IMAGE_INFO` entry.
    ///
    /// # Errors
    ///
    /// Propagates any [`TemplateError::OutputIo`] from writing the header.
    pub fn new(mut out: W, codec: Codec, block_len: u32, declared_total: u64) -> Result<Self, TemplateError> {
        out.write_all(header_line(declared_total).as_bytes())?;
        Ok(Self {
            out,
            codec,
            block_len,
            literal_buf: Vec::new(),
            descriptors: DescriptorTable::new(),
            declared_total,
            written_total: 0,
        })
    }

    /// Consumes one [`MatchEvent`], buffering literal bytes or flushing and
    /// recording a match.
    ///
    /// # Errors
    ///
    /// Propagates [`TemplateError::Compress`] or [`TemplateError::OutputIo`].
    pub fn write_event(&mut self, event: MatchEvent) -> Result<(), TemplateError> {
        match event {
            MatchEvent::Literal(bytes) => self.push_literal(&bytes),
            MatchEvent::Match { summary, start_off } => {
                self.flush_literal()?;
                let size = summary.borrow().size();
                let digest = summary
                    .borrow_mut()
                    .full_digest(None, 0)
                    .map_err(|_| TemplateError::Malformed("matched candidate has no cached digest"))?;
                let rsum0 = summary
                    .borrow_mut()
                    .rsum0(None, 0)
                    .map_err(|_| TemplateError::Malformed("matched candidate has no cached rsum0"))?
                    .value();
                self.descriptors.push(DescriptorEntry::MatchedFile {
                    offset: start_off,
                    size,
                    digest,
                    rsum0,
                });
                self.written_total += size;
                Ok(())
            }
        }
    }

    fn push_literal(&mut self, bytes: &[u8]) -> Result<(), TemplateError> {
        self.literal_buf.extend_from_slice(bytes);
        let limit = self.codec.chunk_limit();
        if self.codec.hard_limit() {
            while self.literal_buf.len() >= limit {
                let chunk: Vec<u8> = self.literal_buf.drain(..limit).collect();
                self.write_literal_part(&chunk)?;
            }
        } else if self.literal_buf.len() > limit {
            let chunk = std::mem::take(&mut self.literal_buf);
            self.write_literal_part(&chunk)?;
        }
        Ok(())
    }

    fn flush_literal(&mut self) -> Result<(), TemplateError> {
        if self.literal_buf.is_empty() {
            return Ok(());
        }
        let chunk = std::mem::take(&mut self.literal_buf);
        self.write_literal_part(&chunk)
    }

    fn write_literal_part(&mut self, chunk: &[u8]) -> Result<(), TemplateError> {
        let part = self.codec.compress_chunk(chunk)?;
        let header = PartHeader::for_part(part.kind(), part.compressed().len() as u64, part.uncompressed_len());
        self.out.write_all(&header.encode())?;
        self.out.write_all(part.compressed())?;
        self.descriptors.push(DescriptorEntry::WrittenUnmatched {
            size: chunk.len() as u64,
            digest: Md5::digest(chunk),
        });
        self.written_total += chunk.len() as u64;
        Ok(())
    }

    /// Finalizes the container: flushes any trailing literal run, writes
    /// the descriptor table as its own compressed part, and writes the
    /// fixed trailer. `image_digest` is the whole-image digest, computed by
    /// the caller alongside (typically via
    /// [`crate::digesting::DigestingReader`]) while the image was scanned.
    ///
    /// # Errors
    ///
    /// Propagates [`TemplateError::Compress`] or [`TemplateError::OutputIo`].
    pub fn finish(mut self, image_digest: [u8; 16]) -> Result<W, TemplateError> {
        self.flush_literal()?;
        debug_assert_eq!(
            self.written_total, self.declared_total,
            "every image byte must land in exactly one literal run or match"
        );

        let mut table = DescriptorTable::new();
        table.push(DescriptorEntry::ImageInfo {
            size: self.declared_total,
            digest: image_digest,
            block_len: self.block_len,
        });
        for entry in self.descriptors.entries() {
            table.push(entry.clone());
        }

        let payload = table.encode();
        let part = self.codec.compress_chunk(&payload)?;
        let header = PartHeader::for_part(part.kind(), part.compressed().len() as u64, part.uncompressed_len());
        self.out.write_all(&header.encode())?;
        self.out.write_all(part.compressed())?;

        let desc_part_len = header.total_part_len;
        let trailer = Trailer {
            desc_part_len,
            image_digest,
        };
        self.out.write_all(&trailer.encode())?;

        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jigdo_compress::deflate::Deflate;
    use jigdo_summary::FileSummary;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn deflate_writer(out: Vec<u8>, declared_total: u64) -> TemplateWriter<Vec<u8>> {
        TemplateWriter::new(out, Codec::Deflate(Deflate::with_default_level()), 65536, declared_total).unwrap()
    }

    #[test]
    fn header_line_is_written_immediately() {
        let writer = deflate_writer(Vec::new(), 1000);
        let out = writer.finish([0; 16]).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("JigsawDownload template"));
    }

    #[test]
    fn pure_literal_stream_produces_one_unmatched_entry() {
        let mut writer = deflate_writer(Vec::new(), 11);
        writer.write_event(MatchEvent::Literal(b"hello world".to_vec())).unwrap();
        let out = writer.finish(Md5::digest(b"hello world")).unwrap();
        assert!(out.len() > "JigsawDownload template 3 11\n".len());
    }

    #[test]
    fn match_event_records_descriptor_without_storing_bytes() {
        let mut writer = deflate_writer(Vec::new(), 4096);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x");
        std::fs::write(&path, vec![5u8; 4096]).unwrap();
        let summary = Rc::new(RefCell::new(FileSummary::new(&path, "x".into(), 4096, 0, 1024, 65536)));
        summary.borrow_mut().rsum0(None, 0).unwrap();
        summary.borrow_mut().full_digest(None, 0).unwrap();

        writer
            .write_event(MatchEvent::Match { summary, start_off: 0 })
            .unwrap();
        let out = writer.finish([9; 16]).unwrap();
        assert!(out.len() > "JigsawDownload template 3 4096\n".len());
    }
}
