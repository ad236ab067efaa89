use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use jigdo_compress::deflate::{self, Deflate};
use jigdo_compress::part::PartKind;
use jigdo_matching::MatchEvent;
use jigdo_summary::FileSummary;
use jigdo_template::{
    parse_header_line, Codec, DescriptorEntry, DescriptorTable, PartHeader, TemplateWriter, Trailer,
    PART_HEADER_LEN,
};

fn candidate(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> Rc<RefCell<FileSummary>> {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    let mut summary = FileSummary::new(&path, name.to_string(), bytes.len() as u64, 0, 1024, 65536);
    summary.rsum0(None, 0).unwrap();
    summary.full_digest(None, 0).unwrap();
    Rc::new(RefCell::new(summary))
}

/// Reads back everything a [`TemplateWriter`] wrote: the header line, every
/// part (decompressing each via the deflate codec used below), and the
/// trailing descriptor table plus trailer. Returns `(declared_size, parts,
/// table, trailer)`.
fn parse_container(bytes: &[u8]) -> (u64, Vec<Vec<u8>>, DescriptorTable, Trailer) {
    let newline = bytes.iter().position(|&b| b == b'\n').unwrap();
    let header = std::str::from_utf8(&bytes[..=newline]).unwrap();
    let declared_size = parse_header_line(header).unwrap();

    let trailer_len = 4 + 6 + 16;
    let trailer = Trailer::decode(&bytes[bytes.len() - trailer_len..]).unwrap();

    let body = &bytes[newline + 1..bytes.len() - trailer_len];
    let mut parts = Vec::new();
    let mut offset = 0usize;
    let mut table = DescriptorTable::new();
    while offset < body.len() {
        let header_bytes = &body[offset..offset + PART_HEADER_LEN];
        let header = PartHeader::decode(header_bytes).unwrap();
        let compressed_start = offset + PART_HEADER_LEN;
        let compressed_end = compressed_start + header.compressed_len() as usize;
        let compressed = &body[compressed_start..compressed_end];
        let decompressed = match header.kind {
            PartKind::Data => deflate::decompress_chunk(compressed).unwrap(),
            PartKind::Bzip => jigdo_compress::blocksort::decompress_chunk(compressed).unwrap(),
        };
        assert_eq!(decompressed.len() as u64, header.uncompressed_len);

        if compressed_end == body.len() {
            table = DescriptorTable::decode(&decompressed).unwrap();
        } else {
            parts.push(decompressed);
        }
        offset = compressed_end;
    }

    (declared_size, parts, table, trailer)
}

#[test]
fn pure_literal_image_round_trips() {
    let image = b"hello jigdo world, no candidates cover any of this".to_vec();
    let mut writer = TemplateWriter::new(
        Cursor::new(Vec::new()),
        Codec::Deflate(Deflate::with_default_level()),
        65536,
        image.len() as u64,
    )
    .unwrap();
    writer.write_event(MatchEvent::Literal(image.clone())).unwrap();
    let digest = jigdo_checksums::strong::Md5::digest(&image);
    let out = writer.finish(digest).unwrap().into_inner();

    let (declared_size, parts, table, trailer) = parse_container(&out);
    assert_eq!(declared_size, image.len() as u64);
    assert_eq!(parts.concat(), image);
    assert_eq!(trailer.image_digest, digest);

    let has_image_info = table
        .entries()
        .iter()
        .any(|e| matches!(e, DescriptorEntry::ImageInfo { size, .. } if *size == image.len() as u64));
    assert!(has_image_info);
}

#[test]
fn literal_and_match_interleave_without_storing_matched_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let matched_bytes = vec![42u8; 4096];
    let summary = candidate(&dir, "matched.bin", &matched_bytes);

    let leading = b"leading literal run ".to_vec();
    let trailing = b" trailing literal run".to_vec();
    let total = leading.len() as u64 + matched_bytes.len() as u64 + trailing.len() as u64;

    let mut writer = TemplateWriter::new(
        Cursor::new(Vec::new()),
        Codec::Deflate(Deflate::with_default_level()),
        65536,
        total,
    )
    .unwrap();
    writer.write_event(MatchEvent::Literal(leading.clone())).unwrap();
    writer
        .write_event(MatchEvent::Match {
            summary,
            start_off: leading.len() as u64,
        })
        .unwrap();
    writer.write_event(MatchEvent::Literal(trailing.clone())).unwrap();
    let out = writer.finish([1; 16]).unwrap().into_inner();

    let (declared_size, parts, table, _trailer) = parse_container(&out);
    assert_eq!(declared_size, total);
    // only the two literal runs are present as parts; the matched region
    // contributes no compressed bytes at all.
    assert_eq!(parts, vec![leading, trailing]);

    let matched_entries: Vec<_> = table
        .entries()
        .iter()
        .filter(|e| matches!(e, DescriptorEntry::MatchedFile { .. }))
        .collect();
    assert_eq!(matched_entries.len(), 1);
}
