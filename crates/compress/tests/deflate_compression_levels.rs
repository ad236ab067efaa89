//! Round-trip coverage across every deflate compression level.

use jigdo_compress::deflate::{CompressionLevel, Deflate, decompress_chunk};

fn sample_text() -> Vec<u8> {
    "the quick brown fox jumps over the lazy dog ".repeat(2000).into_bytes()
}

#[test]
fn every_named_level_round_trips() {
    let data = sample_text();
    for level in [
        CompressionLevel::None,
        CompressionLevel::Fast,
        CompressionLevel::Default,
        CompressionLevel::Best,
    ] {
        let codec = Deflate::new(level, jigdo_compress::deflate::DEFAULT_CHUNK_LIMIT);
        let part = codec.compress_chunk(&data).unwrap();
        let restored = decompress_chunk(part.compressed()).unwrap();
        assert_eq!(restored, data, "level {level:?} failed to round-trip");
    }
}

#[test]
fn every_numeric_level_round_trips() {
    let data = sample_text();
    for level in 0..=9 {
        let level = CompressionLevel::from_numeric(level).unwrap();
        let codec = Deflate::new(level, jigdo_compress::deflate::DEFAULT_CHUNK_LIMIT);
        let part = codec.compress_chunk(&data).unwrap();
        let restored = decompress_chunk(part.compressed()).unwrap();
        assert_eq!(restored, data);
    }
}

#[test]
fn higher_levels_compress_repetitive_data_at_least_as_well() {
    let data = sample_text();
    let fast = Deflate::new(CompressionLevel::Fast, jigdo_compress::deflate::DEFAULT_CHUNK_LIMIT)
        .compress_chunk(&data)
        .unwrap();
    let best = Deflate::new(CompressionLevel::Best, jigdo_compress::deflate::DEFAULT_CHUNK_LIMIT)
        .compress_chunk(&data)
        .unwrap();
    assert!(best.compressed().len() <= fast.compressed().len());
}
