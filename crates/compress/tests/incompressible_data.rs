//! Coverage for data that does not compress well: both codecs must still
//! round-trip it correctly even though the compressed part may be larger
//! than the input.

use jigdo_compress::blocksort::BlockSort;
use jigdo_compress::deflate::{CompressionLevel, Deflate};

/// Deterministic PRNG byte stream, standing in for encrypted/random data.
fn random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..size)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
            let rot = (state >> 59) as u32;
            ((xorshifted >> rot) | (xorshifted << ((32u32.wrapping_sub(rot)) & 31))) as u8
        })
        .collect()
}

#[test]
fn deflate_round_trips_random_bytes() {
    let data = random_data(64 * 1024, 42);
    let codec = Deflate::new(CompressionLevel::Best, jigdo_compress::deflate::DEFAULT_CHUNK_LIMIT);
    let part = codec.compress_chunk(&data).unwrap();
    let restored = jigdo_compress::deflate::decompress_chunk(part.compressed()).unwrap();
    assert_eq!(restored, data);
}

#[test]
fn block_sort_round_trips_random_bytes_at_the_hard_limit() {
    let codec = BlockSort::new(1).unwrap();
    let data = random_data(codec.chunk_limit(), 7);
    let part = codec.compress_chunk(&data).unwrap();
    let restored = jigdo_compress::blocksort::decompress_chunk(part.compressed()).unwrap();
    assert_eq!(restored, data);
}

#[test]
fn deflate_does_not_panic_on_empty_or_single_byte_input() {
    let codec = Deflate::with_default_level();
    for data in [&b""[..], &b"x"[..]] {
        let part = codec.compress_chunk(data).unwrap();
        let restored = jigdo_compress::deflate::decompress_chunk(part.compressed()).unwrap();
        assert_eq!(restored, data);
    }
}

#[test]
fn block_sort_does_not_panic_on_empty_or_single_byte_input() {
    let codec = BlockSort::new(9).unwrap();
    for data in [&b""[..], &b"x"[..]] {
        let part = codec.compress_chunk(data).unwrap();
        let restored = jigdo_compress::blocksort::decompress_chunk(part.compressed()).unwrap();
        assert_eq!(restored, data);
    }
}
