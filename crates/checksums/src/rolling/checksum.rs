use std::io::{self, Read};

use super::error::RollingError;

/// Bias added to every byte before summation, matching jigdo's original
/// constant; avoids an all-zero window producing a checksum of zero.
pub const BIAS: u32 = 31;

/// Default number of bytes read at a time by [`RollingSum::update_reader`].
const DEFAULT_READER_BUFFER_LEN: usize = 8192;

/// Additive/rotational rolling checksum over a sliding window of bytes.
///
/// Two running sums are maintained: `s1` is the sum of biased bytes, `s2` is
/// their position-weighted sum. Both wrap modulo 2^32 internally; only the
/// low 16 bits of each are significant, which [`RollingSum::value`] packs
/// into the returned checksum. The unmasked sums are kept so the checksum of
/// an initial (partial) window can be extended byte-by-byte without
/// recomputing from scratch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RollingSum {
    s1: u32,
    s2: u32,
    window_len: u32,
}

impl Default for RollingSum {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingSum {
    /// Creates a checksum over an empty window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            s1: 0,
            s2: 0,
            window_len: 0,
        }
    }

    /// Reconstructs a checksum from its raw `s1`/`s2` components and window
    /// length, as stored in a cache entry's `rsum0` field.
    #[must_use]
    pub const fn from_raw(s1: u32, s2: u32, window_len: u32) -> Self {
        Self { s1, s2, window_len }
    }

    /// Computes the checksum of an initial window from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`RollingError::WindowTooLarge`] if `window.len()` does not
    /// fit in a `u32`.
    pub fn init(window: &[u8]) -> Result<Self, RollingError> {
        let mut sum = Self::new();
        sum.reset_to(window)?;
        Ok(sum)
    }

    /// Resets this checksum and recomputes it over `window` from scratch,
    /// reusing the existing state rather than allocating a new value.
    ///
    /// # Errors
    ///
    /// Returns [`RollingError::WindowTooLarge`] if `window.len()` does not
    /// fit in a `u32`.
    pub fn reset_to(&mut self, window: &[u8]) -> Result<(), RollingError> {
        let len = u32::try_from(window.len()).map_err(|_| RollingError::WindowTooLarge {
            len: window.len(),
        })?;
        let mut s1 = 0u32;
        let mut s2 = 0u32;
        for (i, &byte) in window.iter().enumerate() {
            let weighted = u32::from(byte).wrapping_add(BIAS);
            s1 = s1.wrapping_add(weighted);
            #[allow(clippy::cast_possible_truncation)]
            let weight = len - i as u32;
            s2 = s2.wrapping_add(weight.wrapping_mul(weighted));
        }
        self.s1 = s1;
        self.s2 = s2;
        self.window_len = len;
        Ok(())
    }

    /// Appends one byte to the window without removing any existing byte,
    /// growing the window length by one. Used while the image's initial `W`
    /// bytes are still being accumulated.
    ///
    /// # Errors
    ///
    /// Returns [`RollingError::WindowTooLarge`] if the window would grow
    /// past `u32::MAX` bytes.
    pub fn push(&mut self, byte: u8) -> Result<(), RollingError> {
        let new_len = self
            .window_len
            .checked_add(1)
            .ok_or(RollingError::WindowTooLarge {
                len: self.window_len as usize + 1,
            })?;
        let weighted = u32::from(byte).wrapping_add(BIAS);
        self.s1 = self.s1.wrapping_add(weighted);
        self.s2 = self.s2.wrapping_add(self.s1);
        self.window_len = new_len;
        Ok(())
    }

    /// Appends every byte of `bytes` via repeated [`Self::push`].
    ///
    /// # Errors
    ///
    /// Returns [`RollingError::WindowTooLarge`] if the window would overflow.
    pub fn push_slice(&mut self, bytes: &[u8]) -> Result<(), RollingError> {
        for &byte in bytes {
            self.push(byte)?;
        }
        Ok(())
    }

    /// Slides the window forward by one byte: `old_byte` leaves the window,
    /// `new_byte` enters it. The window length is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RollingError::EmptyWindow`] if the window is currently empty.
    pub fn slide(&mut self, old_byte: u8, new_byte: u8) -> Result<(), RollingError> {
        if self.window_len == 0 {
            return Err(RollingError::EmptyWindow);
        }
        self.s1 = self
            .s1
            .wrapping_add(u32::from(new_byte))
            .wrapping_sub(u32::from(old_byte));
        let old_weighted = u32::from(old_byte).wrapping_add(BIAS);
        self.s2 = self
            .s2
            .wrapping_add(self.s1)
            .wrapping_sub(self.window_len.wrapping_mul(old_weighted));
        Ok(())
    }

    /// Streams `reader` into a fresh checksum using a caller-supplied buffer.
    ///
    /// # Errors
    ///
    /// Propagates any [`io::Error`] from `reader`, and surfaces
    /// [`RollingError::WindowTooLarge`] wrapped in an `io::Error` if the
    /// stream is longer than `u32::MAX` bytes.
    pub fn update_reader_with_buffer<R: Read>(
        reader: &mut R,
        buffer: &mut [u8],
    ) -> io::Result<Self> {
        assert!(!buffer.is_empty(), "scratch buffer must be non-empty");
        let mut sum = Self::new();
        loop {
            let read = reader.read(buffer)?;
            if read == 0 {
                break;
            }
            sum.push_slice(&buffer[..read])
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        }
        Ok(sum)
    }

    /// Like [`Self::update_reader_with_buffer`], using an internal stack buffer.
    ///
    /// # Errors
    ///
    /// See [`Self::update_reader_with_buffer`].
    pub fn update_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut buffer = [0u8; DEFAULT_READER_BUFFER_LEN];
        Self::update_reader_with_buffer(reader, &mut buffer)
    }

    /// Number of bytes currently in the window.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.window_len as usize
    }

    /// Reports whether the window is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.window_len == 0
    }

    /// The raw, unmasked `s1` accumulator.
    #[must_use]
    pub const fn s1(&self) -> u32 {
        self.s1
    }

    /// The raw, unmasked `s2` accumulator.
    #[must_use]
    pub const fn s2(&self) -> u32 {
        self.s2
    }

    /// The packed 32-bit checksum: low 16 bits of `s1` in the low half, low
    /// 16 bits of `s2` in the high half.
    #[must_use]
    pub const fn value(&self) -> u32 {
        (self.s1 & 0xFFFF) | ((self.s2 & 0xFFFF) << 16)
    }
}
