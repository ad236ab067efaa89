//! Common utility types shared by the compression back-ends.

use std::io::{self, IoSlice, Write};

pub(crate) struct CountingWriter<W> {
    inner: W,
    bytes: u64,
}

impl<W> CountingWriter<W> {
    pub(crate) const fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    pub(crate) const fn bytes(&self) -> u64 {
        self.bytes
    }

    pub(crate) const fn inner_ref(&self) -> &W {
        &self.inner
    }

    pub(crate) const fn inner_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub(crate) fn into_parts(self) -> (W, u64) {
        (self.inner, self.bytes)
    }

    pub(crate) const fn saturating_add_bytes(&mut self, written: usize) {
        self.bytes = self.bytes.saturating_add(written as u64);
    }
}

impl<W> Write for CountingWriter<W>
where
    W: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.saturating_add_bytes(written);
        Ok(written)
    }

    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        let written = self.inner.write_vectored(bufs)?;
        self.saturating_add_bytes(written);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
