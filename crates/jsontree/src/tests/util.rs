use alloc::vec::Vec;
use std::io::{self, Read};

/// Hands out input in caller-chosen slice sizes (cycled), so tests can force
/// chunk boundaries anywhere — including mid-escape and mid-literal.
pub(crate) struct TrickleReader<'a> {
    data: &'a [u8],
    sizes: Vec<usize>,
    at: usize,
}

impl<'a> TrickleReader<'a> {
    pub fn new(data: &'a [u8], sizes: Vec<usize>) -> Self {
        Self { data, sizes, at: 0 }
    }

    /// One byte per read call.
    pub fn bytewise(data: &'a [u8]) -> Self {
        Self::new(data, alloc::vec![1])
    }
}

impl Read for TrickleReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() || buf.is_empty() {
            return Ok(0);
        }
        let mut want = if self.sizes.is_empty() {
            self.data.len()
        } else {
            let s = self.sizes[self.at % self.sizes.len()];
            self.at += 1;
            s.max(1)
        };
        want = want.min(self.data.len()).min(buf.len());
        buf[..want].copy_from_slice(&self.data[..want]);
        self.data = &self.data[want..];
        Ok(want)
    }
}
