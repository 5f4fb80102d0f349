#![no_main]

use std::io::{self, Read};

use jsontree::{Error, Parser};
use libfuzzer_sys::fuzz_target;

/// Replays the input through `read` in small rotating chunk sizes so every
/// fuzz case also exercises chunk-boundary resume paths.
struct TrickleReader<'a> {
    data: &'a [u8],
    at: usize,
}

impl Read for TrickleReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() || buf.is_empty() {
            return Ok(0);
        }
        let want = (self.at % 7 + 1).min(self.data.len()).min(buf.len());
        self.at += 1;
        buf[..want].copy_from_slice(&self.data[..want]);
        self.data = &self.data[want..];
        Ok(want)
    }
}

fuzz_target!(|data: &[u8]| {
    let whole = Parser::new().parse(data);
    let trickled = Parser::new().parse_reader(TrickleReader { data, at: data.len() });

    match (whole, trickled) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Err(a), Err(Error::Parse(b))) => assert_eq!(a, b),
        (a, b) => panic!("whole/chunked divergence: {a:?} vs {b:?}"),
    }
});
