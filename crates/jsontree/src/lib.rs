//! A table-driven, byte-at-a-time streaming JSON parser that builds generic
//! [`Value`] trees.
//!
//! The parser consumes either a complete byte buffer or a segmented stream of
//! chunks drawn from a reader; chunk boundaries never change the outcome. All
//! syntactic context lives in precomputed per-state byte tables, so the inner
//! loop is a table lookup plus a small opcode dispatch. Integers that do not
//! fit in an `i64` (and decimals that overflow `f64`) are preserved as
//! arbitrary-precision literals in [`Value::Big`].
//!
//! A [`Parser`] is reusable: its internal buffers keep their capacity between
//! calls, so repeated parses of small documents are amortized allocation-free.
//!
//! ```
//! use jsontree::{parse, Value};
//!
//! let v = parse(br#"{"a":[1,2.5,"x"]}"#).unwrap();
//! let items = v.as_object().unwrap()["a"].as_array().unwrap();
//! assert_eq!(items[0], Value::Int(1));
//! assert_eq!(items[1], Value::Float(2.5));
//! ```
//!
//! Streams of whitespace-separated top-level values are handled in callback
//! mode:
//!
//! ```
//! use jsontree::{Parser, Value};
//!
//! let mut seen = Vec::new();
//! let mut parser = Parser::new();
//! parser
//!     .parse_with(b"1 2 3", |v| {
//!         seen.push(v);
//!         false
//!     })
//!     .unwrap();
//! assert_eq!(seen.len(), 3);
//! ```

#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

mod error;
mod parser;
mod value;

pub use error::{Error, ErrorKind, ParseError};
pub use parser::Parser;
pub use value::{Array, Map, Value};

#[cfg(test)]
mod tests;

/// Parses a complete JSON document into a [`Value`].
///
/// Convenience wrapper around a fresh [`Parser`]; exactly one top-level value
/// is expected. Reuse a [`Parser`] directly when parsing repeatedly.
pub fn parse(json: &[u8]) -> Result<Value, ParseError> {
    Parser::new().parse(json)
}
