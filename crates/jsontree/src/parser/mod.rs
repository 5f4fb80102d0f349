//! The table-driven parser engine.
//!
//! The engine advances one byte at a time: the current mode's table maps the
//! byte to an opcode, the opcode mutates the accumulator, the container
//! stack, or the position tracker, and may switch modes. Hot opcodes scan
//! ahead over runs of like bytes (string body, digits, whitespace) as a pure
//! latency optimization.
//!
//! All resume state lives on the [`Parser`], so a buffer may end anywhere —
//! mid-string, mid-escape, mid-literal, mid-number — and the next call picks
//! up exactly where the previous one stopped.

mod number;
mod stack;
mod table;

use alloc::{string::String, vec::Vec};

use number::Number;
use stack::ContainerStack;
use table::{Mode, Op, Table, Term};

use crate::{
    error::{ErrorKind, ParseError},
    value::Value,
};

#[cfg(feature = "std")]
use crate::error::Error;

#[cfg(feature = "std")]
const READ_BUF_SIZE: usize = 4096;

type Callback<'a> = &'a mut dyn FnMut(Value) -> bool;

/// A reusable JSON parser.
///
/// One instance owns all working buffers; reusing it across parses retains
/// their capacity, which makes repeated parses of small documents amortized
/// allocation-free. An instance is not safe for concurrent use — give each
/// worker its own.
///
/// # Examples
///
/// ```
/// use jsontree::{Parser, Value};
///
/// let mut parser = Parser::new();
/// assert_eq!(parser.parse(b"[true]").unwrap().as_array().unwrap().len(), 1);
/// assert_eq!(parser.parse(b"7").unwrap(), Value::Int(7));
/// ```
pub struct Parser {
    stack: ContainerStack,
    num: Number,
    /// String bytes accumulated when a literal spans buffers or contains
    /// escapes.
    tmp: Vec<u8>,
    mode: &'static Table,
    /// The mode a string terminator re-enters: value position or key
    /// position.
    next_mode: &'static Table,
    line: usize,
    /// Offset of the most recent newline. Negative once rebased across chunk
    /// boundaries; `column = off - noff` stays correct either way.
    noff: isize,
    /// Read index into a partial `null`/`true`/`false` literal or a `\uXXXX`
    /// escape.
    ri: usize,
    /// Accumulated code point of a `\uXXXX` escape.
    rn: u32,
    result: Option<Value>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: ContainerStack::default(),
            num: Number::default(),
            tmp: Vec::new(),
            mode: &table::VALUE,
            next_mode: &table::AFTER,
            line: 1,
            noff: -1,
            ri: 0,
            rn: 0,
            result: None,
        }
    }

    /// Parses a complete buffer holding exactly one top-level JSON value.
    ///
    /// Anything after the value other than whitespace is an error.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] with the position of the first offending
    /// byte.
    pub fn parse(&mut self, json: &[u8]) -> Result<Value, ParseError> {
        self.begin();
        let buf = strip_bom(json)?;
        match self.parse_buffer(buf, true, &mut None) {
            Ok(()) => Ok(self.result.take().unwrap_or(Value::Null)),
            Err(err) => {
                self.drain();
                Err(err)
            }
        }
    }

    /// Parses a buffer holding any number of whitespace-separated top-level
    /// JSON values, invoking `callback` once per value.
    ///
    /// The callback's boolean return is reserved for stop-iteration
    /// signalling; both values are currently accepted and ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] with the position of the first offending
    /// byte.
    pub fn parse_with<F>(&mut self, json: &[u8], mut callback: F) -> Result<(), ParseError>
    where
        F: FnMut(Value) -> bool,
    {
        self.begin();
        let buf = strip_bom(json)?;
        let mut cb: Option<Callback<'_>> = Some(&mut callback);
        match self.parse_buffer(buf, true, &mut cb) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.drain();
                Err(err)
            }
        }
    }

    /// Parses exactly one top-level JSON value drawn from `reader` in
    /// fixed-size chunks.
    ///
    /// Chunk boundaries never change the outcome; partial strings, numbers,
    /// escapes, and literals resume on the next chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for invalid JSON and [`Error::Io`] if the
    /// reader fails; either way internal buffers are drained and no partial
    /// value is kept.
    #[cfg(feature = "std")]
    pub fn parse_reader<R: std::io::Read>(&mut self, reader: R) -> Result<Value, Error> {
        self.begin();
        match self.read_loop(reader, &mut None) {
            Ok(()) => Ok(self.result.take().unwrap_or(Value::Null)),
            Err(err) => {
                self.drain();
                Err(err)
            }
        }
    }

    /// Parses a stream of top-level JSON values from `reader`, invoking
    /// `callback` once per value. See [`parse_reader`](Self::parse_reader)
    /// and [`parse_with`](Self::parse_with).
    ///
    /// # Errors
    ///
    /// As for [`parse_reader`](Self::parse_reader).
    #[cfg(feature = "std")]
    pub fn parse_reader_with<R, F>(&mut self, reader: R, mut callback: F) -> Result<(), Error>
    where
        R: std::io::Read,
        F: FnMut(Value) -> bool,
    {
        self.begin();
        let mut cb: Option<Callback<'_>> = Some(&mut callback);
        match self.read_loop(reader, &mut cb) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.drain();
                Err(err)
            }
        }
    }

    /// Resets lengths for a fresh parse. Capacities are retained.
    fn begin(&mut self) {
        self.stack.clear();
        self.tmp.clear();
        self.num.reset();
        self.mode = &table::VALUE;
        self.next_mode = &table::AFTER;
        self.line = 1;
        self.noff = -1;
        self.ri = 0;
        self.rn = 0;
        self.result = None;
    }

    /// Releases values held mid-parse after an error.
    fn drain(&mut self) {
        self.stack.clear();
        self.tmp.clear();
        self.num.reset();
        self.result = None;
    }

    #[cfg(feature = "std")]
    fn read_loop<R: std::io::Read>(
        &mut self,
        mut reader: R,
        cb: &mut Option<Callback<'_>>,
    ) -> Result<(), Error> {
        let mut buf = alloc::vec![0u8; READ_BUF_SIZE];
        let mut len = 0usize;
        let mut eof = false;
        // Top the first chunk up to three bytes when it opens like a BOM, so
        // that an arbitrarily fragmented reader still resolves it.
        while !eof && len < 3 {
            let n = reader.read(&mut buf[len..])?;
            if n == 0 {
                eof = true;
            } else {
                len += n;
            }
            if len > 0 && buf[0] != 0xEF {
                break;
            }
        }
        let mut start = 0;
        if len > 0 && buf[0] == 0xEF {
            if len >= 3 && buf[1] == 0xBB && buf[2] == 0xBF {
                start = 3;
            } else {
                return Err(bom_error().into());
            }
        }
        loop {
            self.parse_buffer(&buf[start..len], eof, cb)?;
            if eof {
                return Ok(());
            }
            // Rebase the newline offset so columns remain correct relative to
            // the next chunk's origin.
            self.noff -= (len - start) as isize;
            start = 0;
            len = reader.read(&mut buf)?;
            if len == 0 {
                eof = true;
            }
        }
    }

    /// Runs the state machine over one buffer. `last` marks the end of the
    /// whole input and triggers terminator-class handling.
    fn parse_buffer(
        &mut self,
        buf: &[u8],
        last: bool,
        cb: &mut Option<Callback<'_>>,
    ) -> Result<(), ParseError> {
        let mut off = 0;
        while off < buf.len() {
            let b = buf[off];
            match self.mode.ops[b as usize] {
                Op::Skip => {}
                Op::SkipNewline => {
                    self.line += 1;
                    self.noff = off as isize;
                    off += skip_spaces(&buf[off + 1..]);
                }
                Op::ValNull => {
                    if buf.len() >= off + 4 && &buf[off..off + 4] == b"null" {
                        off += 3;
                        self.stack.add(Value::Null);
                        self.mode = &table::AFTER;
                    } else {
                        self.mode = &table::NULL;
                        self.ri = 0;
                    }
                }
                Op::ValTrue => {
                    if buf.len() >= off + 4 && &buf[off..off + 4] == b"true" {
                        off += 3;
                        self.stack.add(Value::Bool(true));
                        self.mode = &table::AFTER;
                    } else {
                        self.mode = &table::TRUE;
                        self.ri = 0;
                    }
                }
                Op::ValFalse => {
                    if buf.len() >= off + 5 && &buf[off..off + 5] == b"false" {
                        off += 4;
                        self.stack.add(Value::Bool(false));
                        self.mode = &table::AFTER;
                    } else {
                        self.mode = &table::FALSE;
                        self.ri = 0;
                    }
                }
                Op::NullOk => {
                    self.ri += 1;
                    if b"null"[self.ri] != b {
                        return Err(self.err_at(off, ErrorKind::ExpectedNull));
                    }
                    if self.ri >= 3 {
                        self.stack.add(Value::Null);
                        self.mode = &table::AFTER;
                    }
                }
                Op::TrueOk => {
                    self.ri += 1;
                    if b"true"[self.ri] != b {
                        return Err(self.err_at(off, ErrorKind::ExpectedTrue));
                    }
                    if self.ri >= 3 {
                        self.stack.add(Value::Bool(true));
                        self.mode = &table::AFTER;
                    }
                }
                Op::FalseOk => {
                    self.ri += 1;
                    if b"false"[self.ri] != b {
                        return Err(self.err_at(off, ErrorKind::ExpectedFalse));
                    }
                    if self.ri >= 4 {
                        self.stack.add(Value::Bool(false));
                        self.mode = &table::AFTER;
                    }
                }
                Op::ValNeg => {
                    self.num.reset();
                    self.num.set_neg();
                    self.mode = &table::NEG;
                }
                Op::ValZero => {
                    self.num.reset();
                    self.mode = &table::ZERO;
                }
                Op::NumZero => {
                    self.mode = &table::ZERO;
                }
                Op::ValDigit => {
                    self.num.reset();
                    self.num.add_digit(b);
                    let tail = &buf[off + 1..];
                    let mut n = 0;
                    while n < tail.len() && tail[n].is_ascii_digit() {
                        self.num.add_digit(tail[n]);
                        n += 1;
                    }
                    off += n;
                    self.mode = &table::DIGIT;
                }
                Op::NegDigit | Op::NumDigit => {
                    self.num.add_digit(b);
                    let tail = &buf[off + 1..];
                    let mut n = 0;
                    while n < tail.len() && tail[n].is_ascii_digit() {
                        self.num.add_digit(tail[n]);
                        n += 1;
                    }
                    off += n;
                    self.mode = &table::DIGIT;
                }
                Op::NumDot => {
                    if self.num.is_big() {
                        self.num.push_big(b);
                    }
                    self.mode = &table::DOT;
                }
                Op::NumFrac => {
                    self.num.add_frac(b);
                    let tail = &buf[off + 1..];
                    let mut n = 0;
                    while n < tail.len() && tail[n].is_ascii_digit() {
                        self.num.add_frac(tail[n]);
                        n += 1;
                    }
                    off += n;
                    self.mode = &table::FRAC;
                }
                Op::FracExp => {
                    if self.num.is_big() {
                        self.num.push_big(b);
                    }
                    self.mode = &table::EXP_SIGN;
                }
                Op::ExpSign => {
                    if b == b'-' {
                        self.num.set_neg_exp();
                    }
                    if self.num.is_big() {
                        self.num.push_big(b);
                    }
                    self.mode = &table::EXP_ZERO;
                }
                Op::ExpDigit => {
                    self.num.add_exp(b);
                    let tail = &buf[off + 1..];
                    let mut n = 0;
                    while n < tail.len() && tail[n].is_ascii_digit() {
                        self.num.add_exp(tail[n]);
                        n += 1;
                    }
                    off += n;
                    self.mode = &table::EXP;
                }
                Op::NumSpc => {
                    let v = self.num.as_value();
                    self.stack.add(v);
                    self.mode = &table::AFTER;
                }
                Op::NumNewline => {
                    let v = self.num.as_value();
                    self.stack.add(v);
                    self.line += 1;
                    self.noff = off as isize;
                    off += skip_spaces(&buf[off + 1..]);
                    self.mode = &table::AFTER;
                }
                Op::NumComma => {
                    if self.stack.depth() == 0 {
                        return Err(self.err_at(off, ErrorKind::UnexpectedCharacter(',')));
                    }
                    let v = self.num.as_value();
                    self.stack.add(v);
                    self.mode = if self.stack.in_object() {
                        &table::KEY
                    } else {
                        &table::COMMA
                    };
                }
                Op::NumCloseArray => {
                    let v = self.num.as_value();
                    self.stack.add(v);
                    if let Err(kind) = self.stack.close_array() {
                        return Err(self.err_at(off, kind));
                    }
                    self.mode = &table::AFTER;
                }
                Op::NumCloseObject => {
                    let v = self.num.as_value();
                    self.stack.add(v);
                    if let Err(kind) = self.stack.close_object() {
                        return Err(self.err_at(off, kind));
                    }
                    self.mode = &table::AFTER;
                }
                Op::OpenArray => {
                    self.stack.open_array();
                    self.mode = &table::VALUE;
                }
                Op::OpenObject => {
                    self.stack.open_object();
                    self.mode = &table::KEY1;
                }
                Op::CloseArray => {
                    if let Err(kind) = self.stack.close_array() {
                        return Err(self.err_at(off, kind));
                    }
                    self.mode = &table::AFTER;
                }
                Op::CloseObject => {
                    if let Err(kind) = self.stack.close_object() {
                        return Err(self.err_at(off, kind));
                    }
                    self.mode = &table::AFTER;
                }
                Op::AfterComma => {
                    if self.stack.depth() == 0 {
                        return Err(self.err_at(off, ErrorKind::UnexpectedCharacter(b as char)));
                    }
                    self.mode = if self.stack.in_object() {
                        &table::KEY
                    } else {
                        &table::COMMA
                    };
                }
                Op::Colon => {
                    self.mode = &table::VALUE;
                }
                Op::ValQuote => {
                    off = self.begin_string(buf, off, &table::AFTER);
                }
                Op::KeyQuote => {
                    off = self.begin_string(buf, off, &table::COLON);
                }
                Op::StrOk => {
                    let start = off;
                    let mut end = off + 1;
                    while end < buf.len() && table::STRING.ops[buf[end] as usize] == Op::StrOk {
                        end += 1;
                    }
                    self.tmp.extend_from_slice(&buf[start..end]);
                    off = end - 1;
                }
                Op::StrQuote => {
                    self.mode = self.next_mode;
                    let text = take_string(&mut self.tmp);
                    if self.mode.kind == Mode::Colon {
                        self.stack.set_key(text);
                    } else {
                        self.stack.add(Value::String(text));
                    }
                }
                Op::StrSlash => {
                    self.mode = &table::ESC;
                }
                Op::EscOk => {
                    self.tmp.push(table::ESC_BYTE[b as usize]);
                    self.mode = &table::STRING;
                }
                Op::EscU => {
                    self.mode = &table::UNICODE;
                    self.rn = 0;
                    self.ri = 0;
                }
                Op::UOk => {
                    self.ri += 1;
                    let nibble = match b {
                        b'0'..=b'9' => b - b'0',
                        b'a'..=b'f' => b - b'a' + 10,
                        _ => b - b'A' + 10,
                    };
                    self.rn = (self.rn << 4) | u32::from(nibble);
                    if self.ri == 4 {
                        // Unpaired surrogates cannot form a scalar value and
                        // degrade to U+FFFD.
                        let ch = char::from_u32(self.rn).unwrap_or(char::REPLACEMENT_CHARACTER);
                        let mut scratch = [0u8; 4];
                        self.tmp
                            .extend_from_slice(ch.encode_utf8(&mut scratch).as_bytes());
                        self.mode = &table::STRING;
                    }
                }
                Op::CharErr => {
                    return Err(self.byte_error(off, b));
                }
            }
            if self.stack.depth() == 0 && self.mode.term == Term::Complete {
                self.deliver(cb);
            }
            off += 1;
        }
        if last {
            self.finish_eof(buf.len(), cb)?;
        }
        Ok(())
    }

    /// Handles a `"` that starts a string in value (`next` = after-value) or
    /// key (`next` = colon) position. When the closing quote lies within
    /// `buf` and no escape intervenes, the text is taken straight from the
    /// input; otherwise the scanned prefix moves to `tmp` and string mode
    /// takes over. Returns the offset of the last consumed byte.
    fn begin_string(&mut self, buf: &[u8], off: usize, next: &'static Table) -> usize {
        let start = off + 1;
        let mut end = start;
        while end < buf.len() && table::STRING.ops[buf[end] as usize] == Op::StrOk {
            end += 1;
        }
        if end < buf.len() && buf[end] == b'"' {
            let text = text_from_bytes(&buf[start..end]);
            if next.kind == Mode::Colon {
                self.stack.set_key(text);
            } else {
                self.stack.add(Value::String(text));
            }
            self.mode = next;
            end
        } else {
            self.tmp.clear();
            self.tmp.extend_from_slice(&buf[start..end]);
            self.mode = &table::STRING;
            self.next_mode = next;
            end - 1
        }
    }

    /// Ships a completed top-level value and routes the mode to the
    /// appropriate idle state.
    fn deliver(&mut self, cb: &mut Option<Callback<'_>>) {
        match cb {
            Some(callback) => {
                if let Some(value) = self.stack.take_root() {
                    // The returned bool is reserved for stop-iteration.
                    let _ = callback(value);
                }
                self.mode = &table::BETWEEN;
            }
            None => {
                self.mode = &table::SPACE;
            }
        }
    }

    /// Terminator-class dispatch once the whole input is consumed.
    fn finish_eof(&mut self, off: usize, cb: &mut Option<Callback<'_>>) -> Result<(), ParseError> {
        match self.mode.term {
            Term::None => return Err(self.err_at(off, ErrorKind::IncompleteJson)),
            Term::Number => {
                let v = self.num.as_value();
                self.stack.add(v);
            }
            Term::Complete | Term::Space => {}
        }
        if self.stack.depth() > 0 {
            return Err(self.err_at(off, ErrorKind::IncompleteJson));
        }
        if let Some(value) = self.stack.take_root() {
            match cb {
                Some(callback) => {
                    let _ = callback(value);
                }
                None => self.result = Some(value),
            }
        }
        Ok(())
    }

    /// The mode-specific diagnostic for a `CharErr` byte.
    fn byte_error(&self, off: usize, b: u8) -> ParseError {
        let c = b as char;
        let kind = match self.mode.kind {
            Mode::Null => ErrorKind::ExpectedNull,
            Mode::True => ErrorKind::ExpectedTrue,
            Mode::False => ErrorKind::ExpectedFalse,
            Mode::After => ErrorKind::ExpectedCommaOrClose(c),
            Mode::Key1 => ErrorKind::ExpectedKeyOrClose(c),
            Mode::Key => ErrorKind::ExpectedKey(c),
            Mode::Colon => ErrorKind::ExpectedColon(c),
            Mode::Neg
            | Mode::Zero
            | Mode::Digit
            | Mode::Dot
            | Mode::Frac
            | Mode::ExpSign
            | Mode::ExpZero
            | Mode::Exp => ErrorKind::InvalidNumber,
            Mode::Str => ErrorKind::InvalidStringByte(b),
            Mode::Esc => ErrorKind::InvalidEscape(c),
            Mode::Unicode => ErrorKind::InvalidUnicodeEscape(c),
            Mode::Space => ErrorKind::ExtraCharacters(c),
            Mode::Value | Mode::Comma | Mode::Between => ErrorKind::UnexpectedCharacter(c),
        };
        self.err_at(off, kind)
    }

    fn err_at(&self, off: usize, kind: ErrorKind) -> ParseError {
        ParseError {
            kind,
            line: self.line,
            column: (off as isize - self.noff) as usize,
        }
    }
}

/// Length of the run of non-newline whitespace at the start of `tail`.
fn skip_spaces(tail: &[u8]) -> usize {
    let mut n = 0;
    while n < tail.len() && table::SPACE.ops[tail[n] as usize] == Op::Skip {
        n += 1;
    }
    n
}

fn text_from_bytes(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn take_string(tmp: &mut Vec<u8>) -> String {
    let text = String::from_utf8_lossy(tmp).into_owned();
    tmp.clear();
    text
}

/// Consumes a UTF-8 byte-order mark. A lone `0xEF` prefix that does not
/// complete the mark is an error.
fn strip_bom(buf: &[u8]) -> Result<&[u8], ParseError> {
    if buf.first() == Some(&0xEF) {
        if buf.len() >= 3 && buf[1] == 0xBB && buf[2] == 0xBF {
            Ok(&buf[3..])
        } else {
            Err(bom_error())
        }
    } else {
        Ok(buf)
    }
}

fn bom_error() -> ParseError {
    ParseError {
        kind: ErrorKind::ExpectedBom,
        line: 1,
        column: 3,
    }
}
