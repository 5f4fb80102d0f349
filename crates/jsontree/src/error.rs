//! Parse error types.

use alloc::string::String;

use thiserror::Error;

/// The reason a parse failed.
///
/// Each variant renders the exact diagnostic message; position information
/// lives on [`ParseError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("expected a comma or close, not '{0}'")]
    ExpectedCommaOrClose(char),
    #[error("expected a string start or object close, not '{0}'")]
    ExpectedKeyOrClose(char),
    #[error("expected a string start, not '{0}'")]
    ExpectedKey(char),
    #[error("expected a colon, not '{0}'")]
    ExpectedColon(char),
    #[error("invalid number")]
    InvalidNumber,
    /// A control or otherwise forbidden byte inside a string literal.
    #[error("invalid JSON character 0x{0:02x}")]
    InvalidStringByte(u8),
    #[error("invalid JSON escape character '\\{0}'")]
    InvalidEscape(char),
    #[error("invalid JSON unicode character '{0}'")]
    InvalidUnicodeEscape(char),
    /// Non-whitespace input after the single expected top-level value.
    #[error("extra characters after close, '{0}'")]
    ExtraCharacters(char),
    #[error("expected null")]
    ExpectedNull,
    #[error("expected true")]
    ExpectedTrue,
    #[error("expected false")]
    ExpectedFalse,
    #[error("too many closes")]
    TooManyCloses,
    #[error("unexpected array close")]
    UnexpectedArrayClose,
    #[error("unexpected object close")]
    UnexpectedObjectClose,
    /// Input ended in a state that cannot complete a document.
    #[error("incomplete JSON")]
    IncompleteJson,
    /// A leading `0xEF` that is not part of a full UTF-8 byte-order mark.
    #[error("expected BOM")]
    ExpectedBom,
}

/// A syntax error with its position in the input.
///
/// `line` is 1-based and counts newline bytes outside strings; `column` is
/// the 1-based byte offset from the most recent newline, and stays accurate
/// across reader chunk boundaries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} at {line}:{column}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    /// The diagnostic message without the position suffix.
    #[must_use]
    pub fn message(&self) -> String {
        use alloc::string::ToString;

        self.kind.to_string()
    }
}

/// Any error surfaced by the reader-based entry points: either a syntax
/// error or a failure of the underlying reader.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[cfg(feature = "std")]
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the syntax error, if that is what this is.
    #[must_use]
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            Error::Parse(e) => Some(e),
            #[cfg(feature = "std")]
            Error::Io(_) => None,
        }
    }
}
