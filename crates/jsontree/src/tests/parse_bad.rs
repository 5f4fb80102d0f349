use alloc::string::ToString;

use crate::{ErrorKind, ParseError, Parser};

fn parse_err(json: &[u8]) -> ParseError {
    Parser::new()
        .parse(json)
        .expect_err(core::str::from_utf8(json).unwrap_or("<non-utf8>"))
}

#[track_caller]
fn assert_parse_err(json: &str, message: &str, line: usize, column: usize) {
    let err = parse_err(json.as_bytes());
    assert_eq!(err.message(), message, "message for {json:?}");
    assert_eq!(
        (err.line, err.column),
        (line, column),
        "position for {json:?}"
    );
}

#[test]
fn unexpected_characters() {
    assert_parse_err("x", "unexpected character 'x'", 1, 1);
    assert_parse_err("}", "unexpected character '}'", 1, 1);
    assert_parse_err("+1", "unexpected character '+'", 1, 1);
    assert_parse_err(".5", "unexpected character '.'", 1, 1);
    assert_parse_err("1,2", "unexpected character ','", 1, 2);
}

#[test]
fn trailing_commas() {
    assert_parse_err("[1,]", "unexpected character ']'", 1, 4);
    assert_parse_err("[1,,2]", "unexpected character ','", 1, 4);
    assert_parse_err(r#"{"a":1,}"#, "expected a string start, not '}'", 1, 8);
}

#[test]
fn object_shape_errors() {
    assert_parse_err("{x", "expected a string start or object close, not 'x'", 1, 2);
    assert_parse_err("{]", "expected a string start or object close, not ']'", 1, 2);
    assert_parse_err(r#"{"a" 1}"#, "expected a colon, not '1'", 1, 6);
    assert_parse_err(r#"{"a":1 2"#, "expected a comma or close, not '2'", 1, 8);
}

#[test]
fn structural_errors() {
    assert_parse_err("]", "too many closes", 1, 1);
    // In single-value mode anything after the root is "extra characters";
    // the unbalanced close only surfaces as such between streamed values.
    assert_parse_err("[1]]", "extra characters after close, ']'", 1, 4);
    assert_parse_err("[1}", "unexpected object close", 1, 3);
    assert_parse_err("[1 }", "unexpected object close", 1, 4);
    assert_parse_err(r#"{"a":1]"#, "unexpected array close", 1, 7);

    let err = Parser::new()
        .parse_with(b"[1] ]", |_| false)
        .unwrap_err();
    assert_eq!(err.message(), "too many closes");
    assert_eq!((err.line, err.column), (1, 5));
}

#[test]
fn number_errors() {
    assert_parse_err("01", "invalid number", 1, 2);
    assert_parse_err("-x", "invalid number", 1, 2);
    assert_parse_err("1.x", "invalid number", 1, 3);
    assert_parse_err("[0.]", "invalid number", 1, 4);
    assert_parse_err("0.e1", "invalid number", 1, 3);
    assert_parse_err("1ex", "invalid number", 1, 3);
    assert_parse_err("1e-x", "invalid number", 1, 4);
    assert_parse_err("1e+ ", "invalid number", 1, 4);
}

#[test]
fn string_errors() {
    assert_parse_err("\"a\nb\"", "invalid JSON character 0x0a", 1, 3);
    assert_parse_err("\"\t\"", "invalid JSON character 0x09", 1, 2);
    assert_parse_err(r#""\q""#, r"invalid JSON escape character '\q'", 1, 3);
    assert_parse_err(r#""\uZZZZ""#, "invalid JSON unicode character 'Z'", 1, 4);
    assert_parse_err(r#""\u00G0""#, "invalid JSON unicode character 'G'", 1, 6);
}

#[test]
fn literal_errors() {
    assert_parse_err("nulx", "expected null", 1, 4);
    assert_parse_err("nn", "expected null", 1, 2);
    assert_parse_err("trux", "expected true", 1, 4);
    assert_parse_err("truu", "expected true", 1, 4);
    assert_parse_err("falsx", "expected false", 1, 5);
}

#[test]
fn extra_characters() {
    assert_parse_err(r#""abc"x"#, "extra characters after close, 'x'", 1, 6);
    assert_parse_err("[1] [2]", "extra characters after close, '['", 1, 5);
    assert_parse_err("7 7", "extra characters after close, '7'", 1, 3);
}

#[test]
fn incomplete_documents() {
    assert_parse_err("", "incomplete JSON", 1, 1);
    assert_parse_err("  ", "incomplete JSON", 1, 3);
    assert_parse_err("{ ", "incomplete JSON", 1, 3);
    assert_parse_err(r#"{"k":"#, "incomplete JSON", 1, 6);
    assert_parse_err("[1", "incomplete JSON", 1, 3);
    assert_parse_err("[1 ", "incomplete JSON", 1, 4);
    assert_parse_err("-", "incomplete JSON", 1, 2);
    assert_parse_err("0.", "incomplete JSON", 1, 3);
    assert_parse_err("1e", "incomplete JSON", 1, 3);
    assert_parse_err("1e+", "incomplete JSON", 1, 4);
    assert_parse_err("\"abc", "incomplete JSON", 1, 5);
    assert_parse_err("nul", "incomplete JSON", 1, 4);
}

#[test]
fn malformed_byte_order_mark() {
    let err = parse_err(b"\xEF");
    assert_eq!(err.kind, ErrorKind::ExpectedBom);
    assert_eq!((err.line, err.column), (1, 3));
    assert_eq!(parse_err(b"\xEF\xBB").kind, ErrorKind::ExpectedBom);
    assert_eq!(parse_err(b"\xEFx[1]").kind, ErrorKind::ExpectedBom);
}

#[test]
fn positions_track_newlines() {
    assert_parse_err("[1,\nx]", "unexpected character 'x'", 2, 1);
    assert_parse_err("[\n  y]", "unexpected character 'y'", 2, 3);
    assert_parse_err("[1\n2]", "expected a comma or close, not '2'", 2, 1);
    assert_parse_err("{\n\n!", "expected a string start or object close, not '!'", 3, 1);
}

#[test]
fn error_display_includes_position() {
    let err = parse_err(b"[1,]");
    insta::assert_snapshot!(err, @"unexpected character ']' at 1:4");

    let err = parse_err(b"\xEF");
    insta::assert_snapshot!(err, @"expected BOM at 1:3");

    let err = parse_err(br#"{"a" 1}"#);
    insta::assert_snapshot!(err.to_string(), @"expected a colon, not '1' at 1:6");
}

#[test]
fn errors_stop_the_stream() {
    let mut seen = 0usize;
    let err = Parser::new()
        .parse_with(b"[true,false] nope", |_| {
            seen += 1;
            false
        })
        .unwrap_err();
    assert_eq!(seen, 1, "the complete first value is still delivered");
    assert_eq!(err.message(), "expected null");
}
