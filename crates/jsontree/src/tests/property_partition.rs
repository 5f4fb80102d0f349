use alloc::{string::ToString, vec::Vec};

use quickcheck::QuickCheck;

use crate::{Parser, Value};

use super::util::TrickleReader;

/// Structural equality up to the integer/float split: a float that prints
/// without a fraction re-parses as an integer, and `i64::MIN` re-parses as a
/// promoted literal.
fn text_equivalent(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => *i as f64 == *f,
        (Value::Int(i), Value::Big(s)) | (Value::Big(s), Value::Int(i)) => {
            s.parse::<i64>() == Ok(*i)
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| text_equivalent(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y)
                    .all(|((ka, va), (kb, vb))| ka == kb && text_equivalent(va, vb))
        }
        _ => a == b,
    }
}

/// Feeding a serialized document through the reader in arbitrary chunk sizes
/// must yield exactly the whole-buffer result, and the whole-buffer result
/// must mirror the original tree.
#[test]
fn partition_roundtrip_quickcheck() {
    fn prop(value: Value, splits: Vec<usize>) -> bool {
        let src = value.to_string();

        let whole = match Parser::new().parse(src.as_bytes()) {
            Ok(v) => v,
            Err(_) => return false,
        };
        if !text_equivalent(&whole, &value) {
            return false;
        }

        let sizes: Vec<usize> = splits.into_iter().map(|s| s % 7 + 1).collect();
        let chunked = match Parser::new().parse_reader(TrickleReader::new(src.as_bytes(), sizes)) {
            Ok(v) => v,
            Err(_) => return false,
        };
        if chunked != whole {
            return false;
        }

        // Re-serializing the parsed tree is stable.
        let again = match Parser::new().parse(whole.to_string().as_bytes()) {
            Ok(v) => v,
            Err(_) => return false,
        };
        text_equivalent(&again, &whole)
    }

    let tests = if cfg!(miri) {
        10
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    };

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(Value, Vec<usize>) -> bool);
}

/// Callback mode sees the same stream whether the values arrive in one
/// buffer or byte by byte.
#[test]
fn multivalue_partition_quickcheck() {
    fn prop(values: Vec<Value>) -> bool {
        let src = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        if src.is_empty() {
            return true;
        }

        let mut whole = Vec::new();
        if Parser::new()
            .parse_with(src.as_bytes(), |v| {
                whole.push(v);
                false
            })
            .is_err()
        {
            return false;
        }

        let mut trickled = Vec::new();
        if Parser::new()
            .parse_reader_with(TrickleReader::bytewise(src.as_bytes()), |v| {
                trickled.push(v);
                false
            })
            .is_err()
        {
            return false;
        }

        whole.len() == values.len() && whole == trickled
    }

    let tests = if cfg!(miri) { 10 } else { 500 };
    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(Vec<Value>) -> bool);
}
