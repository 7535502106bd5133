//! Primitive types: string, symbol, boolean, integer, float and the
//! JSON-backed json/array/hash types.

use indexmap::IndexMap;

use crate::error::{CastError, CastResult};
use crate::registry::TypeSpec;
use crate::value::Value;

pub(crate) fn specs() -> Vec<TypeSpec> {
    vec![
        TypeSpec::new("string")
            .if_unset("")
            .parser(|raw| Ok(Value::from(raw))),
        TypeSpec::new("symbol")
            .if_unset(Value::Symbol(String::new()))
            .parser(|raw| Ok(Value::Symbol(raw.to_owned()))),
        TypeSpec::new("boolean")
            .if_unset(false)
            .parser(|raw| Ok(Value::Bool(parse_bool(raw)))),
        TypeSpec::new("integer")
            .alias("int")
            .if_unset(0)
            .parser(|raw| Ok(Value::Integer(parse_int(raw)))),
        TypeSpec::new("float")
            .aliases(["decimal", "number"])
            .if_unset(0.0)
            .parser(|raw| Ok(Value::Float(parse_float(raw)))),
        TypeSpec::new("json").parser(parse_json),
        TypeSpec::new("array")
            .if_unset(Value::Array(Vec::new()))
            .parser(|raw| match parse_json(raw)? {
                value @ Value::Array(_) => Ok(value),
                _ => Err(CastError::not_convertible("array", "non-array value")),
            }),
        TypeSpec::new("hash")
            .if_unset(Value::Hash(IndexMap::new()))
            .parser(|raw| match parse_json(raw)? {
                value @ Value::Hash(_) => Ok(value),
                _ => Err(CastError::not_convertible("hash", "non-hash value")),
            }),
    ]
}

/// `""`, `"0"`, `"f"` and `"false"` are false; everything else is true.
#[must_use]
pub fn parse_bool(raw: &str) -> bool {
    !matches!(raw, "" | "0" | "f" | "false")
}

/// Parses the leading integer of `raw`, ignoring whatever follows.
///
/// Leading whitespace and a sign are accepted, and single underscores
/// may separate digits (`1_000`). Input without a leading integer is
/// `0`; out-of-range input saturates.
#[must_use]
pub fn parse_int(raw: &str) -> i64 {
    let prefix = numeric_prefix(raw, false);
    if prefix.is_empty() {
        return 0;
    }
    prefix.parse::<i64>().unwrap_or_else(|_| {
        if prefix.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Parses the leading decimal number of `raw` (fraction and exponent
/// allowed). Input without a leading number is `0.0`.
#[must_use]
pub fn parse_float(raw: &str) -> f64 {
    numeric_prefix(raw, true).parse::<f64>().unwrap_or(0.0)
}

/// Decodes any JSON document, including bare scalars such as `true`,
/// `25` or `"str"`.
pub fn parse_json(raw: &str) -> CastResult<Value> {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .map_err(|err| CastError::not_convertible("json", err.to_string()))
}

/// Extracts the longest numeric prefix, with underscores removed.
fn numeric_prefix(raw: &str, fractional: bool) -> String {
    let bytes = raw.trim_start().as_bytes();
    let mut out = String::new();
    let mut pos = 0;

    if let Some(&sign @ (b'+' | b'-')) = bytes.first() {
        out.push(char::from(sign));
        pos = 1;
    }

    let int_digits = take_digits(bytes, &mut pos, &mut out);
    if !fractional {
        return if int_digits == 0 { String::new() } else { out };
    }

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) {
        out.push('.');
        pos += 1;
        frac_digits = take_digits(bytes, &mut pos, &mut out);
    }
    if int_digits == 0 && frac_digits == 0 {
        return String::new();
    }
    if int_digits == 0 {
        // ".5" parses as 0.5
        let sign_len = usize::from(out.starts_with(['+', '-']));
        out.insert(sign_len, '0');
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exponent = String::from("e");
        let mut probe = pos + 1;
        if let Some(&sign @ (b'+' | b'-')) = bytes.get(probe) {
            exponent.push(char::from(sign));
            probe += 1;
        }
        if take_digits(bytes, &mut probe, &mut exponent) > 0 {
            out.push_str(&exponent);
        }
    }

    out
}

/// Appends ASCII digits (allowing single `_` between digits) and returns
/// how many digits were taken.
fn take_digits(bytes: &[u8], pos: &mut usize, out: &mut String) -> usize {
    let mut count = 0;
    while let Some(&byte) = bytes.get(*pos) {
        if byte.is_ascii_digit() {
            out.push(char::from(byte));
            count += 1;
            *pos += 1;
        } else if byte == b'_'
            && count > 0
            && bytes.get(*pos + 1).is_some_and(u8::is_ascii_digit)
        {
            *pos += 1;
        } else {
            break;
        }
    }
    count
}
