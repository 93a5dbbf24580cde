//! Decoding primitive values from the process argument vector.
//!
//! Indices address the raw vector, program name included: generated
//! entry code asks for index `i + 1` to read the `i`-th parameter of
//! `main`.

use std::str;

use bril_rt_core::{ArgError, ArgType};

use crate::value::Value;

/// Random access to an argument vector as raw bytes.
///
/// Implemented for slices, arrays and vectors of anything byte-like, and
/// by the C ABI layer for a NULL-terminated `char **`.
pub trait ArgSource {
    /// Bytes of argument `index`, or `None` past the end.
    fn arg(&self, index: usize) -> Option<&[u8]>;

    /// Number of arguments.
    fn count(&self) -> usize;
}

impl<S: AsRef<[u8]>> ArgSource for [S] {
    fn arg(&self, index: usize) -> Option<&[u8]> {
        self.get(index).map(AsRef::as_ref)
    }

    fn count(&self) -> usize {
        self.len()
    }
}

impl<S: AsRef<[u8]>, const N: usize> ArgSource for [S; N] {
    fn arg(&self, index: usize) -> Option<&[u8]> {
        self.as_slice().arg(index)
    }

    fn count(&self) -> usize {
        N
    }
}

impl<S: AsRef<[u8]>> ArgSource for Vec<S> {
    fn arg(&self, index: usize) -> Option<&[u8]> {
        self.as_slice().arg(index)
    }

    fn count(&self) -> usize {
        self.len()
    }
}

fn arg_text<A: ArgSource + ?Sized>(args: &A, index: i64) -> Result<&str, ArgError> {
    let missing = || ArgError::Missing {
        index,
        available: args.count(),
    };
    let slot = usize::try_from(index).map_err(|_| missing())?;
    let bytes = args.arg(slot).ok_or_else(missing)?;
    str::from_utf8(bytes).map_err(|_| ArgError::NotUtf8 { index })
}

fn malformed(index: i64, text: &str, expected: ArgType) -> ArgError {
    ArgError::Malformed {
        index,
        text: text.to_string(),
        expected,
    }
}

/// Decode argument `index` as a signed 64-bit decimal integer.
///
/// An optional leading `+` or `-` is accepted; whitespace and values
/// outside the `i64` range are not.
pub fn parse_int<A: ArgSource + ?Sized>(args: &A, index: i64) -> Result<i64, ArgError> {
    let text = arg_text(args, index)?;
    text.parse()
        .map_err(|_| malformed(index, text, ArgType::Int))
}

/// Decode argument `index` as exactly `true` or `false`.
pub fn parse_bool<A: ArgSource + ?Sized>(args: &A, index: i64) -> Result<bool, ArgError> {
    let text = arg_text(args, index)?;
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(malformed(index, text, ArgType::Bool)),
    }
}

/// Decode argument `index` as a 64-bit float.
///
/// Accepts decimal and exponent notation plus the printed forms of the
/// non-finite values (`NaN`, `Infinity`, `-Infinity`), so anything
/// [`float_text`](crate::float_text) produces parses back.
pub fn parse_float<A: ArgSource + ?Sized>(args: &A, index: i64) -> Result<f64, ArgError> {
    let text = arg_text(args, index)?;
    match text {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        _ => text
            .parse()
            .map_err(|_| malformed(index, text, ArgType::Float)),
    }
}

/// Decode argument `index` as `ty`.
pub fn parse_value<A: ArgSource + ?Sized>(
    args: &A,
    index: i64,
    ty: ArgType,
) -> Result<Value, ArgError> {
    match ty {
        ArgType::Int => parse_int(args, index).map(Value::Int),
        ArgType::Bool => parse_bool(args, index).map(Value::Bool),
        ArgType::Float => parse_float(args, index).map(Value::Float),
    }
}
