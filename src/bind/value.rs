//! Typed configuration values and string coercion
//!
//! This module defines the closed set of value kinds a binding may declare
//! and the parsers that coerce raw environment strings into them. Duration
//! is a distinct kind, never conflated with a plain 64-bit integer.

use chrono::TimeDelta;
use std::fmt;

/// A typed configuration value held by a binding's cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F64(f64),
    Bool(bool),
    Duration(TimeDelta),
}

/// The declared kind of a binding, one variant per supported type.
///
/// Each kind carries its own coercion rule via [`ValueKind::coerce`], so the
/// mapping from raw strings to typed values is checked at compile time
/// instead of being dispatched over runtime type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Str,
    I32,
    I64,
    U32,
    U64,
    F64,
    Bool,
    Duration,
}

impl ValueKind {
    /// Coerce a raw string into a typed value of this kind.
    ///
    /// Integers parse in base 10 at the declared width; unsigned kinds
    /// reject negative input; booleans accept `true`/`false`/`1`/`0`/`t`/`f`
    /// case-insensitively; durations accept signed unit-suffixed forms such
    /// as `"3h"` or `"1h30m"`. Strings pass through unchanged.
    pub fn coerce(self, raw: &str) -> std::result::Result<Value, String> {
        match self {
            ValueKind::Str => Ok(Value::Str(raw.to_string())),
            ValueKind::I32 => raw.parse::<i32>().map(Value::I32).map_err(|e| e.to_string()),
            ValueKind::I64 => raw.parse::<i64>().map(Value::I64).map_err(|e| e.to_string()),
            ValueKind::U32 => raw.parse::<u32>().map(Value::U32).map_err(|e| e.to_string()),
            ValueKind::U64 => raw.parse::<u64>().map(Value::U64).map_err(|e| e.to_string()),
            ValueKind::F64 => raw.parse::<f64>().map(Value::F64).map_err(|e| e.to_string()),
            ValueKind::Bool => parse_bool(raw).map(Value::Bool),
            ValueKind::Duration => parse_duration(raw).map(Value::Duration),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Str => "string",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::U32 => "u32",
            ValueKind::U64 => "u64",
            ValueKind::F64 => "f64",
            ValueKind::Bool => "bool",
            ValueKind::Duration => "duration",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Duration(v) => match v.num_nanoseconds() {
                Some(ns) => write!(f, "{ns}ns"),
                None => write!(f, "{}s", v.num_seconds()),
            },
        }
    }
}

fn parse_bool(raw: &str) -> std::result::Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(format!("invalid boolean literal: {raw:?}")),
    }
}

const NANOS_PER_US: i128 = 1_000;
const NANOS_PER_MS: i128 = 1_000_000;
const NANOS_PER_SEC: i128 = 1_000_000_000;
const NANOS_PER_MIN: i128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: i128 = 3_600 * NANOS_PER_SEC;

/// Parse a signed duration string: one or more `<number><unit>` components
/// (`ns`, `us`, `ms`, `s`, `m`, `h`), e.g. `"90s"`, `"1h30m"`, `"-1.5h"`.
/// A bare `"0"` is accepted without a unit.
pub fn parse_duration(raw: &str) -> std::result::Result<TimeDelta, String> {
    let trimmed = raw.trim();
    let (negative, mut rest) = match trimmed.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err(format!("invalid duration: {raw:?}"));
    }

    let mut total: i128 = 0;
    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(format!("invalid duration: {raw:?}"));
        }
        let int_part: i128 = rest[..digits_end]
            .parse()
            .map_err(|_| format!("invalid duration: {raw:?}"))?;
        rest = &rest[digits_end..];

        let mut frac_part = 0.0f64;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_end = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            if frac_end == 0 {
                return Err(format!("invalid duration: {raw:?}"));
            }
            frac_part = format!("0.{}", &after_dot[..frac_end])
                .parse::<f64>()
                .unwrap_or(0.0);
            rest = &after_dot[frac_end..];
        }

        // Two-letter units must be matched before the one-letter ones so
        // that "ms" is not read as minutes.
        let (unit_nanos, unit_len) = if rest.starts_with("ns") {
            (1, 2)
        } else if rest.starts_with("us") {
            (NANOS_PER_US, 2)
        } else if rest.starts_with("ms") {
            (NANOS_PER_MS, 2)
        } else if rest.starts_with('s') {
            (NANOS_PER_SEC, 1)
        } else if rest.starts_with('m') {
            (NANOS_PER_MIN, 1)
        } else if rest.starts_with('h') {
            (NANOS_PER_HOUR, 1)
        } else {
            return Err(format!("missing or unknown unit in duration: {raw:?}"));
        };
        rest = &rest[unit_len..];

        let component = int_part
            .checked_mul(unit_nanos)
            .and_then(|ns| ns.checked_add((frac_part * unit_nanos as f64) as i128))
            .ok_or_else(|| format!("duration out of range: {raw:?}"))?;
        total = total
            .checked_add(component)
            .ok_or_else(|| format!("duration out of range: {raw:?}"))?;
    }

    if negative {
        total = -total;
    }

    i64::try_from(total)
        .map(TimeDelta::nanoseconds)
        .map_err(|_| format!("duration out of range: {raw:?}"))
}

mod sealed {
    pub trait Sealed {}
}

/// Rust types that may back a binding: the closed set of declared types.
///
/// The trait is sealed so the supported set cannot grow outside the crate.
pub trait BindValue: sealed::Sealed + Clone + 'static {
    fn kind() -> ValueKind;
    fn into_value(self) -> Value;
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_bind_value {
    ($ty:ty, $variant:ident) => {
        impl sealed::Sealed for $ty {}

        impl BindValue for $ty {
            fn kind() -> ValueKind {
                ValueKind::$variant
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

impl_bind_value!(String, Str);
impl_bind_value!(i32, I32);
impl_bind_value!(i64, I64);
impl_bind_value!(u32, U32);
impl_bind_value!(u64, U64);
impl_bind_value!(f64, F64);
impl_bind_value!(bool, Bool);
impl_bind_value!(TimeDelta, Duration);
