//! Cell values and numeric rounding.
//!
//! A [`CellValue`] is whatever ends up in a table cell: a number, or a
//! passthrough value (text, bool, null) that the formatter leaves alone.
//! [`try_round`] turns fractional numbers into fixed-point text and keeps
//! everything else as it is.

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Precision used when none (or zero) is requested.
pub const DEFAULT_PRECISION: u32 = 2;

/// Most fraction digits [`to_fixed`] will produce.
pub const MAX_FIXED_DIGITS: u32 = 100;

/// Fraction digits needed to print any `f64` exactly.
///
/// The smallest subnormal is 2^-1074, whose decimal expansion has 1074
/// fraction digits.
const EXACT_FRACTION_DIGITS: usize = 1075;

/// Largest integer magnitude an `f64` holds without gaps (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A value destined for a table cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing value; renders as an empty cell
    #[default]
    Null,
    /// Boolean passthrough
    Bool(bool),
    /// Numeric value, rounded by [`try_round`]
    Number(f64),
    /// Text passthrough (also the result of rounding a fractional number)
    Text(String),
}

impl CellValue {
    /// Create a text cell
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Coerce the cell to a number.
    ///
    /// Null is 0, booleans are 0/1, text is parsed (blank text is 0, the
    /// words `Infinity`/`-Infinity` are accepted, anything else unparsable
    /// is NaN). Used when a rounded cell is fed back into arithmetic.
    pub fn to_number(&self) -> f64 {
        match self {
            CellValue::Null => 0.0,
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::Number(v) => *v,
            CellValue::Text(s) => parse_number(s),
        }
    }
}

fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust also parses "inf" and "nan", which are not numbers here
        _ if trimmed
            .bytes()
            .any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E')) =>
        {
            f64::NAN
        }
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

fn is_integral(value: f64) -> bool {
    value % 1.0 == 0.0
}

/// Shortest display form of a number.
///
/// Integral values print without a fraction, non-finite values print as
/// `NaN`/`Infinity`, and magnitudes of 1e21 and above use exponent
/// notation with an explicit sign (`1e+21`).
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.abs() >= 1e21 {
        return format!("{:e}", value).replacen('e', "e+", 1);
    }
    if is_integral(value) {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Resolve an optional precision.
///
/// Both an absent precision and an explicit zero fall back to
/// [`DEFAULT_PRECISION`], so `try_round(5.5, Some(0))` is `"5.50"`.
pub fn effective_precision(precision: Option<u32>) -> u32 {
    match precision {
        None | Some(0) => DEFAULT_PRECISION,
        Some(p) => p,
    }
}

/// Format a number with exactly `digits` fraction digits.
///
/// Rounding works on the exact binary value: the nearest representation
/// wins and exact ties round away from zero. So `2.345` (stored slightly
/// above 2.345) gives `"2.35"` while `1.005` (stored slightly below) gives
/// `"1.00"`. The sign is kept for negative values that round to zero.
/// Requests above [`MAX_FIXED_DIGITS`] are clamped to it.
pub fn to_fixed(value: f64, digits: u32) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return number_to_string(value);
    }

    let digits = digits.min(MAX_FIXED_DIGITS) as usize;
    let exact = format!("{:.*}", digits + EXACT_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .collect();
    if matches!(frac_part.as_bytes().get(digits), Some(b'5'..=b'9')) {
        increment_digits(&mut kept);
    }

    let int_len = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    for (i, digit) in kept.iter().enumerate() {
        if i == int_len {
            out.push('.');
        }
        out.push(*digit as char);
    }
    out
}

/// Add one unit in the last place to a run of ASCII digits.
fn increment_digits(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Round a value for display.
///
/// Numbers with a fractional part become text fixed to `precision`
/// places (see [`effective_precision`] for the fallback). Integral numbers
/// and non-numeric values are returned unchanged. NaN and infinities count
/// as fractional and become `"NaN"`, `"Infinity"` or `"-Infinity"`.
pub fn try_round(value: impl Into<CellValue>, precision: Option<u32>) -> CellValue {
    match value.into() {
        CellValue::Number(v) if !is_integral(v) => {
            CellValue::Text(to_fixed(v, effective_precision(precision)))
        }
        other => other,
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Cow<'_, str> = match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Number(v) => Cow::Owned(number_to_string(*v)),
            CellValue::Text(s) => Cow::Borrowed(s),
        };
        // Respect width and alignment from the formatter
        f.pad(&s)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_unit(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Number(v) if is_integral(*v) && v.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*v as i64)
            }
            CellValue::Number(v) => serializer.serialize_f64(*v),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CellValue {
                fn from(value: $t) -> Self {
                    CellValue::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i32, i64, u32, u64, usize);

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

/// JSON arrays and objects are carried as their compact JSON text.
impl From<&serde_json::Value> for CellValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(CellValue::Null, CellValue::Number),
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        CellValue::from(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_numbers_pass_through() {
        assert_eq!(try_round(5, Some(2)), CellValue::Number(5.0));
        assert_eq!(try_round(5.0, None), CellValue::Number(5.0));
        assert_eq!(try_round(-12, Some(3)), CellValue::Number(-12.0));
    }

    #[test]
    fn test_fractional_numbers_become_text() {
        assert_eq!(try_round(5.0001, Some(2)), CellValue::text("5.00"));
        assert_eq!(try_round(2.345, None), CellValue::text("2.35"));
        assert_eq!(try_round(2.0 / 3.0, Some(4)), CellValue::text("0.6667"));
    }

    #[test]
    fn test_non_numbers_pass_through() {
        assert_eq!(try_round("abc", Some(2)), CellValue::text("abc"));
        assert_eq!(try_round(CellValue::Null, None), CellValue::Null);
        assert_eq!(try_round(true, None), CellValue::Bool(true));
        assert_eq!(try_round("2.345", None), CellValue::text("2.345"));
    }

    #[test]
    fn test_zero_precision_falls_back_to_default() {
        assert_eq!(try_round(5.5, Some(0)), CellValue::text("5.50"));
        assert_eq!(effective_precision(None), 2);
        assert_eq!(effective_precision(Some(0)), 2);
        assert_eq!(effective_precision(Some(3)), 3);
    }

    #[test]
    fn test_non_finite_numbers() {
        assert_eq!(try_round(f64::NAN, None), CellValue::text("NaN"));
        assert_eq!(try_round(f64::INFINITY, None), CellValue::text("Infinity"));
        assert_eq!(
            try_round(f64::NEG_INFINITY, None),
            CellValue::text("-Infinity")
        );
    }

    #[test]
    fn test_to_fixed_rounds_on_binary_value() {
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(2.345, 2), "2.35");
        assert_eq!(to_fixed(0.29 * 100.0, 0), "29");
        assert_eq!(to_fixed(0.0, 2), "0.00");
    }

    #[test]
    fn test_to_fixed_ties_round_away_from_zero() {
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(-2.5, 0), "-3");
    }

    #[test]
    fn test_to_fixed_carries() {
        assert_eq!(to_fixed(9.999, 2), "10.00");
        assert_eq!(to_fixed(99.5, 0), "100");
        assert_eq!(to_fixed(0.999, 1), "1.0");
    }

    #[test]
    fn test_to_fixed_sign() {
        assert_eq!(to_fixed(-0.001, 2), "-0.00");
        assert_eq!(to_fixed(-0.0, 2), "0.00");
        assert_eq!(to_fixed(-1.25, 1), "-1.3");
    }

    #[test]
    fn test_to_fixed_large_and_tiny() {
        assert_eq!(to_fixed(1e21, 2), "1e+21");
        assert_eq!(to_fixed(123456789.0, 1), "123456789.0");
        assert_eq!(to_fixed(5e-324, 3), "0.000");
    }

    #[test]
    fn test_to_fixed_clamps_digits() {
        assert_eq!(to_fixed(0.5, 100).len(), 102);
        assert_eq!(to_fixed(0.5, u32::MAX), to_fixed(0.5, MAX_FIXED_DIGITS));
        assert_eq!(try_round(1.5, Some(u32::MAX)), CellValue::Text(to_fixed(1.5, 100)));
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(5.0), "5");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(1.5e22), "1.5e+22");
        assert_eq!(number_to_string(f64::NAN), "NaN");
    }

    #[test]
    fn test_to_number_coercion() {
        assert_eq!(CellValue::text("0.29").to_number(), 0.29);
        assert_eq!(CellValue::text(" 12 ").to_number(), 12.0);
        assert_eq!(CellValue::text("").to_number(), 0.0);
        assert_eq!(CellValue::text("Infinity").to_number(), f64::INFINITY);
        assert!(CellValue::text("inf").to_number().is_nan());
        assert!(CellValue::text("NaN").to_number().is_nan());
        assert!(CellValue::text("abc").to_number().is_nan());
        assert_eq!(CellValue::text("1e3").to_number(), 1000.0);
        assert_eq!(CellValue::Null.to_number(), 0.0);
        assert_eq!(CellValue::Bool(true).to_number(), 1.0);
    }

    #[test]
    fn test_display_respects_width() {
        assert_eq!(format!("{:>6}", CellValue::Number(42.0)), "    42");
        assert_eq!(format!("{:<6}|", CellValue::text("ab")), "ab    |");
        assert_eq!(format!("{}", CellValue::Null), "");
    }

    #[test]
    fn test_serialize() {
        let cells = vec![
            CellValue::Number(1.0),
            CellValue::Number(0.5),
            CellValue::text("2.35"),
            CellValue::Null,
            CellValue::Bool(false),
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[1,0.5,"2.35",null,false]"#);
    }

    #[test]
    fn test_from_json() {
        let value = serde_json::json!({"a": [1, 2]});
        assert_eq!(CellValue::from(&value["a"]), CellValue::text("[1,2]"));
        assert_eq!(CellValue::from(&value["missing"]), CellValue::Null);
        assert_eq!(
            CellValue::from(serde_json::json!(3)),
            CellValue::Number(3.0)
        );
        assert_eq!(CellValue::from(None::<u32>), CellValue::Null);
    }
}
