//! Loose value semantics shared by search, filters and sorting.
//!
//! Cell values are plain [`serde_json::Value`]s. The functions here define how
//! two cells are compared and how a cell turns into text:
//!
//! - [`to_text`]: string coercion used by search and the string operators
//! - [`to_number`]: numeric coercion used by mixed-type comparisons
//! - [`strict_eq`]: equality for `equals` and `in`
//! - [`loose_cmp`]: ordering for `greaterThan`, `lessThan` and `between`
//! - [`sort_cmp`]: total ordering for sorting rows

use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Coerces a cell to text.
///
/// `null` becomes the empty string, arrays join their elements with `,` and
/// objects render as `[object Object]`. Integral floats print without a
/// fractional part so `2.0` and `2` read the same.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vuege::domain::value::to_text;
///
/// assert_eq!(to_text(&json!("Moscow")), "Moscow");
/// assert_eq!(to_text(&json!(2.0)), "2");
/// assert_eq!(to_text(&json!([1, "a"])), "1,a");
/// assert_eq!(to_text(&json!(null)), "");
/// ```
#[must_use]
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Coerces a cell to a number.
///
/// Booleans map to `1`/`0`, `null` and blank strings to `0`. Strings that do not
/// parse, arrays and objects have no numeric value.
#[must_use]
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok().filter(|f| !f.is_nan())
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Strict equality: same type and same value, with numbers compared by
/// magnitude so `1` equals `1.0`.
#[must_use]
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Type-coercive ordering.
///
/// Two strings compare lexicographically. Every other pair is compared by
/// [`to_number`]; `None` means the pair is incomparable and no relational test
/// between them holds.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use std::cmp::Ordering;
/// use vuege::domain::value::loose_cmp;
///
/// assert_eq!(loose_cmp(&json!("10"), &json!(9)), Some(Ordering::Greater));
/// assert_eq!(loose_cmp(&json!("10"), &json!("9")), Some(Ordering::Less));
/// assert_eq!(loose_cmp(&json!("abc"), &json!(1)), None);
/// ```
#[must_use]
pub fn loose_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Value::String(x), Value::String(y)) = (a, b) {
        return Some(x.cmp(y));
    }
    let x = to_number(a)?;
    let y = to_number(b)?;
    x.partial_cmp(&y)
}

fn sort_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) | Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) | Value::Object(_) => 3,
    }
}

/// Total ordering used for sorting rows.
///
/// Values are grouped by kind (`null`, then booleans and numbers, then strings,
/// then arrays and objects) and ordered within each group. Unlike [`loose_cmp`]
/// this never reports two values as incomparable, so it is safe to hand to
/// `sort_by`.
#[must_use]
pub fn sort_cmp(a: &Value, b: &Value) -> Ordering {
    let (ra, rb) = (sort_rank(a), sort_rank(b));
    if ra != rb {
        return ra.cmp(&rb);
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(_) | Value::Object(_), _) => to_text(a).cmp(&to_text(b)),
        _ => {
            let x = to_number(a).unwrap_or(0.0);
            let y = to_number(b).unwrap_or(0.0);
            x.total_cmp(&y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_coercion() {
        assert_eq!(to_text(&json!(true)), "true");
        assert_eq!(to_text(&json!(1.25)), "1.25");
        assert_eq!(to_text(&json!(-3)), "-3");
        assert_eq!(to_text(&json!({ "a": 1 })), "[object Object]");
        assert_eq!(to_text(&json!([[1, 2], null])), "1,2,");
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(to_number(&json!(" 42 ")), Some(42.0));
        assert_eq!(to_number(&json!("")), Some(0.0));
        assert_eq!(to_number(&json!(false)), Some(0.0));
        assert_eq!(to_number(&json!("4x")), None);
        assert_eq!(to_number(&json!([1])), None);
    }

    #[test]
    fn equality_is_type_strict() {
        assert!(strict_eq(&json!(1), &json!(1.0)));
        assert!(!strict_eq(&json!(1), &json!("1")));
        assert!(strict_eq(&json!("B"), &json!("B")));
        assert!(!strict_eq(&json!(null), &json!(0)));
    }

    #[test]
    fn ordering_mixes_types() {
        assert_eq!(loose_cmp(&json!(2), &json!(10)), Some(Ordering::Less));
        assert_eq!(loose_cmp(&json!(true), &json!(0)), Some(Ordering::Greater));
        assert_eq!(loose_cmp(&json!("1999-01-01"), &json!("2001-05-09")), Some(Ordering::Less));
        assert_eq!(loose_cmp(&json!({}), &json!(1)), None);
    }

    #[test]
    fn sort_order_is_total() {
        let mut values = vec![json!("b"), json!(3), json!(null), json!([1]), json!(true), json!("a"), json!(-1.5)];
        values.sort_by(sort_cmp);
        assert_eq!(
            values,
            vec![json!(null), json!(-1.5), json!(true), json!(3), json!("a"), json!("b"), json!([1])]
        );
        assert_eq!(sort_cmp(&json!(2), &json!(2.0)), Ordering::Equal);
    }
}
