//! Ordering, equality and canonical encoding of document values
//!
//! Ordering rules:
//! - null < bool < number < string < array < object
//! - Numbers compare numerically regardless of integer/float representation
//! - Arrays compare element-wise, then by length
//! - Objects compare by (key, value) pairs in key order, then by size

use std::cmp::Ordering;

use serde_json::{Map, Number, Value};

/// Rank of a value's type in the cross-type ordering.
pub fn type_order(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over values.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    let by_type = type_order(a).cmp(&type_order(b));
    if by_type != Ordering::Equal {
        return by_type;
    }

    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => compare_arrays(a, b),
        (Value::Object(a), Value::Object(b)) => compare_objects(a, b),
        _ => Ordering::Equal,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a.cmp(&b);
    }
    // serde_json numbers are always finite
    let a = a.as_f64().unwrap_or(0.0);
    let b = b.as_f64().unwrap_or(0.0);
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn compare_arrays(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = compare(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_objects(a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
    let mut a_entries: Vec<_> = a.iter().collect();
    let mut b_entries: Vec<_> = b.iter().collect();
    a_entries.sort_by(|x, y| x.0.cmp(y.0));
    b_entries.sort_by(|x, y| x.0.cmp(y.0));

    for ((ak, av), (bk, bv)) in a_entries.iter().zip(&b_entries) {
        let ord = ak.cmp(bk).then_with(|| compare(av, bv));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a_entries.len().cmp(&b_entries.len())
}

/// Strict equality: same representation, so integer `1` and float `1.0`
/// differ even though they compare equal.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    a == b
}

/// Returns true if `haystack` is an array holding an element strictly equal
/// to `needle`.
pub fn contains(haystack: &Value, needle: &Value) -> bool {
    haystack
        .as_array()
        .is_some_and(|items| items.iter().any(|item| values_equal(item, needle)))
}

/// Deterministic string encoding used inside canonical ids.
///
/// Strings are JSON-quoted so `"10"` and `10` encode differently.
pub fn canonical_id(value: &Value) -> String {
    let mut out = String::new();
    write_canonical_id(value, &mut out);
    out
}

fn write_canonical_id(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        // -0.0 equals 0.0 as a value, so it must encode the same
        Value::Number(n) if n.as_f64() == Some(0.0) && n.is_f64() => out.push_str("0.0"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(&quoted(s)),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical_id(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&quoted(key));
                out.push(':');
                write_canonical_id(&map[key.as_str()], out);
            }
            out.push('}');
        }
    }
}

fn quoted(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cross_type_order() {
        let ordered = [
            json!(null),
            json!(false),
            json!(-3),
            json!("a"),
            json!([1]),
            json!({"a": 1}),
        ];
        for pair in ordered.windows(2) {
            assert_eq!(compare(&pair[0], &pair[1]), Ordering::Less);
        }
    }

    #[test]
    fn test_numbers_compare_across_representations() {
        assert_eq!(compare(&json!(1), &json!(1.0)), Ordering::Equal);
        assert_eq!(compare(&json!(1), &json!(1.5)), Ordering::Less);
        assert_eq!(compare(&json!(-1), &json!(u64::MAX)), Ordering::Less);
        assert_eq!(compare(&json!(u64::MAX), &json!(u64::MAX - 1)), Ordering::Greater);
    }

    #[test]
    fn test_arrays_compare_lexicographically() {
        assert_eq!(compare(&json!([1, 2]), &json!([1, 3])), Ordering::Less);
        assert_eq!(compare(&json!([1, 2]), &json!([1])), Ordering::Greater);
        assert_eq!(compare(&json!([]), &json!([])), Ordering::Equal);
    }

    #[test]
    fn test_objects_compare_by_sorted_entries() {
        assert_eq!(compare(&json!({"a": 1}), &json!({"b": 0})), Ordering::Less);
        assert_eq!(compare(&json!({"a": 1}), &json!({"a": 2})), Ordering::Less);
        assert_eq!(
            compare(&json!({"a": 1}), &json!({"a": 1, "b": 1})),
            Ordering::Less
        );
    }

    #[test]
    fn test_strict_equality_and_containment() {
        assert!(!values_equal(&json!(1), &json!(1.0)));
        assert!(contains(&json!([1, "x"]), &json!("x")));
        assert!(!contains(&json!([1.0]), &json!(1)));
        assert!(!contains(&json!("x"), &json!("x")));
    }

    #[test]
    fn test_canonical_ids() {
        assert_eq!(canonical_id(&json!(null)), "null");
        assert_eq!(canonical_id(&json!("abc")), "\"abc\"");
        assert_ne!(canonical_id(&json!("10")), canonical_id(&json!(10)));
        assert_eq!(canonical_id(&json!(10)), "10");
        assert_eq!(canonical_id(&json!([1, true])), "[1,true]");
        assert_eq!(canonical_id(&json!({"b": 2, "a": [1]})), r#"{"a":[1],"b":2}"#);
    }

    #[test]
    fn test_signed_zero_encodes_like_equality() {
        assert_eq!(json!(-0.0), json!(0.0));
        assert_eq!(canonical_id(&json!(-0.0)), "0.0");
        assert_eq!(canonical_id(&json!([-0.0])), canonical_id(&json!([0.0])));
        assert_eq!(canonical_id(&json!(0)), "0");
    }
}
