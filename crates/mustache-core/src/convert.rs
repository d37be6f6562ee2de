/*
 * convert.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion from host data to template values.
//!
//! [`ToValue`] is the conversion protocol: any type that needs to appear
//! in a template's data implements it, and the renderer only ever sees
//! [`Value`]. Built-in implementations cover the primitives, standard
//! collections and `serde_json::Value` as the structural interchange
//! format.
//!
//! Conversions are total: they cannot fail for conforming input.
//! Non-finite floats degrade to [`Value::Null`] rather than erroring.

use crate::value::Value;
use std::collections::{BTreeMap, HashMap};

/// Convert a host value into a template [`Value`].
pub trait ToValue {
    /// Perform the conversion, consuming the host value.
    fn to_value(self) -> Value;
}

/// Identity conversion.
impl ToValue for Value {
    fn to_value(self) -> Value {
        self
    }
}

impl ToValue for String {
    fn to_value(self) -> Value {
        Value::String(self)
    }
}

impl ToValue for &str {
    fn to_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for char {
    fn to_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for bool {
    fn to_value(self) -> Value {
        Value::Bool(self)
    }
}

impl ToValue for () {
    fn to_value(self) -> Value {
        Value::Null
    }
}

macro_rules! impl_to_value_integer {
    ($($t:ty),* $(,)?) => {$(
        impl ToValue for $t {
            fn to_value(self) -> Value {
                Value::Number(serde_json::Number::from(self))
            }
        }
    )*};
}

impl_to_value_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ToValue for f64 {
    fn to_value(self) -> Value {
        serde_json::Number::from_f64(self).map_or(Value::Null, Value::Number)
    }
}

impl ToValue for f32 {
    fn to_value(self) -> Value {
        (self as f64).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(self) -> Value {
        Value::Array(self.into_iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for HashMap<String, T> {
    fn to_value(self) -> Value {
        Value::Object(self.into_iter().map(|(k, v)| (k, v.to_value())).collect())
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(self) -> Value {
        Value::Object(self.into_iter().map(|(k, v)| (k, v.to_value())).collect())
    }
}

/// Structural interchange: JSON maps one-to-one onto the value model.
impl ToValue for serde_json::Value {
    fn to_value(self) -> Value {
        match self {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(ToValue::to_value).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, v.to_value())).collect())
            }
        }
    }
}

/// Build an [`Value::Object`] from key/value pairs.
///
/// Use with [`field`] and [`json_field`]:
///
/// ```
/// use mustache_core::{object, field, json_field};
/// use serde_json::json;
///
/// let value = object([
///     field("name", "World"),
///     field("count", 3),
///     json_field("tags", json!(["a", "b"])),
/// ]);
/// ```
pub fn object(pairs: impl IntoIterator<Item = (String, Value)>) -> Value {
    Value::Object(pairs.into_iter().collect())
}

/// Pair a key with a natively convertible value.
pub fn field(key: impl Into<String>, value: impl ToValue) -> (String, Value) {
    (key.into(), value.to_value())
}

/// Pair a key with a value expressed in the JSON interchange format.
pub fn json_field(key: impl Into<String>, value: serde_json::Value) -> (String, Value) {
    (key.into(), value.to_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!("hi".to_value(), Value::String("hi".to_string()));
        assert_eq!('x'.to_value(), Value::String("x".to_string()));
        assert_eq!(true.to_value(), Value::Bool(true));
        assert_eq!(().to_value(), Value::Null);
        assert_eq!(42u8.to_value(), Value::Number(42.into()));
        assert_eq!((-3i64).to_value(), Value::Number((-3).into()));
    }

    #[test]
    fn test_float_conversions() {
        assert_eq!(
            1.5f64.to_value(),
            Value::Number(serde_json::Number::from_f64(1.5).unwrap())
        );
        // Non-finite floats have no Number form; conversion stays total.
        assert_eq!(f64::NAN.to_value(), Value::Null);
        assert_eq!(f64::INFINITY.to_value(), Value::Null);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Some("x").to_value(), Value::String("x".to_string()));
        assert_eq!(None::<String>.to_value(), Value::Null);
    }

    #[test]
    fn test_sequence_conversion() {
        assert_eq!(
            vec![1, 2, 3].to_value(),
            Value::Array(vec![
                Value::Number(1.into()),
                Value::Number(2.into()),
                Value::Number(3.into()),
            ])
        );
    }

    #[test]
    fn test_map_conversion() {
        let mut map = HashMap::new();
        map.insert("key".to_string(), "value");
        assert_eq!(
            map.to_value(),
            Value::Object(HashMap::from([(
                "key".to_string(),
                Value::String("value".to_string())
            )]))
        );
    }

    #[test]
    fn test_identity_conversion_is_idempotent() {
        let value = object([field("a", 1), field("b", vec!["x", "y"])]);
        assert_eq!(value.clone().to_value(), value);
    }

    #[test]
    fn test_json_conversion_preserves_structure() {
        let converted = json!({
            "name": "test",
            "count": 2,
            "nested": { "flag": true, "missing": null },
            "items": ["a", 1.5],
        })
        .to_value();

        let expected = object([
            field("name", "test"),
            field("count", 2),
            field(
                "nested",
                object([field("flag", true), field("missing", ())]),
            ),
            field(
                "items",
                Value::Array(vec![Value::String("a".to_string()), 1.5f64.to_value()]),
            ),
        ]);

        assert_eq!(converted, expected);
    }

    #[test]
    fn test_object_builder() {
        let value = object([field("name", "World"), json_field("tags", json!(["a"]))]);
        match value {
            Value::Object(map) => {
                assert_eq!(map.get("name"), Some(&Value::String("World".to_string())));
                assert_eq!(
                    map.get("tags"),
                    Some(&Value::Array(vec![Value::String("a".to_string())]))
                );
            }
            _ => panic!("Expected Object"),
        }
    }
}
