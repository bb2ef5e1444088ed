//! Coercion of JSON settings nodes into typed scalars and vectors.
//!
//! All functions here are pure. A scalar node is treated as a one-element
//! vector; objects and null never coerce.

use serde_json::Value;

/// Scalar types a setting can be read as.
pub trait FromSetting: Sized {
    /// Name used in type mismatch errors.
    const EXPECTED: &'static str;

    fn from_setting(value: &Value) -> Option<Self>;
}

impl FromSetting for i64 {
    const EXPECTED: &'static str = "int";

    fn from_setting(value: &Value) -> Option<Self> {
        value_as_int(value)
    }
}

impl FromSetting for f64 {
    const EXPECTED: &'static str = "double";

    fn from_setting(value: &Value) -> Option<Self> {
        value_as_double(value)
    }
}

impl FromSetting for String {
    const EXPECTED: &'static str = "string";

    fn from_setting(value: &Value) -> Option<Self> {
        value_as_string(value)
    }
}

/// Values a setting can be written from.
///
/// Non-finite doubles have no JSON number form, so they are stored as their
/// string spelling (`"inf"`, `"-inf"`, `"NaN"`), which reads back as a double.
pub trait ToSetting {
    fn to_setting(self) -> Value;
}

impl ToSetting for f64 {
    fn to_setting(self) -> Value {
        if self.is_finite() {
            Value::from(self)
        } else {
            Value::String(self.to_string())
        }
    }
}

impl ToSetting for f32 {
    fn to_setting(self) -> Value {
        f64::from(self).to_setting()
    }
}

macro_rules! to_setting_via_from {
    ($($ty:ty),*) => {
        $(
            impl ToSetting for $ty {
                fn to_setting(self) -> Value {
                    Value::from(self)
                }
            }
        )*
    };
}

to_setting_via_from!(i32, i64, u32, u64, bool, String, &str);

impl ToSetting for &String {
    fn to_setting(self) -> Value {
        Value::from(self.as_str())
    }
}

impl ToSetting for Value {
    fn to_setting(self) -> Value {
        self
    }
}

pub fn value_as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(truncate_to_int)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(truncate_to_int))
        }
        Value::Bool(flag) => Some(i64::from(*flag)),
        _ => None,
    }
}

pub fn value_as_double(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn truncate_to_int(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

/// The elements of a node viewed as a vector.
///
/// Arrays yield their items, scalars yield themselves. Objects and null have
/// no elements.
pub fn elements(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(_) | Value::Null => &[],
        scalar => std::slice::from_ref(scalar),
    }
}

pub fn element_count(value: &Value) -> usize {
    elements(value).len()
}

/// Coerce every element, or nothing at all. Objects and null never coerce.
pub fn vector_as<T: FromSetting>(value: &Value) -> Option<Vec<T>> {
    if value.is_object() || value.is_null() {
        return None;
    }
    elements(value).iter().map(T::from_setting).collect()
}

pub fn element_as<T: FromSetting>(value: &Value, index: usize) -> Option<T> {
    elements(value).get(index).and_then(T::from_setting)
}
