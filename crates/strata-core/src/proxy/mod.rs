//! Proxy property synchronization.
//!
//! Provides the seam between the settings store and an external object
//! model:
//! - `SettingsProxy`: the capability set the store reads and writes through
//! - `PropertyValue`/`PropertyHandle`: typed property snapshots
//! - `InMemoryProxy`: a self-contained proxy backed by a property list

pub mod memory;
pub mod sync;

use serde_json::Value;

use crate::error::Result;
use crate::settings::coerce::{self, ToSetting};

pub use memory::{InMemoryProxy, PropertyDescription, ProxyDescription};
pub use sync::ProxySyncReport;

/// Typed property value. A scalar is a one-element vector.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Ints(Vec<i64>),
    Doubles(Vec<f64>),
    Strings(Vec<String>),
}

impl PropertyValue {
    pub fn len(&self) -> usize {
        match self {
            Self::Ints(values) => values.len(),
            Self::Doubles(values) => values.len(),
            Self::Strings(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Ints(_) => "int",
            Self::Doubles(_) => "double",
            Self::Strings(_) => "string",
        }
    }

    /// Coerce a settings node into a value of the same element kind as `self`.
    pub fn coerce_like(&self, value: &Value) -> Option<PropertyValue> {
        match self {
            Self::Ints(_) => coerce::vector_as(value).map(Self::Ints),
            Self::Doubles(_) => coerce::vector_as(value).map(Self::Doubles),
            Self::Strings(_) => coerce::vector_as(value).map(Self::Strings),
        }
    }

    /// Ints widened to doubles; other kinds unchanged.
    pub fn widen_to_doubles(&self) -> PropertyValue {
        match self {
            Self::Ints(values) => Self::Doubles(values.iter().map(|value| *value as f64).collect()),
            other => other.clone(),
        }
    }

    /// Infer a value from JSON.
    ///
    /// All-integer arrays become ints, any non-integer number makes the whole
    /// value doubles, strings become strings. Mixed or nested values and
    /// empty arrays are rejected.
    pub fn from_json(value: &Value) -> Option<PropertyValue> {
        let items = coerce::elements(value);
        if items.is_empty() {
            return None;
        }
        if items.iter().all(Value::is_string) {
            return coerce::vector_as(value).map(Self::Strings);
        }
        if !items.iter().all(Value::is_number) {
            return None;
        }
        if items.iter().all(|item| item.is_i64()) {
            coerce::vector_as(value).map(Self::Ints)
        } else {
            coerce::vector_as(value).map(Self::Doubles)
        }
    }

    /// Settings representation: a bare scalar when `as_scalar` and there is
    /// exactly one element, an array otherwise.
    pub fn to_json(&self, as_scalar: bool) -> Value {
        let mut items: Vec<Value> = match self {
            Self::Ints(values) => values.iter().copied().map(Value::from).collect(),
            Self::Doubles(values) => values.iter().copied().map(ToSetting::to_setting).collect(),
            Self::Strings(values) => values.iter().cloned().map(Value::from).collect(),
        };
        if as_scalar && items.len() == 1 {
            items.remove(0)
        } else {
            Value::Array(items)
        }
    }
}

/// Snapshot of one proxy property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyHandle {
    pub name: String,
    /// Repeatable properties accept any number of elements; the rest must
    /// keep their current element count.
    pub repeatable: bool,
    pub current: PropertyValue,
    pub default: PropertyValue,
}

impl PropertyHandle {
    pub fn is_modified(&self) -> bool {
        self.current != self.default
    }

    /// Element count a new value must have, if fixed.
    pub fn fixed_len(&self) -> Option<usize> {
        (!self.repeatable).then(|| self.current.len())
    }
}

/// An external object exposing named, typed properties.
pub trait SettingsProxy {
    /// Group the proxy is declared in, e.g. `"filters"`.
    fn group(&self) -> &str;

    /// Proxy name within its group, e.g. `"Clip"`.
    fn name(&self) -> &str;

    fn properties(&self) -> Vec<PropertyHandle>;

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<()>;
}
