//! Proxy implementation backed by an in-memory property list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{PropertyHandle, PropertyValue, SettingsProxy};
use crate::error::{Result, SettingsError};

/// Serialized form of a proxy, e.g. a JSON file handed to the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyDescription {
    pub group: String,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDescription {
    pub name: String,
    #[serde(default)]
    pub repeatable: bool,
    pub default: Value,
    /// Current value; the default when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryProxy {
    group: String,
    name: String,
    properties: Vec<PropertyHandle>,
}

impl InMemoryProxy {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn from_description(description: &ProxyDescription) -> Result<Self> {
        let mut proxy = Self::new(description.group.clone(), description.name.clone());
        for property in &description.properties {
            let invalid = |what: &str| SettingsError::PropertyRejected {
                property: property.name.clone(),
                reason: format!("unsupported {what} value"),
            };
            let mut default =
                PropertyValue::from_json(&property.default).ok_or_else(|| invalid("default"))?;
            // An integer default with a fractional current value is a double property.
            if let Some(value) = &property.value
                && matches!(PropertyValue::from_json(value), Some(PropertyValue::Doubles(_)))
            {
                default = default.widen_to_doubles();
            }
            let current = match &property.value {
                Some(value) => default
                    .coerce_like(value)
                    .ok_or_else(|| invalid("current"))?,
                None => default.clone(),
            };
            proxy.properties.push(PropertyHandle {
                name: property.name.clone(),
                repeatable: property.repeatable,
                current,
                default,
            });
        }
        Ok(proxy)
    }

    /// Add a property whose current value is its default.
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        default: PropertyValue,
        repeatable: bool,
    ) -> Self {
        self.properties.push(PropertyHandle {
            name: name.into(),
            repeatable,
            current: default.clone(),
            default,
        });
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyHandle> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// Current values keyed by property name, in settings representation.
    pub fn to_json(&self) -> Value {
        let values: Map<String, Value> = self
            .properties
            .iter()
            .map(|property| {
                (
                    property.name.clone(),
                    property.current.to_json(!property.repeatable),
                )
            })
            .collect();
        Value::Object(values)
    }
}

impl SettingsProxy for InMemoryProxy {
    fn group(&self) -> &str {
        &self.group
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn properties(&self) -> Vec<PropertyHandle> {
        self.properties.clone()
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<()> {
        let rejected = |reason: String| SettingsError::PropertyRejected {
            property: name.to_string(),
            reason,
        };
        let property = self
            .properties
            .iter_mut()
            .find(|property| property.name == name)
            .ok_or_else(|| rejected("no such property".to_string()))?;

        if property.current.kind_name() != value.kind_name() {
            return Err(rejected(format!(
                "expected {} values, got {}",
                property.current.kind_name(),
                value.kind_name()
            )));
        }
        if !property.repeatable && property.current.len() != value.len() {
            return Err(rejected(format!(
                "expected {} elements, got {}",
                property.current.len(),
                value.len()
            )));
        }
        property.current = value;
        Ok(())
    }
}
