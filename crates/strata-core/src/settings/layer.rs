//! A single tier's settings document.

use serde_json::{Map, Value};

use super::path::SettingPath;
use crate::error::{Result, SettingsError};
use crate::types::SettingsTier;

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsLayer {
    tier: SettingsTier,
    root: Map<String, Value>,
    raw: String,
}

impl SettingsLayer {
    /// An empty document for `tier`.
    pub fn empty(tier: SettingsTier) -> Self {
        Self {
            tier,
            root: Map::new(),
            raw: "{}".to_string(),
        }
    }

    /// Parse settings text. The text is kept verbatim for persistence.
    pub fn parse(tier: SettingsTier, text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Object(root) => Ok(Self {
                tier,
                root,
                raw: text.to_string(),
            }),
            other => Err(SettingsError::RootNotObject(json_kind(&other))),
        }
    }

    pub fn tier(&self) -> SettingsTier {
        self.tier
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Text this layer was parsed from, or the serialized document after a write.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn resolve(&self, path: &SettingPath) -> Option<&Value> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = &self.root;
        for segment in parents {
            match current.get(segment) {
                Some(Value::Object(map)) => current = map,
                _ => return None,
            }
        }
        current.get(last)
    }

    /// Store `value` at `path`, replacing whatever was there.
    ///
    /// Missing parents become objects; non-object nodes on the way are
    /// replaced by objects. The empty path is ignored.
    pub fn set(&mut self, path: &SettingPath, value: Value) {
        let Some((last, parents)) = path.segments().split_last() else {
            tracing::warn!("Ignoring write to empty setting path");
            return;
        };
        let mut current = &mut self.root;
        for segment in parents {
            let next = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !next.is_object() {
                *next = Value::Object(Map::new());
            }
            let Some(map) = next.as_object_mut() else {
                return;
            };
            current = map;
        }
        current.insert(last.clone(), value);
        self.raw = self.to_json_string();
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.root).unwrap_or_else(|_| "{}".to_string())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
