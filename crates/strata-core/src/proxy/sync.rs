//! Pushing proxy properties into the user layer and pulling them back.

use super::{PropertyHandle, PropertyValue, SettingsProxy};
use crate::error::{Result, SettingsError};
use crate::settings::{SettingPath, SettingsStore};

/// Outcome of applying settings to a proxy.
#[derive(Debug, Default)]
pub struct ProxySyncReport {
    /// Properties that received a value from the settings.
    pub applied: Vec<String>,
    /// Properties with a matching setting that could not be applied.
    pub skipped: Vec<(String, SettingsError)>,
}

impl ProxySyncReport {
    pub fn applied_any(&self) -> bool {
        !self.applied.is_empty()
    }
}

impl SettingsStore {
    /// Record every non-default property of `proxy` in the user layer under
    /// `<group>.<name>.<property>`. Returns the number of properties written.
    pub fn set_proxy_settings<P>(&mut self, proxy: &P) -> usize
    where
        P: SettingsProxy + ?Sized,
    {
        let base = proxy_path(&SettingPath::default(), proxy);
        let mut written = 0;
        for property in proxy.properties() {
            if !property.is_modified() {
                continue;
            }
            let value = property.current.to_json(!property.repeatable);
            self.set_scalar_setting(base.child(property.name.as_str()), value);
            written += 1;
        }
        tracing::debug!(
            group = proxy.group(),
            proxy = proxy.name(),
            "Stored {written} proxy settings"
        );
        written
    }

    /// Apply settings found under `<group>.<name>` to `proxy`.
    pub fn get_proxy_settings<P>(&self, proxy: &mut P) -> ProxySyncReport
    where
        P: SettingsProxy + ?Sized,
    {
        self.get_proxy_settings_with_prefix(proxy, "")
    }

    /// Apply settings found under `<prefix>.<group>.<name>` to `proxy`.
    ///
    /// Properties without a setting keep their value. A property whose
    /// setting cannot be coerced, or has the wrong element count for a
    /// fixed-size property, is skipped and reported.
    pub fn get_proxy_settings_with_prefix<P>(&self, proxy: &mut P, prefix: &str) -> ProxySyncReport
    where
        P: SettingsProxy + ?Sized,
    {
        let base = proxy_path(&SettingPath::parse(prefix), proxy);
        let mut report = ProxySyncReport::default();

        for property in proxy.properties() {
            let path = base.child(property.name.as_str());
            let Some((_, value)) = self.resolve(&path) else {
                continue;
            };
            let outcome = coerce_for_property(&property, &path, value)
                .and_then(|coerced| proxy.set_property(&property.name, coerced));
            match outcome {
                Ok(()) => report.applied.push(property.name),
                Err(err) => {
                    tracing::warn!(path = %path, "Skipping proxy property: {err}");
                    report.skipped.push((property.name, err));
                }
            }
        }

        report
    }
}

fn proxy_path<P>(prefix: &SettingPath, proxy: &P) -> SettingPath
where
    P: SettingsProxy + ?Sized,
{
    prefix.child(proxy.group()).child(proxy.name())
}

fn coerce_for_property(
    property: &PropertyHandle,
    path: &SettingPath,
    value: &serde_json::Value,
) -> Result<PropertyValue> {
    let coerced =
        property
            .current
            .coerce_like(value)
            .ok_or_else(|| SettingsError::TypeMismatch {
                path: path.to_string(),
                expected: property.current.kind_name(),
            })?;
    if let Some(expected) = property.fixed_len()
        && coerced.len() != expected
    {
        return Err(SettingsError::ElementCountMismatch {
            path: path.to_string(),
            expected,
            found: coerced.len(),
        });
    }
    Ok(coerced)
}
