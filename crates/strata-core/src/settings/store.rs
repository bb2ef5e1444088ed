//! Layered settings store.
//!
//! Holds at most one document per tier and resolves queries by probing the
//! tiers from highest to lowest precedence. Nothing is merged eagerly; the
//! first layer containing a path supplies its value.

use std::path::Path;

use serde_json::Value;

use super::coerce::{self, FromSetting, ToSetting};
use super::layer::SettingsLayer;
use super::path::SettingPath;
use super::paths::SettingsLocations;
use crate::error::{Result, SettingsError};
use crate::types::SettingsTier;

#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    locations: Option<SettingsLocations>,
    /// Ordered by tier precedence, at most one layer per tier.
    layers: Vec<SettingsLayer>,
}

impl SettingsStore {
    /// A store with no layers that resolves default file locations from the
    /// environment on first use.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locations(locations: SettingsLocations) -> Self {
        Self {
            locations: Some(locations),
            layers: Vec::new(),
        }
    }

    pub fn locations(&self) -> Result<SettingsLocations> {
        match &self.locations {
            Some(locations) => Ok(locations.clone()),
            None => SettingsLocations::from_env(),
        }
    }

    pub fn layer(&self, tier: SettingsTier) -> Option<&SettingsLayer> {
        self.layers.iter().find(|layer| layer.tier() == tier)
    }

    pub fn layers(&self) -> &[SettingsLayer] {
        &self.layers
    }

    // Loading

    pub fn load_user_settings(&mut self) -> Result<()> {
        let locations = self.locations()?;
        self.load_settings_from(SettingsTier::User, locations.user())
    }

    pub fn load_user_settings_from(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load_settings_from(SettingsTier::User, path.as_ref())
    }

    pub fn load_site_settings(&mut self) -> Result<()> {
        let locations = self.locations()?;
        self.load_settings_from(SettingsTier::Site, locations.site())
    }

    pub fn load_site_settings_from(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load_settings_from(SettingsTier::Site, path.as_ref())
    }

    /// Replace `tier` with the document in `path`.
    ///
    /// On any failure the previous layer (or its absence) is kept.
    pub fn load_settings_from(&mut self, tier: SettingsTier, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            tracing::warn!(tier = %tier, path = %path.display(), "Failed to read settings file: {source}");
            SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.set_settings_string(tier, &text).inspect(|()| {
            tracing::debug!(tier = %tier, path = %path.display(), "Loaded settings");
        })
    }

    pub fn set_user_settings_string(&mut self, text: &str) -> Result<()> {
        self.set_settings_string(SettingsTier::User, text)
    }

    pub fn set_site_settings_string(&mut self, text: &str) -> Result<()> {
        self.set_settings_string(SettingsTier::Site, text)
    }

    pub fn set_settings_string(&mut self, tier: SettingsTier, text: &str) -> Result<()> {
        let layer = SettingsLayer::parse(tier, text).inspect_err(|err| {
            tracing::warn!(tier = %tier, "Rejected settings text: {err}");
        })?;
        self.install_layer(layer);
        Ok(())
    }

    pub fn user_settings_string(&self) -> Option<&str> {
        self.settings_string(SettingsTier::User)
    }

    pub fn site_settings_string(&self) -> Option<&str> {
        self.settings_string(SettingsTier::Site)
    }

    pub fn settings_string(&self, tier: SettingsTier) -> Option<&str> {
        self.layer(tier).map(SettingsLayer::raw)
    }

    fn install_layer(&mut self, layer: SettingsLayer) {
        let tier = layer.tier();
        match self.layers.iter_mut().find(|existing| existing.tier() == tier) {
            Some(existing) => *existing = layer,
            None => {
                self.layers.push(layer);
                self.layers.sort_by_key(|layer| precedence_rank(layer.tier()));
            }
        }
    }

    // Queries

    /// The first value found for `path`, with the tier that supplied it.
    pub fn resolve(&self, path: impl Into<SettingPath>) -> Option<(SettingsTier, &Value)> {
        let path = path.into();
        self.layers
            .iter()
            .find_map(|layer| layer.resolve(&path).map(|value| (layer.tier(), value)))
    }

    pub fn has_setting(&self, path: impl Into<SettingPath>) -> bool {
        self.resolve(path).is_some()
    }

    pub fn get_scalar_setting<T: FromSetting>(&self, path: impl Into<SettingPath>, default: T) -> T {
        let path = path.into();
        match self.resolve(&path) {
            Some((_, value)) => T::from_setting(value).unwrap_or_else(|| {
                tracing::debug!(path = %path, "Setting is not readable as {}", T::EXPECTED);
                default
            }),
            None => default,
        }
    }

    pub fn get_scalar_setting_as_int(&self, path: impl Into<SettingPath>, default: i64) -> i64 {
        self.get_scalar_setting(path, default)
    }

    pub fn get_scalar_setting_as_double(&self, path: impl Into<SettingPath>, default: f64) -> f64 {
        self.get_scalar_setting(path, default)
    }

    pub fn get_scalar_setting_as_string(
        &self,
        path: impl Into<SettingPath>,
        default: &str,
    ) -> String {
        self.get_scalar_setting(path, default.to_string())
    }

    /// Array length, 1 for a scalar, 0 when nothing resolves.
    pub fn get_number_of_elements(&self, path: impl Into<SettingPath>) -> usize {
        self.resolve(path)
            .map(|(_, value)| coerce::element_count(value))
            .unwrap_or(0)
    }

    /// Every element coerced to `T`; empty when unresolved or any element
    /// fails to coerce.
    pub fn get_vector_setting<T: FromSetting>(&self, path: impl Into<SettingPath>) -> Vec<T> {
        let path = path.into();
        self.resolve(&path)
            .and_then(|(_, value)| {
                coerce::vector_as(value).or_else(|| {
                    tracing::debug!(path = %path, "Setting is not readable as a {} vector", T::EXPECTED);
                    None
                })
            })
            .unwrap_or_default()
    }

    pub fn get_vector_setting_as_ints(&self, path: impl Into<SettingPath>) -> Vec<i64> {
        self.get_vector_setting(path)
    }

    pub fn get_vector_setting_as_doubles(&self, path: impl Into<SettingPath>) -> Vec<f64> {
        self.get_vector_setting(path)
    }

    pub fn get_vector_setting_as_strings(&self, path: impl Into<SettingPath>) -> Vec<String> {
        self.get_vector_setting(path)
    }

    pub fn get_vector_element<T: FromSetting>(
        &self,
        path: impl Into<SettingPath>,
        index: usize,
        default: T,
    ) -> T {
        self.resolve(path)
            .and_then(|(_, value)| coerce::element_as(value, index))
            .unwrap_or(default)
    }

    pub fn get_vector_setting_as_int(
        &self,
        path: impl Into<SettingPath>,
        index: usize,
        default: i64,
    ) -> i64 {
        self.get_vector_element(path, index, default)
    }

    pub fn get_vector_setting_as_double(
        &self,
        path: impl Into<SettingPath>,
        index: usize,
        default: f64,
    ) -> f64 {
        self.get_vector_element(path, index, default)
    }

    pub fn get_vector_setting_as_string(
        &self,
        path: impl Into<SettingPath>,
        index: usize,
        default: &str,
    ) -> String {
        self.get_vector_element(path, index, default.to_string())
    }

    // Writes

    /// Store a scalar in the user layer, creating the layer if needed.
    pub fn set_scalar_setting(&mut self, path: impl Into<SettingPath>, value: impl ToSetting) {
        self.write_user_setting(path.into(), value.to_setting());
    }

    /// Store an array in the user layer, creating the layer if needed.
    pub fn set_vector_setting<I, T>(&mut self, path: impl Into<SettingPath>, values: I)
    where
        I: IntoIterator<Item = T>,
        T: ToSetting,
    {
        let values = values.into_iter().map(ToSetting::to_setting).collect();
        self.write_user_setting(path.into(), Value::Array(values));
    }

    fn write_user_setting(&mut self, path: SettingPath, value: Value) {
        tracing::debug!(path = %path, "Writing user setting");
        self.user_layer_mut().set(&path, value);
    }

    fn user_layer_mut(&mut self) -> &mut SettingsLayer {
        if let Some(index) = self
            .layers
            .iter()
            .position(|layer| layer.tier() == SettingsTier::User)
        {
            return &mut self.layers[index];
        }
        // User is the highest tier, so it always sits first.
        self.layers.insert(0, SettingsLayer::empty(SettingsTier::User));
        &mut self.layers[0]
    }

    // Persistence

    /// Write the user settings string to the default user location.
    pub fn save_user_settings(&self) -> Result<()> {
        let locations = self.locations()?;
        self.save_user_settings_to(locations.user())
    }

    /// Write the user settings string to `path`; `{}` when no user layer exists.
    pub fn save_user_settings_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.user_settings_string().unwrap_or("{}");
        let io_error = |source: std::io::Error| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, content).map_err(io_error)?;
        tracing::debug!(path = %path.display(), "Saved user settings");
        Ok(())
    }
}

fn precedence_rank(tier: SettingsTier) -> usize {
    SettingsTier::precedence_order()
        .iter()
        .position(|candidate| *candidate == tier)
        .unwrap_or(usize::MAX)
}
