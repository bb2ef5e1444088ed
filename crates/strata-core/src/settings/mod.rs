//! Layered settings documents and their resolution.
//!
//! Two tiers are supported:
//! - User: per-user overrides, consulted first
//! - Site: deployment-wide overrides, consulted last

pub mod coerce;
pub mod layer;
pub mod path;
pub mod paths;
pub mod store;

pub use coerce::{FromSetting, ToSetting};
pub use layer::SettingsLayer;
pub use path::SettingPath;
pub use paths::SettingsLocations;
pub use store::SettingsStore;
