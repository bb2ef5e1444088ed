//! Strata Core Library
//!
//! Layered settings resolution: user and site JSON documents, typed
//! scalar/vector queries with tier precedence, and synchronization of
//! settings with proxy object properties.

pub mod error;
pub mod proxy;
pub mod settings;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Errors
    pub use crate::error::{Result, SettingsError};

    // Settings
    pub use crate::settings::{
        FromSetting, SettingPath, SettingsLayer, SettingsLocations, SettingsStore, ToSetting,
    };
    pub use crate::types::SettingsTier;

    // Proxy
    pub use crate::proxy::{
        InMemoryProxy, PropertyHandle, PropertyValue, ProxyDescription, ProxySyncReport,
        SettingsProxy,
    };
}
