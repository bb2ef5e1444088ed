//! Default settings file locations.

use std::path::{Path, PathBuf};

use crate::error::{Result, SettingsError};
use crate::types::SettingsTier;

pub const USER_SETTINGS_FILE: &str = ".strata.user.json";
pub const SITE_SETTINGS_FILE: &str = "strata.site.json";

/// Overrides the user settings file.
pub const USER_SETTINGS_ENV: &str = "STRATA_USER_SETTINGS";
/// Overrides the site settings file.
pub const SITE_SETTINGS_ENV: &str = "STRATA_SITE_SETTINGS";
/// Overrides the directory searched for the site settings file.
pub const SITE_DIR_ENV: &str = "STRATA_SITE_DIR";

/// One default file per tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsLocations {
    user: PathBuf,
    site: PathBuf,
}

impl SettingsLocations {
    pub fn new(user: PathBuf, site: PathBuf) -> Self {
        Self { user, site }
    }

    /// Resolve locations from the environment.
    ///
    /// User settings live in the home (profile) directory. Site settings
    /// live next to the running executable unless overridden.
    pub fn from_env() -> Result<Self> {
        let user = match std::env::var_os(USER_SETTINGS_ENV) {
            Some(path) => PathBuf::from(path),
            None => user_settings_path(&dirs::home_dir().ok_or(SettingsError::NoHomeDir)?),
        };

        let site = match std::env::var_os(SITE_SETTINGS_ENV) {
            Some(path) => PathBuf::from(path),
            None => {
                let site_dir = std::env::var_os(SITE_DIR_ENV)
                    .map(PathBuf::from)
                    .or_else(executable_dir)
                    .unwrap_or_else(|| PathBuf::from("."));
                site_settings_path(&site_dir)
            }
        };

        Ok(Self { user, site })
    }

    pub fn path_for_tier(&self, tier: SettingsTier) -> &Path {
        match tier {
            SettingsTier::User => &self.user,
            SettingsTier::Site => &self.site,
        }
    }

    pub fn user(&self) -> &Path {
        &self.user
    }

    pub fn site(&self) -> &Path {
        &self.site
    }
}

pub fn user_settings_path(home_dir: &Path) -> PathBuf {
    home_dir.join(USER_SETTINGS_FILE)
}

pub fn site_settings_path(site_dir: &Path) -> PathBuf {
    site_dir.join(SITE_SETTINGS_FILE)
}

fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
