use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Largest dog-ear edge in pixels.
pub const MAX_DOGEAR_SIZE: u32 = 4096;

/// Root settings of the relay service.
///
/// All field names are camelCase in JSON and every field has a default, so a
/// settings file only needs the values it changes:
///
/// ```json
/// { "customNotifications": true, "dogearSize": 96 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelaySettings {
    /// Host control socket.
    pub socket_path: String,
    /// Relay notifications whose content cannot be rebuilt from title and text.
    pub custom_notifications: bool,
    /// The service's own package. Its notifications are never relayed.
    pub own_package: String,
    /// Packages that stack messages into one summary entry.
    pub stacked_packages: Vec<String>,
    /// Packages whose templated notifications duplicate a plain one.
    pub template_filtered_packages: Vec<String>,
    /// Notification categories never relayed.
    pub filtered_categories: Vec<String>,
    /// Switch target used when a return action names no container.
    pub default_container: String,
    /// Edge length of the corner triangle marking the source container.
    pub dogear_size: u32,
    pub max_frame_bytes: usize,
    pub logging: LoggingSettings,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            socket_path: "/dev/socket/cml-service".to_string(),
            custom_notifications: false,
            own_package: "de.fraunhofer.aisec.trustme.service".to_string(),
            stacked_packages: vec![
                "com.google.android.gm".to_string(),
                "com.android.email".to_string(),
                "com.fsck.k9".to_string(),
            ],
            template_filtered_packages: vec!["ch.threema.app".to_string()],
            filtered_categories: vec!["transport".to_string(), "promo".to_string()],
            default_container: "00000000-0000-0000-0000-000000000000".to_string(),
            dogear_size: 200,
            max_frame_bytes: 8 * 1024 * 1024,
            logging: LoggingSettings::default(),
        }
    }
}

impl RelaySettings {
    /// Reject values the relay cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.socket_path.is_empty() {
            return Err(SettingsError::InvalidValue("socketPath is empty".into()));
        }
        if !(1..=MAX_DOGEAR_SIZE).contains(&self.dogear_size) {
            return Err(SettingsError::InvalidValue(format!(
                "dogearSize {} is outside 1..={MAX_DOGEAR_SIZE}",
                self.dogear_size
            )));
        }
        if self.max_frame_bytes < 1024 {
            return Err(SettingsError::InvalidValue(format!(
                "maxFrameBytes {} is below 1024",
                self.max_frame_bytes
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Per-module overrides, e.g. `{"relay_engine": "debug"}`.
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            modules: BTreeMap::new(),
        }
    }
}
