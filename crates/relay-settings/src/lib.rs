//! # relay-settings
//!
//! Layered configuration for the notification relay.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`RelaySettings::default()`]
//! 2. **Settings file**: `RELAY_CONFIG` or `/data/misc/notify-relay/settings.json`
//! 3. **Environment variables**: `RELAY_*` overrides
//!
//! ```no_run
//! let settings = relay_settings::load_settings().unwrap_or_default();
//! println!("socket: {}", settings.socket_path);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::{LoggingSettings, RelaySettings, MAX_DOGEAR_SIZE};
