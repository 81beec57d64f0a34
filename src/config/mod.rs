//! Tool settings for nyo
//!
//! These are settings of the tool itself (timeouts, registry location,
//! host-key policy), not of the project being deployed; see
//! [`crate::project`] for `Nyo.toml`.

mod loader;
mod types;

pub use loader::{
    load, load_with_warnings, settings_path, suggest_key, with_env_overrides, SettingsWarning,
};
pub use types::{HostKeyPolicy, Settings};
