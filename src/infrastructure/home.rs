//! Home directory resolution with test isolation support.
//!
//! On Windows, `dirs::home_dir()` uses the Windows system API rather than
//! environment variables, so setting `HOME` in tests has no effect there.
//! `nyo_home_dir()` checks `NYO_TEST_HOME` first and falls back to
//! `dirs::home_dir()`.
//!
//! Used for every home-relative path nyo reads: `~/.ssh/config`,
//! `~/.ssh/known_hosts`, `~` in `IdentityFile` and the settings file.

use std::path::PathBuf;

/// Environment variable for test isolation of the home directory.
pub const NYO_TEST_HOME_VAR: &str = "NYO_TEST_HOME";

/// Get the home directory used for SSH and settings paths.
///
/// # Example
///
/// ```
/// use nyo::infrastructure::home::nyo_home_dir;
///
/// if let Some(home) = nyo_home_dir() {
///     let ssh_config = home.join(".ssh/config");
/// }
/// ```
pub fn nyo_home_dir() -> Option<PathBuf> {
    std::env::var(NYO_TEST_HOME_VAR)
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}
