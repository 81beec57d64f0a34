//! Infrastructure Layer
//!
//! Concrete implementations of the domain ports.
//!
//! ## Structure
//!
//! - `transport/` - SSH connector and sessions (russh)
//! - `prompt` - terminal passphrase prompt (dialoguer)
//! - `executor` - authorize-only deployment executor
//! - `home` - home directory lookup with test override

pub mod executor;
pub mod home;
pub mod prompt;
pub mod transport;

pub use executor::AuthorizeOnlyExecutor;
pub use home::nyo_home_dir;
pub use prompt::TerminalPrompt;
pub use transport::{RusshConnector, RusshSession};
