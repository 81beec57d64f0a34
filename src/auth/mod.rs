//! Authentication against nodes
//!
//! - `registry` - parsing of a node's trust registry
//! - `authenticator` - key decoding, dialing and role discovery

pub mod authenticator;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use authenticator::{AuthOptions, Authorization, NodeAuthenticator};
pub use registry::{RegistryEntry, TrustRegistry};
