//! SSH identity handling
//!
//! - `client_config` - lookup in the user's OpenSSH client configuration
//! - `identity` - host alias to hostname, port, user and key file
//! - `keys` - private key decoding and public key text

pub mod client_config;
pub mod identity;
pub mod keys;

pub use client_config::SshClientConfig;
pub use identity::{expand_identity_path, ResolvedNodeIdentity, SshIdentityResolver, DEFAULT_SSH_PORT};
pub use keys::{decode_private_key, AuthorizedKey, IdentityKey};
