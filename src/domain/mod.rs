//! Domain Layer
//!
//! Interfaces between nyo's core (configuration resolution, identity
//! resolution, authentication) and the outside world.
//!
//! ## Structure
//!
//! - `ports/` - traits for transport, credential prompts and deployment execution
//!
//! Concrete implementations live in `infrastructure/`.

pub mod ports;
