#![allow(dead_code)]

//! Common test utilities for nyo CLI tests.
//!
//! - `TestEnv`: isolated project and home directories plus a runner for the
//!   `nyo` binary
//! - fixtures: reusable `Nyo.toml` documents

pub mod env;

pub use env::*;
pub use fixtures::*;
