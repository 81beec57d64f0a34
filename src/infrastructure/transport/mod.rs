//! Node transports

mod russh_client;

pub use russh_client::{ClientHandler, RusshConnector, RusshSession};
