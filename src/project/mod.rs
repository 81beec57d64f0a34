//! Project document (`Nyo.toml`) resolution
//!
//! A document holds a top-level `name` and one section per service or
//! database:
//!
//! ```toml
//! name = "blog"
//!
//! [web]
//! path = "./web"
//! use = "bun"
//! prepare = ["bun install", "bun run build"]
//! nodes = ["server1"]
//! tools = ["node"]
//!
//! [database]
//! type = "postgres"
//! name = "blogdb"
//! username = "admin"
//! password = "secret"
//! ```
//!
//! A section is a database when its name is a reserved keyword or it sets
//! `kind = "database"`; everything else is a service.

mod coerce;
mod resolver;
mod types;

pub use coerce::to_text_sequence;
pub use resolver::{locate_config_file, ConfigResolver};
pub use types::{
    DatabaseConfig, ResolvedProject, ResolverOptions, SectionKind, SectionWarning,
    ServiceConfig, CONFIG_FILE_NAME, DEFAULT_RESERVED_KEYWORDS,
};
