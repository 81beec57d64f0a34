//! Deployment entities produced from `Nyo.toml`

use std::fmt;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "Nyo.toml";

/// Section names routed to database config when no `kind` is given
pub const DEFAULT_RESERVED_KEYWORDS: &[&str] = &["database"];

/// One deployable unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// `{project}-{section}`
    pub name: String,
    /// Section the service was declared under
    pub section: String,
    pub domain: Option<String>,
    pub spa: bool,
    /// Source location of the service
    pub path: String,
    /// Runtime/builder identifier (the `use` key)
    pub runtime: String,
    /// Build/setup commands, run in order
    pub prepare: Vec<String>,
    /// Host aliases resolved through the SSH client configuration
    pub nodes: Vec<String>,
    pub tools: Vec<String>,
}

/// A managed datastore declaration
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub section: String,
    /// Engine identifier (the `type` key), e.g. `postgres`
    pub engine: String,
    pub name: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("section", &self.section)
            .field("engine", &self.engine)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// How a top-level section is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Service,
    Database,
}

impl SectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Service => "service",
            SectionKind::Database => "database",
        }
    }
}

/// Unknown key found inside a section. Not fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionWarning {
    pub section: String,
    pub key: String,
    pub suggestion: Option<String>,
}

impl fmt::Display for SectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key '{}' in section '{}'", self.key, self.section)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Validated content of a project document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProject {
    pub name: String,
    pub services: Vec<ServiceConfig>,
    pub databases: Vec<DatabaseConfig>,
    pub warnings: Vec<SectionWarning>,
}

/// Knobs for the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Section names that are databases without an explicit `kind`
    pub reserved_keywords: Vec<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            reserved_keywords: DEFAULT_RESERVED_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ResolverOptions {
    pub fn with_reserved_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_reserved(&self, section: &str) -> bool {
        self.reserved_keywords.iter().any(|k| k == section)
    }
}
