//! Resolution of `Nyo.toml` into services and databases
//!
//! The document is read as an untyped, order-preserving TOML table and every
//! section is checked against the schema of its kind. All violations across
//! the document are collected before failing so a single run reports
//! everything that needs fixing.

use std::fs;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use crate::config::suggest_key;
use crate::error::{ConfigError, Violation, Violations};

use super::coerce::to_text_sequence;
use super::types::{
    DatabaseConfig, ResolvedProject, ResolverOptions, SectionKind, SectionWarning,
    ServiceConfig, CONFIG_FILE_NAME,
};

const PROJECT_NAME_KEY: &str = "name";
const KIND_KEY: &str = "kind";

const SERVICE_KEYS: &[&str] = &[
    "kind", "domain", "spa", "path", "use", "prepare", "nodes", "tools",
];
const DATABASE_KEYS: &[&str] = &["kind", "type", "name", "username", "password"];

/// Find `Nyo.toml` directly inside `dir`.
pub fn locate_config_file(dir: &Path) -> Result<PathBuf, ConfigError> {
    let read_err = |source| ConfigError::Read {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if entry.file_name() == CONFIG_FILE_NAME && !is_dir {
            return Ok(entry.path());
        }
    }

    Err(ConfigError::MissingConfigFile {
        dir: dir.to_path_buf(),
    })
}

/// Turns project documents into validated deployment entities
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    options: ResolverOptions,
}

impl ConfigResolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Read and resolve the document at `path`.
    pub fn load(&self, path: &Path) -> Result<ResolvedProject, ConfigError> {
        let bytes = fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.resolve(&bytes)
    }

    /// Resolve raw document bytes.
    pub fn resolve(&self, document: &[u8]) -> Result<ResolvedProject, ConfigError> {
        let text = std::str::from_utf8(document)?;
        self.resolve_str(text)
    }

    pub fn resolve_str(&self, text: &str) -> Result<ResolvedProject, ConfigError> {
        let document: Table = toml::from_str(text)?;

        let project = match document.get(PROJECT_NAME_KEY) {
            Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
            _ => return Err(ConfigError::MissingProjectName),
        };

        let mut services = Vec::new();
        let mut databases = Vec::new();
        let mut warnings = Vec::new();
        let mut violations = Vec::new();

        for (section, body) in &document {
            if section == PROJECT_NAME_KEY {
                continue;
            }

            let Some(table) = body.as_table() else {
                violations.push(Violation::NotATable {
                    section: section.clone(),
                    actual: body.type_str(),
                });
                continue;
            };

            let kind = match self.classify(section, table) {
                Ok(kind) => kind,
                Err(violation) => {
                    violations.push(violation);
                    continue;
                }
            };
            debug!(section = %section, kind = kind.as_str(), "classified section");

            warnings.extend(unknown_keys(section, table, kind));

            let reader = SectionReader::new(section, table, kind);
            match kind {
                SectionKind::Service => {
                    if let Some(service) = reader.service(&project, &mut violations) {
                        services.push(service);
                    }
                }
                SectionKind::Database => {
                    if let Some(database) = reader.database(&mut violations) {
                        databases.push(database);
                    }
                }
            }
        }

        if !violations.is_empty() {
            return Err(ConfigError::Invalid(Violations(violations)));
        }

        Ok(ResolvedProject {
            name: project,
            services,
            databases,
            warnings,
        })
    }

    /// An explicit `kind` wins; otherwise reserved section names are databases.
    fn classify(&self, section: &str, table: &Table) -> Result<SectionKind, Violation> {
        match table.get(KIND_KEY) {
            None if self.options.is_reserved(section) => Ok(SectionKind::Database),
            None => Ok(SectionKind::Service),
            Some(Value::String(kind)) => match kind.as_str() {
                "service" => Ok(SectionKind::Service),
                "database" => Ok(SectionKind::Database),
                other => Err(Violation::UnknownKind {
                    section: section.to_string(),
                    kind: other.to_string(),
                }),
            },
            Some(other) => Err(Violation::WrongType {
                section: section.to_string(),
                field: KIND_KEY,
                expected: "a string",
                actual: other.type_str(),
            }),
        }
    }
}

fn unknown_keys(section: &str, table: &Table, kind: SectionKind) -> Vec<SectionWarning> {
    let known = match kind {
        SectionKind::Service => SERVICE_KEYS,
        SectionKind::Database => DATABASE_KEYS,
    };

    table
        .keys()
        .filter(|key| !known.contains(&key.as_str()))
        .map(|key| SectionWarning {
            section: section.to_string(),
            key: key.clone(),
            suggestion: suggest_key(key, known),
        })
        .collect()
}

/// Field extraction for one section; violations stay local until `finish`.
struct SectionReader<'a> {
    section: &'a str,
    table: &'a Table,
    kind: SectionKind,
    violations: Vec<Violation>,
}

impl<'a> SectionReader<'a> {
    fn new(section: &'a str, table: &'a Table, kind: SectionKind) -> Self {
        Self {
            section,
            table,
            kind,
            violations: Vec::new(),
        }
    }

    fn service(mut self, project: &str, out: &mut Vec<Violation>) -> Option<ServiceConfig> {
        let domain = self.optional_text("domain");
        let spa = self.optional_bool("spa").unwrap_or(false);
        let path = self.required_text("path");
        let runtime = self.required_text("use");
        let prepare = self.required_list("prepare");
        let nodes = self.required_list("nodes");
        let tools = self.required_list("tools");

        if nodes.iter().any(|n| n.trim().is_empty()) {
            self.violations.push(Violation::EmptyValue {
                section: self.section.to_string(),
                field: "nodes",
            });
        }

        let service = ServiceConfig {
            name: format!("{}-{}", project, self.section),
            section: self.section.to_string(),
            domain,
            spa,
            path,
            runtime,
            prepare,
            nodes,
            tools,
        };
        self.finish(service, out)
    }

    fn database(mut self, out: &mut Vec<Violation>) -> Option<DatabaseConfig> {
        let database = DatabaseConfig {
            section: self.section.to_string(),
            engine: self.required_text("type"),
            name: self.required_text("name"),
            username: self.required_text("username"),
            password: self.required_text("password"),
        };
        self.finish(database, out)
    }

    fn finish<T>(self, value: T, out: &mut Vec<Violation>) -> Option<T> {
        if self.violations.is_empty() {
            Some(value)
        } else {
            out.extend(self.violations);
            None
        }
    }

    fn missing(&self, field: &'static str) -> Violation {
        let section = self.section.to_string();
        match self.kind {
            SectionKind::Service => Violation::MissingServiceField { section, field },
            SectionKind::Database => Violation::MissingDatabaseField { section, field },
        }
    }

    fn wrong_type(&mut self, field: &'static str, expected: &'static str, actual: &Value) {
        self.violations.push(Violation::WrongType {
            section: self.section.to_string(),
            field,
            expected,
            actual: actual.type_str(),
        });
    }

    fn required_text(&mut self, field: &'static str) -> String {
        let table = self.table;
        match table.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                self.wrong_type(field, "a string", other);
                String::new()
            }
            None => {
                let violation = self.missing(field);
                self.violations.push(violation);
                String::new()
            }
        }
    }

    fn optional_text(&mut self, field: &'static str) -> Option<String> {
        let table = self.table;
        match table.get(field) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.wrong_type(field, "a string", other);
                None
            }
            None => None,
        }
    }

    fn optional_bool(&mut self, field: &'static str) -> Option<bool> {
        let table = self.table;
        match table.get(field) {
            Some(Value::Boolean(b)) => Some(*b),
            Some(other) => {
                self.wrong_type(field, "a boolean", other);
                None
            }
            None => None,
        }
    }

    fn required_list(&mut self, field: &'static str) -> Vec<String> {
        let table = self.table;
        let Some(value) = table.get(field) else {
            let violation = self.missing(field);
            self.violations.push(violation);
            return Vec::new();
        };

        to_text_sequence(value).unwrap_or_else(|source| {
            self.violations.push(Violation::Coercion {
                section: self.section.to_string(),
                field,
                source,
            });
            Vec::new()
        })
    }
}
