use crate::file_reader;
use crate::file_reader::ReadContentError;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Settings for schema loading, resolution, and request execution.
///
/// Usually read from a TOML file; every key is optional.
///
/// ```toml
/// transactional_mutations = true
/// guards = ["api"]
///
/// [schema]
/// path = "graphql/schema.graphql"
///
/// [schema.cache]
/// enable = true
/// path = "cache/schema.bin"
///
/// [namespaces]
/// field_resolvers = ["app::resolvers"]
///
/// [pagination]
/// default_count = 15
/// max_count = 100
///
/// [security]
/// max_query_complexity = 500
/// max_query_depth = 12
/// ```
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct BeaconConfig {
    /// Authentication guards consulted by `@guard` when none are given.
    pub guards: Vec<String>,
    pub namespaces: NamespaceConfig,
    pub pagination: PaginationConfig,
    pub schema: SchemaConfig,
    pub security: SecurityConfig,
    /// Run each top-level mutation field inside a store transaction.
    pub transactional_mutations: bool,
}
impl BeaconConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = file_reader::read_content(path)
            .map_err(|err| ConfigError::Read(Box::new(err)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}
impl std::default::Default for BeaconConfig {
    fn default() -> Self {
        Self {
            guards: vec!["api".to_string()],
            namespaces: NamespaceConfig::default(),
            pagination: PaginationConfig::default(),
            schema: SchemaConfig::default(),
            security: SecurityConfig::default(),
            transactional_mutations: true,
        }
    }
}

/// Prefixes tried, in order, when looking up a named callable such as
/// `@field(resolver: "UserResolver@fullName")`.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct NamespaceConfig {
    pub builders: Vec<String>,
    pub complexity: Vec<String>,
    pub field_resolvers: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when a paginated field is queried without `first`.
    pub default_count: Option<u64>,
    /// Upper bound on `first` for every paginated field.
    pub max_count: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub cache: SchemaCacheConfig,
    pub path: PathBuf,
}
impl std::default::Default for SchemaConfig {
    fn default() -> Self {
        Self {
            cache: SchemaCacheConfig::default(),
            path: PathBuf::from("graphql/schema.graphql"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SchemaCacheConfig {
    pub enable: bool,
    pub path: PathBuf,
}
impl std::default::Default for SchemaCacheConfig {
    fn default() -> Self {
        Self {
            enable: false,
            path: PathBuf::from("cache/beacon-schema.bin"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub max_query_complexity: Option<usize>,
    pub max_query_depth: Option<usize>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Unable to parse config: {0}")]
    Parse(String),

    #[error(transparent)]
    Read(Box<ReadContentError>),
}
