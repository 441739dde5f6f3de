//! Directive-driven GraphQL schema augmentation and resolver composition.
//!
//! A schema is loaded from SDL files, rewritten by the manipulator
//! directives it uses (see [`directives::builtin`]), validated, and then
//! compiled into a [`resolve::CompiledSchema`] whose fields each carry a
//! resolver composed from their directives. [`execution::Executor`] runs
//! requests against it.

pub mod arguments;
pub mod ast;
pub mod auth;
pub mod batch;
mod config;
pub mod directives;
pub mod document;
pub mod execution;
mod file_reader;
pub mod loc;
pub mod mutation;
pub mod resolve;
pub mod schema;
pub mod store;
mod value;

pub use config::BeaconConfig;
pub use config::ConfigError;
pub use config::NamespaceConfig;
pub use config::PaginationConfig;
pub use config::SchemaCacheConfig;
pub use config::SchemaConfig;
pub use config::SecurityConfig;
pub use file_reader::ReadContentError;
pub use value::Value;

#[cfg(test)]
mod test;
