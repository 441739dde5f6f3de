mod schema_build_error;
mod schema_builder;
mod schema_cache;
mod schema_plugin;
mod schema_source;

pub use schema_build_error::SchemaBuildError;
pub use schema_builder::SchemaBuilder;
pub use schema_cache::SchemaCache;
pub use schema_cache::SchemaCacheError;
pub use schema_cache::CACHE_FORMAT_VERSION;
pub use schema_plugin::SchemaPlugin;
pub use schema_source::SchemaSource;

#[cfg(test)]
mod tests;
