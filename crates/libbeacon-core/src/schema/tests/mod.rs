mod schema_builder_tests;
mod schema_cache_tests;
mod schema_source_tests;
