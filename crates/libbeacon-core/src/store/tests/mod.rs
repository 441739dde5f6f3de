mod memory_store_tests;
mod query_builder_tests;
