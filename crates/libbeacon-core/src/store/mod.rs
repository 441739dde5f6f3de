mod data_store;
mod memory_store;
mod query_builder;
mod store_error;

pub use data_store::DataStore;
pub use data_store::Pivot;
pub use data_store::Relation;
pub use data_store::RelationKind;
pub use memory_store::InMemoryStore;
pub(crate) use memory_store::loose_eq;
pub use memory_store::ScopeFn;
pub use query_builder::Operator;
pub use query_builder::OrderDirection;
pub use query_builder::Page;
pub use query_builder::QueryBuilder;
pub use query_builder::Row;
pub use store_error::StoreError;

#[cfg(test)]
mod tests;
