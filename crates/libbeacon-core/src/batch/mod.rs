mod batch_loader;
mod batch_loader_registry;
mod relation_batch_load;

pub use batch_loader::key_id;
pub use batch_loader::BatchLoad;
pub use batch_loader::BatchLoader;
pub use batch_loader_registry::BatchKey;
pub use batch_loader_registry::BatchLoaderRegistry;
pub use relation_batch_load::RelationBatchLoad;
pub use relation_batch_load::RelationLoadMode;

#[cfg(test)]
mod tests;
