mod mutation_executor;

pub use mutation_executor::MutationExecutor;
pub use mutation_executor::SaveMode;
pub(crate) use mutation_executor::key_list;
pub(crate) use mutation_executor::nested_sets;

#[cfg(test)]
mod tests;
