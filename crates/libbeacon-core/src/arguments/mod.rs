mod argument_pipeline;
mod argument_set;
mod argument_set_factory;

pub use argument_pipeline::ArgumentPipeline;
pub use argument_set::Argument;
pub use argument_set::ArgumentSet;
pub use argument_set::ArgumentValue;
pub use argument_set_factory::ArgumentSetFactory;

#[cfg(test)]
mod tests;
