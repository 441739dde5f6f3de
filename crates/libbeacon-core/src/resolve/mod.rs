mod compiled_schema;
mod field_middleware;
mod field_resolver;
mod resolve_error;
mod resolve_info;
mod resolver_composer;

pub use compiled_schema::CompiledSchema;
pub use compiled_schema::ComposedField;
pub use field_middleware::FieldMiddleware;
pub use field_middleware::Next;
pub use field_resolver::DefaultFieldResolver;
pub use field_resolver::FieldResolverFn;
pub use field_resolver::ResolveFuture;
pub use field_resolver::ResolveParams;
pub use field_resolver::ResolveResult;
pub use field_resolver::SyncResolver;
pub use resolve_error::ResolveError;
pub use resolve_info::ResolveInfo;
pub(crate) use resolver_composer::ResolverComposer;

#[cfg(test)]
mod tests;
