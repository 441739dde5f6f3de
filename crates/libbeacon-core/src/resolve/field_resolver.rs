use crate::arguments::ArgumentSet;
use crate::execution::RequestContext;
use crate::resolve::ResolveError;
use crate::resolve::ResolveInfo;
use futures::future::BoxFuture;
use std::sync::Arc;

pub type ResolveResult = Result<serde_json::Value, ResolveError>;
pub type ResolveFuture<'a> = BoxFuture<'a, ResolveResult>;

/// Everything a resolver is called with.
pub struct ResolveParams<'a> {
    /// The field's arguments, after the argument pipeline ran.
    pub args: ArgumentSet,
    pub ctx: &'a RequestContext,
    pub info: &'a ResolveInfo<'a>,
    /// The value of the parent object.
    pub root: Arc<serde_json::Value>,
}

/// Produces the value of a field.
pub trait FieldResolverFn: Send + Sync {
    fn resolve<'a>(&'a self, params: ResolveParams<'a>) -> ResolveFuture<'a>;
}

/// Adapts a synchronous closure into a [`FieldResolverFn`].
pub struct SyncResolver<F> {
    resolver: F,
}
impl<F> SyncResolver<F>
where
    F: Fn(&ResolveParams<'_>) -> ResolveResult + Send + Sync,
{
    pub fn new(resolver: F) -> Self {
        Self {
            resolver,
        }
    }
}
impl<F> FieldResolverFn for SyncResolver<F>
where
    F: Fn(&ResolveParams<'_>) -> ResolveResult + Send + Sync,
{
    fn resolve<'a>(&'a self, params: ResolveParams<'a>) -> ResolveFuture<'a> {
        let result = (self.resolver)(&params);
        Box::pin(futures::future::ready(result))
    }
}

/// Used for fields without a field resolver directive: reads the
/// property of the parent object named like the field.
pub struct DefaultFieldResolver;
impl FieldResolverFn for DefaultFieldResolver {
    fn resolve<'a>(&'a self, params: ResolveParams<'a>) -> ResolveFuture<'a> {
        let value = params.root
            .get(params.info.field_name())
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        Box::pin(futures::future::ready(Ok(value)))
    }
}
