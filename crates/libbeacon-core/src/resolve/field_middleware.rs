use crate::resolve::FieldResolverFn;
use crate::resolve::ResolveFuture;
use crate::resolve::ResolveParams;
use std::sync::Arc;

/// The rest of a field's resolver chain, handed to a
/// [`FieldMiddleware`].
pub struct Next<'a> {
    inner: &'a dyn FieldResolverFn,
}
impl<'a> Next<'a> {
    pub fn run(self, params: ResolveParams<'a>) -> ResolveFuture<'a> {
        self.inner.resolve(params)
    }
}

/// Wraps a field's resolver. A middleware may inspect or replace the
/// params before calling `next`, short-circuit without calling it at all,
/// or transform its result.
pub trait FieldMiddleware: Send + Sync {
    fn handle<'a>(&'a self, params: ResolveParams<'a>, next: Next<'a>) -> ResolveFuture<'a>;
}

/// One layer of the onion: a middleware around everything inside it.
pub(crate) struct MiddlewareResolver {
    pub(crate) inner: Arc<dyn FieldResolverFn>,
    pub(crate) middleware: Arc<dyn FieldMiddleware>,
}
impl FieldResolverFn for MiddlewareResolver {
    fn resolve<'a>(&'a self, params: ResolveParams<'a>) -> ResolveFuture<'a> {
        self.middleware.handle(params, Next {
            inner: self.inner.as_ref(),
        })
    }
}
