use crate::resolve::FieldResolverFn;
use crate::resolve::ResolveError;
use crate::resolve::ResolveParams;
use crate::resolve::ResolveResult;
use crate::resolve::SyncResolver;
use crate::store::QueryBuilder;
use std::collections::HashMap;
use std::sync::Arc;

/// A named query builder callback, as referenced by `@builder(method:)`.
pub type BuilderFn = dyn Fn(&mut dyn QueryBuilder, &serde_json::Value) -> Result<(), ResolveError>
    + Send
    + Sync;

/// A named complexity function, as referenced by `@complexity(resolver:)`.
/// Receives the summed complexity of the field's children and the field's
/// arguments.
pub type ComplexityFn = dyn Fn(usize, &serde_json::Map<String, serde_json::Value>) -> usize
    + Send
    + Sync;

/// Application code that directives refer to by name, e.g.
/// `@field(resolver: "UserResolver@fullName")`.
///
/// Names are looked up first with each candidate namespace prepended
/// (`<namespace>::<name>`), then bare.
#[derive(Clone, Default)]
pub struct CallableRegistry {
    builders: HashMap<String, Arc<BuilderFn>>,
    complexity: HashMap<String, Arc<ComplexityFn>>,
    resolvers: HashMap<String, Arc<dyn FieldResolverFn>>,
}
impl CallableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder(&self, name: &str, namespaces: &[String]) -> Option<Arc<BuilderFn>> {
        lookup(&self.builders, name, namespaces)
    }

    pub fn complexity(&self, name: &str, namespaces: &[String]) -> Option<Arc<ComplexityFn>> {
        lookup(&self.complexity, name, namespaces)
    }

    pub fn register_builder<F>(&mut self, name: impl Into<String>, builder: F) -> &mut Self
    where
        F: Fn(&mut dyn QueryBuilder, &serde_json::Value) -> Result<(), ResolveError>
            + Send
            + Sync
            + 'static,
    {
        self.builders.insert(name.into(), Arc::new(builder));
        self
    }

    pub fn register_complexity<F>(&mut self, name: impl Into<String>, complexity: F) -> &mut Self
    where
        F: Fn(usize, &serde_json::Map<String, serde_json::Value>) -> usize + Send + Sync + 'static,
    {
        self.complexity.insert(name.into(), Arc::new(complexity));
        self
    }

    pub fn register_resolver<R>(&mut self, name: impl Into<String>, resolver: R) -> &mut Self
    where
        R: FieldResolverFn + 'static,
    {
        self.resolvers.insert(name.into(), Arc::new(resolver));
        self
    }

    /// Registers a resolver that does not need to await anything.
    pub fn register_sync_resolver<F>(&mut self, name: impl Into<String>, resolver: F) -> &mut Self
    where
        F: Fn(&ResolveParams<'_>) -> ResolveResult + Send + Sync + 'static,
    {
        self.register_resolver(name, SyncResolver::new(resolver))
    }

    pub fn resolver(&self, name: &str, namespaces: &[String]) -> Option<Arc<dyn FieldResolverFn>> {
        lookup(&self.resolvers, name, namespaces)
    }
}
impl std::fmt::Debug for CallableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallableRegistry")
            .field("builders", &self.builders.keys().collect::<Vec<_>>())
            .field("complexity", &self.complexity.keys().collect::<Vec<_>>())
            .field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn lookup<T: ?Sized>(
    map: &HashMap<String, Arc<T>>,
    name: &str,
    namespaces: &[String],
) -> Option<Arc<T>> {
    namespaces.iter()
        .map(|namespace| format!("{namespace}::{name}"))
        .chain(std::iter::once(name.to_string()))
        .find_map(|candidate| map.get(&candidate).cloned())
}
