use crate::directives::builtin;
use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::document::DirectiveDefinition;
use crate::document::DirectiveUsage;
use crate::document::DocumentAst;
use indexmap::IndexMap;
use std::sync::Arc;

type Result<T> = std::result::Result<T, DirectiveError>;

const GRAPHQL_BUILTIN_DIRECTIVES_SDL: &str = r#"
directive @deprecated(reason: String = "No longer supported") on FIELD_DEFINITION | ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION | ENUM_VALUE
directive @include(if: Boolean!) on FIELD | FRAGMENT_SPREAD | INLINE_FRAGMENT
directive @skip(if: Boolean!) on FIELD | FRAGMENT_SPREAD | INLINE_FRAGMENT
directive @specifiedBy(url: String!) on SCALAR
"#;

/// A directive usage paired with the implementation its name resolved to.
#[derive(Clone)]
pub struct BoundDirective {
    pub(crate) directive: Arc<dyn Directive>,
    pub(crate) usage: DirectiveUsage,
}
impl BoundDirective {
    pub fn directive(&self) -> &dyn Directive {
        self.directive.as_ref()
    }

    pub fn usage(&self) -> &DirectiveUsage {
        &self.usage
    }
}
impl std::fmt::Debug for BoundDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundDirective")
            .field("name", &self.directive.name())
            .field("usage", &self.usage)
            .finish()
    }
}

#[derive(Clone)]
pub struct RegisteredDirective {
    pub(crate) definition: DirectiveDefinition,
    pub(crate) directive: Arc<dyn Directive>,
}
impl RegisteredDirective {
    pub fn definition(&self) -> &DirectiveDefinition {
        &self.definition
    }

    pub fn directive(&self) -> &Arc<dyn Directive> {
        &self.directive
    }
}

/// Maps directive names to their implementations.
///
/// Registering a name a second time replaces the earlier implementation,
/// which is how applications override a built-in directive.
#[derive(Clone)]
pub struct DirectiveRegistry {
    directives: IndexMap<String, RegisteredDirective>,
    graphql_builtins: IndexMap<String, DirectiveDefinition>,
}
impl DirectiveRegistry {
    /// A registry that knows only GraphQL's own directives.
    pub fn new() -> Self {
        let graphql_builtins = DocumentAst::from_source(GRAPHQL_BUILTIN_DIRECTIVES_SDL, None)
            .map(|doc| doc.directive_definitions)
            .unwrap_or_default();
        Self {
            directives: IndexMap::new(),
            graphql_builtins,
        }
    }

    /// A registry preloaded with every built-in schema directive.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        builtin::register_builtins(&mut registry)?;
        Ok(registry)
    }

    /// Collects every usage in `usages` whose directive has `capability`,
    /// in source order.
    ///
    /// GraphQL's own directives are skipped; any other name that is not
    /// registered is an error.
    pub fn associated_of_type(
        &self,
        usages: &[DirectiveUsage],
        capability: DirectiveCapability,
    ) -> Result<Vec<BoundDirective>> {
        let mut bound = vec![];
        for usage in usages {
            if self.graphql_builtins.contains_key(usage.name()) {
                continue;
            }
            let registered = self.resolve_usage(usage)?;
            if registered.directive.capabilities().contains(&capability) {
                bound.push(BoundDirective {
                    directive: registered.directive.clone(),
                    usage: usage.clone(),
                });
            }
        }
        Ok(bound)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }

    /// The declaration for `name`, whether it is a registered directive or
    /// one of GraphQL's own.
    pub fn definition(&self, name: &str) -> Option<&DirectiveDefinition> {
        self.directives.get(name)
            .map(|registered| &registered.definition)
            .or_else(|| self.graphql_builtins.get(name))
    }

    /// Like [`DirectiveRegistry::associated_of_type()`], but fails when more
    /// than one usage has `capability`.
    pub fn exclusive_of_type(
        &self,
        usages: &[DirectiveUsage],
        capability: DirectiveCapability,
        node_name: &str,
    ) -> Result<Option<BoundDirective>> {
        let mut bound = self.associated_of_type(usages, capability)?;
        if bound.len() > 1 {
            return Err(DirectiveError::ExclusiveCapabilityViolation {
                capability,
                directive_names: bound.iter()
                    .map(|b| b.usage.name().to_string())
                    .collect(),
                node_name: node_name.to_string(),
            });
        }
        Ok(bound.pop())
    }

    pub fn is_graphql_builtin(&self, name: &str) -> bool {
        self.graphql_builtins.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.directives.keys().map(|name| name.as_str())
    }

    /// Registers `directive` under its own name.
    ///
    /// Fails if the directive's SDL declaration does not parse, declares a
    /// different name, or if a capability it lists is not provided by the
    /// matching accessor.
    pub fn register<D: Directive + 'static>(&mut self, directive: D) -> Result<()> {
        self.register_arc(Arc::new(directive))
    }

    pub fn register_arc(&mut self, directive: Arc<dyn Directive>) -> Result<()> {
        let name = directive.name().to_string();
        let doc = DocumentAst::from_source(directive.definition(), None)
            .map_err(|err| DirectiveError::InvalidDefinition {
                directive_name: name.clone(),
                message: err.to_string(),
            })?;
        let definition = doc.directive_definitions.get(&name)
            .cloned()
            .ok_or_else(|| DirectiveError::InvalidDefinition {
                directive_name: name.clone(),
                message: format!("no `directive @{name}` declaration found"),
            })?;

        for capability in directive.capabilities() {
            if !capability.is_provided_by(directive.as_ref()) {
                return Err(DirectiveError::CapabilityNotProvided {
                    capability: *capability,
                    directive_name: name,
                });
            }
        }

        if self.directives.contains_key(&name) {
            tracing::debug!("Replacing the registered implementation of `@{name}`");
        }
        self.directives.insert(name, RegisteredDirective {
            definition,
            directive,
        });
        Ok(())
    }

    /// Looks up a directive implementation by name.
    pub fn resolve(&self, name: &str) -> Option<&RegisteredDirective> {
        self.directives.get(name)
    }

    pub(crate) fn resolve_usage(&self, usage: &DirectiveUsage) -> Result<&RegisteredDirective> {
        self.directives.get(usage.name())
            .ok_or_else(|| DirectiveError::UnknownDirective {
                directive_name: usage.name().to_string(),
                location: usage.location().clone(),
            })
    }
}
impl std::default::Default for DirectiveRegistry {
    fn default() -> Self {
        Self::new()
    }
}
impl std::fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveRegistry")
            .field("directives", &self.directives.keys().collect::<Vec<_>>())
            .finish()
    }
}
