use crate::directives::ComplexityContext;
use crate::directives::ComplexityResolverDirective;
use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::document::DirectiveUsage;

/// `@complexity(resolver: "UserComplexity@posts")` customizes a field's
/// cost. Without a resolver the cost is `1 + children * (first or 1)`.
pub struct ComplexityDirective;
impl Directive for ComplexityDirective {
    fn name(&self) -> &str {
        "complexity"
    }

    fn definition(&self) -> &str {
        r#"
"""
Customize the calculation of a fields complexity score before execution.
"""
directive @complexity(
  """
  Reference a function to customize the complexity score calculation.
  Consists of the name of a registered complexity callable.
  """
  resolver: String
) on FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::ComplexityResolver]
    }

    fn as_complexity_resolver(&self) -> Option<&dyn ComplexityResolverDirective> {
        Some(self)
    }
}
impl ComplexityResolverDirective for ComplexityDirective {
    fn complexity(
        &self,
        usage: &DirectiveUsage,
        child_complexity: usize,
        args: &serde_json::Map<String, serde_json::Value>,
        ctx: &ComplexityContext<'_>,
    ) -> usize {
        let resolver = usage.string_arg("resolver").ok().flatten();
        if let Some(name) = resolver {
            match ctx.callables.complexity(name, &ctx.config.namespaces.complexity) {
                Some(complexity_fn) => return complexity_fn(child_complexity, args),
                None => tracing::warn!("No complexity callable named `{name}` is registered"),
            }
        }
        child_complexity.saturating_mul(requested_count(args).unwrap_or(1)).saturating_add(1)
    }
}

/// The `first` argument of a field, when the client gave one.
pub(super) fn requested_count(args: &serde_json::Map<String, serde_json::Value>) -> Option<usize> {
    args.get("first")
        .and_then(|first| first.as_u64())
        .map(|first| usize::try_from(first).unwrap_or(usize::MAX))
}
