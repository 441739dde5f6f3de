pub mod builtin;
mod callable_registry;
mod capabilities;
mod directive;
mod directive_capability;
mod directive_error;
mod directive_registry;
mod directive_validator;

pub use callable_registry::BuilderFn;
pub use callable_registry::CallableRegistry;
pub use callable_registry::ComplexityFn;
pub use capabilities::ArgBuilderDirective;
pub use capabilities::ArgManipulator;
pub use capabilities::ArgResolverDirective;
pub use capabilities::ArgSanitizerDirective;
pub use capabilities::ArgStructureDirective;
pub use capabilities::ArgTransformerDirective;
pub use capabilities::ArgValidatorDirective;
pub use capabilities::BuilderContext;
pub use capabilities::ComplexityContext;
pub use capabilities::ComplexityResolverDirective;
pub use capabilities::FieldBuilderDirective;
pub use capabilities::FieldContext;
pub use capabilities::FieldManipulator;
pub use capabilities::FieldMiddlewareDirective;
pub use capabilities::FieldResolverDirective;
pub use capabilities::InputFieldManipulator;
pub use capabilities::Manipulation;
pub use capabilities::NestedParent;
pub use capabilities::TypeExtensionManipulator;
pub use capabilities::TypeManipulator;
pub use directive::Directive;
pub use directive_capability::DirectiveCapability;
pub use directive_error::DirectiveError;
pub use directive_error::ManyMutationProblem;
pub use directive_registry::BoundDirective;
pub use directive_registry::DirectiveRegistry;
pub use directive_registry::RegisteredDirective;
pub(crate) use directive_validator::DirectiveValidator;

#[cfg(test)]
mod tests;
