use crate::directives::ArgBuilderDirective;
use crate::directives::ArgManipulator;
use crate::directives::ArgResolverDirective;
use crate::directives::ArgSanitizerDirective;
use crate::directives::ArgStructureDirective;
use crate::directives::ArgTransformerDirective;
use crate::directives::ArgValidatorDirective;
use crate::directives::ComplexityResolverDirective;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::FieldBuilderDirective;
use crate::directives::FieldManipulator;
use crate::directives::FieldMiddlewareDirective;
use crate::directives::FieldResolverDirective;
use crate::directives::InputFieldManipulator;
use crate::directives::TypeExtensionManipulator;
use crate::directives::TypeManipulator;
use crate::document::DirectiveUsage;

/// A schema directive implementation.
///
/// Implementations are stateless and shared: the same instance handles
/// every usage of its name, and receives the usage's
/// [`DirectiveUsage`] with each call.
///
/// [`Directive::capabilities()`] lists the roles this directive plays, and
/// each listed role must be handed out by its `as_*()` accessor.
/// [`DirectiveRegistry::register()`](crate::directives::DirectiveRegistry::register)
/// rejects directives whose two disagree.
pub trait Directive: Send + Sync {
    /// The name used in SDL, without the leading `@`.
    fn name(&self) -> &str;

    /// The SDL `directive @...` declaration.
    fn definition(&self) -> &str;

    fn capabilities(&self) -> &[DirectiveCapability];

    /// Checks a usage's arguments beyond what the declaration can
    /// express. Runs once per usage at build time.
    fn validate_usage(&self, _usage: &DirectiveUsage) -> Result<(), DirectiveError> {
        Ok(())
    }

    fn as_arg_builder(&self) -> Option<&dyn ArgBuilderDirective> { None }
    fn as_arg_manipulator(&self) -> Option<&dyn ArgManipulator> { None }
    fn as_arg_resolver(&self) -> Option<&dyn ArgResolverDirective> { None }
    fn as_arg_sanitizer(&self) -> Option<&dyn ArgSanitizerDirective> { None }
    fn as_arg_structure(&self) -> Option<&dyn ArgStructureDirective> { None }
    fn as_arg_transformer(&self) -> Option<&dyn ArgTransformerDirective> { None }
    fn as_arg_validator(&self) -> Option<&dyn ArgValidatorDirective> { None }
    fn as_complexity_resolver(&self) -> Option<&dyn ComplexityResolverDirective> { None }
    fn as_field_builder(&self) -> Option<&dyn FieldBuilderDirective> { None }
    fn as_field_manipulator(&self) -> Option<&dyn FieldManipulator> { None }
    fn as_field_middleware(&self) -> Option<&dyn FieldMiddlewareDirective> { None }
    fn as_field_resolver(&self) -> Option<&dyn FieldResolverDirective> { None }
    fn as_input_field_manipulator(&self) -> Option<&dyn InputFieldManipulator> { None }
    fn as_type_extension_manipulator(&self) -> Option<&dyn TypeExtensionManipulator> { None }
    fn as_type_manipulator(&self) -> Option<&dyn TypeManipulator> { None }
}
