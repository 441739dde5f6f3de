use crate::directives::Directive;

/// The roles a directive can play. A directive declares the roles it
/// supports through [`Directive::capabilities()`] and provides each one
/// through the matching `as_*()` accessor.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DirectiveCapability {
    /// Decorates a store query with an argument's value.
    ArgBuilder,
    /// Edits the document around an argument definition.
    ArgManipulator,
    /// Handles a nested mutation argument once its parent row is saved.
    ArgResolver,
    /// Cleans up an incoming argument value.
    ArgSanitizer,
    /// Renames, flattens, or drops an argument.
    ArgStructure,
    /// Rewrites an argument value after validation.
    ArgTransformer,
    /// Checks an argument value, producing messages.
    ArgValidator,
    /// Computes a field's cost for query complexity analysis.
    ComplexityResolver,
    /// Decorates a store query for a whole field.
    FieldBuilder,
    /// Edits the document around a field definition.
    FieldManipulator,
    /// Wraps a field's resolver.
    FieldMiddleware,
    /// Provides a field's base resolver.
    FieldResolver,
    /// Edits the document around an input object field.
    InputFieldManipulator,
    /// Edits a type extension before it is merged.
    TypeExtensionManipulator,
    /// Edits the document around a type definition.
    TypeManipulator,
}
impl DirectiveCapability {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ArgBuilder => "ArgBuilder",
            Self::ArgManipulator => "ArgManipulator",
            Self::ArgResolver => "ArgResolver",
            Self::ArgSanitizer => "ArgSanitizer",
            Self::ArgStructure => "ArgStructure",
            Self::ArgTransformer => "ArgTransformer",
            Self::ArgValidator => "ArgValidator",
            Self::ComplexityResolver => "ComplexityResolver",
            Self::FieldBuilder => "FieldBuilder",
            Self::FieldManipulator => "FieldManipulator",
            Self::FieldMiddleware => "FieldMiddleware",
            Self::FieldResolver => "FieldResolver",
            Self::InputFieldManipulator => "InputFieldManipulator",
            Self::TypeExtensionManipulator => "TypeExtensionManipulator",
            Self::TypeManipulator => "TypeManipulator",
        }
    }

    /// Whether `directive` actually hands out an implementation of this
    /// capability.
    pub fn is_provided_by(&self, directive: &dyn Directive) -> bool {
        match self {
            Self::ArgBuilder => directive.as_arg_builder().is_some(),
            Self::ArgManipulator => directive.as_arg_manipulator().is_some(),
            Self::ArgResolver => directive.as_arg_resolver().is_some(),
            Self::ArgSanitizer => directive.as_arg_sanitizer().is_some(),
            Self::ArgStructure => directive.as_arg_structure().is_some(),
            Self::ArgTransformer => directive.as_arg_transformer().is_some(),
            Self::ArgValidator => directive.as_arg_validator().is_some(),
            Self::ComplexityResolver => directive.as_complexity_resolver().is_some(),
            Self::FieldBuilder => directive.as_field_builder().is_some(),
            Self::FieldManipulator => directive.as_field_manipulator().is_some(),
            Self::FieldMiddleware => directive.as_field_middleware().is_some(),
            Self::FieldResolver => directive.as_field_resolver().is_some(),
            Self::InputFieldManipulator => directive.as_input_field_manipulator().is_some(),
            Self::TypeExtensionManipulator => directive.as_type_extension_manipulator().is_some(),
            Self::TypeManipulator => directive.as_type_manipulator().is_some(),
        }
    }
}
impl std::fmt::Display for DirectiveCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
