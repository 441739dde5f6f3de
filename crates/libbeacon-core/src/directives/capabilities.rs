use crate::arguments::Argument;
use crate::arguments::ArgumentSet;
use crate::arguments::ArgumentValue;
use crate::directives::CallableRegistry;
use crate::directives::DirectiveError;
use crate::document::DirectiveUsage;
use crate::document::DocumentAst;
use crate::document::FieldDefinition;
use crate::document::Node;
use crate::document::TypeDefinition;
use crate::execution::RequestContext;
use crate::mutation::MutationExecutor;
use crate::resolve::CompiledSchema;
use crate::resolve::FieldMiddleware;
use crate::resolve::FieldResolverFn;
use crate::resolve::ResolveError;
use crate::schema::SchemaBuildError;
use crate::store::QueryBuilder;
use crate::store::Row;
use crate::BeaconConfig;
use futures::future::BoxFuture;
use std::sync::Arc;

type BuildResult = std::result::Result<(), SchemaBuildError>;

/// What a manipulator gets to work with during one of the build passes.
pub struct Manipulation<'a> {
    pub config: &'a BeaconConfig,
    pub doc: &'a mut DocumentAst,
    pub usage: &'a DirectiveUsage,
}

pub trait TypeManipulator: Send + Sync {
    fn manipulate_type_definition(
        &self,
        manipulation: Manipulation<'_>,
        type_name: &str,
    ) -> BuildResult;
}

pub trait TypeExtensionManipulator: Send + Sync {
    /// `extension` has already been taken out of the document, so the
    /// document and the extension may both be edited.
    fn manipulate_type_extension(
        &self,
        manipulation: Manipulation<'_>,
        extension: &mut TypeDefinition,
    ) -> BuildResult;
}

pub trait FieldManipulator: Send + Sync {
    fn manipulate_field_definition(
        &self,
        manipulation: Manipulation<'_>,
        parent_type: &str,
        field_name: &str,
    ) -> BuildResult;
}

pub trait ArgManipulator: Send + Sync {
    fn manipulate_arg_definition(
        &self,
        manipulation: Manipulation<'_>,
        parent_type: &str,
        field_name: &str,
        arg_name: &str,
    ) -> BuildResult;
}

pub trait InputFieldManipulator: Send + Sync {
    fn manipulate_input_field_definition(
        &self,
        manipulation: Manipulation<'_>,
        input_type: &str,
        field_name: &str,
    ) -> BuildResult;
}

/// The field a resolution-time directive is being composed for.
pub struct FieldContext<'a> {
    pub callables: &'a CallableRegistry,
    pub config: &'a BeaconConfig,
    pub doc: &'a DocumentAst,
    pub field: &'a FieldDefinition,
    pub parent_type: &'a str,
}
impl<'a> FieldContext<'a> {
    /// The model a field reads or writes: the `model` argument if the
    /// usage has one, otherwise the model behind the field's return type.
    pub fn model_name(&self, usage: &DirectiveUsage) -> Result<String, DirectiveError> {
        Ok(match usage.string_arg("model")? {
            Some(model) => model.to_string(),
            None => self.doc.model_name_for_type(self.return_type_name()),
        })
    }

    /// Namespaces to try when looking up a callable named by `usage`.
    ///
    /// A `@namespace(<directive>: "...")` on the field comes first, then
    /// `configured`.
    pub fn namespaces(&self, usage: &DirectiveUsage, configured: &[String]) -> Vec<String> {
        let mut namespaces = vec![];
        if let Some(namespace) = self.field.directive("namespace")
            .and_then(|ns| ns.argument(usage.name()))
            .and_then(|value| value.as_str())
        {
            namespaces.push(namespace.to_string());
        }
        namespaces.extend(configured.iter().cloned());
        namespaces
    }

    pub fn return_type_name(&self) -> &'a str {
        self.field.type_annotation().innermost_type_name()
    }
}

pub trait FieldResolverDirective: Send + Sync {
    fn resolve_field(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldResolverFn>, DirectiveError>;
}

pub trait FieldMiddlewareDirective: Send + Sync {
    fn field_middleware(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldMiddleware>, DirectiveError>;
}

/// Request-time context for query builder directives.
pub struct BuilderContext<'a> {
    pub request: &'a RequestContext,
    pub schema: &'a CompiledSchema,
}

pub trait ArgBuilderDirective: Send + Sync {
    fn handle_builder(
        &self,
        usage: &DirectiveUsage,
        builder: &mut dyn QueryBuilder,
        argument_name: &str,
        value: &ArgumentValue,
        ctx: &BuilderContext<'_>,
    ) -> Result<(), ResolveError>;
}

pub trait FieldBuilderDirective: Send + Sync {
    fn handle_field_builder(
        &self,
        usage: &DirectiveUsage,
        builder: &mut dyn QueryBuilder,
        args: &ArgumentSet,
        ctx: &BuilderContext<'_>,
    ) -> Result<(), ResolveError>;
}

pub trait ArgSanitizerDirective: Send + Sync {
    fn sanitize(&self, usage: &DirectiveUsage, value: ArgumentValue) -> ArgumentValue;
}

pub trait ArgTransformerDirective: Send + Sync {
    fn transform(
        &self,
        usage: &DirectiveUsage,
        value: ArgumentValue,
        request: &RequestContext,
    ) -> Result<ArgumentValue, ResolveError>;
}

pub trait ArgValidatorDirective: Send + Sync {
    /// Returns one message per failed check. `value` is `None` when the
    /// argument was not given at all.
    fn validate(&self, usage: &DirectiveUsage, value: Option<&ArgumentValue>) -> Vec<String>;
}

pub trait ArgStructureDirective: Send + Sync {
    /// Receives an argument already removed from `parent`. Returning it
    /// (possibly renamed) keeps it in the set; returning `None` means the
    /// directive consumed it.
    fn restructure(
        &self,
        usage: &DirectiveUsage,
        name: String,
        argument: Argument,
        parent: &mut ArgumentSet,
    ) -> Result<Option<(String, Argument)>, ResolveError>;
}

/// The saved row a nested mutation argument belongs to.
#[derive(Clone, Copy, Debug)]
pub struct NestedParent<'a> {
    pub model: &'a str,
    pub row: &'a Row,
}

pub trait ArgResolverDirective: Send + Sync {
    fn resolve_nested<'a>(
        &'a self,
        usage: &'a DirectiveUsage,
        argument_name: &'a str,
        parent: NestedParent<'a>,
        value: ArgumentValue,
        executor: &'a MutationExecutor<'a>,
    ) -> BoxFuture<'a, Result<(), ResolveError>>;
}

pub struct ComplexityContext<'a> {
    pub callables: &'a CallableRegistry,
    pub config: &'a BeaconConfig,
}

pub trait ComplexityResolverDirective: Send + Sync {
    fn complexity(
        &self,
        usage: &DirectiveUsage,
        child_complexity: usize,
        args: &serde_json::Map<String, serde_json::Value>,
        ctx: &ComplexityContext<'_>,
    ) -> usize;
}
