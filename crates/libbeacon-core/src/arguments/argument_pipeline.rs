use crate::arguments::ArgumentSet;
use crate::arguments::ArgumentValue;
use crate::directives::BoundDirective;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::document::DirectiveUsage;
use crate::execution::RequestContext;
use crate::resolve::CompiledSchema;
use crate::resolve::ResolveError;
use indexmap::IndexMap;

type Result<T> = std::result::Result<T, ResolveError>;

/// Runs the argument directives of a field over its [`ArgumentSet`].
///
/// The stages always run in this order, each over the whole tree:
///
/// 1. sanitizers, leaf-first;
/// 2. validators, collecting every failure under its dotted path;
/// 3. transformers, leaf-first;
/// 4. structure directives (`@spread`, `@rename`, `@drop`), depth-first,
///    so an enclosing set sees the already-restructured keys of its
///    children.
pub struct ArgumentPipeline<'a> {
    request: &'a RequestContext,
    schema: &'a CompiledSchema,
}
impl<'a> ArgumentPipeline<'a> {
    pub fn new(schema: &'a CompiledSchema, request: &'a RequestContext) -> Self {
        Self {
            request,
            schema,
        }
    }

    pub fn process(&self, args: ArgumentSet, field_name: &str) -> Result<ArgumentSet> {
        let args = self.sanitize(args)?;

        let mut errors = IndexMap::new();
        self.validate(&args, "", &mut errors)?;
        if !errors.is_empty() {
            tracing::debug!(
                "Rejecting arguments of `{field_name}`: {} invalid path(s)",
                errors.len(),
            );
            return Err(ResolveError::Validation {
                errors,
                field: field_name.to_string(),
            });
        }

        let args = self.transform(args)?;
        self.restructure(args)
    }

    fn bound(
        &self,
        usages: &[DirectiveUsage],
        capability: DirectiveCapability,
    ) -> Result<Vec<BoundDirective>> {
        Ok(self.schema.registry().associated_of_type(usages, capability)?)
    }

    fn sanitize(&self, mut args: ArgumentSet) -> Result<ArgumentSet> {
        for argument in args.arguments.values_mut() {
            let value = std::mem::replace(&mut argument.value, ArgumentValue::Null);
            let mut value = map_nested(value, &mut |nested| self.sanitize(nested))?;
            for bound in self.bound(&argument.directives, DirectiveCapability::ArgSanitizer)? {
                let sanitizer = bound.directive().as_arg_sanitizer()
                    .ok_or_else(|| not_provided(&bound, DirectiveCapability::ArgSanitizer))?;
                value = sanitizer.sanitize(bound.usage(), value);
            }
            argument.value = value;
        }
        Ok(args)
    }

    fn validate(
        &self,
        args: &ArgumentSet,
        prefix: &str,
        errors: &mut IndexMap<String, Vec<String>>,
    ) -> Result<()> {
        let given = args.arguments.iter().map(|(name, arg)| (name, arg, true));
        let undefined = args.undefined.iter().map(|(name, arg)| (name, arg, false));
        for (name, argument, is_given) in given.chain(undefined) {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };

            let value = is_given.then_some(&argument.value);
            for bound in self.bound(&argument.directives, DirectiveCapability::ArgValidator)? {
                let validator = bound.directive().as_arg_validator()
                    .ok_or_else(|| not_provided(&bound, DirectiveCapability::ArgValidator))?;
                let messages = validator.validate(bound.usage(), value);
                if !messages.is_empty() {
                    errors.entry(path.clone()).or_default().extend(messages);
                }
            }

            match value {
                Some(ArgumentValue::Nested(nested)) => self.validate(nested, &path, errors)?,
                Some(ArgumentValue::List(items)) => {
                    for (idx, item) in items.iter().enumerate() {
                        if let ArgumentValue::Nested(nested) = item {
                            self.validate(nested, &format!("{path}.{idx}"), errors)?;
                        }
                    }
                },
                _ => (),
            }
        }
        Ok(())
    }

    fn transform(&self, mut args: ArgumentSet) -> Result<ArgumentSet> {
        for argument in args.arguments.values_mut() {
            let value = std::mem::replace(&mut argument.value, ArgumentValue::Null);
            let mut value = map_nested(value, &mut |nested| self.transform(nested))?;
            for bound in self.bound(&argument.directives, DirectiveCapability::ArgTransformer)? {
                let transformer = bound.directive().as_arg_transformer()
                    .ok_or_else(|| not_provided(&bound, DirectiveCapability::ArgTransformer))?;
                value = transformer.transform(bound.usage(), value, self.request)?;
            }
            argument.value = value;
        }
        Ok(args)
    }

    fn restructure(&self, args: ArgumentSet) -> Result<ArgumentSet> {
        let ArgumentSet { arguments, undefined } = args;
        let mut restructured = ArgumentSet {
            arguments: IndexMap::new(),
            undefined,
        };

        for (name, mut argument) in arguments {
            let value = std::mem::replace(&mut argument.value, ArgumentValue::Null);
            argument.value = map_nested(value, &mut |nested| self.restructure(nested))?;

            let structure_directives = self.bound(
                &argument.directives,
                DirectiveCapability::ArgStructure,
            )?;
            let mut current = Some((name, argument));
            for bound in structure_directives {
                let Some((name, argument)) = current.take() else {
                    break;
                };
                let structure = bound.directive().as_arg_structure()
                    .ok_or_else(|| not_provided(&bound, DirectiveCapability::ArgStructure))?;
                current = structure.restructure(bound.usage(), name, argument, &mut restructured)?;
            }

            if let Some((name, argument)) = current {
                restructured.arguments.insert(name, argument);
            }
        }
        Ok(restructured)
    }
}

/// Applies `f` to each nested set inside `value`, including those inside
/// lists.
fn map_nested(
    value: ArgumentValue,
    f: &mut impl FnMut(ArgumentSet) -> Result<ArgumentSet>,
) -> Result<ArgumentValue> {
    Ok(match value {
        ArgumentValue::Nested(nested) => ArgumentValue::Nested(f(nested)?),
        ArgumentValue::List(items) => ArgumentValue::List(
            items.into_iter()
                .map(|item| map_nested(item, f))
                .collect::<Result<Vec<_>>>()?,
        ),
        value => value,
    })
}

fn not_provided(bound: &BoundDirective, capability: DirectiveCapability) -> ResolveError {
    ResolveError::Directive(DirectiveError::CapabilityNotProvided {
        capability,
        directive_name: bound.usage().name().to_string(),
    })
}

impl std::fmt::Debug for ArgumentPipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgumentPipeline").finish_non_exhaustive()
    }
}
