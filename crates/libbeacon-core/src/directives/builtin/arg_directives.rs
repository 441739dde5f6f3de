use crate::arguments::Argument;
use crate::arguments::ArgumentSet;
use crate::arguments::ArgumentValue;
use crate::directives::ArgResolverDirective;
use crate::directives::ArgSanitizerDirective;
use crate::directives::ArgStructureDirective;
use crate::directives::ArgTransformerDirective;
use crate::directives::ArgValidatorDirective;
use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::NestedParent;
use crate::document::DirectiveUsage;
use crate::execution::RequestContext;
use crate::mutation::MutationExecutor;
use crate::resolve::ResolveError;
use futures::future::BoxFuture;
use regex::Regex;
use sha2::Digest;
use std::sync::LazyLock;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Rewrites every string inside `value`, descending into lists and nested
/// input objects.
fn map_strings(value: ArgumentValue, f: &impl Fn(&str) -> ArgumentValue) -> ArgumentValue {
    match value {
        ArgumentValue::List(items) => ArgumentValue::List(
            items.into_iter().map(|item| map_strings(item, f)).collect(),
        ),
        ArgumentValue::Nested(mut set) => {
            for argument in set.arguments.values_mut() {
                let value = std::mem::replace(&mut argument.value, ArgumentValue::Null);
                argument.value = map_strings(value, f);
            }
            ArgumentValue::Nested(set)
        },
        ArgumentValue::Scalar(serde_json::Value::String(text)) => f(&text),
        other => other,
    }
}

/// `@trim` removes surrounding whitespace from strings.
pub struct TrimDirective;
impl Directive for TrimDirective {
    fn name(&self) -> &str {
        "trim"
    }

    fn definition(&self) -> &str {
        r#"
"""
Remove whitespace from the beginning and end of a given input.
"""
directive @trim on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::ArgSanitizer]
    }

    fn as_arg_sanitizer(&self) -> Option<&dyn ArgSanitizerDirective> {
        Some(self)
    }
}
impl ArgSanitizerDirective for TrimDirective {
    fn sanitize(&self, _usage: &DirectiveUsage, value: ArgumentValue) -> ArgumentValue {
        map_strings(value, &|text| ArgumentValue::Scalar(text.trim().into()))
    }
}

/// `@convertEmptyStringsToNull` turns `""` into `null`.
pub struct ConvertEmptyStringsToNullDirective;
impl Directive for ConvertEmptyStringsToNullDirective {
    fn name(&self) -> &str {
        "convertEmptyStringsToNull"
    }

    fn definition(&self) -> &str {
        r#"
"""
Replaces `""` with `null`.
"""
directive @convertEmptyStringsToNull on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::ArgSanitizer]
    }

    fn as_arg_sanitizer(&self) -> Option<&dyn ArgSanitizerDirective> {
        Some(self)
    }
}
impl ArgSanitizerDirective for ConvertEmptyStringsToNullDirective {
    fn sanitize(&self, _usage: &DirectiveUsage, value: ArgumentValue) -> ArgumentValue {
        map_strings(value, &|text| if text.is_empty() {
            ArgumentValue::Null
        } else {
            ArgumentValue::Scalar(text.into())
        })
    }
}

/// `@hash` replaces strings with their hex-encoded SHA-256 digest.
pub struct HashDirective;
impl Directive for HashDirective {
    fn name(&self) -> &str {
        "hash"
    }

    fn definition(&self) -> &str {
        r#"
"""
Use a one-way hash to store sensitive values such as passwords.
"""
directive @hash on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::ArgTransformer]
    }

    fn as_arg_transformer(&self) -> Option<&dyn ArgTransformerDirective> {
        Some(self)
    }
}
impl ArgTransformerDirective for HashDirective {
    fn transform(
        &self,
        _usage: &DirectiveUsage,
        value: ArgumentValue,
        _request: &RequestContext,
    ) -> Result<ArgumentValue, ResolveError> {
        Ok(map_strings(value, &|text| {
            ArgumentValue::Scalar(hex::encode(sha2::Sha256::digest(text.as_bytes())).into())
        }))
    }
}

/// A single parsed entry of `@rules(apply: [...])`.
#[derive(Clone, Debug, PartialEq)]
enum Rule {
    Alpha,
    Email,
    In(Vec<String>),
    Integer,
    Max(f64),
    Min(f64),
    Numeric,
    Required,
}
impl Rule {
    fn parse(src: &str) -> Option<Self> {
        let (name, param) = match src.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (src.trim(), None),
        };
        Some(match (name, param) {
            ("alpha", None) => Self::Alpha,
            ("email", None) => Self::Email,
            ("in", Some(options)) => Self::In(
                options.split(',').map(|option| option.trim().to_string()).collect(),
            ),
            ("integer", None) => Self::Integer,
            ("max", Some(max)) => Self::Max(max.parse().ok()?),
            ("min", Some(min)) => Self::Min(min.parse().ok()?),
            ("numeric", None) => Self::Numeric,
            ("required", None) => Self::Required,
            _ => return None,
        })
    }

    /// `None` when `value` passes.
    fn check(&self, value: Option<&ArgumentValue>) -> Option<String> {
        let value = match value {
            None | Some(ArgumentValue::Null) => {
                return (*self == Self::Required).then(|| "This field is required.".to_string());
            },
            Some(value) => value,
        };

        match self {
            Self::Required => match value.as_str() {
                Some(text) if text.trim().is_empty() => Some("This field is required.".to_string()),
                _ => None,
            },
            Self::Max(max) => match size_of(value) {
                Some(size) if size > *max => Some(format!("This field may not be greater than {max}.")),
                _ => None,
            },
            Self::Min(min) => match size_of(value) {
                Some(size) if size < *min => Some(format!("This field must be at least {min}.")),
                _ => None,
            },
            _ => scalars(value).into_iter()
                .find(|scalar| !self.scalar_passes(scalar))
                .map(|_| self.message()),
        }
    }

    fn scalar_passes(&self, scalar: &serde_json::Value) -> bool {
        match self {
            Self::Alpha => scalar.as_str()
                .is_some_and(|text| !text.is_empty() && text.chars().all(char::is_alphabetic)),
            Self::Email => scalar.as_str()
                .zip(EMAIL.as_ref())
                .is_some_and(|(text, email)| email.is_match(text)),
            Self::In(options) => {
                let given = match scalar {
                    serde_json::Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                options.contains(&given)
            },
            Self::Integer => match scalar {
                serde_json::Value::Number(number) => number.is_i64() || number.is_u64(),
                serde_json::Value::String(text) => text.trim().parse::<i64>().is_ok(),
                _ => false,
            },
            Self::Numeric => match scalar {
                serde_json::Value::Number(_) => true,
                serde_json::Value::String(text) => text.trim().parse::<f64>().is_ok(),
                _ => false,
            },
            Self::Max(_) | Self::Min(_) | Self::Required => true,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Alpha => "This field may only contain letters.".to_string(),
            Self::Email => "This field must be a valid email address.".to_string(),
            Self::In(_) => "The selected value is invalid.".to_string(),
            Self::Integer => "This field must be an integer.".to_string(),
            Self::Numeric => "This field must be a number.".to_string(),
            Self::Max(_) | Self::Min(_) | Self::Required => "This field is invalid.".to_string(),
        }
    }
}

/// The size `min`/`max` compare: a number's value, a string's length in
/// characters, or a list's item count.
fn size_of(value: &ArgumentValue) -> Option<f64> {
    match value {
        ArgumentValue::List(items) => Some(items.len() as f64),
        ArgumentValue::Scalar(serde_json::Value::Number(number)) => number.as_f64(),
        ArgumentValue::Scalar(serde_json::Value::String(text)) => Some(text.chars().count() as f64),
        _ => None,
    }
}

fn scalars(value: &ArgumentValue) -> Vec<&serde_json::Value> {
    match value {
        ArgumentValue::List(items) => items.iter().flat_map(scalars).collect(),
        ArgumentValue::Scalar(scalar) => vec![scalar],
        _ => vec![],
    }
}

fn parse_rules(usage: &DirectiveUsage) -> Result<Vec<Rule>, DirectiveError> {
    usage.string_list_arg("apply")?
        .unwrap_or_default()
        .iter()
        .map(|src| Rule::parse(src).ok_or_else(|| DirectiveError::InvalidArgument {
            argument_name: "apply".to_string(),
            directive_name: usage.name().to_string(),
            message: format!("unknown rule `{src}`"),
        }))
        .collect()
}

/// `@rules(apply: ["required", "min:3"])` validates an argument.
pub struct RulesDirective;
impl Directive for RulesDirective {
    fn name(&self) -> &str {
        "rules"
    }

    fn definition(&self) -> &str {
        r#"
"""
Validate an argument using a list of rules.
Supported: required, min:n, max:n, email, in:a,b, alpha, numeric, integer.
"""
directive @rules(
  """
  Specify the validation rules to apply to the field.
  """
  apply: [String!]!
) repeatable on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::ArgValidator]
    }

    fn validate_usage(&self, usage: &DirectiveUsage) -> Result<(), DirectiveError> {
        parse_rules(usage).map(|_| ())
    }

    fn as_arg_validator(&self) -> Option<&dyn ArgValidatorDirective> {
        Some(self)
    }
}
impl ArgValidatorDirective for RulesDirective {
    fn validate(&self, usage: &DirectiveUsage, value: Option<&ArgumentValue>) -> Vec<String> {
        let rules = match parse_rules(usage) {
            Ok(rules) => rules,
            Err(err) => return vec![err.to_string()],
        };
        rules.iter().filter_map(|rule| rule.check(value)).collect()
    }
}

/// `@spread` merges the fields of a nested input object into the
/// enclosing set. A `null` value removes the argument instead.
pub struct SpreadDirective;
impl Directive for SpreadDirective {
    fn name(&self) -> &str {
        "spread"
    }

    fn definition(&self) -> &str {
        r#"
"""
Merge the fields of a nested input object into the arguments of its parent
when processing the field arguments given by a client.
"""
directive @spread on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::ArgStructure]
    }

    fn as_arg_structure(&self) -> Option<&dyn ArgStructureDirective> {
        Some(self)
    }
}
impl ArgStructureDirective for SpreadDirective {
    fn restructure(
        &self,
        _usage: &DirectiveUsage,
        name: String,
        argument: Argument,
        parent: &mut ArgumentSet,
    ) -> Result<Option<(String, Argument)>, ResolveError> {
        match argument.value {
            ArgumentValue::Null => Ok(None),
            ArgumentValue::Nested(nested) => {
                for (nested_name, nested_argument) in nested.arguments {
                    parent.insert(nested_name, nested_argument);
                }
                Ok(None)
            },
            value => Ok(Some((name, Argument { value, ..argument }))),
        }
    }
}

/// `@drop` removes an argument before it reaches the resolver.
pub struct DropDirective;
impl Directive for DropDirective {
    fn name(&self) -> &str {
        "drop"
    }

    fn definition(&self) -> &str {
        r#"
"""
Ignore the user given value, don't pass it to the resolver.
"""
directive @drop on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::ArgStructure]
    }

    fn as_arg_structure(&self) -> Option<&dyn ArgStructureDirective> {
        Some(self)
    }
}
impl ArgStructureDirective for DropDirective {
    fn restructure(
        &self,
        _usage: &DirectiveUsage,
        _name: String,
        _argument: Argument,
        _parent: &mut ArgumentSet,
    ) -> Result<Option<(String, Argument)>, ResolveError> {
        Ok(None)
    }
}

/// `@nest` hands each field of a nested input object to that field's own
/// argument resolver directives, against the same parent row.
pub struct NestDirective;
impl Directive for NestDirective {
    fn name(&self) -> &str {
        "nest"
    }

    fn definition(&self) -> &str {
        r#"
"""
A no-op nested arg resolver that delegates all calls
to the ArgResolver directives attached to the children.
"""
directive @nest on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::ArgResolver]
    }

    fn as_arg_resolver(&self) -> Option<&dyn ArgResolverDirective> {
        Some(self)
    }
}
impl ArgResolverDirective for NestDirective {
    fn resolve_nested<'a>(
        &'a self,
        _usage: &'a DirectiveUsage,
        _argument_name: &'a str,
        parent: NestedParent<'a>,
        value: ArgumentValue,
        executor: &'a MutationExecutor<'a>,
    ) -> BoxFuture<'a, Result<(), ResolveError>> {
        Box::pin(async move {
            let ArgumentValue::Nested(nested) = value else {
                return Ok(());
            };
            let registry = executor.schema().registry();
            for (name, argument) in nested.arguments {
                let bound = registry.associated_of_type(
                    &argument.directives,
                    DirectiveCapability::ArgResolver,
                )?;
                for bound in bound.iter() {
                    let resolver = bound.directive().as_arg_resolver()
                        .ok_or_else(|| DirectiveError::CapabilityNotProvided {
                            capability: DirectiveCapability::ArgResolver,
                            directive_name: bound.usage().name().to_string(),
                        })?;
                    resolver.resolve_nested(
                        bound.usage(),
                        &name,
                        parent,
                        argument.value.clone(),
                        executor,
                    ).await?;
                }
            }
            Ok(())
        })
    }
}
