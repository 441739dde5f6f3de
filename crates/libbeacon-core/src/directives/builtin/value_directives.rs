use crate::arguments::Argument;
use crate::arguments::ArgumentSet;
use crate::arguments::ArgumentValue;
use crate::directives::ArgStructureDirective;
use crate::directives::ArgTransformerDirective;
use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::FieldContext;
use crate::directives::FieldMiddlewareDirective;
use crate::directives::FieldResolverDirective;
use crate::document::DirectiveUsage;
use crate::execution::RequestContext;
use crate::resolve::FieldMiddleware;
use crate::resolve::FieldResolverFn;
use crate::resolve::Next;
use crate::resolve::ResolveError;
use crate::resolve::ResolveFuture;
use crate::resolve::ResolveParams;
use base64::Engine;
use std::sync::Arc;

/// `@inject(context: "user.id", name: "user_id")` copies a value from the
/// request context into the field's arguments. Dotted names nest.
pub struct InjectDirective;
impl Directive for InjectDirective {
    fn name(&self) -> &str {
        "inject"
    }

    fn definition(&self) -> &str {
        r#"
"""
Inject a value from the context object into the arguments.
"""
directive @inject(
  """
  A path to the property of the context that will be injected.
  If the value is nested within the context, you may use dot notation
  to get it, e.g. "user.id".
  """
  context: String!

  """
  The target name of the argument into which the value is injected.
  You can use dot notation to set the value at arbitrary depth
  within the incoming argument.
  """
  name: String!
) repeatable on FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::FieldMiddleware]
    }

    fn as_field_middleware(&self) -> Option<&dyn FieldMiddlewareDirective> {
        Some(self)
    }
}
impl FieldMiddlewareDirective for InjectDirective {
    fn field_middleware(
        &self,
        usage: &DirectiveUsage,
        _field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldMiddleware>, DirectiveError> {
        Ok(Arc::new(InjectMiddleware {
            context: usage.required_string_arg("context")?.to_string(),
            name: usage.required_string_arg("name")?.to_string(),
        }))
    }
}

struct InjectMiddleware {
    context: String,
    name: String,
}
impl FieldMiddleware for InjectMiddleware {
    fn handle<'a>(&'a self, mut params: ResolveParams<'a>, next: Next<'a>) -> ResolveFuture<'a> {
        let value = params.ctx.context_value(&self.context)
            .unwrap_or(serde_json::Value::Null);
        params.args.add_value(&self.name, value);
        next.run(params)
    }
}

/// `@globalId` turns keys into opaque, type-qualified global ids: on a
/// field it encodes the resolved value, on an argument it decodes the
/// client's value.
pub struct GlobalIdDirective;
impl Directive for GlobalIdDirective {
    fn name(&self) -> &str {
        "globalId"
    }

    fn definition(&self) -> &str {
        r#"
"""
Converts between IDs/types and global IDs.

When used upon a field, it encodes; when used upon an argument, it decodes.
"""
directive @globalId(
  """
  The type name to encode with. Defaults to the parent type of the field.
  """
  type: String

  """
  By default, an array of `[$type, $id]` is returned when decoding.
  You may limit this to returning just one of both, using "TYPE" or "ID".
  """
  decode: String
) on FIELD_DEFINITION | INPUT_FIELD_DEFINITION | ARGUMENT_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[
            DirectiveCapability::ArgTransformer,
            DirectiveCapability::FieldMiddleware,
        ]
    }

    fn validate_usage(&self, usage: &DirectiveUsage) -> Result<(), DirectiveError> {
        match usage.string_arg("decode")? {
            None | Some("ARRAY" | "ID" | "TYPE") => Ok(()),
            Some(other) => Err(DirectiveError::InvalidArgument {
                argument_name: "decode".to_string(),
                directive_name: self.name().to_string(),
                message: format!("expected one of ARRAY, ID or TYPE, got `{other}`"),
            }),
        }
    }

    fn as_arg_transformer(&self) -> Option<&dyn ArgTransformerDirective> {
        Some(self)
    }

    fn as_field_middleware(&self) -> Option<&dyn FieldMiddlewareDirective> {
        Some(self)
    }
}
impl ArgTransformerDirective for GlobalIdDirective {
    fn transform(
        &self,
        usage: &DirectiveUsage,
        value: ArgumentValue,
        _request: &RequestContext,
    ) -> Result<ArgumentValue, ResolveError> {
        let decode = usage.string_arg("decode")?.unwrap_or("ARRAY");
        let mut failure = None;
        let decoded = value.map_leaves(&mut |leaf| {
            let Some(global_id) = leaf.as_str() else {
                return leaf;
            };
            match decode_global_id(global_id) {
                Some((type_name, id)) => ArgumentValue::Scalar(match decode {
                    "ID" => id.into(),
                    "TYPE" => type_name.into(),
                    _ => serde_json::json!([type_name, id]),
                }),
                None => {
                    failure.get_or_insert_with(|| global_id.to_string());
                    leaf
                },
            }
        });
        match failure {
            Some(global_id) => Err(ResolveError::User(format!("Invalid global id `{global_id}`."))),
            None => Ok(decoded),
        }
    }
}
impl FieldMiddlewareDirective for GlobalIdDirective {
    fn field_middleware(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldMiddleware>, DirectiveError> {
        Ok(Arc::new(GlobalIdMiddleware {
            type_name: usage.string_arg("type")?.unwrap_or(field.parent_type).to_string(),
        }))
    }
}

struct GlobalIdMiddleware {
    type_name: String,
}
impl FieldMiddleware for GlobalIdMiddleware {
    fn handle<'a>(&'a self, params: ResolveParams<'a>, next: Next<'a>) -> ResolveFuture<'a> {
        Box::pin(async move {
            Ok(match next.run(params).await? {
                serde_json::Value::Null => serde_json::Value::Null,
                id => encode_global_id(&self.type_name, &crate::batch::key_id(&id)).into(),
            })
        })
    }
}

pub fn encode_global_id(type_name: &str, id: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(format!("{type_name}:{id}"))
}

pub fn decode_global_id(global_id: &str) -> Option<(String, String)> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(global_id).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let (type_name, id) = decoded.split_once(':')?;
    Some((type_name.to_string(), id.to_string()))
}

/// `@rename(attribute: "created_at")`: on a field, reads the parent's
/// property of that name; on an argument, renames the argument.
pub struct RenameDirective;
impl Directive for RenameDirective {
    fn name(&self) -> &str {
        "rename"
    }

    fn definition(&self) -> &str {
        r#"
"""
Change the internally used name of a field or argument.
"""
directive @rename(
  """
  The internal name of an attribute/property/key.
  """
  attribute: String!
) on FIELD_DEFINITION | ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[
            DirectiveCapability::ArgStructure,
            DirectiveCapability::FieldResolver,
        ]
    }

    fn as_arg_structure(&self) -> Option<&dyn ArgStructureDirective> {
        Some(self)
    }

    fn as_field_resolver(&self) -> Option<&dyn FieldResolverDirective> {
        Some(self)
    }
}
impl ArgStructureDirective for RenameDirective {
    fn restructure(
        &self,
        usage: &DirectiveUsage,
        _name: String,
        argument: Argument,
        _parent: &mut ArgumentSet,
    ) -> Result<Option<(String, Argument)>, ResolveError> {
        let attribute = usage.required_string_arg("attribute")?;
        Ok(Some((attribute.to_string(), argument)))
    }
}
impl FieldResolverDirective for RenameDirective {
    fn resolve_field(
        &self,
        usage: &DirectiveUsage,
        _field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldResolverFn>, DirectiveError> {
        Ok(Arc::new(RenameResolver {
            attribute: usage.required_string_arg("attribute")?.to_string(),
        }))
    }
}

struct RenameResolver {
    attribute: String,
}
impl FieldResolverFn for RenameResolver {
    fn resolve<'a>(&'a self, params: ResolveParams<'a>) -> ResolveFuture<'a> {
        let value = params.root.get(&self.attribute)
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        Box::pin(futures::future::ready(Ok(value)))
    }
}
