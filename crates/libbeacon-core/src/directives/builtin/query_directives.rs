use crate::batch::RelationLoadMode;
use crate::directives::builtin::relation_directives::RelationLoad;
use crate::directives::builtin::returns_abstract_type;
use crate::directives::builtin::scopes_arg;
use crate::directives::builtin::tag_model;
use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::FieldContext;
use crate::directives::FieldResolverDirective;
use crate::document::DirectiveUsage;
use crate::resolve::FieldResolverFn;
use crate::resolve::ResolveError;
use crate::resolve::ResolveFuture;
use crate::resolve::ResolveParams;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QueryKind {
    All,
    Count,
    Find,
    First,
}

/// `@all`, `@count`, `@find` and `@first`: resolve a field by querying
/// the model behind its return type (or `model`), decorated with the
/// field's builder directives and `scopes`.
pub struct QueryDirective {
    kind: QueryKind,
}
impl QueryDirective {
    pub fn all() -> [Self; 4] {
        [
            Self { kind: QueryKind::All },
            Self { kind: QueryKind::Count },
            Self { kind: QueryKind::Find },
            Self { kind: QueryKind::First },
        ]
    }
}
impl Directive for QueryDirective {
    fn name(&self) -> &str {
        match self.kind {
            QueryKind::All => "all",
            QueryKind::Count => "count",
            QueryKind::Find => "find",
            QueryKind::First => "first",
        }
    }

    fn definition(&self) -> &str {
        match self.kind {
            QueryKind::All => r#"
"""
Fetch all models from the data store.
"""
directive @all(
  """
  Specify the model name, if it can not be derived from the return type.
  """
  model: String

  """
  Apply scopes to the underlying query.
  """
  scopes: [String!]
) on FIELD_DEFINITION
"#,
            QueryKind::Count => r#"
"""
Returns the count of a given relationship or model.
"""
directive @count(
  """
  The relationship to count.
  Mutually exclusive with `model`.
  """
  relation: String

  """
  The model to count.
  Mutually exclusive with `relation`.
  """
  model: String

  """
  Apply scopes to the underlying query.
  """
  scopes: [String!]
) on FIELD_DEFINITION
"#,
            QueryKind::Find => r#"
"""
Find a model based on the arguments provided.
Results in a field error if more than one model matches.
"""
directive @find(
  """
  Specify the model name, if it can not be derived from the return type.
  """
  model: String

  """
  Apply scopes to the underlying query.
  """
  scopes: [String!]
) on FIELD_DEFINITION
"#,
            QueryKind::First => r#"
"""
Get the first query result from a collection of models.
"""
directive @first(
  """
  Specify the model name, if it can not be derived from the return type.
  """
  model: String

  """
  Apply scopes to the underlying query.
  """
  scopes: [String!]
) on FIELD_DEFINITION
"#,
        }
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::FieldResolver]
    }

    fn validate_usage(&self, usage: &DirectiveUsage) -> Result<(), DirectiveError> {
        if self.kind == QueryKind::Count
            && usage.argument("relation").is_some()
            && usage.argument("model").is_some() {
            return Err(DirectiveError::InvalidArgument {
                argument_name: "relation".to_string(),
                directive_name: self.name().to_string(),
                message: "`relation` and `model` are mutually exclusive".to_string(),
            });
        }
        Ok(())
    }

    fn as_field_resolver(&self) -> Option<&dyn FieldResolverDirective> {
        Some(self)
    }
}
impl FieldResolverDirective for QueryDirective {
    fn resolve_field(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldResolverFn>, DirectiveError> {
        let scopes = scopes_arg(usage)?;
        if self.kind == QueryKind::Count {
            if let Some(relation) = usage.string_arg("relation")? {
                return Ok(Arc::new(RelationLoad {
                    mode: Some(RelationLoadMode::Count),
                    pagination: None,
                    parent_model: field.doc.model_name_for_type(field.parent_type),
                    relation: relation.to_string(),
                    scopes,
                    tag: false,
                }));
            }
        }

        let model = match (self.kind, usage.string_arg("model")?) {
            (_, Some(model)) => model.to_string(),
            (QueryKind::Count, None) => return Err(DirectiveError::InvalidUsage {
                directive_name: self.name().to_string(),
                message: "either `relation` or `model` must be given".to_string(),
                node_name: format!("{}.{}", field.parent_type, field.field.name()),
            }),
            (_, None) => field.model_name(usage)?,
        };
        Ok(Arc::new(QueryResolver {
            kind: self.kind,
            scopes,
            tag: returns_abstract_type(field),
            model,
        }))
    }
}

struct QueryResolver {
    kind: QueryKind,
    model: String,
    scopes: Vec<String>,
    tag: bool,
}
impl QueryResolver {
    fn tagged(&self, value: serde_json::Value) -> serde_json::Value {
        if self.tag {
            tag_model(value, &self.model)
        } else {
            value
        }
    }
}
impl FieldResolverFn for QueryResolver {
    fn resolve<'a>(&'a self, params: ResolveParams<'a>) -> ResolveFuture<'a> {
        Box::pin(async move {
            let mut query = params.ctx.store().query(&self.model)?;
            params.info.enhance_builder(query.as_mut(), &self.scopes, &params.args, params.ctx)?;

            let value = match self.kind {
                QueryKind::All => serde_json::Value::Array(
                    query.get().await?.into_iter().map(serde_json::Value::Object).collect(),
                ),
                QueryKind::Count => query.count().await?.into(),
                QueryKind::Find => {
                    let mut rows = query.get().await?;
                    if rows.len() > 1 {
                        return Err(ResolveError::User(format!(
                            "The query for `{}` returned more than one result.",
                            self.model,
                        )));
                    }
                    rows.pop().map(serde_json::Value::Object).unwrap_or(serde_json::Value::Null)
                },
                QueryKind::First => {
                    query.limit(1);
                    query.get().await?.into_iter()
                        .next()
                        .map(serde_json::Value::Object)
                        .unwrap_or(serde_json::Value::Null)
                },
            };
            Ok(self.tagged(value))
        })
    }
}

/// `@field(resolver: "users::full_name")` resolves a field with a callable
/// registered in the [`CallableRegistry`](crate::directives::CallableRegistry).
pub struct FieldDirective;
impl Directive for FieldDirective {
    fn name(&self) -> &str {
        "field"
    }

    fn definition(&self) -> &str {
        r#"
"""
Assign a resolver function to a field.
"""
directive @field(
  """
  The name of a registered resolver. Looked up in the namespaces given
  by `@namespace(field: ...)` and the configuration first.
  """
  resolver: String!
) on FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::FieldResolver]
    }

    fn as_field_resolver(&self) -> Option<&dyn FieldResolverDirective> {
        Some(self)
    }
}
impl FieldResolverDirective for FieldDirective {
    fn resolve_field(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldResolverFn>, DirectiveError> {
        let name = usage.required_string_arg("resolver")?;
        let namespaces = field.namespaces(usage, &field.config.namespaces.field_resolvers);
        field.callables.resolver(name, &namespaces)
            .ok_or_else(|| DirectiveError::UnknownCallable {
                callable: name.to_string(),
                directive_name: self.name().to_string(),
            })
    }
}
