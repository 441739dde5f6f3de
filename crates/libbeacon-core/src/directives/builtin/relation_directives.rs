use crate::batch::BatchKey;
use crate::batch::BatchLoader;
use crate::batch::RelationBatchLoad;
use crate::batch::RelationLoadMode;
use crate::directives::builtin::pagination;
use crate::directives::builtin::pagination::PageRequest;
use crate::directives::builtin::pagination::PaginationType;
use crate::directives::builtin::returns_abstract_type;
use crate::directives::builtin::scopes_arg;
use crate::directives::builtin::tag_model;
use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::FieldContext;
use crate::directives::FieldManipulator;
use crate::directives::FieldMiddlewareDirective;
use crate::directives::FieldResolverDirective;
use crate::directives::Manipulation;
use crate::document::DirectiveUsage;
use crate::resolve::FieldMiddleware;
use crate::resolve::FieldResolverFn;
use crate::resolve::Next;
use crate::resolve::ResolveError;
use crate::resolve::ResolveFuture;
use crate::resolve::ResolveParams;
use crate::schema::SchemaBuildError;
use crate::store::RelationKind;
use std::sync::Arc;

/// Pagination settings of a paginated relation field.
#[derive(Clone, Copy, Debug)]
pub(super) struct RelationPagination {
    pub default_count: Option<u64>,
    pub max_count: Option<u64>,
    pub pagination_type: PaginationType,
}

/// Loads a relation of the parent row through the request's batch
/// loaders, so that all parents at the same path share one query.
pub(super) struct RelationLoad {
    /// `None` picks single or many from the relation's kind.
    pub mode: Option<RelationLoadMode>,
    pub pagination: Option<RelationPagination>,
    pub parent_model: String,
    pub relation: String,
    pub scopes: Vec<String>,
    pub tag: bool,
}
impl RelationLoad {
    /// With `apply_field_args`, the field's arguments and builder
    /// directives narrow the related query; otherwise only `scopes` do.
    async fn load(
        &self,
        params: &ResolveParams<'_>,
        apply_field_args: bool,
    ) -> Result<serde_json::Value, ResolveError> {
        let ctx = params.ctx;
        let store = ctx.store();
        let relation = store.relation(&self.parent_model, &self.relation)?;
        let mode = self.mode.unwrap_or(if relation.kind.is_single() {
            RelationLoadMode::Single
        } else {
            RelationLoadMode::Many
        });

        let parent_key = params.root.get(relation.parent_key())
            .filter(|key| !key.is_null())
            .cloned();
        let Some(parent_key) = parent_key else {
            return Ok(match mode {
                RelationLoadMode::Count => 0.into(),
                RelationLoadMode::Many => serde_json::Value::Array(vec![]),
                RelationLoadMode::Single => serde_json::Value::Null,
            });
        };

        let mut template = store.query(&relation.related)?;
        let mut key_args = serde_json::Map::new();
        if apply_field_args {
            params.info.enhance_builder(template.as_mut(), &self.scopes, &params.args, ctx)?;
            key_args = params.args.to_json();
            for pagination_arg in ["after", "first", "page"] {
                key_args.remove(pagination_arg);
            }
        } else {
            let no_args = serde_json::Value::Object(serde_json::Map::new());
            for scope in self.scopes.iter() {
                template.apply_scope(scope, &no_args)?;
            }
        }

        let key = BatchKey::new(
            params.info.path_without_indices(),
            format!("{}:{mode:?}", self.relation),
            &serde_json::json!({
                "args": key_args,
                "scopes": self.scopes,
            }),
        );
        let related = relation.related.clone();
        let loader = ctx.batch_loaders().instance(key, || BatchLoader::new(RelationBatchLoad {
            mode,
            relation,
            store: store.clone(),
            template,
        }))?;
        let value = loader.load(parent_key).await?;

        Ok(if self.tag {
            tag_model(value, &related)
        } else {
            value
        })
    }
}
impl FieldResolverFn for RelationLoad {
    fn resolve<'a>(&'a self, params: ResolveParams<'a>) -> ResolveFuture<'a> {
        Box::pin(async move {
            if let Some(pagination) = self.pagination {
                let request = PageRequest::from_args(
                    &params.args,
                    pagination.pagination_type,
                    pagination.default_count,
                    pagination.max_count,
                )?;
                let items = match self.load(&params, true).await? {
                    serde_json::Value::Array(items) => items,
                    _ => vec![],
                };
                return Ok(pagination::page_to_json(
                    pagination.pagination_type,
                    request.slice(items),
                    |item| item,
                ));
            }

            if self.mode != Some(RelationLoadMode::Count) {
                match params.root.get(&self.relation) {
                    Some(loaded @ (serde_json::Value::Array(_) | serde_json::Value::Object(_))) => {
                        return Ok(loaded.clone());
                    },
                    _ => (),
                }
            }
            self.load(&params, true).await
        })
    }
}

/// `@belongsTo`, `@belongsToMany`, `@hasMany` and `@hasOne` resolve a
/// relation of the parent model, batched across all parents.
///
/// The to-many variants accept `type` to paginate the relation.
pub struct RelationDirective {
    kind: RelationKind,
}
impl RelationDirective {
    pub fn new(kind: RelationKind) -> Self {
        Self {
            kind,
        }
    }
}
impl Directive for RelationDirective {
    fn name(&self) -> &str {
        match self.kind {
            RelationKind::BelongsTo => "belongsTo",
            RelationKind::BelongsToMany => "belongsToMany",
            RelationKind::HasMany => "hasMany",
            RelationKind::HasOne => "hasOne",
        }
    }

    fn definition(&self) -> &str {
        match self.kind {
            RelationKind::BelongsTo => r#"
"""
Resolves a field through the belongs-to relation of the parent model.
"""
directive @belongsTo(
  """
  Specify the relation name, if it differs from the field name.
  """
  relation: String

  """
  Apply scopes to the underlying query.
  """
  scopes: [String!]
) on FIELD_DEFINITION
"#,
            RelationKind::BelongsToMany => r#"
"""
Resolves a field through the many-to-many relation of the parent model.
"""
directive @belongsToMany(
  """
  Specify the relation name, if it differs from the field name.
  """
  relation: String

  """
  Apply scopes to the underlying query.
  """
  scopes: [String!]

  """
  Allows to resolve the relation as a paginated list.
  One of PAGINATOR, SIMPLE or CONNECTION.
  """
  type: String

  """
  Allow clients to query paginated lists without specifying the amount of items.
  Overrules the `pagination.default_count` setting.
  """
  defaultCount: Int

  """
  Limit the maximum amount of items that clients can request from paginated lists.
  Overrules the `pagination.max_count` setting.
  """
  maxCount: Int
) on FIELD_DEFINITION
"#,
            RelationKind::HasMany => r#"
"""
Corresponds to a has-many relation of the parent model.
"""
directive @hasMany(
  """
  Specify the relation name, if it differs from the field name.
  """
  relation: String

  """
  Apply scopes to the underlying query.
  """
  scopes: [String!]

  """
  Allows to resolve the relation as a paginated list.
  One of PAGINATOR, SIMPLE or CONNECTION.
  """
  type: String

  """
  Allow clients to query paginated lists without specifying the amount of items.
  Overrules the `pagination.default_count` setting.
  """
  defaultCount: Int

  """
  Limit the maximum amount of items that clients can request from paginated lists.
  Overrules the `pagination.max_count` setting.
  """
  maxCount: Int
) on FIELD_DEFINITION
"#,
            RelationKind::HasOne => r#"
"""
Corresponds to a has-one relation of the parent model.
"""
directive @hasOne(
  """
  Specify the relation name, if it differs from the field name.
  """
  relation: String

  """
  Apply scopes to the underlying query.
  """
  scopes: [String!]
) on FIELD_DEFINITION
"#,
        }
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[
            DirectiveCapability::FieldManipulator,
            DirectiveCapability::FieldResolver,
        ]
    }

    fn validate_usage(&self, usage: &DirectiveUsage) -> Result<(), DirectiveError> {
        PaginationType::from_usage(usage)?;
        Ok(())
    }

    fn as_field_manipulator(&self) -> Option<&dyn FieldManipulator> {
        Some(self)
    }

    fn as_field_resolver(&self) -> Option<&dyn FieldResolverDirective> {
        Some(self)
    }
}
impl FieldManipulator for RelationDirective {
    fn manipulate_field_definition(
        &self,
        manipulation: Manipulation<'_>,
        parent_type: &str,
        field_name: &str,
    ) -> Result<(), SchemaBuildError> {
        let Some(pagination_type) = PaginationType::from_usage(manipulation.usage)? else {
            return Ok(());
        };
        let default_count = default_count(manipulation.usage, manipulation.config.pagination.default_count)?;
        pagination::paginate_field(
            manipulation.doc,
            parent_type,
            field_name,
            pagination_type,
            default_count,
        )
    }
}
impl FieldResolverDirective for RelationDirective {
    fn resolve_field(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldResolverFn>, DirectiveError> {
        let pagination = match PaginationType::from_usage(usage)? {
            Some(pagination_type) => Some(RelationPagination {
                default_count: default_count(usage, field.config.pagination.default_count)?,
                max_count: max_count(usage, field.config.pagination.max_count)?,
                pagination_type,
            }),
            None => None,
        };
        let mode = if pagination.is_some() || !self.kind.is_single() {
            RelationLoadMode::Many
        } else {
            RelationLoadMode::Single
        };

        Ok(Arc::new(RelationLoad {
            mode: Some(mode),
            pagination,
            parent_model: field.doc.model_name_for_type(field.parent_type),
            relation: usage.string_arg("relation")?
                .unwrap_or(field.field.name())
                .to_string(),
            scopes: scopes_arg(usage)?,
            tag: pagination.is_none() && returns_abstract_type(field),
        }))
    }
}

pub(super) fn default_count(
    usage: &DirectiveUsage,
    configured: Option<u64>,
) -> Result<Option<u64>, DirectiveError> {
    Ok(usage.int_arg("defaultCount")?
        .map(|count| count.max(0) as u64)
        .or(configured))
}

pub(super) fn max_count(
    usage: &DirectiveUsage,
    configured: Option<u64>,
) -> Result<Option<u64>, DirectiveError> {
    Ok(usage.int_arg("maxCount")?
        .map(|count| count.max(0) as u64)
        .or(configured))
}

/// `@with(relation: "posts")` loads a relation onto the parent before the
/// field resolves, batched across all parents.
pub struct WithDirective;
impl Directive for WithDirective {
    fn name(&self) -> &str {
        "with"
    }

    fn definition(&self) -> &str {
        r#"
"""
Eager-load a relation on the parent model.

This is useful when accessing a computed property on the model
that requires the relation to be loaded.
"""
directive @with(
  """
  Specify the relation name to use. Defaults to the field name.
  """
  relation: String

  """
  Apply scopes to the underlying query.
  """
  scopes: [String!]
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
impl FieldMiddlewareDirective for WithDirective {
    fn field_middleware(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldMiddleware>, DirectiveError> {
        Ok(Arc::new(WithMiddleware {
            load: RelationLoad {
                mode: None,
                pagination: None,
                parent_model: field.doc.model_name_for_type(field.parent_type),
                relation: usage.string_arg("relation")?
                    .unwrap_or(field.field.name())
                    .to_string(),
                scopes: scopes_arg(usage)?,
                tag: false,
            },
        }))
    }
}

struct WithMiddleware {
    load: RelationLoad,
}
impl FieldMiddleware for WithMiddleware {
    fn handle<'a>(&'a self, mut params: ResolveParams<'a>, next: Next<'a>) -> ResolveFuture<'a> {
        Box::pin(async move {
            let already_loaded = params.root.get(&self.load.relation)
                .is_some_and(|value| value.is_array() || value.is_object());
            if !already_loaded {
                let related = self.load.load(&params, false).await?;
                let mut root = (*params.root).clone();
                if let serde_json::Value::Object(row) = &mut root {
                    row.insert(self.load.relation.clone(), related);
                }
                params.root = Arc::new(root);
            }
            next.run(params).await
        })
    }
}
