use crate::directives::builtin::complexity_directive::requested_count;
use crate::directives::builtin::pagination;
use crate::directives::builtin::pagination::PageRequest;
use crate::directives::builtin::pagination::PaginationType;
use crate::directives::builtin::relation_directives::default_count;
use crate::directives::builtin::relation_directives::max_count;
use crate::directives::builtin::scopes_arg;
use crate::directives::builtin::tag_model;
use crate::directives::ComplexityContext;
use crate::directives::ComplexityResolverDirective;
use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::FieldContext;
use crate::directives::FieldManipulator;
use crate::directives::FieldResolverDirective;
use crate::directives::Manipulation;
use crate::document::DirectiveUsage;
use crate::document::DocumentAst;
use crate::document::TypeKind;
use crate::resolve::FieldResolverFn;
use crate::resolve::ResolveFuture;
use crate::resolve::ResolveParams;
use crate::schema::SchemaBuildError;
use crate::store::Page;
use crate::Value;
use std::sync::Arc;

/// `@paginate` turns a list field into a paginated one and resolves it
/// from the model behind the list's item type.
pub struct PaginateDirective;
impl Directive for PaginateDirective {
    fn name(&self) -> &str {
        "paginate"
    }

    fn definition(&self) -> &str {
        r#"
"""
Query multiple model entries as a paginated list.
"""
directive @paginate(
  """
  Which pagination style should be used.
  One of PAGINATOR, SIMPLE or CONNECTION.
  """
  type: String = "PAGINATOR"

  """
  Specify the model name, if it can not be derived from the item type.
  """
  model: String

  """
  Apply scopes to the underlying query.
  """
  scopes: [String!]

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
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[
            DirectiveCapability::ComplexityResolver,
            DirectiveCapability::FieldManipulator,
            DirectiveCapability::FieldResolver,
        ]
    }

    fn validate_usage(&self, usage: &DirectiveUsage) -> Result<(), DirectiveError> {
        pagination_type(usage)?;
        Ok(())
    }

    fn as_complexity_resolver(&self) -> Option<&dyn ComplexityResolverDirective> {
        Some(self)
    }

    fn as_field_manipulator(&self) -> Option<&dyn FieldManipulator> {
        Some(self)
    }

    fn as_field_resolver(&self) -> Option<&dyn FieldResolverDirective> {
        Some(self)
    }
}
impl FieldManipulator for PaginateDirective {
    fn manipulate_field_definition(
        &self,
        manipulation: Manipulation<'_>,
        parent_type: &str,
        field_name: &str,
    ) -> Result<(), SchemaBuildError> {
        let Manipulation { config, doc, usage } = manipulation;
        let Some(field) = doc.field(parent_type, field_name) else {
            return Ok(());
        };

        // The return type is about to be replaced, so the model has to be
        // pinned down while the item type is still known.
        if usage.argument("model").is_none() {
            let model = doc.model_name_for_type(field.type_annotation().innermost_type_name());
            if let Some(field) = doc.field_mut(parent_type, field_name) {
                let own_usage = field.directives_mut()
                    .iter_mut()
                    .find(|own| own.name() == usage.name());
                if let Some(own_usage) = own_usage {
                    own_usage.arguments.insert("model".to_string(), Value::String(model));
                }
            }
        }

        pagination::paginate_field(
            doc,
            parent_type,
            field_name,
            pagination_type(usage)?,
            default_count(usage, config.pagination.default_count)?,
        )
    }
}
impl FieldResolverDirective for PaginateDirective {
    fn resolve_field(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldResolverFn>, DirectiveError> {
        let item_type = paginated_item_type(field.doc, field.return_type_name());
        let tag = item_type.and_then(|item_type| field.doc.type_definition(item_type))
            .is_some_and(|def| matches!(def.kind(), TypeKind::Interface | TypeKind::Union));

        Ok(Arc::new(PaginateResolver {
            default_count: default_count(usage, field.config.pagination.default_count)?,
            max_count: max_count(usage, field.config.pagination.max_count)?,
            model: field.model_name(usage)?,
            pagination_type: pagination_type(usage)?,
            scopes: scopes_arg(usage)?,
            tag,
        }))
    }
}
impl ComplexityResolverDirective for PaginateDirective {
    fn complexity(
        &self,
        usage: &DirectiveUsage,
        child_complexity: usize,
        args: &serde_json::Map<String, serde_json::Value>,
        ctx: &ComplexityContext<'_>,
    ) -> usize {
        let first = requested_count(args).or_else(|| {
            default_count(usage, ctx.config.pagination.default_count)
                .ok()
                .flatten()
                .map(|count| usize::try_from(count).unwrap_or(usize::MAX))
        });
        child_complexity.saturating_mul(first.unwrap_or(1)).saturating_add(1)
    }
}

fn pagination_type(usage: &DirectiveUsage) -> Result<PaginationType, DirectiveError> {
    Ok(PaginationType::from_usage(usage)?.unwrap_or(PaginationType::Paginator))
}

/// The item type of a generated `XPaginator` or `XConnection` type.
fn paginated_item_type<'a>(doc: &'a DocumentAst, paginated_type: &str) -> Option<&'a str> {
    if let Some(data) = doc.field(paginated_type, "data") {
        return Some(data.type_annotation().innermost_type_name());
    }
    let edge_type = doc.field(paginated_type, "edges")?
        .type_annotation()
        .innermost_type_name();
    doc.field(edge_type, "node").map(|node| node.type_annotation().innermost_type_name())
}

struct PaginateResolver {
    default_count: Option<u64>,
    max_count: Option<u64>,
    model: String,
    pagination_type: PaginationType,
    scopes: Vec<String>,
    tag: bool,
}
impl FieldResolverFn for PaginateResolver {
    fn resolve<'a>(&'a self, params: ResolveParams<'a>) -> ResolveFuture<'a> {
        Box::pin(async move {
            let request = PageRequest::from_args(
                &params.args,
                self.pagination_type,
                self.default_count,
                self.max_count,
            )?;

            let mut query = params.ctx.store().query(&self.model)?;
            params.info.enhance_builder(query.as_mut(), &self.scopes, &params.args, params.ctx)?;

            let page = if request.first == 0 {
                Page {
                    current_page: request.page,
                    items: vec![],
                    per_page: 0,
                    total: query.count().await?,
                }
            } else {
                query.paginate(request.first, request.page).await?
            };

            Ok(pagination::page_to_json(self.pagination_type, page, |item| {
                if self.tag {
                    tag_model(item, &self.model)
                } else {
                    item
                }
            }))
        })
    }
}
