//! The schema directives every [`DirectiveRegistry`] built with
//! [`DirectiveRegistry::with_builtins()`] knows about.

mod arg_directives;
mod auth_directives;
mod builder_directives;
mod complexity_directive;
mod mutation_directives;
mod paginate_directive;
mod pagination;
mod query_directives;
mod relation_directives;
mod schema_directives;
mod value_directives;

pub use arg_directives::ConvertEmptyStringsToNullDirective;
pub use arg_directives::DropDirective;
pub use arg_directives::HashDirective;
pub use arg_directives::NestDirective;
pub use arg_directives::RulesDirective;
pub use arg_directives::SpreadDirective;
pub use arg_directives::TrimDirective;
pub use auth_directives::CanDirective;
pub use auth_directives::GuardDirective;
pub use auth_directives::ThrottleDirective;
pub use builder_directives::BuilderDirective;
pub use builder_directives::LimitDirective;
pub use builder_directives::OrderByDirective;
pub use builder_directives::ScopeDirective;
pub use builder_directives::WhereDirective;
pub use complexity_directive::ComplexityDirective;
pub use mutation_directives::ManyMutationDirective;
pub use mutation_directives::MutationDirective;
pub use paginate_directive::PaginateDirective;
pub use pagination::PaginationType;
pub use query_directives::FieldDirective;
pub use query_directives::QueryDirective;
pub use relation_directives::RelationDirective;
pub use relation_directives::WithDirective;
pub use schema_directives::ModelDirective;
pub use schema_directives::NamespaceDirective;
pub use value_directives::decode_global_id;
pub use value_directives::encode_global_id;
pub use value_directives::GlobalIdDirective;
pub use value_directives::InjectDirective;
pub use value_directives::RenameDirective;

use crate::directives::DirectiveError;
use crate::directives::DirectiveRegistry;
use crate::directives::FieldContext;
use crate::document::DirectiveUsage;
use crate::document::TypeKind;
use crate::store::RelationKind;

/// Registers every built-in directive into `registry`, replacing any
/// directive already registered under the same name.
pub fn register_builtins(registry: &mut DirectiveRegistry) -> Result<(), DirectiveError> {
    registry.register(ModelDirective)?;
    registry.register(NamespaceDirective)?;

    registry.register(GuardDirective)?;
    registry.register(CanDirective)?;
    registry.register(ThrottleDirective)?;

    registry.register(InjectDirective)?;
    registry.register(GlobalIdDirective)?;
    registry.register(RenameDirective)?;
    registry.register(ComplexityDirective)?;

    for query_directive in QueryDirective::all() {
        registry.register(query_directive)?;
    }
    registry.register(FieldDirective)?;
    registry.register(PaginateDirective)?;

    for kind in [
        RelationKind::BelongsTo,
        RelationKind::BelongsToMany,
        RelationKind::HasMany,
        RelationKind::HasOne,
    ] {
        registry.register(RelationDirective::new(kind))?;
    }
    registry.register(WithDirective)?;

    for mutation_directive in MutationDirective::all() {
        registry.register(mutation_directive)?;
    }
    for many_directive in ManyMutationDirective::all() {
        registry.register(many_directive)?;
    }

    for where_directive in WhereDirective::all() {
        registry.register(where_directive)?;
    }
    registry.register(ScopeDirective)?;
    registry.register(LimitDirective)?;
    registry.register(OrderByDirective)?;
    registry.register(BuilderDirective)?;

    registry.register(TrimDirective)?;
    registry.register(ConvertEmptyStringsToNullDirective)?;
    registry.register(HashDirective)?;
    registry.register(RulesDirective)?;
    registry.register(SpreadDirective)?;
    registry.register(DropDirective)?;
    registry.register(NestDirective)?;

    tracing::trace!("Registered {} built-in directives", registry.names().count());
    Ok(())
}

/// The `scopes` argument shared by every querying directive.
fn scopes_arg(usage: &DirectiveUsage) -> Result<Vec<String>, DirectiveError> {
    Ok(usage.string_list_arg("scopes")?.unwrap_or_default())
}

/// Whether values of the field's return type need a `__model` tag to pick
/// their concrete type.
fn returns_abstract_type(field: &FieldContext<'_>) -> bool {
    field.doc.type_definition(field.return_type_name())
        .is_some_and(|def| matches!(def.kind(), TypeKind::Interface | TypeKind::Union))
}

/// Marks a row with the model it was read from, for abstract type
/// resolution.
fn tag_model(value: serde_json::Value, model: &str) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut row) => {
            row.entry("__model".to_string())
                .or_insert_with(|| model.into());
            serde_json::Value::Object(row)
        },
        serde_json::Value::Array(items) => serde_json::Value::Array(
            items.into_iter().map(|item| tag_model(item, model)).collect(),
        ),
        other => other,
    }
}
