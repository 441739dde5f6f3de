use crate::arguments::ArgumentSet;
use crate::arguments::ArgumentValue;
use crate::directives::ArgBuilderDirective;
use crate::directives::ArgManipulator;
use crate::directives::BuilderContext;
use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::FieldBuilderDirective;
use crate::directives::Manipulation;
use crate::document::ast_helpers;
use crate::document::DirectiveUsage;
use crate::document::TypeAnnotation;
use crate::resolve::ResolveError;
use crate::schema::SchemaBuildError;
use crate::store::Operator;
use crate::store::OrderDirection;
use crate::store::QueryBuilder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WhereKind {
    Eq,
    In,
    Like,
    Neq,
    NotIn,
    Where,
    WhereBetween,
}

/// The filtering directives: `@eq`, `@neq`, `@in`, `@notIn`, `@where`,
/// `@whereBetween` and `@like`.
///
/// Each adds a condition on `key` (or the argument's name) using the
/// argument's value. A `null` value adds nothing. `@eq` and `@neq` also
/// work on fields, with a constant `value`.
pub struct WhereDirective {
    kind: WhereKind,
}
impl WhereDirective {
    pub fn all() -> [Self; 7] {
        [
            Self { kind: WhereKind::Eq },
            Self { kind: WhereKind::In },
            Self { kind: WhereKind::Like },
            Self { kind: WhereKind::Neq },
            Self { kind: WhereKind::NotIn },
            Self { kind: WhereKind::Where },
            Self { kind: WhereKind::WhereBetween },
        ]
    }

    fn apply(
        &self,
        usage: &DirectiveUsage,
        builder: &mut dyn QueryBuilder,
        column: &str,
        value: serde_json::Value,
    ) -> Result<(), ResolveError> {
        if value.is_null() {
            return Ok(());
        }
        match self.kind {
            WhereKind::Eq => builder.add_where(column, Operator::Eq, value),
            WhereKind::Neq => builder.add_where(column, Operator::Neq, value),
            WhereKind::In => builder.where_in(column, list_of(value)),
            WhereKind::NotIn => builder.where_not_in(column, list_of(value)),
            WhereKind::Like => {
                let value = match (usage.string_arg("template")?, value.as_str()) {
                    (Some(template), Some(text)) => template.replace("{}", text).into(),
                    _ => value,
                };
                builder.add_where(column, Operator::Like, value);
            },
            WhereKind::WhereBetween => {
                let mut bounds = match value {
                    serde_json::Value::Object(fields) => fields.into_iter()
                        .map(|(_, bound)| bound)
                        .collect::<Vec<_>>(),
                    other => list_of(other),
                }.into_iter();
                match (bounds.next(), bounds.next()) {
                    (Some(min), Some(max)) => builder.where_between(column, min, max),
                    _ => return Err(ResolveError::User(format!(
                        "`@whereBetween` on `{column}` expects exactly two bounds.",
                    ))),
                }
            },
            WhereKind::Where => match usage.string_arg("clause")? {
                None => {
                    let operator_src = usage.string_arg("operator")?.unwrap_or("=");
                    let operator = Operator::parse(operator_src).ok_or_else(|| {
                        DirectiveError::InvalidArgument {
                            argument_name: "operator".to_string(),
                            directive_name: "where".to_string(),
                            message: format!("unsupported operator `{operator_src}`"),
                        }
                    })?;
                    builder.add_where(column, operator, value);
                },
                Some("whereIn") => builder.where_in(column, list_of(value)),
                Some("whereNotIn") => builder.where_not_in(column, list_of(value)),
                Some("whereNull") => match value.as_bool() {
                    Some(false) => builder.where_not_null(column),
                    _ => builder.where_null(column),
                },
                Some("whereNotNull") => match value.as_bool() {
                    Some(false) => builder.where_null(column),
                    _ => builder.where_not_null(column),
                },
                Some(clause) => return Err(DirectiveError::InvalidArgument {
                    argument_name: "clause".to_string(),
                    directive_name: "where".to_string(),
                    message: format!("unsupported clause `{clause}`"),
                }.into()),
            },
        }
        Ok(())
    }
}
impl Directive for WhereDirective {
    fn name(&self) -> &str {
        match self.kind {
            WhereKind::Eq => "eq",
            WhereKind::In => "in",
            WhereKind::Like => "like",
            WhereKind::Neq => "neq",
            WhereKind::NotIn => "notIn",
            WhereKind::Where => "where",
            WhereKind::WhereBetween => "whereBetween",
        }
    }

    fn definition(&self) -> &str {
        match self.kind {
            WhereKind::Eq => r#"
"""
Add an equal conditional to a database query.
"""
directive @eq(
  """
  Specify the database column to compare.
  Required if the directive is:
  - used on an argument and the database column has a different name
  - used on a field
  """
  key: String

  """
  Provide a value to compare against.
  Only required when this directive is used on a field.
  """
  value: Mixed
) repeatable on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION | FIELD_DEFINITION
"#,
            WhereKind::In => r#"
"""
Use the client given list value to add an IN conditional to a database query.
"""
directive @in(
  """
  Specify the database column to compare.
  Only required if database column has a different name than the attribute in your schema.
  """
  key: String
) repeatable on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#,
            WhereKind::Like => r#"
"""
Add a `LIKE` conditional to a database query.
"""
directive @like(
  """
  Specify the database column to compare.
  Only required if database column has a different name than the attribute in your schema.
  """
  key: String

  """
  Fixed `LIKE` pattern; `{}` is replaced with the client given value.
  """
  template: String
) repeatable on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#,
            WhereKind::Neq => r#"
"""
Use the client given value to add a not-equal conditional to a database query.
"""
directive @neq(
  """
  Specify the database column to compare.
  Required if the directive is:
  - used on an argument and the database column has a different name
  - used on a field
  """
  key: String

  """
  Provide a value to compare against.
  Only required when this directive is used on a field.
  """
  value: Mixed
) repeatable on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION | FIELD_DEFINITION
"#,
            WhereKind::NotIn => r#"
"""
Use the client given list value to add a NOT IN conditional to a database query.
"""
directive @notIn(
  """
  Specify the database column to compare.
  Only required if database column has a different name than the attribute in your schema.
  """
  key: String
) repeatable on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#,
            WhereKind::Where => r#"
"""
Use an input value as a where filter.
"""
directive @where(
  """
  Specify the operator to use within the WHERE condition.
  """
  operator: String = "="

  """
  Specify the database column to compare.
  Only required if database column has a different name than the attribute in your schema.
  """
  key: String

  """
  Use another clause instead of a plain comparison: one of
  whereIn, whereNotIn, whereNull or whereNotNull.
  """
  clause: String
) repeatable on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#,
            WhereKind::WhereBetween => r#"
"""
Verify that a column's value is between two values.
The type of the input value this is defined upon should be
an `input` object with two fields, or a list of two values.
"""
directive @whereBetween(
  """
  Specify the database column to compare.
  Only required if database column has a different name than the attribute in your schema.
  """
  key: String
) repeatable on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#,
        }
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        match self.kind {
            WhereKind::Eq | WhereKind::Neq => &[
                DirectiveCapability::ArgBuilder,
                DirectiveCapability::FieldBuilder,
            ],
            _ => &[DirectiveCapability::ArgBuilder],
        }
    }

    fn as_arg_builder(&self) -> Option<&dyn ArgBuilderDirective> {
        Some(self)
    }

    fn as_field_builder(&self) -> Option<&dyn FieldBuilderDirective> {
        match self.kind {
            WhereKind::Eq | WhereKind::Neq => Some(self),
            _ => None,
        }
    }
}
impl ArgBuilderDirective for WhereDirective {
    fn handle_builder(
        &self,
        usage: &DirectiveUsage,
        builder: &mut dyn QueryBuilder,
        argument_name: &str,
        value: &ArgumentValue,
        _ctx: &BuilderContext<'_>,
    ) -> Result<(), ResolveError> {
        let column = usage.string_arg("key")?.unwrap_or(argument_name);
        self.apply(usage, builder, column, value.to_json())
    }
}
impl FieldBuilderDirective for WhereDirective {
    fn handle_field_builder(
        &self,
        usage: &DirectiveUsage,
        builder: &mut dyn QueryBuilder,
        _args: &ArgumentSet,
        _ctx: &BuilderContext<'_>,
    ) -> Result<(), ResolveError> {
        let column = usage.required_string_arg("key")?;
        let value = usage.argument("value")
            .map(|value| value.to_json())
            .unwrap_or(serde_json::Value::Null);
        self.apply(usage, builder, column, value)
    }
}

fn list_of(value: serde_json::Value) -> Vec<serde_json::Value> {
    match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    }
}

/// `@scope(name: "verified")` applies a named model scope when the
/// argument is given. The argument's value is passed to the scope.
pub struct ScopeDirective;
impl Directive for ScopeDirective {
    fn name(&self) -> &str {
        "scope"
    }

    fn definition(&self) -> &str {
        r#"
"""
Adds a scope to the query builder.
The scope method will receive the client-given value of the argument as the second parameter.
"""
directive @scope(
  """
  The name of the scope. Defaults to the name of the argument.
  """
  name: String
) repeatable on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::ArgBuilder]
    }

    fn as_arg_builder(&self) -> Option<&dyn ArgBuilderDirective> {
        Some(self)
    }
}
impl ArgBuilderDirective for ScopeDirective {
    fn handle_builder(
        &self,
        usage: &DirectiveUsage,
        builder: &mut dyn QueryBuilder,
        argument_name: &str,
        value: &ArgumentValue,
        _ctx: &BuilderContext<'_>,
    ) -> Result<(), ResolveError> {
        if value.is_null() {
            return Ok(());
        }
        let scope = usage.string_arg("name")?.unwrap_or(argument_name);
        builder.apply_scope(scope, &value.to_json())?;
        Ok(())
    }
}

/// `@limit` caps the number of rows with the argument's value.
pub struct LimitDirective;
impl Directive for LimitDirective {
    fn name(&self) -> &str {
        "limit"
    }

    fn definition(&self) -> &str {
        r#"
"""
Allow clients to specify the maximum number of results to return.
"""
directive @limit on ARGUMENT_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::ArgBuilder]
    }

    fn as_arg_builder(&self) -> Option<&dyn ArgBuilderDirective> {
        Some(self)
    }
}
impl ArgBuilderDirective for LimitDirective {
    fn handle_builder(
        &self,
        _usage: &DirectiveUsage,
        builder: &mut dyn QueryBuilder,
        argument_name: &str,
        value: &ArgumentValue,
        _ctx: &BuilderContext<'_>,
    ) -> Result<(), ResolveError> {
        match value.as_scalar().and_then(|limit| limit.as_i64()) {
            None => Ok(()),
            Some(limit) if limit < 0 => Err(ResolveError::User(format!(
                "Expected `{argument_name}` to be non-negative, got {limit}.",
            ))),
            Some(limit) => {
                builder.limit(limit as u64);
                Ok(())
            },
        }
    }
}

const SORT_ORDER_SDL: &str = r#"
"""
Directions for ordering a list of records.
"""
enum SortOrder {
  "Sort records in ascending order."
  ASC

  "Sort records in descending order."
  DESC
}
"#;

const ORDER_BY_CLAUSE_SDL: &str = r#"
"""
Allows ordering a list of records.
"""
input OrderByClause {
  "The column that is used for ordering."
  column: String!

  "The direction that is used for ordering."
  order: SortOrder!
}
"#;

/// `@orderBy` sorts the query.
///
/// On an argument it rewrites the argument's type into a list of
/// `{ column, order }` clauses; with `columns`, the allowed columns become
/// an enum. On a field it applies a fixed `column` and `direction`.
pub struct OrderByDirective;
impl Directive for OrderByDirective {
    fn name(&self) -> &str {
        "orderBy"
    }

    fn definition(&self) -> &str {
        r#"
"""
Sort a result list by one or more given columns.
"""
directive @orderBy(
  """
  Restrict the allowed column names to a well-defined list.
  Generates an enum of the allowed columns.
  """
  columns: [String!]

  """
  The database column for ordering.
  Only used when the directive is added on a field.
  """
  column: String

  """
  The direction of the ordering.
  Only used when the directive is added on a field.
  """
  direction: String = "ASC"
) on ARGUMENT_DEFINITION | FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[
            DirectiveCapability::ArgBuilder,
            DirectiveCapability::ArgManipulator,
            DirectiveCapability::FieldBuilder,
        ]
    }

    fn as_arg_builder(&self) -> Option<&dyn ArgBuilderDirective> {
        Some(self)
    }

    fn as_arg_manipulator(&self) -> Option<&dyn ArgManipulator> {
        Some(self)
    }

    fn as_field_builder(&self) -> Option<&dyn FieldBuilderDirective> {
        Some(self)
    }
}
impl ArgManipulator for OrderByDirective {
    fn manipulate_arg_definition(
        &self,
        manipulation: Manipulation<'_>,
        parent_type: &str,
        field_name: &str,
        arg_name: &str,
    ) -> Result<(), SchemaBuildError> {
        let Manipulation { doc, usage, .. } = manipulation;
        if !doc.has_type("SortOrder") {
            doc.add_type_definition(ast_helpers::parse_type_definition(SORT_ORDER_SDL)?)?;
        }

        let clause_type = match usage.string_list_arg("columns")? {
            None => {
                if !doc.has_type("OrderByClause") {
                    doc.add_type_definition(ast_helpers::parse_type_definition(ORDER_BY_CLAUSE_SDL)?)?;
                }
                "OrderByClause".to_string()
            },
            Some(columns) => {
                let prefix = format!("{parent_type}{}", upper_first(field_name));
                let column_enum = format!("{prefix}OrderByColumn");
                let clause_type = format!("{prefix}OrderByClause");
                let values = columns.iter()
                    .map(|column| format!("  {}\n", column_enum_value(column)))
                    .collect::<String>();
                doc.add_type_definition(ast_helpers::parse_type_definition(&format!(
                    "\"Allowed column names for {parent_type}.{field_name}.\"\n\
                    enum {column_enum} {{\n{values}}}",
                ))?)?;
                doc.add_type_definition(ast_helpers::parse_type_definition(&format!(
                    "\"Order by clause for {parent_type}.{field_name}.\"\n\
                    input {clause_type} {{ column: {column_enum}! order: SortOrder! }}",
                ))?)?;
                clause_type
            },
        };

        if let Some(argument) = doc.field_mut(parent_type, field_name)
            .and_then(|field| field.argument_mut(arg_name))
        {
            argument.set_type_annotation(TypeAnnotation::list(
                TypeAnnotation::named(clause_type, false),
                true,
            ));
        }
        Ok(())
    }
}
impl ArgBuilderDirective for OrderByDirective {
    fn handle_builder(
        &self,
        usage: &DirectiveUsage,
        builder: &mut dyn QueryBuilder,
        argument_name: &str,
        value: &ArgumentValue,
        _ctx: &BuilderContext<'_>,
    ) -> Result<(), ResolveError> {
        let clauses = match value {
            ArgumentValue::List(items) => items.iter().collect::<Vec<_>>(),
            ArgumentValue::Null => vec![],
            single => vec![single],
        };
        let columns = usage.string_list_arg("columns")?;

        for clause in clauses.iter().filter_map(|clause| clause.as_nested()) {
            let given = clause.value("column")
                .and_then(|column| column.as_str())
                .ok_or_else(|| ResolveError::User(format!(
                    "Every clause of `{argument_name}` needs a `column`.",
                )))?;
            let column = match &columns {
                Some(columns) => columns.iter()
                    .find(|column| column_enum_value(column) == given)
                    .map(|column| column.as_str())
                    .ok_or_else(|| ResolveError::User(format!(
                        "`{given}` is not a sortable column.",
                    )))?,
                None => given,
            };
            let direction = clause.value("order")
                .and_then(|order| order.as_str())
                .and_then(OrderDirection::parse)
                .unwrap_or(OrderDirection::Asc);
            builder.order_by(column, direction);
        }
        Ok(())
    }
}
impl FieldBuilderDirective for OrderByDirective {
    fn handle_field_builder(
        &self,
        usage: &DirectiveUsage,
        builder: &mut dyn QueryBuilder,
        _args: &ArgumentSet,
        _ctx: &BuilderContext<'_>,
    ) -> Result<(), ResolveError> {
        let column = usage.required_string_arg("column")?;
        let direction = usage.string_arg("direction")?
            .and_then(OrderDirection::parse)
            .unwrap_or(OrderDirection::Asc);
        builder.order_by(column, direction);
        Ok(())
    }
}

/// `created_at` becomes `CREATED_AT`.
fn column_enum_value(column: &str) -> String {
    column.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch.to_ascii_uppercase() } else { '_' })
        .collect()
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `@builder(method: "users::active")` hands the query to a registered
/// builder callable, together with the argument's value (or `value`, on
/// a field).
pub struct BuilderDirective;
impl Directive for BuilderDirective {
    fn name(&self) -> &str {
        "builder"
    }

    fn definition(&self) -> &str {
        r#"
"""
Manipulate the query builder with a custom method.
"""
directive @builder(
  """
  The name of a registered builder callable.
  """
  method: String!

  """
  Pass a value to the method as the second argument.
  Only used when the directive is added on a field.
  """
  value: Mixed
) repeatable on ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION | FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[
            DirectiveCapability::ArgBuilder,
            DirectiveCapability::FieldBuilder,
        ]
    }

    fn as_arg_builder(&self) -> Option<&dyn ArgBuilderDirective> {
        Some(self)
    }

    fn as_field_builder(&self) -> Option<&dyn FieldBuilderDirective> {
        Some(self)
    }
}
impl BuilderDirective {
    fn call(
        &self,
        usage: &DirectiveUsage,
        builder: &mut dyn QueryBuilder,
        value: &serde_json::Value,
        ctx: &BuilderContext<'_>,
    ) -> Result<(), ResolveError> {
        let method = usage.required_string_arg("method")?;
        let namespaces = &ctx.schema.config().namespaces.builders;
        let builder_fn = ctx.schema.callables().builder(method, namespaces)
            .ok_or_else(|| DirectiveError::UnknownCallable {
                callable: method.to_string(),
                directive_name: self.name().to_string(),
            })?;
        builder_fn(builder, value)
    }
}
impl ArgBuilderDirective for BuilderDirective {
    fn handle_builder(
        &self,
        usage: &DirectiveUsage,
        builder: &mut dyn QueryBuilder,
        _argument_name: &str,
        value: &ArgumentValue,
        ctx: &BuilderContext<'_>,
    ) -> Result<(), ResolveError> {
        if value.is_null() {
            return Ok(());
        }
        self.call(usage, builder, &value.to_json(), ctx)
    }
}
impl FieldBuilderDirective for BuilderDirective {
    fn handle_field_builder(
        &self,
        usage: &DirectiveUsage,
        builder: &mut dyn QueryBuilder,
        args: &ArgumentSet,
        ctx: &BuilderContext<'_>,
    ) -> Result<(), ResolveError> {
        let value = match usage.argument("value") {
            Some(value) => value.to_json(),
            None => serde_json::Value::Object(args.to_json()),
        };
        self.call(usage, builder, &value, ctx)
    }
}
