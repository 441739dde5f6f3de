use crate::arguments::ArgumentValue;
use crate::directives::ArgResolverDirective;
use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::FieldContext;
use crate::directives::FieldManipulator;
use crate::directives::FieldResolverDirective;
use crate::directives::Manipulation;
use crate::directives::ManyMutationProblem;
use crate::directives::NestedParent;
use crate::document::DirectiveUsage;
use crate::mutation::key_list;
use crate::mutation::nested_sets;
use crate::mutation::MutationExecutor;
use crate::mutation::SaveMode;
use crate::resolve::FieldResolverFn;
use crate::resolve::ResolveError;
use crate::resolve::ResolveFuture;
use crate::resolve::ResolveParams;
use crate::schema::SchemaBuildError;
use futures::future::BoxFuture;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MutationKind {
    Create,
    Delete,
    Update,
    Upsert,
}
impl MutationKind {
    fn save_mode(&self) -> Option<SaveMode> {
        match self {
            Self::Create => Some(SaveMode::Create),
            Self::Delete => None,
            Self::Update => Some(SaveMode::Update),
            Self::Upsert => Some(SaveMode::Upsert),
        }
    }
}

/// `@create`, `@update`, `@upsert` and `@delete`.
///
/// On a field they write the model behind the return type using the
/// field's arguments. On an argument they write the argument's value
/// through a relation of the parent being saved.
pub struct MutationDirective {
    kind: MutationKind,
}
impl MutationDirective {
    pub fn all() -> [Self; 4] {
        [
            Self { kind: MutationKind::Create },
            Self { kind: MutationKind::Delete },
            Self { kind: MutationKind::Update },
            Self { kind: MutationKind::Upsert },
        ]
    }
}
impl Directive for MutationDirective {
    fn name(&self) -> &str {
        match self.kind {
            MutationKind::Create => "create",
            MutationKind::Delete => "delete",
            MutationKind::Update => "update",
            MutationKind::Upsert => "upsert",
        }
    }

    fn definition(&self) -> &str {
        match self.kind {
            MutationKind::Create => r#"
"""
Create a new model with the given arguments.
"""
directive @create(
  """
  Specify the model name, if it can not be derived from the return type.
  """
  model: String

  """
  Specify the relation name to use, if it differs from the argument name.
  Only used when the directive is placed on an argument.
  """
  relation: String
) on FIELD_DEFINITION | ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#,
            MutationKind::Delete => r#"
"""
Delete one or more models by their key.
The field must have a single argument holding the key(s).
"""
directive @delete(
  """
  Specify the model name, if it can not be derived from the return type.
  """
  model: String

  """
  Specify the relation name to use, if it differs from the argument name.
  Only used when the directive is placed on an argument.
  """
  relation: String
) on FIELD_DEFINITION | ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#,
            MutationKind::Update => r#"
"""
Update a model with the given arguments. The model's key must be given.
"""
directive @update(
  """
  Specify the model name, if it can not be derived from the return type.
  """
  model: String

  """
  Specify the relation name to use, if it differs from the argument name.
  Only used when the directive is placed on an argument.
  """
  relation: String
) on FIELD_DEFINITION | ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#,
            MutationKind::Upsert => r#"
"""
Create or update a model with the given arguments.
"""
directive @upsert(
  """
  Specify the model name, if it can not be derived from the return type.
  """
  model: String

  """
  Specify the relation name to use, if it differs from the argument name.
  Only used when the directive is placed on an argument.
  """
  relation: String
) on FIELD_DEFINITION | ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION
"#,
        }
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[
            DirectiveCapability::ArgResolver,
            DirectiveCapability::FieldResolver,
        ]
    }

    fn as_arg_resolver(&self) -> Option<&dyn ArgResolverDirective> {
        Some(self)
    }

    fn as_field_resolver(&self) -> Option<&dyn FieldResolverDirective> {
        Some(self)
    }
}
impl FieldResolverDirective for MutationDirective {
    fn resolve_field(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldResolverFn>, DirectiveError> {
        Ok(Arc::new(MutationResolver {
            kind: self.kind,
            model: field.model_name(usage)?,
            returns_list: field.field.type_annotation().is_list(),
            transactional: field.config.transactional_mutations,
        }))
    }
}
impl ArgResolverDirective for MutationDirective {
    fn resolve_nested<'a>(
        &'a self,
        usage: &'a DirectiveUsage,
        argument_name: &'a str,
        parent: NestedParent<'a>,
        value: ArgumentValue,
        executor: &'a MutationExecutor<'a>,
    ) -> BoxFuture<'a, Result<(), ResolveError>> {
        Box::pin(async move {
            let relation_name = usage.string_arg("relation")?.unwrap_or(argument_name);
            let relation = executor.store().relation(parent.model, relation_name)?;

            match self.kind.save_mode() {
                None => {
                    let keys = key_list(value.to_json());
                    executor.delete_related(parent, &relation, keys).await
                },
                Some(mode) => {
                    for set in nested_sets(value) {
                        executor.save_related(parent, &relation, mode, set).await?;
                    }
                    Ok(())
                },
            }
        })
    }
}

struct MutationResolver {
    kind: MutationKind,
    model: String,
    returns_list: bool,
    transactional: bool,
}
impl MutationResolver {
    async fn delete(
        &self,
        executor: &MutationExecutor<'_>,
        key: serde_json::Value,
    ) -> Result<serde_json::Value, ResolveError> {
        let mut deleted = executor.delete(&self.model, key_list(key)).await?
            .into_iter()
            .map(serde_json::Value::Object);
        Ok(if self.returns_list {
            serde_json::Value::Array(deleted.collect())
        } else {
            deleted.next().unwrap_or(serde_json::Value::Null)
        })
    }
}
impl FieldResolverFn for MutationResolver {
    fn resolve<'a>(&'a self, params: ResolveParams<'a>) -> ResolveFuture<'a> {
        Box::pin(async move {
            let executor = MutationExecutor::new(params.ctx, params.info.schema());

            let Some(mode) = self.kind.save_mode() else {
                let key = params.args.arguments()
                    .values()
                    .next()
                    .map(|argument| argument.value.to_json())
                    .ok_or_else(|| ResolveError::User(format!(
                        "Deleting `{}` requires an argument holding its key.",
                        self.model,
                    )))?;
                return if self.transactional {
                    executor.transaction(self.delete(&executor, key)).await
                } else {
                    self.delete(&executor, key).await
                };
            };

            let row = if self.transactional {
                executor.transaction(executor.save(&self.model, mode, params.args)).await?
            } else {
                executor.save(&self.model, mode, params.args).await?
            };
            Ok(serde_json::Value::Object(row))
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ManyKind {
    Create,
    Update,
    Upsert,
}

/// `@createMany`, `@updateMany` and `@upsertMany` save a list of input
/// objects given through the field's single argument.
pub struct ManyMutationDirective {
    kind: ManyKind,
}
impl ManyMutationDirective {
    pub fn all() -> [Self; 3] {
        [
            Self { kind: ManyKind::Create },
            Self { kind: ManyKind::Update },
            Self { kind: ManyKind::Upsert },
        ]
    }

    fn save_mode(&self) -> SaveMode {
        match self.kind {
            ManyKind::Create => SaveMode::Create,
            ManyKind::Update => SaveMode::Update,
            ManyKind::Upsert => SaveMode::Upsert,
        }
    }
}
impl Directive for ManyMutationDirective {
    fn name(&self) -> &str {
        match self.kind {
            ManyKind::Create => "createMany",
            ManyKind::Update => "updateMany",
            ManyKind::Upsert => "upsertMany",
        }
    }

    fn definition(&self) -> &str {
        match self.kind {
            ManyKind::Create => r#"
"""
Create multiple new models with the given list of input objects.
"""
directive @createMany(
  """
  Specify the model name, if it can not be derived from the return type.
  """
  model: String
) on FIELD_DEFINITION
"#,
            ManyKind::Update => r#"
"""
Update multiple models with the given list of input objects.
"""
directive @updateMany(
  """
  Specify the model name, if it can not be derived from the return type.
  """
  model: String
) on FIELD_DEFINITION
"#,
            ManyKind::Upsert => r#"
"""
Create or update multiple models with the given list of input objects.
"""
directive @upsertMany(
  """
  Specify the model name, if it can not be derived from the return type.
  """
  model: String
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

    fn as_field_manipulator(&self) -> Option<&dyn FieldManipulator> {
        Some(self)
    }

    fn as_field_resolver(&self) -> Option<&dyn FieldResolverDirective> {
        Some(self)
    }
}
impl FieldManipulator for ManyMutationDirective {
    fn manipulate_field_definition(
        &self,
        manipulation: Manipulation<'_>,
        parent_type: &str,
        field_name: &str,
    ) -> Result<(), SchemaBuildError> {
        let doc = manipulation.doc;
        let Some(field) = doc.field(parent_type, field_name) else {
            return Ok(());
        };
        let invalid = |problem| DirectiveError::InvalidManyMutation {
            directive_name: self.name().to_string(),
            node_name: format!("{parent_type}.{field_name}"),
            problem,
        };

        let mut arguments = field.arguments().values();
        let argument = match (arguments.next(), arguments.next()) {
            (Some(argument), None) => argument,
            _ => return Err(invalid(ManyMutationProblem::NotExactlyOneArgument).into()),
        };
        let type_annotation = argument.type_annotation();
        if !type_annotation.is_list() {
            return Err(invalid(ManyMutationProblem::ArgumentNotList).into());
        }
        if !doc.is_input_object_type(type_annotation.innermost_type_name()) {
            return Err(invalid(ManyMutationProblem::ListItemNotInputObject).into());
        }
        Ok(())
    }
}
impl FieldResolverDirective for ManyMutationDirective {
    fn resolve_field(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldResolverFn>, DirectiveError> {
        Ok(Arc::new(ManyMutationResolver {
            mode: self.save_mode(),
            model: field.model_name(usage)?,
        }))
    }
}

struct ManyMutationResolver {
    mode: SaveMode,
    model: String,
}
impl FieldResolverFn for ManyMutationResolver {
    fn resolve<'a>(&'a self, mut params: ResolveParams<'a>) -> ResolveFuture<'a> {
        Box::pin(async move {
            let name = params.args.arguments().keys().next().cloned();
            let items = name.and_then(|name| params.args.remove(&name))
                .map(|argument| nested_sets(argument.value))
                .unwrap_or_default();

            let executor = MutationExecutor::new(params.ctx, params.info.schema());
            let rows = executor.save_many(&self.model, self.mode, items, params.info.path()).await?;
            Ok(serde_json::Value::Array(rows))
        })
    }
}
