use crate::arguments::Argument;
use crate::arguments::ArgumentSet;
use crate::arguments::ArgumentValue;
use crate::directives::BoundDirective;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::NestedParent;
use crate::execution::PathSegment;
use crate::execution::RequestContext;
use crate::resolve::CompiledSchema;
use crate::resolve::ResolveError;
use crate::store::DataStore;
use crate::store::Operator;
use crate::store::Relation;
use crate::store::RelationKind;
use crate::store::Row;
use crate::store::StoreError;
use async_recursion::async_recursion;
use std::future::Future;

type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Update,
    Upsert,
}

/// An argument that writes to something other than the row's own columns.
enum NestedWrite {
    Directive {
        argument: Argument,
        bound: Vec<BoundDirective>,
        name: String,
    },
    Relation {
        name: String,
        relation: Relation,
        value: ArgumentValue,
    },
}

/// Writes nested argument sets to the store.
///
/// Arguments of a saved set fall into three groups: ones carrying an
/// argument resolver directive, ones named after a relation of the model
/// whose value is an input object, and plain columns. `belongsTo` relation
/// writes run before the row is saved, since they produce its foreign key;
/// every other nested write runs after, against the saved row.
pub struct MutationExecutor<'a> {
    ctx: &'a RequestContext,
    schema: &'a CompiledSchema,
}
impl<'a> MutationExecutor<'a> {
    pub fn new(ctx: &'a RequestContext, schema: &'a CompiledSchema) -> Self {
        Self {
            ctx,
            schema,
        }
    }

    pub fn ctx(&self) -> &'a RequestContext {
        self.ctx
    }

    pub async fn delete(&self, model: &str, keys: Vec<serde_json::Value>) -> Result<Vec<Row>> {
        let mut deleted = vec![];
        for key in keys {
            if let Some(row) = self.store().delete(model, &key).await? {
                deleted.push(row);
            }
        }
        Ok(deleted)
    }

    /// Deletes related rows by key, detaching them first for
    /// many-to-many relations.
    pub async fn delete_related(
        &self,
        parent: NestedParent<'_>,
        relation: &Relation,
        keys: Vec<serde_json::Value>,
    ) -> Result<()> {
        if relation.kind == RelationKind::BelongsToMany {
            self.detach(parent, relation, &keys).await?;
        }
        self.delete(&relation.related, keys).await?;
        Ok(())
    }

    #[async_recursion]
    pub async fn save(&self, model: &str, mode: SaveMode, args: ArgumentSet) -> Result<Row> {
        let store = self.store();
        let key_name = store.key_name(model);
        let (mut attributes, before, after) = self.partition(model, args)?;

        for write in before {
            if let NestedWrite::Relation { relation, value, name } = write {
                self.write_belongs_to(model, &key_name, &relation, &name, value, &mut attributes).await?;
            }
        }

        let key = attributes.get(&key_name).cloned().filter(|key| !key.is_null());
        let row = match (mode, key) {
            (SaveMode::Create, _) => store.insert(model, attributes).await?,
            (SaveMode::Update, None) => return Err(ResolveError::User(format!(
                "Updating `{model}` requires the `{key_name}` argument.",
            ))),
            (SaveMode::Update, Some(key)) => {
                attributes.remove(&key_name);
                store.update(model, &key, attributes).await
                    .map_err(|err| not_found(err, model))?
            },
            (SaveMode::Upsert, None) => store.insert(model, attributes).await?,
            (SaveMode::Upsert, Some(key)) => {
                let mut changes = attributes.clone();
                changes.remove(&key_name);
                match store.update(model, &key, changes).await {
                    Ok(row) => row,
                    Err(StoreError::RowNotFound { .. }) => store.insert(model, attributes).await?,
                    Err(err) => return Err(err.into()),
                }
            },
        };
        tracing::trace!("Saved `{model}` ({mode:?})");

        let parent = NestedParent {
            model,
            row: &row,
        };
        for write in after {
            match write {
                NestedWrite::Directive { argument, bound, name } => {
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
                            self,
                        ).await?;
                    }
                },
                NestedWrite::Relation { relation, value, .. } => {
                    self.write_relation(parent, &relation, value).await?;
                },
            }
        }
        Ok(row)
    }

    /// Saves each item, all-or-nothing when mutations are transactional.
    ///
    /// Otherwise every item is saved in its own transaction; a failed item
    /// yields `null` and its error goes to the request's error pool.
    pub async fn save_many(
        &self,
        model: &str,
        mode: SaveMode,
        items: Vec<ArgumentSet>,
        path: &[PathSegment],
    ) -> Result<Vec<serde_json::Value>> {
        if self.schema.config().transactional_mutations {
            return self.transaction(async {
                let mut rows = vec![];
                for item in items {
                    rows.push(serde_json::Value::Object(self.save(model, mode, item).await?));
                }
                Ok(rows)
            }).await;
        }

        let mut rows = vec![];
        for (idx, item) in items.into_iter().enumerate() {
            match self.transaction(self.save(model, mode, item)).await {
                Ok(row) => rows.push(serde_json::Value::Object(row)),
                Err(err) => {
                    let mut item_path = path.to_vec();
                    item_path.push(PathSegment::Index(idx));
                    self.ctx.error_pool().record(err.to_graphql_error(Some(item_path)));
                    rows.push(serde_json::Value::Null);
                },
            }
        }
        Ok(rows)
    }

    /// Saves a row of `relation`'s related model, linked to `parent`.
    pub async fn save_related(
        &self,
        parent: NestedParent<'_>,
        relation: &Relation,
        mode: SaveMode,
        mut args: ArgumentSet,
    ) -> Result<Row> {
        match relation.kind {
            RelationKind::BelongsTo => Err(ResolveError::User(format!(
                "The related `{}` of a belongsTo relation must be written through the parent's input.",
                relation.related,
            ))),
            RelationKind::HasMany | RelationKind::HasOne => {
                let owner_key = parent_value(parent, &relation.owner_key);
                args.insert(
                    relation.foreign_key.clone(),
                    Argument::new(ArgumentValue::Scalar(owner_key)),
                );
                self.save(&relation.related, mode, args).await
            },
            RelationKind::BelongsToMany => {
                let row = self.save(&relation.related, mode, args).await?;
                let related_key = row.get(&relation.owner_key).cloned()
                    .unwrap_or(serde_json::Value::Null);
                self.attach(parent, relation, &[related_key]).await?;
                Ok(row)
            },
        }
    }

    pub fn schema(&self) -> &'a CompiledSchema {
        self.schema
    }

    pub fn store(&self) -> &'a dyn DataStore {
        self.ctx.store().as_ref()
    }

    /// Runs `operation` between `begin()` and `commit()`, rolling back if
    /// it fails.
    pub async fn transaction<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        let store = self.store();
        store.begin().await?;
        match operation.await {
            Ok(value) => {
                store.commit().await?;
                Ok(value)
            },
            Err(err) => {
                tracing::debug!("Rolling back mutation: {err}");
                if let Err(rollback_err) = store.rollback().await {
                    tracing::warn!("Rollback failed: {rollback_err}");
                }
                Err(err)
            },
        }
    }

    async fn attach(
        &self,
        parent: NestedParent<'_>,
        relation: &Relation,
        related_keys: &[serde_json::Value],
    ) -> Result<()> {
        let pivot = pivot_of(relation)?;
        let parent_key = parent_value(parent, &relation.owner_key);
        for related_key in related_keys {
            let mut existing = self.store().query(&pivot.model)?;
            existing.add_where(&pivot.foreign_pivot_key, Operator::Eq, parent_key.clone());
            existing.add_where(&pivot.related_pivot_key, Operator::Eq, related_key.clone());
            if existing.count().await? > 0 {
                continue;
            }
            let mut link = Row::new();
            link.insert(pivot.foreign_pivot_key.clone(), parent_key.clone());
            link.insert(pivot.related_pivot_key.clone(), related_key.clone());
            self.store().insert(&pivot.model, link).await?;
        }
        Ok(())
    }

    async fn detach(
        &self,
        parent: NestedParent<'_>,
        relation: &Relation,
        related_keys: &[serde_json::Value],
    ) -> Result<()> {
        let pivot = pivot_of(relation)?;
        let parent_key = parent_value(parent, &relation.owner_key);
        for related_key in related_keys {
            let mut link = Row::new();
            link.insert(pivot.foreign_pivot_key.clone(), parent_key.clone());
            link.insert(pivot.related_pivot_key.clone(), related_key.clone());
            self.store().delete_where(&pivot.model, &link).await?;
        }
        Ok(())
    }

    async fn attached_keys(
        &self,
        parent: NestedParent<'_>,
        relation: &Relation,
    ) -> Result<Vec<serde_json::Value>> {
        let pivot = pivot_of(relation)?;
        let mut query = self.store().query(&pivot.model)?;
        query.add_where(&pivot.foreign_pivot_key, Operator::Eq, parent_value(parent, &relation.owner_key));
        Ok(query.get().await?
            .into_iter()
            .filter_map(|mut row| row.remove(&pivot.related_pivot_key))
            .collect())
    }

    fn partition(
        &self,
        model: &str,
        args: ArgumentSet,
    ) -> Result<(Row, Vec<NestedWrite>, Vec<NestedWrite>)> {
        let registry = self.schema.registry();
        let mut attributes = Row::new();
        let mut before = vec![];
        let mut after = vec![];

        for (name, argument) in args.arguments {
            let bound = registry.associated_of_type(
                &argument.directives,
                DirectiveCapability::ArgResolver,
            )?;
            if !bound.is_empty() {
                after.push(NestedWrite::Directive {
                    argument,
                    bound,
                    name,
                });
                continue;
            }

            if let ArgumentValue::Nested(_) = argument.value {
                if let Ok(relation) = self.store().relation(model, &name) {
                    let write = NestedWrite::Relation {
                        name,
                        relation: relation.clone(),
                        value: argument.value,
                    };
                    if relation.kind == RelationKind::BelongsTo {
                        before.push(write);
                    } else {
                        after.push(write);
                    }
                    continue;
                }
            }

            attributes.insert(name, argument.value.to_json());
        }
        Ok((attributes, before, after))
    }

    /// Applies a nested `belongsTo` input (`connect`, `create`, `update`,
    /// `upsert`, `disconnect`, `delete`) by setting the foreign key in
    /// `attributes`.
    async fn write_belongs_to(
        &self,
        model: &str,
        key_name: &str,
        relation: &Relation,
        relation_name: &str,
        value: ArgumentValue,
        attributes: &mut Row,
    ) -> Result<()> {
        let ArgumentValue::Nested(mut ops) = value else {
            return Ok(());
        };
        let foreign_key = relation.foreign_key.clone();

        if let Some(connect) = ops.json("connect") {
            attributes.insert(foreign_key.clone(), connect);
        }
        for (op, mode) in [
            ("create", SaveMode::Create),
            ("update", SaveMode::Update),
            ("upsert", SaveMode::Upsert),
        ] {
            let Some(ArgumentValue::Nested(set)) = ops.remove(op).map(|arg| arg.value) else {
                continue;
            };
            let related = self.save(&relation.related, mode, set).await?;
            let related_key = related.get(&relation.owner_key).cloned()
                .unwrap_or(serde_json::Value::Null);
            attributes.insert(foreign_key.clone(), related_key);
        }
        if ops.json("disconnect").and_then(|v| v.as_bool()) == Some(true) {
            attributes.insert(foreign_key.clone(), serde_json::Value::Null);
        }
        if ops.json("delete").and_then(|v| v.as_bool()) == Some(true) {
            let current = match attributes.get(&foreign_key) {
                Some(current) => Some(current.clone()),
                None => self.current_column(model, key_name, attributes, &foreign_key).await?,
            };
            if let Some(current) = current.filter(|key| !key.is_null()) {
                tracing::trace!("Deleting `{relation_name}` of `{model}`");
                self.store().delete(&relation.related, &current).await?;
            }
            attributes.insert(foreign_key, serde_json::Value::Null);
        }
        Ok(())
    }

    /// Reads `column` of the stored row identified by the key in
    /// `attributes`.
    async fn current_column(
        &self,
        model: &str,
        key_name: &str,
        attributes: &Row,
        column: &str,
    ) -> Result<Option<serde_json::Value>> {
        let Some(key) = attributes.get(key_name) else {
            return Ok(None);
        };
        let mut query = self.store().query(model)?;
        query.add_where(key_name, Operator::Eq, key.clone());
        Ok(query.get().await?
            .into_iter()
            .next()
            .and_then(|mut row| row.remove(column)))
    }

    /// Applies a nested relation input such as
    /// `{ create: [...], connect: [1, 2] }` against a saved parent.
    async fn write_relation(
        &self,
        parent: NestedParent<'_>,
        relation: &Relation,
        value: ArgumentValue,
    ) -> Result<()> {
        let ArgumentValue::Nested(mut ops) = value else {
            return Ok(());
        };

        for (op, mode) in [
            ("create", SaveMode::Create),
            ("update", SaveMode::Update),
            ("upsert", SaveMode::Upsert),
        ] {
            let Some(argument) = ops.remove(op) else {
                continue;
            };
            for set in nested_sets(argument.value) {
                self.save_related(parent, relation, mode, set).await?;
            }
        }

        if let Some(keys) = ops.json("delete") {
            self.delete_related(parent, relation, key_list(keys)).await?;
        }

        let parent_key = parent_value(parent, &relation.owner_key);
        match relation.kind {
            RelationKind::HasMany | RelationKind::HasOne => {
                for (op, link) in [("connect", parent_key), ("disconnect", serde_json::Value::Null)] {
                    let Some(keys) = ops.json(op) else {
                        continue;
                    };
                    for key in key_list(keys) {
                        let mut changes = Row::new();
                        changes.insert(relation.foreign_key.clone(), link.clone());
                        self.store().update(&relation.related, &key, changes).await
                            .map_err(|err| not_found(err, &relation.related))?;
                    }
                }
            },

            RelationKind::BelongsToMany => {
                if let Some(keys) = ops.json("sync") {
                    let keys = key_list(keys);
                    let stale: Vec<serde_json::Value> = self.attached_keys(parent, relation).await?
                        .into_iter()
                        .filter(|attached| !keys.iter().any(|k| crate::store::loose_eq(k, attached)))
                        .collect();
                    self.detach(parent, relation, &stale).await?;
                    self.attach(parent, relation, &keys).await?;
                }
                for op in ["connect", "syncWithoutDetaching"] {
                    if let Some(keys) = ops.json(op) {
                        self.attach(parent, relation, &key_list(keys)).await?;
                    }
                }
                if let Some(keys) = ops.json("disconnect") {
                    self.detach(parent, relation, &key_list(keys)).await?;
                }
            },

            RelationKind::BelongsTo => (),
        }
        Ok(())
    }
}

/// The nested sets in a value that is either one input object or a list of
/// them.
pub(crate) fn nested_sets(value: ArgumentValue) -> Vec<ArgumentSet> {
    match value {
        ArgumentValue::Nested(set) => vec![set],
        ArgumentValue::List(items) => items.into_iter().flat_map(nested_sets).collect(),
        _ => vec![],
    }
}

pub(crate) fn key_list(value: serde_json::Value) -> Vec<serde_json::Value> {
    match value {
        serde_json::Value::Array(keys) => keys,
        serde_json::Value::Null => vec![],
        key => vec![key],
    }
}

fn not_found(err: StoreError, model: &str) -> ResolveError {
    match err {
        StoreError::RowNotFound { key, .. } => ResolveError::NotFound {
            key,
            model: model.to_string(),
        },
        err => err.into(),
    }
}

fn parent_value(parent: NestedParent<'_>, column: &str) -> serde_json::Value {
    parent.row.get(column).cloned().unwrap_or(serde_json::Value::Null)
}

fn pivot_of(relation: &Relation) -> Result<&crate::store::Pivot> {
    relation.pivot.as_ref().ok_or_else(|| ResolveError::internal(format!(
        "many-to-many relation to `{}` has no pivot",
        relation.related,
    )))
}
