use crate::batch::key_id;
use crate::batch::BatchLoad;
use crate::resolve::ResolveError;
use crate::store::DataStore;
use crate::store::QueryBuilder;
use crate::store::Relation;
use crate::store::RelationKind;
use crate::store::Row;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationLoadMode {
    Count,
    Many,
    Single,
}

/// Loads one relation for many parents at once.
///
/// Keys are the parents' [`Relation::parent_key()`] values. `template` is
/// the related model's query with every filter and scope already applied;
/// each batch clones it and narrows it to the batch's keys.
pub struct RelationBatchLoad {
    pub mode: RelationLoadMode,
    pub relation: Relation,
    pub store: Arc<dyn DataStore>,
    pub template: Box<dyn QueryBuilder>,
}
impl RelationBatchLoad {
    async fn grouped_rows(&self, keys: &[serde_json::Value]) -> Result<IndexMap<String, Vec<Row>>> {
        let relation = &self.relation;
        let mut query = self.template.box_clone();
        let mut grouped: IndexMap<String, Vec<Row>> = IndexMap::new();

        match relation.kind {
            RelationKind::HasMany | RelationKind::HasOne => {
                query.where_in(&relation.foreign_key, keys.to_vec());
                for row in query.get().await? {
                    if let Some(parent) = row.get(&relation.foreign_key) {
                        grouped.entry(key_id(parent)).or_default().push(row);
                    }
                }
            },

            RelationKind::BelongsTo => {
                query.where_in(&relation.owner_key, keys.to_vec());
                for row in query.get().await? {
                    if let Some(owner) = row.get(&relation.owner_key) {
                        grouped.entry(key_id(owner)).or_default().push(row);
                    }
                }
            },

            RelationKind::BelongsToMany => {
                let pivot = relation.pivot.as_ref()
                    .ok_or_else(|| ResolveError::internal(format!(
                        "belongsToMany relation to `{}` has no pivot",
                        relation.related,
                    )))?;
                let mut pivot_query = self.store.query(&pivot.model)?;
                pivot_query.where_in(&pivot.foreign_pivot_key, keys.to_vec());
                let pivot_rows = pivot_query.get().await?;

                let related_keys: Vec<serde_json::Value> = pivot_rows.iter()
                    .filter_map(|row| row.get(&pivot.related_pivot_key).cloned())
                    .collect();
                query.where_in(&relation.owner_key, related_keys);

                for row in query.get().await? {
                    let Some(related_key) = row.get(&relation.owner_key).map(key_id) else {
                        continue;
                    };
                    for pivot_row in pivot_rows.iter() {
                        let links = pivot_row.get(&pivot.related_pivot_key)
                            .is_some_and(|k| key_id(k) == related_key);
                        if !links {
                            continue;
                        }
                        if let Some(parent) = pivot_row.get(&pivot.foreign_pivot_key) {
                            let mut row = row.clone();
                            row.insert("pivot".to_string(), serde_json::Value::Object(pivot_row.clone()));
                            grouped.entry(key_id(parent)).or_default().push(row);
                        }
                    }
                }
            },
        }
        Ok(grouped)
    }
}
#[async_trait::async_trait]
impl BatchLoad for RelationBatchLoad {
    async fn load(&self, keys: &[serde_json::Value]) -> Result<HashMap<String, serde_json::Value>> {
        let mut grouped = self.grouped_rows(keys).await?;
        Ok(keys.iter()
            .map(|key| {
                let id = key_id(key);
                let rows = grouped.shift_remove(&id).unwrap_or_default();
                let value = match self.mode {
                    RelationLoadMode::Count => serde_json::Value::from(rows.len()),
                    RelationLoadMode::Many => serde_json::Value::Array(
                        rows.into_iter().map(serde_json::Value::Object).collect(),
                    ),
                    RelationLoadMode::Single => rows.into_iter()
                        .next()
                        .map(serde_json::Value::Object)
                        .unwrap_or(serde_json::Value::Null),
                };
                (id, value)
            })
            .collect())
    }
}
