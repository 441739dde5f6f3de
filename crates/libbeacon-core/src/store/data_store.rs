use crate::store::QueryBuilder;
use crate::store::Row;
use crate::store::StoreError;

type Result<T> = std::result::Result<T, StoreError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationKind {
    BelongsTo,
    BelongsToMany,
    HasMany,
    HasOne,
}
impl RelationKind {
    pub fn is_single(&self) -> bool {
        matches!(self, Self::BelongsTo | Self::HasOne)
    }
}

/// The link table of a many-to-many relation.
#[derive(Clone, Debug, PartialEq)]
pub struct Pivot {
    /// Column of the pivot pointing at the parent.
    pub foreign_pivot_key: String,
    pub model: String,
    /// Column of the pivot pointing at the related row.
    pub related_pivot_key: String,
}

/// How two models are linked.
///
/// For `HasOne`/`HasMany`, `foreign_key` lives on the related model and
/// points at the parent's `owner_key`. For `BelongsTo` it lives on the
/// parent and points at the related model's `owner_key`.
#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    pub foreign_key: String,
    pub kind: RelationKind,
    pub owner_key: String,
    pub pivot: Option<Pivot>,
    pub related: String,
}
impl Relation {
    pub fn belongs_to(related: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            foreign_key: foreign_key.into(),
            kind: RelationKind::BelongsTo,
            owner_key: "id".to_string(),
            pivot: None,
            related: related.into(),
        }
    }

    pub fn belongs_to_many(related: impl Into<String>, pivot: Pivot) -> Self {
        Self {
            foreign_key: pivot.foreign_pivot_key.clone(),
            kind: RelationKind::BelongsToMany,
            owner_key: "id".to_string(),
            pivot: Some(pivot),
            related: related.into(),
        }
    }

    pub fn has_many(related: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            foreign_key: foreign_key.into(),
            kind: RelationKind::HasMany,
            owner_key: "id".to_string(),
            pivot: None,
            related: related.into(),
        }
    }

    pub fn has_one(related: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            kind: RelationKind::HasOne,
            ..Self::has_many(related, foreign_key)
        }
    }

    /// The column of the *parent* row whose value identifies the related
    /// rows.
    pub fn parent_key(&self) -> &str {
        match self.kind {
            RelationKind::BelongsTo => self.foreign_key.as_str(),
            _ => self.owner_key.as_str(),
        }
    }
}

/// The persistence port: everything the engine needs from the underlying
/// data store.
#[async_trait::async_trait]
pub trait DataStore: Send + Sync {
    fn query(&self, model: &str) -> Result<Box<dyn QueryBuilder>>;

    fn relation(&self, model: &str, relation: &str) -> Result<Relation>;

    fn key_name(&self, model: &str) -> String {
        let _ = model;
        "id".to_string()
    }

    /// Inserts a row, assigning its key if absent, and returns it as
    /// stored.
    async fn insert(&self, model: &str, row: Row) -> Result<Row>;

    /// Merges `changes` into the row keyed `key` and returns the result.
    async fn update(&self, model: &str, key: &serde_json::Value, changes: Row) -> Result<Row>;

    async fn delete(&self, model: &str, key: &serde_json::Value) -> Result<Option<Row>>;

    /// Deletes every row whose columns equal all of `conditions`.
    async fn delete_where(&self, model: &str, conditions: &Row) -> Result<u64>;

    async fn begin(&self) -> Result<()>;
    async fn commit(&self) -> Result<()>;
    async fn rollback(&self) -> Result<()>;
}
