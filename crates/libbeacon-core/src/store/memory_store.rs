use crate::store::DataStore;
use crate::store::Operator;
use crate::store::OrderDirection;
use crate::store::Page;
use crate::store::QueryBuilder;
use crate::store::Relation;
use crate::store::Row;
use crate::store::StoreError;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

type Result<T> = std::result::Result<T, StoreError>;

pub type ScopeFn = dyn Fn(&mut dyn QueryBuilder, &serde_json::Value) -> Result<()>
    + Send
    + Sync;

#[derive(Clone, Default)]
struct Tables {
    next_keys: HashMap<String, i64>,
    rows: IndexMap<String, Vec<Row>>,
}

#[derive(Default)]
struct MemoryState {
    relations: HashMap<(String, String), Relation>,
    scopes: HashMap<(String, String), Arc<ScopeFn>>,
    select_count: u64,
    snapshots: Vec<Tables>,
    tables: Tables,
}

/// A [`DataStore`] over in-process tables of JSON rows.
///
/// Cloning shares the underlying tables. Transactions nest: each `begin()`
/// snapshots every table and `rollback()` restores the latest snapshot.
///
/// Clones also share one snapshot stack, so a transaction is not scoped to
/// the clone that began it. Run at most one request against a store (and
/// its clones) at a time; concurrent mutations would commit or roll back
/// each other's snapshots.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}
impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_relation(
        &self,
        model: &str,
        name: &str,
        relation: Relation,
    ) -> Result<&Self> {
        self.lock()?.relations.insert((model.to_string(), name.to_string()), relation);
        Ok(self)
    }

    pub fn define_scope<F>(&self, model: &str, name: &str, scope: F) -> Result<&Self>
    where
        F: Fn(&mut dyn QueryBuilder, &serde_json::Value) -> Result<()> + Send + Sync + 'static,
    {
        self.lock()?.scopes.insert((model.to_string(), name.to_string()), Arc::new(scope));
        Ok(self)
    }

    /// Number of `get`/`count`/`paginate` calls run so far.
    pub fn select_count(&self) -> Result<u64> {
        Ok(self.lock()?.select_count)
    }

    pub fn reset_select_count(&self) -> Result<()> {
        self.lock()?.select_count = 0;
        Ok(())
    }

    pub fn rows(&self, model: &str) -> Result<Vec<Row>> {
        Ok(self.lock()?.tables.rows.get(model).cloned().unwrap_or_default())
    }

    /// Inserts rows as given, without going through a transaction.
    pub fn seed(&self, model: &str, rows: Vec<serde_json::Value>) -> Result<&Self> {
        let mut state = self.lock()?;
        for row in rows {
            let serde_json::Value::Object(row) = row else {
                return Err(StoreError::InvalidValue {
                    column: "*".to_string(),
                    message: "seeded rows must be objects".to_string(),
                    model: model.to_string(),
                });
            };
            insert_row(&mut state.tables, model, "id", row);
        }
        drop(state);
        Ok(self)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state.lock()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }

    fn scope(&self, model: &str, name: &str) -> Result<Arc<ScopeFn>> {
        self.lock()?.scopes.get(&(model.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::UnknownScope {
                model: model.to_string(),
                scope: name.to_string(),
            })
    }

    fn select(&self, query: &MemoryQuery) -> Result<Vec<Row>> {
        let mut state = self.lock()?;
        state.select_count += 1;
        tracing::trace!("select #{} from `{}`", state.select_count, query.model);

        let mut rows: Vec<Row> = state.tables.rows.get(&query.model)
            .map(|rows| rows.iter()
                .filter(|row| query.conditions.iter().all(|cond| cond.matches(row)))
                .cloned()
                .collect())
            .unwrap_or_default();
        drop(state);

        if !query.orders.is_empty() {
            rows.sort_by(|a, b| {
                for (column, direction) in query.orders.iter() {
                    let ord = compare_values(
                        a.get(column).unwrap_or(&serde_json::Value::Null),
                        b.get(column).unwrap_or(&serde_json::Value::Null),
                    ).unwrap_or(Ordering::Equal);
                    let ord = match direction {
                        OrderDirection::Asc => ord,
                        OrderDirection::Desc => ord.reverse(),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }
        Ok(rows)
    }
}
impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl DataStore for InMemoryStore {
    fn query(&self, model: &str) -> Result<Box<dyn QueryBuilder>> {
        Ok(Box::new(MemoryQuery {
            conditions: vec![],
            limit: None,
            model: model.to_string(),
            orders: vec![],
            store: self.clone(),
        }))
    }

    fn relation(&self, model: &str, relation: &str) -> Result<Relation> {
        self.lock()?.relations.get(&(model.to_string(), relation.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::UnknownRelation {
                model: model.to_string(),
                relation: relation.to_string(),
            })
    }

    async fn insert(&self, model: &str, row: Row) -> Result<Row> {
        let key_name = self.key_name(model);
        let mut state = self.lock()?;
        Ok(insert_row(&mut state.tables, model, &key_name, row))
    }

    async fn update(&self, model: &str, key: &serde_json::Value, changes: Row) -> Result<Row> {
        let key_name = self.key_name(model);
        let mut state = self.lock()?;
        let row = state.tables.rows.get_mut(model)
            .and_then(|rows| rows.iter_mut().find(|row| {
                row.get(&key_name).is_some_and(|k| loose_eq(k, key))
            }))
            .ok_or_else(|| StoreError::RowNotFound {
                key: key.to_string(),
                model: model.to_string(),
            })?;
        for (column, value) in changes {
            row.insert(column, value);
        }
        Ok(row.clone())
    }

    async fn delete(&self, model: &str, key: &serde_json::Value) -> Result<Option<Row>> {
        let key_name = self.key_name(model);
        let mut state = self.lock()?;
        let Some(rows) = state.tables.rows.get_mut(model) else {
            return Ok(None);
        };
        let position = rows.iter().position(|row| {
            row.get(&key_name).is_some_and(|k| loose_eq(k, key))
        });
        Ok(position.map(|idx| rows.remove(idx)))
    }

    async fn delete_where(&self, model: &str, conditions: &Row) -> Result<u64> {
        let mut state = self.lock()?;
        let Some(rows) = state.tables.rows.get_mut(model) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !conditions.iter().all(|(column, value)| {
            row.get(column).is_some_and(|v| loose_eq(v, value))
        }));
        Ok((before - rows.len()) as u64)
    }

    async fn begin(&self) -> Result<()> {
        let mut state = self.lock()?;
        let snapshot = state.tables.clone();
        state.snapshots.push(snapshot);
        tracing::debug!("Began transaction (depth {})", state.snapshots.len());
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let mut state = self.lock()?;
        state.snapshots.pop()
            .ok_or(StoreError::NoTransaction { operation: "commit" })?;
        tracing::debug!("Committed transaction (depth {})", state.snapshots.len() + 1);
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let mut state = self.lock()?;
        let snapshot = state.snapshots.pop()
            .ok_or(StoreError::NoTransaction { operation: "roll back" })?;
        state.tables = snapshot;
        tracing::debug!("Rolled back transaction (depth {})", state.snapshots.len() + 1);
        Ok(())
    }
}

fn insert_row(tables: &mut Tables, model: &str, key_name: &str, mut row: Row) -> Row {
    let next_key = tables.next_keys.entry(model.to_string()).or_insert(1);
    match row.get(key_name).and_then(|key| key_as_i64(key)) {
        Some(key) => *next_key = (*next_key).max(key + 1),
        None if !row.contains_key(key_name) => {
            row.insert(key_name.to_string(), (*next_key).into());
            *next_key += 1;
        },
        None => (),
    }
    tables.rows.entry(model.to_string()).or_default().push(row.clone());
    row
}

fn key_as_i64(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[derive(Clone, Debug)]
enum Condition {
    Between {
        column: String,
        max: serde_json::Value,
        min: serde_json::Value,
    },
    Compare {
        column: String,
        operator: Operator,
        value: serde_json::Value,
    },
    In {
        column: String,
        negate: bool,
        values: Vec<serde_json::Value>,
    },
    Null {
        column: String,
        negate: bool,
    },
}
impl Condition {
    fn matches(&self, row: &Row) -> bool {
        let null = serde_json::Value::Null;
        match self {
            Self::Between { column, max, min } => {
                let value = row.get(column).unwrap_or(&null);
                matches!(compare_values(value, min), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(compare_values(value, max), Some(Ordering::Less | Ordering::Equal))
            },
            Self::Compare { column, operator, value } => {
                let actual = row.get(column).unwrap_or(&null);
                match operator {
                    Operator::Eq => loose_eq(actual, value),
                    Operator::Neq => !loose_eq(actual, value),
                    Operator::Gt => compare_values(actual, value) == Some(Ordering::Greater),
                    Operator::Gte => matches!(
                        compare_values(actual, value),
                        Some(Ordering::Greater | Ordering::Equal),
                    ),
                    Operator::Lt => compare_values(actual, value) == Some(Ordering::Less),
                    Operator::Lte => matches!(
                        compare_values(actual, value),
                        Some(Ordering::Less | Ordering::Equal),
                    ),
                    Operator::Like => like(actual, value),
                    Operator::NotLike => !like(actual, value),
                }
            },
            Self::In { column, negate, values } => {
                let actual = row.get(column).unwrap_or(&null);
                values.iter().any(|v| loose_eq(actual, v)) != *negate
            },
            Self::Null { column, negate } => {
                row.get(column).is_none_or(|v| v.is_null()) != *negate
            },
        }
    }
}

/// Equality the way a SQL database compares a column with a bound
/// parameter: `1` equals `"1"`.
pub(crate) fn loose_eq(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    use serde_json::Value;
    match (a, b) {
        (Value::Number(_), Value::String(_))
        | (Value::String(_), Value::Number(_))
        | (Value::Number(_), Value::Number(_)) => {
            compare_values(a, b) == Some(Ordering::Equal)
        },
        _ => a == b,
    }
}

fn compare_values(a: &serde_json::Value, b: &serde_json::Value) -> Option<Ordering> {
    use serde_json::Value;
    let as_f64 = |v: &Value| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),
        _ => as_f64(a)?.partial_cmp(&as_f64(b)?),
    }
}

fn like(actual: &serde_json::Value, pattern: &serde_json::Value) -> bool {
    let (Some(actual), Some(pattern)) = (actual.as_str(), pattern.as_str()) else {
        return false;
    };
    let mut regex_src = String::from("(?is)^");
    for ch in pattern.chars() {
        match ch {
            '%' => regex_src.push_str(".*"),
            '_' => regex_src.push('.'),
            ch => regex_src.push_str(&regex::escape(&ch.to_string())),
        }
    }
    regex_src.push('$');
    regex::Regex::new(&regex_src).is_ok_and(|re| re.is_match(actual))
}

#[derive(Clone)]
struct MemoryQuery {
    conditions: Vec<Condition>,
    limit: Option<u64>,
    model: String,
    orders: Vec<(String, OrderDirection)>,
    store: InMemoryStore,
}
#[async_trait::async_trait]
impl QueryBuilder for MemoryQuery {
    fn model(&self) -> &str {
        self.model.as_str()
    }

    fn add_where(&mut self, column: &str, operator: Operator, value: serde_json::Value) {
        self.conditions.push(Condition::Compare {
            column: column.to_string(),
            operator,
            value,
        });
    }

    fn where_between(&mut self, column: &str, min: serde_json::Value, max: serde_json::Value) {
        self.conditions.push(Condition::Between {
            column: column.to_string(),
            max,
            min,
        });
    }

    fn where_in(&mut self, column: &str, values: Vec<serde_json::Value>) {
        self.conditions.push(Condition::In {
            column: column.to_string(),
            negate: false,
            values,
        });
    }

    fn where_not_in(&mut self, column: &str, values: Vec<serde_json::Value>) {
        self.conditions.push(Condition::In {
            column: column.to_string(),
            negate: true,
            values,
        });
    }

    fn where_not_null(&mut self, column: &str) {
        self.conditions.push(Condition::Null {
            column: column.to_string(),
            negate: true,
        });
    }

    fn where_null(&mut self, column: &str) {
        self.conditions.push(Condition::Null {
            column: column.to_string(),
            negate: false,
        });
    }

    fn order_by(&mut self, column: &str, direction: OrderDirection) {
        self.orders.push((column.to_string(), direction));
    }

    fn limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    fn apply_scope(&mut self, scope: &str, arguments: &serde_json::Value) -> Result<()> {
        let scope_fn = self.store.scope(&self.model, scope)?;
        scope_fn(self, arguments)
    }

    fn box_clone(&self) -> Box<dyn QueryBuilder> {
        Box::new(self.clone())
    }

    async fn count(&self) -> Result<u64> {
        let rows = self.store.select(self)?;
        Ok(self.limit.map_or(rows.len() as u64, |limit| limit.min(rows.len() as u64)))
    }

    async fn get(&self) -> Result<Vec<Row>> {
        let mut rows = self.store.select(self)?;
        if let Some(limit) = self.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn paginate(&self, per_page: u64, page: u64) -> Result<Page> {
        let rows = self.store.select(self)?;
        let page = page.max(1);
        let items = rows.iter()
            .skip(Page::offset(page, per_page).unwrap_or(usize::MAX))
            .take(usize::try_from(per_page).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(Page {
            current_page: page,
            items,
            per_page,
            total: rows.len() as u64,
        })
    }
}
