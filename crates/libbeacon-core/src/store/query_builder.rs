use crate::store::StoreError;

type Result<T> = std::result::Result<T, StoreError>;

/// A stored record: column name to value.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Like,
    Lt,
    Lte,
    Neq,
    NotLike,
}
impl Operator {
    /// Parses the SQL spelling of an operator (`=`, `!=`, `<>`, `>`,
    /// `like`, ...).
    pub fn parse(operator: &str) -> Option<Self> {
        Some(match operator.trim().to_ascii_lowercase().as_str() {
            "=" | "==" => Self::Eq,
            "!=" | "<>" => Self::Neq,
            ">" => Self::Gt,
            ">=" => Self::Gte,
            "<" => Self::Lt,
            "<=" => Self::Lte,
            "like" => Self::Like,
            "not like" => Self::NotLike,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}
impl OrderDirection {
    pub fn parse(direction: &str) -> Option<Self> {
        match direction.to_ascii_uppercase().as_str() {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// One page of a paginated query.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub current_page: u64,
    pub items: Vec<Row>,
    pub per_page: u64,
    pub total: u64,
}
impl Page {
    /// Index of the first item on `page` (1-based) when pages hold
    /// `per_page` items, or `None` when it does not fit in a `usize`.
    pub fn offset(page: u64, per_page: u64) -> Option<usize> {
        let offset = page.max(1).checked_sub(1)?.checked_mul(per_page)?;
        usize::try_from(offset).ok()
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }

    pub fn last_page(&self) -> u64 {
        if self.per_page == 0 {
            return 1;
        }
        self.total.div_ceil(self.per_page).max(1)
    }
}

/// A query against one model, built up clause by clause and then run.
///
/// Builders are cloneable through [`QueryBuilder::box_clone()`] so a
/// decorated query can serve as the template of a batched load.
#[async_trait::async_trait]
pub trait QueryBuilder: Send + Sync {
    fn model(&self) -> &str;

    fn add_where(&mut self, column: &str, operator: Operator, value: serde_json::Value);
    fn where_between(&mut self, column: &str, min: serde_json::Value, max: serde_json::Value);
    fn where_in(&mut self, column: &str, values: Vec<serde_json::Value>);
    fn where_not_in(&mut self, column: &str, values: Vec<serde_json::Value>);
    fn where_not_null(&mut self, column: &str);
    fn where_null(&mut self, column: &str);
    fn order_by(&mut self, column: &str, direction: OrderDirection);
    fn limit(&mut self, limit: u64);

    /// Applies a named scope registered for the model. `arguments` is the
    /// field's full argument object.
    fn apply_scope(&mut self, scope: &str, arguments: &serde_json::Value) -> Result<()>;

    fn box_clone(&self) -> Box<dyn QueryBuilder>;

    async fn count(&self) -> Result<u64>;
    async fn get(&self) -> Result<Vec<Row>>;
    async fn paginate(&self, per_page: u64, page: u64) -> Result<Page>;
}
