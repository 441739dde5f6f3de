use crate::arguments::ArgumentSet;
use crate::directives::DirectiveError;
use crate::document::ast_helpers;
use crate::document::DirectiveUsage;
use crate::document::DocumentAst;
use crate::document::TypeAnnotation;
use crate::resolve::ResolveError;
use crate::schema::SchemaBuildError;
use crate::store::Page;
use crate::store::Row;
use base64::Engine;

const PAGINATOR_INFO_SDL: &str = r#"
"""
Information about pagination using a fully featured paginator.
"""
type PaginatorInfo {
  "Number of items in the current page."
  count: Int!

  "Index of the current page."
  currentPage: Int!

  "Index of the first item in the current page."
  firstItem: Int

  "Are there more pages after this one?"
  hasMorePages: Boolean!

  "Index of the last item in the current page."
  lastItem: Int

  "Index of the last available page."
  lastPage: Int!

  "Number of items per page."
  perPage: Int!

  "Number of total available items."
  total: Int!
}
"#;

const SIMPLE_PAGINATOR_INFO_SDL: &str = r#"
"""
Information about pagination using a simple paginator.
"""
type SimplePaginatorInfo {
  "Number of items in the current page."
  count: Int!

  "Index of the current page."
  currentPage: Int!

  "Index of the first item in the current page."
  firstItem: Int

  "Are there more pages after this one?"
  hasMorePages: Boolean!

  "Index of the last item in the current page."
  lastItem: Int

  "Number of items per page."
  perPage: Int!
}
"#;

const PAGE_INFO_SDL: &str = r#"
"""
Information about pagination using a Relay style cursor connection.
"""
type PageInfo {
  "When paginating forwards, are there more items?"
  hasNextPage: Boolean!

  "When paginating backwards, are there more items?"
  hasPreviousPage: Boolean!

  "The cursor to continue paginating backwards."
  startCursor: String

  "The cursor to continue paginating forwards."
  endCursor: String

  "Total number of nodes in the paginated connection."
  total: Int!

  "Number of nodes in the current page."
  count: Int!

  "Index of the current page."
  currentPage: Int!

  "Index of the last available page."
  lastPage: Int!
}
"#;

/// The shape a paginated field returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginationType {
    /// A Relay connection: `edges`, `pageInfo`, cursor based.
    Connection,
    /// `data` plus full `paginatorInfo`, including totals.
    Paginator,
    /// `data` plus `paginatorInfo` without totals.
    Simple,
}
impl PaginationType {
    /// Reads the `type` argument of `usage`.
    pub fn from_usage(usage: &DirectiveUsage) -> Result<Option<Self>, DirectiveError> {
        let Some(name) = usage.string_arg("type")? else {
            return Ok(None);
        };
        Self::parse(name).map(Some).ok_or_else(|| DirectiveError::InvalidArgument {
            argument_name: "type".to_string(),
            directive_name: usage.name().to_string(),
            message: format!("expected PAGINATOR, SIMPLE or CONNECTION, got `{name}`"),
        })
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "CONNECTION" | "RELAY" => Some(Self::Connection),
            "PAGINATOR" | "DEFAULT" => Some(Self::Paginator),
            "SIMPLE" => Some(Self::Simple),
            _ => None,
        }
    }

    fn info_type(&self) -> (&'static str, &'static str) {
        match self {
            Self::Connection => ("PageInfo", PAGE_INFO_SDL),
            Self::Paginator => ("PaginatorInfo", PAGINATOR_INFO_SDL),
            Self::Simple => ("SimplePaginatorInfo", SIMPLE_PAGINATOR_INFO_SDL),
        }
    }

    pub fn type_name_for(&self, item_type: &str) -> String {
        match self {
            Self::Connection => format!("{item_type}Connection"),
            Self::Paginator => format!("{item_type}Paginator"),
            Self::Simple => format!("{item_type}SimplePaginator"),
        }
    }
}

/// Rewrites `parent_type.field_name: [Item]` into a paginated field: adds
/// the paginator types it needs, changes its return type, and adds the
/// `first` and `page` (or `after`) arguments unless already declared.
pub(super) fn paginate_field(
    doc: &mut DocumentAst,
    parent_type: &str,
    field_name: &str,
    pagination_type: PaginationType,
    default_count: Option<u64>,
) -> Result<(), SchemaBuildError> {
    let Some(field) = doc.field(parent_type, field_name) else {
        return Ok(());
    };
    let item_type = field.type_annotation().innermost_type_name().to_string();

    let (info_name, info_sdl) = pagination_type.info_type();
    if !doc.has_type(info_name) {
        doc.add_type_definition(ast_helpers::parse_type_definition(info_sdl)?)?;
    }

    let paginated_type = pagination_type.type_name_for(&item_type);
    if !doc.has_type(&paginated_type) {
        let sdl = match pagination_type {
            PaginationType::Connection => {
                let edge_type = format!("{item_type}Edge");
                if !doc.has_type(&edge_type) {
                    doc.add_type_definition(ast_helpers::parse_type_definition(&format!(
                        "\"An edge that contains a node of type {item_type} and a cursor.\"\n\
                        type {edge_type} {{ node: {item_type}! cursor: String! }}",
                    ))?)?;
                }
                format!(
                    "\"A paginated list of {item_type} edges.\"\n\
                    type {paginated_type} {{ pageInfo: {info_name}! edges: [{edge_type}!]! }}",
                )
            },
            PaginationType::Paginator | PaginationType::Simple => format!(
                "\"A paginated list of {item_type} items.\"\n\
                type {paginated_type} {{ paginatorInfo: {info_name}! data: [{item_type}!]! }}",
            ),
        };
        doc.add_type_definition(ast_helpers::parse_type_definition(&sdl)?)?;
    }

    let first_sdl = match default_count {
        Some(count) => format!("\"Limits number of fetched items.\" first: Int! = {count}"),
        None => "\"Limits number of fetched items.\" first: Int!".to_string(),
    };
    let cursor_sdl = match pagination_type {
        PaginationType::Connection => "\"A cursor after which elements are returned.\" after: String",
        _ => "\"The offset from which items are returned.\" page: Int",
    };
    let first = ast_helpers::parse_input_value_definition(&first_sdl)?;
    let cursor = ast_helpers::parse_input_value_definition(cursor_sdl)?;

    if let Some(field) = doc.field_mut(parent_type, field_name) {
        field.set_type_annotation(TypeAnnotation::named(paginated_type, false));
        let arguments = field.arguments_mut();
        for argument in [first, cursor] {
            if !arguments.contains_key(argument.name()) {
                arguments.insert(argument.name().to_string(), argument);
            }
        }
    }
    tracing::trace!("Paginated `{parent_type}.{field_name}` ({pagination_type:?})");
    Ok(())
}

/// The page a client asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct PageRequest {
    pub first: u64,
    pub page: u64,
}
impl PageRequest {
    pub fn from_args(
        args: &ArgumentSet,
        pagination_type: PaginationType,
        default_count: Option<u64>,
        max_count: Option<u64>,
    ) -> Result<Self, ResolveError> {
        let first = match args.json("first").and_then(|first| first.as_i64()) {
            Some(first) if first < 0 => return Err(ResolveError::User(format!(
                "Requested pagination amount must be non-negative, got {first}.",
            ))),
            Some(first) => first as u64,
            None => default_count.ok_or_else(|| ResolveError::User(
                "A pagination amount must be given through the `first` argument.".to_string(),
            ))?,
        };
        if let Some(max_count) = max_count {
            if first > max_count {
                return Err(ResolveError::User(format!(
                    "Maximum number of {max_count} requested items exceeded, got {first}. \
                    Fetch smaller chunks.",
                )));
            }
        }

        let page = match pagination_type {
            PaginationType::Connection => match args.json("after").and_then(|after| {
                after.as_str().map(str::to_string)
            }) {
                Some(after) if first > 0 => {
                    let end = decode_cursor(&after)
                        .and_then(|offset| offset.checked_add(first))
                        .ok_or_else(|| ResolveError::User(format!("Invalid cursor `{after}`.")))?;
                    end / first
                },
                _ => 1,
            },
            PaginationType::Paginator | PaginationType::Simple => args.json("page")
                .and_then(|page| page.as_u64())
                .unwrap_or(1),
        };

        let page = page.max(1);
        if Page::offset(page, first).is_none() {
            return Err(ResolveError::User(format!(
                "Requested page {page} is out of range.",
            )));
        }

        Ok(Self {
            first,
            page,
        })
    }

    /// Cuts this page out of an already loaded list.
    pub fn slice(&self, items: Vec<serde_json::Value>) -> Page {
        let total = items.len() as u64;
        let items = items.into_iter()
            .skip(Page::offset(self.page, self.first).unwrap_or(usize::MAX))
            .take(usize::try_from(self.first).unwrap_or(usize::MAX))
            .filter_map(|item| match item {
                serde_json::Value::Object(row) => Some(row),
                _ => None,
            })
            .collect();
        Page {
            current_page: self.page,
            items,
            per_page: self.first,
            total,
        }
    }
}

pub(super) fn encode_cursor(index: u64) -> String {
    base64::engine::general_purpose::STANDARD.encode(index.to_string())
}

pub(super) fn decode_cursor(cursor: &str) -> Option<u64> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(cursor).ok()?;
    String::from_utf8(bytes).ok()?.parse().ok()
}

/// Renders a page the way the field's paginated type expects it.
pub(super) fn page_to_json(
    pagination_type: PaginationType,
    page: Page,
    tag: impl Fn(serde_json::Value) -> serde_json::Value,
) -> serde_json::Value {
    let has_more_pages = page.has_more_pages();
    let last_page = page.last_page();
    let count = page.items.len() as u64;
    let first_item = (count > 0).then(|| {
        page.current_page.saturating_sub(1)
            .saturating_mul(page.per_page)
            .saturating_add(1)
    });
    let last_item = first_item.map(|first_item| first_item.saturating_add(count - 1));
    let items: Vec<serde_json::Value> = page.items.into_iter()
        .map(|row: Row| tag(serde_json::Value::Object(row)))
        .collect();

    match pagination_type {
        PaginationType::Connection => {
            let start = first_item.unwrap_or(0);
            let edges: Vec<serde_json::Value> = items.into_iter()
                .enumerate()
                .map(|(idx, node)| serde_json::json!({
                    "cursor": encode_cursor(start.saturating_add(idx as u64)),
                    "node": node,
                }))
                .collect();
            serde_json::json!({
                "edges": edges,
                "pageInfo": {
                    "count": count,
                    "currentPage": page.current_page,
                    "endCursor": last_item.map(encode_cursor),
                    "hasNextPage": has_more_pages,
                    "hasPreviousPage": page.current_page > 1,
                    "lastPage": last_page,
                    "startCursor": first_item.map(encode_cursor),
                    "total": page.total,
                },
            })
        },
        PaginationType::Paginator => serde_json::json!({
            "data": items,
            "paginatorInfo": {
                "count": count,
                "currentPage": page.current_page,
                "firstItem": first_item,
                "hasMorePages": has_more_pages,
                "lastItem": last_item,
                "lastPage": last_page,
                "perPage": page.per_page,
                "total": page.total,
            },
        }),
        PaginationType::Simple => serde_json::json!({
            "data": items,
            "paginatorInfo": {
                "count": count,
                "currentPage": page.current_page,
                "firstItem": first_item,
                "hasMorePages": has_more_pages,
                "lastItem": last_item,
                "perPage": page.per_page,
            },
        }),
    }
}
