use crate::directives::DirectiveError;
use crate::execution::GraphQLError;
use crate::execution::PathSegment;
use crate::store::StoreError;
use indexmap::IndexMap;
use thiserror::Error;

/// A failure while resolving a single field.
///
/// Resolve errors null out the failing field (and propagate per GraphQL's
/// non-null rules) and are reported in the response's `errors` list. They
/// never abort sibling fields.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("Unauthenticated.")]
    Authentication {
        guards: Vec<String>,
    },

    #[error("This action is unauthorized.")]
    Authorization {
        ability: String,
    },

    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error("Internal server error")]
    Internal(String),

    #[error("No query results for model [{model}] {key}")]
    NotFound {
        key: String,
        model: String,
    },

    #[error("Rate limit for {key} exceeded. Try again in {retry_after_secs} seconds.")]
    RateLimited {
        key: String,
        retry_after_secs: u64,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    User(String),

    #[error("Validation failed for the field [{field}].")]
    Validation {
        /// Messages keyed by dotted argument path, e.g. `input.email`.
        errors: IndexMap<String, Vec<String>>,
        field: String,
    },
}
impl ResolveError {
    /// The `extensions.category` reported to clients.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication",
            Self::Authorization { .. } => "authorization",
            Self::Directive(_) | Self::Internal(_) | Self::Store(_) => "internal",
            Self::NotFound { .. } => "not-found",
            Self::RateLimited { .. } => "rate-limited",
            Self::User(_) => "user",
            Self::Validation { .. } => "validation",
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    pub fn to_graphql_error(&self, path: Option<Vec<PathSegment>>) -> GraphQLError {
        let mut extensions = serde_json::Map::new();
        extensions.insert("category".to_string(), self.category().into());
        match self {
            Self::Authentication { guards } => {
                extensions.insert("guards".to_string(), serde_json::json!(guards));
            },
            Self::RateLimited { retry_after_secs, .. } => {
                extensions.insert("retryAfter".to_string(), (*retry_after_secs).into());
            },
            Self::Validation { errors, .. } => {
                extensions.insert("validation".to_string(), serde_json::json!(errors));
            },
            _ => (),
        }

        GraphQLError {
            extensions,
            locations: vec![],
            message: self.to_string(),
            path,
        }
    }
}
