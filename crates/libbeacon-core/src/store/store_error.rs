use thiserror::Error;

/// A failure reported by a [`DataStore`](crate::store::DataStore) or one of
/// its query builders.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Store backend failure: {0}")]
    Backend(String),

    #[error("Invalid value for `{model}.{column}`: {message}")]
    InvalidValue {
        column: String,
        message: String,
        model: String,
    },

    #[error("Attempted to {operation} with no open transaction")]
    NoTransaction {
        operation: &'static str,
    },

    #[error("No row of `{model}` has key {key}")]
    RowNotFound {
        key: String,
        model: String,
    },

    #[error("Unknown model `{0}`")]
    UnknownModel(String),

    #[error("`{model}` has no relation named `{relation}`")]
    UnknownRelation {
        model: String,
        relation: String,
    },

    #[error("`{model}` has no scope named `{scope}`")]
    UnknownScope {
        model: String,
        scope: String,
    },
}
