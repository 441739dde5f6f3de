use serde::Deserialize;
use serde::Serialize;

/// One segment of a response path.
#[derive(Clone, Debug, Deserialize, Hash, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}
impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(idx) => write!(f, "{idx}"),
            Self::Key(key) => write!(f, "{key}"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ErrorLocation {
    pub column: usize,
    pub line: usize,
}

/// An entry of a response's `errors` list.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GraphQLError {
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extensions: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<ErrorLocation>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
}
impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            extensions: serde_json::Map::new(),
            locations: vec![],
            message: message.into(),
            path: None,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.extensions.insert("category".to_string(), category.into());
        self
    }

    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.locations.push(ErrorLocation {
            column,
            line,
        });
        self
    }
}
