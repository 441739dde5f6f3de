use crate::execution::GraphQLError;
use serde::Deserialize;
use serde::Serialize;

/// An operation to execute, as posted by a client.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    #[serde(default)]
    pub operation_name: Option<String>,
    pub query: String,
    #[serde(default)]
    pub variables: serde_json::Map<String, serde_json::Value>,
}
impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn with_variables(mut self, variables: serde_json::Value) -> Self {
        if let serde_json::Value::Object(variables) = variables {
            self.variables = variables;
        }
        self
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GraphQLResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
}
impl GraphQLResponse {
    /// A response for a request rejected before execution started.
    pub fn from_errors(errors: Vec<GraphQLError>) -> Self {
        Self {
            data: None,
            errors,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
