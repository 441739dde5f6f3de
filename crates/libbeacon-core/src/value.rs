use crate::ast;
use indexmap::IndexMap;

/// A literal value as written in SDL: a directive argument or an input
/// value's default.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum Value {
    Boolean(bool),
    Enum(String),
    Float(f64),
    Int(i64),
    List(Vec<Value>),
    Null,
    Object(IndexMap<String, Value>),
    String(String),
    Variable(String),
}
impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        if let Self::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        if let Self::Object(entries) = self {
            Some(entries)
        } else {
            None
        }
    }

    /// Strings and enum values both read as text; directive arguments
    /// such as `direction: ASC` are routinely written either way.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub(crate) fn from_ast(ast_value: &ast::schema::Value) -> Self {
        use graphql_parser::schema::Value as AstValue;
        match ast_value {
            AstValue::Variable(name) => Value::Variable(name.clone()),
            AstValue::Int(num) => Value::Int(num.as_i64().unwrap_or_default()),
            AstValue::Float(value) => Value::Float(*value),
            AstValue::String(value) => Value::String(value.clone()),
            AstValue::Boolean(value) => Value::Boolean(*value),
            AstValue::Null => Value::Null,
            AstValue::Enum(value) => Value::Enum(value.clone()),
            AstValue::List(values) =>
                Value::List(values.iter().map(Value::from_ast).collect()),
            AstValue::Object(entries) =>
                Value::Object(entries.iter().map(|(key, value)|
                    (key.clone(), Value::from_ast(value))
                ).collect()),
        }
    }

    /// Converts a JSON value into a literal. JSON has no notion of enum
    /// values, so strings stay strings.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(num) => match num.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(num.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) =>
                Value::List(items.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(entries) =>
                Value::Object(entries.iter().map(|(key, value)|
                    (key.clone(), Value::from_json(value))
                ).collect()),
        }
    }

    /// Variables have no JSON form and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Enum(s) | Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::List(items) =>
                serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Null | Value::Variable(_) => serde_json::Value::Null,
            Value::Object(entries) =>
                serde_json::Value::Object(entries.iter().map(|(key, value)|
                    (key.clone(), value.to_json())
                ).collect()),
        }
    }
}
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Enum(s) => write!(f, "{s}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            },
            Value::Null => write!(f, "null"),
            Value::Object(entries) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            },
            Value::String(s) => write!(f, "{}", serde_json::Value::String(s.clone())),
            Value::Variable(name) => write!(f, "${name}"),
        }
    }
}
