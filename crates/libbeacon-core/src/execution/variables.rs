use crate::ast;

type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Converts a literal from an operation, substituting variables.
pub(crate) fn value_to_json(value: &ast::query::Value, variables: &JsonMap) -> serde_json::Value {
    use graphql_parser::query::Value as AstValue;
    match value {
        AstValue::Variable(name) => variables.get(name)
            .cloned()
            .unwrap_or(serde_json::Value::Null),
        AstValue::Int(num) => num.as_i64()
            .map(serde_json::Value::from)
            .unwrap_or(serde_json::Value::Null),
        AstValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        AstValue::String(s) | AstValue::Enum(s) => serde_json::Value::String(s.clone()),
        AstValue::Boolean(b) => serde_json::Value::Bool(*b),
        AstValue::Null => serde_json::Value::Null,
        AstValue::List(items) => serde_json::Value::Array(
            items.iter().map(|item| value_to_json(item, variables)).collect(),
        ),
        AstValue::Object(fields) => serde_json::Value::Object(
            fields.iter()
                .map(|(name, value)| (name.clone(), value_to_json(value, variables)))
                .collect(),
        ),
    }
}

pub(crate) fn arguments_to_json(
    arguments: &[(String, ast::query::Value)],
    variables: &JsonMap,
) -> JsonMap {
    arguments.iter()
        .filter_map(|(name, value)| {
            // An unset variable leaves the argument out entirely.
            match value {
                graphql_parser::query::Value::Variable(var) if !variables.contains_key(var) => {
                    return None;
                },
                _ => (),
            }
            Some((name.clone(), value_to_json(value, variables)))
        })
        .collect()
}

/// Evaluates `@skip` and `@include`.
pub(crate) fn should_include(directives: &[ast::query::Directive], variables: &JsonMap) -> bool {
    for directive in directives {
        let condition = directive.arguments.iter()
            .find(|(name, _)| name == "if")
            .map(|(_, value)| value_to_json(value, variables))
            .and_then(|value| value.as_bool());
        match (directive.name.as_str(), condition) {
            ("skip", Some(true)) => return false,
            ("include", Some(false)) => return false,
            _ => (),
        }
    }
    true
}

/// Applies defaults and checks that required variables were given.
pub(crate) fn coerce_variables(
    definitions: &[ast::query::VariableDefinition],
    given: &JsonMap,
) -> Result<JsonMap, String> {
    let mut coerced = JsonMap::new();
    for def in definitions {
        match given.get(&def.name) {
            Some(value) => {
                coerced.insert(def.name.clone(), value.clone());
            },
            None => match &def.default_value {
                Some(default) => {
                    coerced.insert(def.name.clone(), value_to_json(default, &JsonMap::new()));
                },
                None if matches!(def.var_type, graphql_parser::query::Type::NonNullType(_)) => {
                    return Err(format!(
                        "Variable \"${}\" of required type \"{}\" was not provided.",
                        def.name,
                        def.var_type,
                    ));
                },
                None => (),
            },
        }
    }
    Ok(coerced)
}
