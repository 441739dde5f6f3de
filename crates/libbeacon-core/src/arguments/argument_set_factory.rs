use crate::arguments::Argument;
use crate::arguments::ArgumentSet;
use crate::arguments::ArgumentValue;
use crate::document::DocumentAst;
use crate::document::FieldDefinition;
use crate::document::InputValueDefinition;
use crate::document::Node;
use crate::document::TypeAnnotation;
use indexmap::IndexMap;

/// Turns raw argument values into [`ArgumentSet`] trees shaped after the
/// schema's input types.
pub struct ArgumentSetFactory<'a> {
    doc: &'a DocumentAst,
}
impl<'a> ArgumentSetFactory<'a> {
    pub fn new(doc: &'a DocumentAst) -> Self {
        Self {
            doc,
        }
    }

    pub fn from_field_arguments(
        &self,
        field: &FieldDefinition,
        raw: &serde_json::Map<String, serde_json::Value>,
    ) -> ArgumentSet {
        self.wrap_definitions(field.arguments(), raw)
    }

    /// Declared values missing from `raw` take their default value if they
    /// have one, otherwise they are recorded as undefined.
    fn wrap_definitions(
        &self,
        definitions: &IndexMap<String, InputValueDefinition>,
        raw: &serde_json::Map<String, serde_json::Value>,
    ) -> ArgumentSet {
        let mut set = ArgumentSet::new();
        for (name, def) in definitions.iter() {
            let raw_value = raw.get(name).cloned()
                .or_else(|| def.default_value().map(|value| value.to_json()));
            let Some(raw_value) = raw_value else {
                set.undefined.insert(name.clone(), Argument {
                    directives: def.directives().clone(),
                    type_annotation: Some(def.type_annotation().clone()),
                    value: ArgumentValue::Null,
                });
                continue;
            };
            set.arguments.insert(name.clone(), Argument {
                directives: def.directives().clone(),
                type_annotation: Some(def.type_annotation().clone()),
                value: self.wrap_value(def.type_annotation(), raw_value),
            });
        }
        set
    }

    fn wrap_value(&self, annotation: &TypeAnnotation, raw: serde_json::Value) -> ArgumentValue {
        if raw.is_null() {
            return ArgumentValue::Null;
        }

        match annotation {
            TypeAnnotation::List(list) => {
                let inner = list.inner_type_annotation();
                match raw {
                    serde_json::Value::Array(items) => ArgumentValue::List(
                        items.into_iter()
                            .map(|item| self.wrap_value(inner, item))
                            .collect(),
                    ),
                    // Input coercion: a single value given for a list type
                    // is a list of one.
                    single => ArgumentValue::List(vec![self.wrap_value(inner, single)]),
                }
            },

            TypeAnnotation::Named(named) => {
                let input_def = self.doc.type_definition(named.type_name())
                    .and_then(|def| def.as_input_object());
                match (input_def, raw) {
                    (Some(input_def), serde_json::Value::Object(fields)) => {
                        ArgumentValue::Nested(self.wrap_definitions(input_def.fields(), &fields))
                    },
                    (_, raw) => ArgumentValue::Scalar(raw),
                }
            },
        }
    }
}
