use crate::directives::BuilderContext;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::document::DirectiveUsage;
use crate::document::TypeAnnotation;
use crate::resolve::ResolveError;
use crate::store::QueryBuilder;
use indexmap::IndexMap;

/// The value of one client-supplied argument, shaped after its input type.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentValue {
    List(Vec<ArgumentValue>),
    Nested(ArgumentSet),
    Null,
    Scalar(serde_json::Value),
}
impl ArgumentValue {
    /// Wraps a value that has no input type behind it (e.g. an injected
    /// context value). Objects become nested sets.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Array(items) => Self::List(
                items.into_iter().map(Self::from_json).collect(),
            ),
            serde_json::Value::Object(fields) => {
                let mut set = ArgumentSet::new();
                for (name, value) in fields {
                    set.insert(name, Argument::new(Self::from_json(value)));
                }
                Self::Nested(set)
            },
            scalar => Self::Scalar(scalar),
        }
    }

    pub fn as_list(&self) -> Option<&Vec<ArgumentValue>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&ArgumentSet> {
        match self {
            Self::Nested(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(|value| value.as_str())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Applies `f` to every non-list value, descending into lists.
    pub fn map_leaves(self, f: &mut impl FnMut(ArgumentValue) -> ArgumentValue) -> Self {
        match self {
            Self::List(items) => Self::List(
                items.into_iter().map(|item| item.map_leaves(f)).collect(),
            ),
            value => f(value),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::List(items) => serde_json::Value::Array(
                items.iter().map(|item| item.to_json()).collect(),
            ),
            Self::Nested(set) => serde_json::Value::Object(set.to_json()),
            Self::Null => serde_json::Value::Null,
            Self::Scalar(value) => value.clone(),
        }
    }
}

/// One argument (or input object field) together with the directives
/// declared on its definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub directives: Vec<DirectiveUsage>,
    pub type_annotation: Option<TypeAnnotation>,
    pub value: ArgumentValue,
}
impl Argument {
    pub fn new(value: ArgumentValue) -> Self {
        Self {
            directives: vec![],
            type_annotation: None,
            value,
        }
    }

    pub fn has_directive(&self, name: &str) -> bool {
        self.directives.iter().any(|usage| usage.name() == name)
    }
}

/// The arguments of one field, or the fields of one input object value.
///
/// Arguments the client left out are kept apart from the given ones so
/// that an omitted argument can be told from an explicit `null`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArgumentSet {
    pub(crate) arguments: IndexMap<String, Argument>,
    pub(crate) undefined: IndexMap<String, Argument>,
}
impl ArgumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value at a dotted path such as `input.user.id`, creating
    /// intermediate nested sets as needed.
    pub fn add_value(&mut self, path: &str, value: serde_json::Value) {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        self.undefined.shift_remove(head);

        let Some(rest) = rest else {
            let argument = self.arguments.entry(head.to_string())
                .or_insert_with(|| Argument::new(ArgumentValue::Null));
            argument.value = ArgumentValue::from_json(value);
            return;
        };

        let argument = self.arguments.entry(head.to_string())
            .or_insert_with(|| Argument::new(ArgumentValue::Nested(ArgumentSet::new())));
        if !matches!(argument.value, ArgumentValue::Nested(_)) {
            argument.value = ArgumentValue::Nested(ArgumentSet::new());
        }
        if let ArgumentValue::Nested(nested) = &mut argument.value {
            nested.add_value(rest, value);
        }
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.get(name)
    }

    pub fn argument_mut(&mut self, name: &str) -> Option<&mut Argument> {
        self.arguments.get_mut(name)
    }

    pub fn arguments(&self) -> &IndexMap<String, Argument> {
        &self.arguments
    }

    pub fn contains(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    /// Applies every argument builder directive in this set to `builder`,
    /// in argument order, then recurses into nested input values.
    pub fn enhance_builder(
        &self,
        builder: &mut dyn QueryBuilder,
        ctx: &BuilderContext<'_>,
    ) -> Result<(), ResolveError> {
        let registry = ctx.schema.registry();
        for (name, argument) in self.arguments.iter() {
            let arg_builders = registry.associated_of_type(
                &argument.directives,
                DirectiveCapability::ArgBuilder,
            )?;
            for bound in arg_builders {
                let arg_builder = bound.directive().as_arg_builder()
                    .ok_or_else(|| DirectiveError::CapabilityNotProvided {
                        capability: DirectiveCapability::ArgBuilder,
                        directive_name: bound.usage().name().to_string(),
                    })?;
                arg_builder.handle_builder(bound.usage(), builder, name, &argument.value, ctx)?;
            }

            match &argument.value {
                ArgumentValue::Nested(nested) => nested.enhance_builder(builder, ctx)?,
                ArgumentValue::List(items) => {
                    for item in items {
                        if let ArgumentValue::Nested(nested) = item {
                            nested.enhance_builder(builder, ctx)?;
                        }
                    }
                },
                _ => (),
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, name: impl Into<String>, argument: Argument) {
        let name = name.into();
        self.undefined.shift_remove(&name);
        self.arguments.insert(name, argument);
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn is_undefined(&self, name: &str) -> bool {
        self.undefined.contains_key(name)
    }

    /// The JSON value of `name`, if given.
    pub fn json(&self, name: &str) -> Option<serde_json::Value> {
        self.arguments.get(name).map(|argument| argument.value.to_json())
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn remove(&mut self, name: &str) -> Option<Argument> {
        self.arguments.shift_remove(name)
    }

    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.arguments.iter()
            .map(|(name, argument)| (name.clone(), argument.value.to_json()))
            .collect()
    }

    pub fn undefined_argument_names(&self) -> impl Iterator<Item = &str> {
        self.undefined.keys().map(|name| name.as_str())
    }

    pub fn value(&self, name: &str) -> Option<&ArgumentValue> {
        self.arguments.get(name).map(|argument| &argument.value)
    }
}
