use crate::ast;

/// The annotated type of a [`FieldDefinition`](crate::document::FieldDefinition)
/// or an [`InputValueDefinition`](crate::document::InputValueDefinition).
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum TypeAnnotation {
    List(ListTypeAnnotation),
    Named(NamedTypeAnnotation),
}
impl TypeAnnotation {
    /// Unwrap the [`ListTypeAnnotation`] if this annotation is one.
    pub fn as_list_annotation(&self) -> Option<&ListTypeAnnotation> {
        if let Self::List(annot) = self {
            Some(annot)
        } else {
            None
        }
    }

    /// Unwrap the [`NamedTypeAnnotation`] if this annotation is one.
    pub fn as_named_annotation(&self) -> Option<&NamedTypeAnnotation> {
        if let Self::Named(annot) = self {
            Some(annot)
        } else {
            None
        }
    }

    pub(crate) fn from_ast_type(ast_type: &ast::schema::Type) -> Self {
        Self::from_ast_type_impl(ast_type, /* nullable = */ true)
    }

    fn from_ast_type_impl(ast_type: &ast::schema::Type, nullable: bool) -> Self {
        use graphql_parser::schema::Type as AstType;
        match ast_type {
            AstType::ListType(inner) =>
                Self::List(ListTypeAnnotation {
                    inner: Box::new(Self::from_ast_type_impl(inner, true)),
                    nullable,
                }),

            AstType::NamedType(name) =>
                Self::Named(NamedTypeAnnotation {
                    name: name.clone(),
                    nullable,
                }),

            AstType::NonNullType(inner) =>
                Self::from_ast_type_impl(inner, false),
        }
    }

    /// Recursively unwrap this [`TypeAnnotation`] and return the name of the
    /// inner-most named type.
    pub fn innermost_type_name(&self) -> &str {
        match self {
            TypeAnnotation::List(ListTypeAnnotation { inner, .. }) =>
                inner.innermost_type_name(),
            TypeAnnotation::Named(NamedTypeAnnotation { name, .. }) =>
                name.as_str(),
        }
    }

    /// Indicates if the outermost layer of this annotation is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Shorthand for a [`TypeAnnotation::List`].
    pub fn list(inner: TypeAnnotation, nullable: bool) -> Self {
        Self::List(ListTypeAnnotation {
            inner: Box::new(inner),
            nullable,
        })
    }

    /// Shorthand for a [`TypeAnnotation::Named`].
    pub fn named(name: impl Into<String>, nullable: bool) -> Self {
        Self::Named(NamedTypeAnnotation {
            name: name.into(),
            nullable,
        })
    }

    /// Indicates if this [`TypeAnnotation`] is [nullable or
    /// non-nullable](https://spec.graphql.org/October2021/#sec-Non-Null).
    pub fn nullable(&self) -> bool {
        match self {
            TypeAnnotation::List(ListTypeAnnotation { nullable, .. }) => *nullable,
            TypeAnnotation::Named(NamedTypeAnnotation { nullable, .. }) => *nullable,
        }
    }

    /// Returns a copy of this annotation whose outermost layer has the given
    /// nullability.
    pub fn with_nullable(&self, nullable: bool) -> Self {
        match self {
            TypeAnnotation::List(annot) => Self::List(ListTypeAnnotation {
                inner: annot.inner.clone(),
                nullable,
            }),
            TypeAnnotation::Named(annot) => Self::Named(NamedTypeAnnotation {
                name: annot.name.clone(),
                nullable,
            }),
        }
    }
}
impl std::convert::From<ListTypeAnnotation> for TypeAnnotation {
    fn from(value: ListTypeAnnotation) -> Self {
        Self::List(value)
    }
}
impl std::convert::From<NamedTypeAnnotation> for TypeAnnotation {
    fn from(value: NamedTypeAnnotation) -> Self {
        Self::Named(value)
    }
}
impl std::fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bang = if self.nullable() { "" } else { "!" };
        match self {
            TypeAnnotation::List(annot) => write!(f, "[{}]{bang}", annot.inner),
            TypeAnnotation::Named(annot) => write!(f, "{}{bang}", annot.name),
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ListTypeAnnotation {
    pub(crate) inner: Box<TypeAnnotation>,
    pub(crate) nullable: bool,
}
impl ListTypeAnnotation {
    pub fn inner_type_annotation(&self) -> &TypeAnnotation {
        &self.inner
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NamedTypeAnnotation {
    pub(crate) name: String,
    pub(crate) nullable: bool,
}
impl NamedTypeAnnotation {
    pub fn type_name(&self) -> &str {
        self.name.as_str()
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }
}
