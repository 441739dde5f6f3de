use crate::directives::DirectiveCapability;
use crate::document::DirectiveLocation;
use crate::loc;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DirectiveError {
    #[error("The `@{directive_name}` directive declares the {capability} capability but does not provide it")]
    CapabilityNotProvided {
        capability: DirectiveCapability,
        directive_name: String,
    },

    #[error(
        "`{node_name}` can only have one {capability} directive, but found \
        {directive_names:?}"
    )]
    ExclusiveCapabilityViolation {
        capability: DirectiveCapability,
        directive_names: Vec<String>,
        node_name: String,
    },

    #[error("Invalid `{argument_name}` argument to `@{directive_name}`: {message}")]
    InvalidArgument {
        argument_name: String,
        directive_name: String,
        message: String,
    },

    #[error("Invalid definition for the `@{directive_name}` directive: {message}")]
    InvalidDefinition {
        directive_name: String,
        message: String,
    },

    #[error("The `@{directive_name}` directive may not be used on {location_kind} (at {location})")]
    InvalidLocation {
        directive_name: String,
        location: loc::SourceLocation,
        location_kind: DirectiveLocation,
    },

    #[error("`@{directive_name}` on `{node_name}` {problem}")]
    InvalidManyMutation {
        directive_name: String,
        node_name: String,
        problem: ManyMutationProblem,
    },

    #[error("Invalid usage of `@{directive_name}` on `{node_name}`: {message}")]
    InvalidUsage {
        directive_name: String,
        message: String,
        node_name: String,
    },

    #[error("The `@{directive_name}` directive requires the `{argument_name}` argument (at {location})")]
    MissingRequiredArgument {
        argument_name: String,
        directive_name: String,
        location: loc::SourceLocation,
    },

    #[error("`{type_name}.{field_name}` has more than one field resolver directive: {directive_names:?}")]
    MultipleFieldResolvers {
        directive_names: Vec<String>,
        field_name: String,
        type_name: String,
    },

    #[error("The `@{directive_name}` directive is not repeatable but is used more than once (at {location})")]
    NotRepeatable {
        directive_name: String,
        location: loc::SourceLocation,
    },

    #[error("The `@{directive_name}` directive has no argument named `{argument_name}` (at {location})")]
    UnknownArgument {
        argument_name: String,
        directive_name: String,
        location: loc::SourceLocation,
    },

    #[error("No callable named `{callable}` is registered for `@{directive_name}`")]
    UnknownCallable {
        callable: String,
        directive_name: String,
    },

    #[error("No directive found for `@{directive_name}` (at {location})")]
    UnknownDirective {
        directive_name: String,
        location: loc::SourceLocation,
    },
}

/// Ways a field can be unfit for a many-mutation directive, which needs
/// exactly one argument holding a list of input objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManyMutationProblem {
    ArgumentNotList,
    ListItemNotInputObject,
    NotExactlyOneArgument,
}
impl ManyMutationProblem {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArgumentNotList => "ARGUMENT_NOT_LIST",
            Self::ListItemNotInputObject => "LIST_ITEM_NOT_INPUT_OBJECT",
            Self::NotExactlyOneArgument => "NOT_EXACTLY_ONE_ARGUMENT",
        }
    }
}
impl std::fmt::Display for ManyMutationProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::ArgumentNotList => "expects its argument to be a list",
            Self::ListItemNotInputObject => "expects the items of its argument list to be input objects",
            Self::NotExactlyOneArgument => "expects the field to have exactly one argument",
        };
        write!(f, "{message} ({})", self.code())
    }
}
