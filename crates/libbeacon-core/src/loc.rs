use std::path::Path;
use std::path::PathBuf;

/// Very similar to graphql_parser's [Pos](graphql_parser::Pos), except it
/// includes a PathBuf to the file.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct FilePosition {
    pub col: usize,
    pub file: Option<PathBuf>,
    pub line: usize,
}
impl FilePosition {
    pub(crate) fn from_pos<P: AsRef<Path>>(
        file: Option<P>,
        pos: graphql_parser::Pos,
    ) -> Self {
        Self {
            col: pos.column,
            file: file.map(|f| f.as_ref().to_path_buf()),
            line: pos.line,
        }
    }
}
impl std::fmt::Display for FilePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file.display(), self.line, self.col),
            None => write!(f, "<str>:{}:{}", self.line, self.col),
        }
    }
}

/// Where a node of a [`DocumentAst`](crate::document::DocumentAst) came
/// from.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum SourceLocation {
    /// Defined implicitly by GraphQL itself (builtin scalars and
    /// directives).
    GraphQLBuiltIn,

    /// Written in SDL text.
    Schema(FilePosition),

    /// Added to the document by a schema manipulator while building.
    Synthesized,
}
impl SourceLocation {
    pub(crate) fn from_schema_ast_position<P: AsRef<Path>>(
        file: Option<P>,
        pos: &graphql_parser::Pos,
    ) -> Self {
        Self::Schema(FilePosition::from_pos(file, *pos))
    }
}
impl std::convert::From<FilePosition> for SourceLocation {
    fn from(value: FilePosition) -> Self {
        Self::Schema(value)
    }
}
impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GraphQLBuiltIn => write!(f, "<builtin>"),
            Self::Schema(pos) => write!(f, "{pos}"),
            Self::Synthesized => write!(f, "<synthesized>"),
        }
    }
}
