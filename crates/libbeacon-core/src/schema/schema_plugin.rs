use crate::document::DocumentAst;
use crate::schema::SchemaBuildError;

/// A hook into [`SchemaBuilder::build()`](crate::schema::SchemaBuilder::build).
///
/// A plugin may contribute SDL that is parsed alongside the user's schema,
/// and may edit the document once every directive pass has run (but before
/// directive usages are validated).
pub trait SchemaPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn additional_sdl(&self) -> Option<String> {
        None
    }

    fn manipulate(&self, _doc: &mut DocumentAst) -> Result<(), SchemaBuildError> {
        Ok(())
    }
}
