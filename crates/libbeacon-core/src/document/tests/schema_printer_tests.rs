use crate::document::DocumentAst;
use crate::document::SchemaPrinter;
use crate::schema::SchemaBuildError;

type Result<T> = std::result::Result<T, SchemaBuildError>;

const SDL: &str = r#"
directive @upper on FIELD_DEFINITION

"""
A person.
"""
type User {
  name(format: String = "full"): String @upper
  tags: [String!]!
}

enum Role { ADMIN }
union Actor = User
"#;

#[test]
fn prints_definitions_in_document_order() -> Result<()> {
    let doc = DocumentAst::from_source(SDL, None)?;
    let printed = SchemaPrinter::new().print(&doc);
    assert_eq!(printed, concat!(
        "directive @upper on FIELD_DEFINITION\n",
        "\n",
        "\"\"\"\n",
        "A person.\n",
        "\"\"\"\n",
        "type User {\n",
        "  name(format: String = \"full\"): String @upper\n",
        "  tags: [String!]!\n",
        "}\n",
        "\n",
        "enum Role {\n",
        "  ADMIN\n",
        "}\n",
        "\n",
        "union Actor = User\n",
    ));
    Ok(())
}

#[test]
fn client_schema_omits_directives() -> Result<()> {
    let doc = DocumentAst::from_source(SDL, None)?;
    let printed = SchemaPrinter::new().without_directives().print(&doc);
    assert!(!printed.contains('@'));
    assert!(printed.contains("  name(format: String = \"full\"): String\n"));
    Ok(())
}

#[test]
fn printed_schema_parses_back_to_the_same_types() -> Result<()> {
    let doc = DocumentAst::from_source(SDL, None)?;
    let printed = SchemaPrinter::new().print(&doc);
    let reparsed = DocumentAst::from_source(&printed, None)?;
    assert_eq!(SchemaPrinter::new().print(&reparsed), printed);
    assert_eq!(reparsed.types().len(), doc.types().len());
    Ok(())
}
