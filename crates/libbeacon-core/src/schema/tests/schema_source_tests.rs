use crate::schema::SchemaBuildError;
use crate::schema::SchemaBuilder;
use crate::schema::SchemaSource;
use crate::test::builtins;
use crate::test::temp_dir;
use std::path::Path;

type Result<T> = std::result::Result<T, SchemaBuildError>;

fn write(dir: &Path, file: &str, content: &str) {
    let path = dir.join(file);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

#[test]
fn imports_are_expanded_in_place() -> Result<()> {
    let dir = temp_dir("source-imports");
    write(&dir, "schema.graphql", "#import user.graphql\ntype Query { me: User }\n");
    write(&dir, "user.graphql", "type User { id: ID! }\n");

    let sdl = SchemaSource::new(dir.join("schema.graphql")).read()?;
    assert_eq!(sdl, "type User { id: ID! }\ntype Query { me: User }\n");
    Ok(())
}

#[test]
fn glob_imports_include_matches_in_sorted_order() -> Result<()> {
    let dir = temp_dir("source-globs");
    write(&dir, "schema.graphql", "#import types/*.graphql\ntype Query { ping: Boolean }\n");
    write(&dir, "types/b.graphql", "scalar B\n");
    write(&dir, "types/a.graphql", "scalar A\n");
    write(&dir, "types/notes.txt", "not sdl\n");

    let files = SchemaSource::new(dir.join("schema.graphql")).files()?;
    let names: Vec<String> = files.iter()
        .filter_map(|file| file.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["schema.graphql", "a.graphql", "b.graphql"]);
    Ok(())
}

#[test]
fn import_cycles_include_each_file_once() -> Result<()> {
    let dir = temp_dir("source-cycle");
    write(&dir, "a.graphql", "#import b.graphql\ntype Query { a: Int }\n");
    write(&dir, "b.graphql", "#import a.graphql\nscalar Date\n");

    let sdl = SchemaSource::new(dir.join("a.graphql")).read()?;
    assert_eq!(sdl, "scalar Date\ntype Query { a: Int }\n");
    Ok(())
}

#[test]
fn missing_imports_fail() {
    let dir = temp_dir("source-missing");
    write(&dir, "schema.graphql", "#import nowhere.graphql\n");
    let result = SchemaSource::new(dir.join("schema.graphql")).read();
    assert!(matches!(result, Err(SchemaBuildError::SchemaFileReadError(_))));
}

#[test]
fn builder_loads_files_through_their_imports() -> Result<()> {
    let dir = temp_dir("source-builder");
    write(&dir, "schema.graphql", "#import user.graphql\ntype Query { me: User }\n");
    write(&dir, "user.graphql", "type User { id: ID! }\n");

    let doc = SchemaBuilder::new(builtins())
        .load_file(dir.join("schema.graphql"))?
        .build()?;
    assert!(doc.field("Query", "me").is_some());
    assert!(doc.has_type("User"));
    Ok(())
}
