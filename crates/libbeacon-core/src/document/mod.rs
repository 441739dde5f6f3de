pub mod ast_helpers;
mod directive_definition;
mod directive_usage;
mod document_ast;
mod enum_value_definition;
mod field_definition;
mod input_value_definition;
mod merge;
mod node;
mod schema_printer;
mod type_annotation;
mod type_definition;

pub use directive_definition::DirectiveDefinition;
pub use directive_definition::DirectiveLocation;
pub use directive_usage::DirectiveUsage;
pub use document_ast::content_hash;
pub use document_ast::DocumentAst;
pub use document_ast::SchemaExtension;
pub use document_ast::BUILTIN_SCALAR_NAMES;
pub use enum_value_definition::EnumValueDefinition;
pub use field_definition::FieldDefinition;
pub use input_value_definition::InputValueDefinition;
pub(crate) use merge::extend_type_definition;
pub use merge::assert_extension_matches_definition;
pub use merge::merge_unique_node_list;
pub use node::Node;
pub use schema_printer::SchemaPrinter;
pub use type_annotation::ListTypeAnnotation;
pub use type_annotation::NamedTypeAnnotation;
pub use type_annotation::TypeAnnotation;
pub use type_definition::EnumTypeDefinition;
pub use type_definition::InputObjectTypeDefinition;
pub use type_definition::ObjectOrInterfaceTypeDefinition;
pub use type_definition::ScalarTypeDefinition;
pub use type_definition::TypeDefinition;
pub use type_definition::TypeKind;
pub use type_definition::UnionTypeDefinition;

#[cfg(test)]
mod tests;
