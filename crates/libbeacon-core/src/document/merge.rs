use crate::document::Node;
use crate::document::TypeDefinition;
use crate::schema::SchemaBuildError;
use indexmap::IndexMap;

type Result<T> = std::result::Result<T, SchemaBuildError>;

/// Merges `additions` into `original`, keyed by node name.
///
/// With `overwrite` set, an addition replaces the original node of the same
/// name in place. Without it, a name collision is an error. Merging an
/// empty list is a no-op.
pub fn merge_unique_node_list<T, I>(
    parent_name: &str,
    original: &mut IndexMap<String, T>,
    additions: I,
    overwrite: bool,
) -> Result<()>
where
    T: Node,
    I: IntoIterator<Item = T>,
{
    for addition in additions {
        if let Some(existing) = original.get(addition.name()) {
            if !overwrite {
                return Err(SchemaBuildError::DuplicateNodeDefinition {
                    def1: existing.location().clone(),
                    def2: addition.location().clone(),
                    node_name: addition.name().to_string(),
                    parent_name: parent_name.to_string(),
                });
            }
        }
        original.insert(addition.name().to_string(), addition);
    }
    Ok(())
}

/// Fails unless `extension` extends a type of the same kind as `base`.
pub fn assert_extension_matches_definition(
    base: &TypeDefinition,
    extension: &TypeDefinition,
) -> Result<()> {
    if base.kind() != extension.kind() {
        return Err(SchemaBuildError::InvalidExtensionType {
            extension_kind: extension.kind(),
            extension_loc: extension.location().clone(),
            type_kind: base.kind(),
            type_name: base.name().to_string(),
        });
    }
    Ok(())
}

/// Merges one extension into its base definition: directives are
/// appended, fields (or values, or members) are added, and any name
/// collision is an error.
pub(crate) fn extend_type_definition(
    base: &mut TypeDefinition,
    extension: TypeDefinition,
) -> Result<()> {
    assert_extension_matches_definition(base, &extension)?;
    let type_name = base.name().to_string();

    match (base, extension) {
        (TypeDefinition::Enum(base), TypeDefinition::Enum(ext)) => {
            base.directives.extend(ext.directives);
            merge_unique_node_list(&type_name, &mut base.values, ext.values.into_values(), false)?;
        },

        (TypeDefinition::InputObject(base), TypeDefinition::InputObject(ext)) => {
            base.directives.extend(ext.directives);
            merge_unique_node_list(&type_name, &mut base.fields, ext.fields.into_values(), false)?;
        },

        (TypeDefinition::Interface(base), TypeDefinition::Interface(ext))
        | (TypeDefinition::Object(base), TypeDefinition::Object(ext)) => {
            base.directives.extend(ext.directives);
            merge_unique_node_list(&type_name, &mut base.fields, ext.fields.into_values(), false)?;
            for iface in ext.interfaces {
                if !base.interfaces.contains(&iface) {
                    base.interfaces.push(iface);
                }
            }
        },

        (TypeDefinition::Scalar(base), TypeDefinition::Scalar(ext)) => {
            base.directives.extend(ext.directives);
        },

        (TypeDefinition::Union(base), TypeDefinition::Union(ext)) => {
            base.directives.extend(ext.directives);
            for member in ext.members {
                if !base.members.contains(&member) {
                    base.members.push(member);
                }
            }
        },

        // Kinds were checked above.
        _ => (),
    }

    Ok(())
}
