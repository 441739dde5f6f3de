use crate::document::DirectiveDefinition;
use crate::document::DirectiveUsage;
use crate::document::DocumentAst;
use crate::document::FieldDefinition;
use crate::document::InputValueDefinition;
use crate::document::Node;
use crate::document::TypeDefinition;
use indexmap::IndexMap;
use std::fmt::Write;

/// Renders a [`DocumentAst`] back into SDL.
///
/// Output is deterministic: definitions are printed in document order and
/// printing the same document twice yields identical text.
#[derive(Clone, Debug)]
pub struct SchemaPrinter {
    include_directive_definitions: bool,
    include_directives: bool,
}
impl SchemaPrinter {
    pub fn new() -> Self {
        Self {
            include_directive_definitions: true,
            include_directives: true,
        }
    }

    /// Omit directive usages and definitions, as a client would see the
    /// schema.
    pub fn without_directives(mut self) -> Self {
        self.include_directive_definitions = false;
        self.include_directives = false;
        self
    }

    pub fn print(&self, doc: &DocumentAst) -> String {
        let mut blocks: Vec<String> = vec![];

        for ext in doc.schema_extensions() {
            let mut out = String::from("schema");
            self.print_directive_usages(&mut out, ext.directives());
            out.push_str(" {\n");
            for (op, type_name) in [
                ("query", ext.query()),
                ("mutation", ext.mutation()),
                ("subscription", ext.subscription()),
            ] {
                if let Some(type_name) = type_name {
                    let _ = writeln!(out, "  {op}: {type_name}");
                }
            }
            out.push('}');
            blocks.push(out);
        }

        if self.include_directive_definitions {
            for def in doc.directive_definitions().values() {
                blocks.push(self.print_directive_definition(def));
            }
        }

        for def in doc.types().values() {
            blocks.push(self.print_type_definition(def));
        }

        for exts in doc.type_extensions().values() {
            for ext in exts {
                blocks.push(format!("extend {}", self.print_type_definition(ext)));
            }
        }

        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }

    fn print_description(&self, out: &mut String, description: Option<&str>, indent: &str) {
        if let Some(description) = description {
            let _ = writeln!(out, "{indent}\"\"\"");
            for line in description.lines() {
                let _ = writeln!(out, "{indent}{}", line.replace("\"\"\"", "\\\"\"\""));
            }
            let _ = writeln!(out, "{indent}\"\"\"");
        }
    }

    fn print_directive_definition(&self, def: &DirectiveDefinition) -> String {
        let mut out = String::new();
        self.print_description(&mut out, def.description(), "");
        let _ = write!(out, "directive @{}", def.name());
        self.print_arguments(&mut out, def.arguments());
        if def.repeatable() {
            out.push_str(" repeatable");
        }
        let locations: Vec<&str> = def.locations().iter().map(|l| l.as_str()).collect();
        let _ = write!(out, " on {}", locations.join(" | "));
        out
    }

    fn print_directive_usages(&self, out: &mut String, usages: &[DirectiveUsage]) {
        if !self.include_directives {
            return;
        }
        for usage in usages {
            let _ = write!(out, " @{}", usage.name());
            if !usage.arguments().is_empty() {
                let args: Vec<String> = usage.arguments().iter()
                    .map(|(name, value)| format!("{name}: {value}"))
                    .collect();
                let _ = write!(out, "({})", args.join(", "));
            }
        }
    }

    fn print_arguments(&self, out: &mut String, arguments: &IndexMap<String, InputValueDefinition>) {
        if arguments.is_empty() {
            return;
        }
        let args: Vec<String> = arguments.values()
            .map(|arg| self.print_input_value(arg))
            .collect();
        let _ = write!(out, "({})", args.join(", "));
    }

    fn print_input_value(&self, input: &InputValueDefinition) -> String {
        let mut out = format!("{}: {}", input.name(), input.type_annotation());
        if let Some(default_value) = input.default_value() {
            let _ = write!(out, " = {default_value}");
        }
        self.print_directive_usages(&mut out, input.directives());
        out
    }

    fn print_field(&self, out: &mut String, field: &FieldDefinition) {
        self.print_description(out, field.description(), "  ");
        let _ = write!(out, "  {}", field.name());
        self.print_arguments(out, field.arguments());
        let _ = write!(out, ": {}", field.type_annotation());
        self.print_directive_usages(out, field.directives());
        out.push('\n');
    }

    fn print_type_definition(&self, def: &TypeDefinition) -> String {
        let mut out = String::new();
        self.print_description(&mut out, def.description(), "");
        let _ = write!(out, "{} {}", def.kind().keyword(), def.name());

        match def {
            TypeDefinition::Enum(enum_def) => {
                self.print_directive_usages(&mut out, def.directives());
                out.push_str(" {\n");
                for value in enum_def.values().values() {
                    self.print_description(&mut out, value.description(), "  ");
                    let _ = write!(out, "  {}", value.name());
                    self.print_directive_usages(&mut out, value.directives());
                    out.push('\n');
                }
                out.push('}');
            },

            TypeDefinition::InputObject(input_def) => {
                self.print_directive_usages(&mut out, def.directives());
                out.push_str(" {\n");
                for field in input_def.fields().values() {
                    self.print_description(&mut out, field.description(), "  ");
                    let _ = writeln!(out, "  {}", self.print_input_value(field));
                }
                out.push('}');
            },

            TypeDefinition::Interface(obj_def) | TypeDefinition::Object(obj_def) => {
                if !obj_def.interfaces().is_empty() {
                    let _ = write!(out, " implements {}", obj_def.interfaces().join(" & "));
                }
                self.print_directive_usages(&mut out, def.directives());
                out.push_str(" {\n");
                for field in obj_def.fields().values() {
                    self.print_field(&mut out, field);
                }
                out.push('}');
            },

            TypeDefinition::Scalar(_) => {
                self.print_directive_usages(&mut out, def.directives());
            },

            TypeDefinition::Union(union_def) => {
                self.print_directive_usages(&mut out, def.directives());
                let _ = write!(out, " = {}", union_def.members().join(" | "));
            },
        }

        out
    }
}
impl std::default::Default for SchemaPrinter {
    fn default() -> Self {
        Self::new()
    }
}
