//! Schema definition language rendering

use std::fmt::Write;

use super::assembly::Schema;
use super::types::{FieldDef, ObjectType};

/// Renders the schema as SDL: the schema block, the root types, then the
/// entity types in registration order.
pub fn print_schema(schema: &Schema) -> String {
    let mut out = String::new();

    out.push_str("schema {\n");
    let _ = writeln!(out, "  query: {}", schema.query_type().name);
    let _ = writeln!(out, "  mutation: {}", schema.mutation_type().name);
    out.push_str("}\n");

    let objects = std::iter::once(schema.query_type())
        .chain(std::iter::once(schema.mutation_type()))
        .chain(schema.types().iter());
    for object in objects {
        out.push('\n');
        print_object(&mut out, object);
    }

    out
}

fn print_object(out: &mut String, object: &ObjectType) {
    if let Some(description) = object.description {
        let _ = writeln!(out, "\"\"\"{}\"\"\"", description);
    }
    let _ = writeln!(out, "type {} {{", object.name);
    for field in &object.fields {
        print_field(out, field);
    }
    out.push_str("}\n");
}

fn print_field(out: &mut String, field: &FieldDef) {
    if let Some(description) = field.description {
        let _ = writeln!(out, "  \"\"\"{}\"\"\"", description);
    }
    out.push_str("  ");
    out.push_str(field.name);
    if !field.args.is_empty() {
        let args: Vec<String> = field
            .args
            .iter()
            .map(|arg| format!("{}: {}", arg.name, arg.type_ref()))
            .collect();
        let _ = write!(out, "({})", args.join(", "));
    }
    let _ = writeln!(out, ": {}", field.ty);
}
