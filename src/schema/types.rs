//! Schema type definitions
//!
//! Supported output types:
//! - scalars: `ID`, `String`, `Int`
//! - objects: a registered entity type, by name
//! - lists and non-null wrappers around either
//!
//! Arguments are always scalars, optionally non-null.

use std::fmt;
use std::sync::Arc;

use super::resolver::Resolver;

/// Built-in scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Opaque identifier, serialized as a string
    Id,
    /// UTF-8 string
    String,
    /// 32-bit signed integer
    Int,
}

impl ScalarKind {
    /// Returns the GraphQL type name
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::Id => "ID",
            ScalarKind::String => "String",
            ScalarKind::Int => "Int",
        }
    }
}

/// Reference to a declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Scalar(ScalarKind),
    Object(&'static str),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn id() -> Self {
        TypeRef::Scalar(ScalarKind::Id)
    }

    pub fn string() -> Self {
        TypeRef::Scalar(ScalarKind::String)
    }

    pub fn int() -> Self {
        TypeRef::Scalar(ScalarKind::Int)
    }

    pub fn object(name: &'static str) -> Self {
        TypeRef::Object(name)
    }

    /// Wraps this type in a list
    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    /// Wraps this type in a non-null marker
    pub fn non_null(self) -> Self {
        match self {
            TypeRef::NonNull(_) => self,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// The type with the outermost non-null marker removed
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    /// The innermost named type
    pub fn named(&self) -> NamedType {
        match self {
            TypeRef::Scalar(kind) => NamedType::Scalar(*kind),
            TypeRef::Object(name) => NamedType::Object(name),
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(kind) => f.write_str(kind.type_name()),
            TypeRef::Object(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// The innermost named type of a [`TypeRef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedType {
    Scalar(ScalarKind),
    Object(&'static str),
}

impl NamedType {
    pub fn name(&self) -> &'static str {
        match self {
            NamedType::Scalar(kind) => kind.type_name(),
            NamedType::Object(name) => name,
        }
    }
}

/// Argument definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDef {
    pub name: &'static str,
    pub kind: ScalarKind,
    pub required: bool,
}

impl ArgDef {
    /// Required argument (`Kind!`)
    pub fn required(name: &'static str, kind: ScalarKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    /// Optional argument (`Kind`)
    pub fn optional(name: &'static str, kind: ScalarKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    /// The argument's declared type
    pub fn type_ref(&self) -> TypeRef {
        let ty = TypeRef::Scalar(self.kind);
        if self.required {
            ty.non_null()
        } else {
            ty
        }
    }
}

/// Field definition: declared type, arguments and the bound resolver
#[derive(Clone)]
pub struct FieldDef {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub ty: TypeRef,
    pub args: Vec<ArgDef>,
    pub resolver: Arc<dyn Resolver>,
}

impl FieldDef {
    pub fn new(name: &'static str, ty: TypeRef, resolver: impl Resolver + 'static) -> Self {
        Self {
            name,
            description: None,
            ty,
            args: Vec::new(),
            resolver: Arc::new(resolver),
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_arg(mut self, arg: ArgDef) -> Self {
        self.args.push(arg);
        self
    }

    pub fn arg(&self, name: &str) -> Option<&ArgDef> {
        self.args.iter().find(|a| a.name == name)
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Object type: an ordered field set
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub fields: Vec<FieldDef>,
}

impl ObjectType {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_display() {
        assert_eq!(TypeRef::id().non_null().to_string(), "ID!");
        assert_eq!(TypeRef::object("Post").list().to_string(), "[Post]");
        assert_eq!(
            TypeRef::object("Post").non_null().list().non_null().to_string(),
            "[Post!]!"
        );
    }

    #[test]
    fn test_non_null_is_idempotent() {
        let ty = TypeRef::string().non_null().non_null();
        assert_eq!(ty.to_string(), "String!");
        assert_eq!(ty.nullable(), &TypeRef::string());
    }

    #[test]
    fn test_named_type_unwraps_wrappers() {
        let ty = TypeRef::object("Hobby").non_null().list();
        assert_eq!(ty.named(), NamedType::Object("Hobby"));
        assert_eq!(TypeRef::int().named().name(), "Int");
    }

    #[test]
    fn test_arg_type_ref() {
        assert_eq!(ArgDef::required("id", ScalarKind::Id).type_ref().to_string(), "ID!");
        assert_eq!(
            ArgDef::optional("userId", ScalarKind::Id).type_ref().to_string(),
            "ID"
        );
    }
}
