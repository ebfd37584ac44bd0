//! Read-only access to the type-level structure of an input schema.
//!
//! The endpoint extractor only talks to [`SchemaAccess`]; [`DeclarationSchema`]
//! is the implementation backed by the bundled TypeScript declaration reader.

mod ast;
mod parser;
mod resolve;

use std::fmt::Debug;

pub use ast::{Declaration, DeclarationFile, DeclarationKind, Keyword, Member, ObjectType, TypeNode};
pub use parser::parse_declarations;
pub use resolve::DeclarationSchema;

/// A named member of an object-like type.
#[derive(Debug, Clone, PartialEq)]
pub struct Property<T> {
    pub name: String,
    pub optional: bool,
    pub ty: T,
    /// JSDoc body of the member declaration, decoration stripped.
    pub docs: Option<String>,
    /// False when the member only exists through a mapped type such as
    /// `Record<"get", T>` and has no property signature of its own.
    pub declared: bool,
}

/// `Object["key"]` as written in the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedAccess {
    pub object: String,
    pub key: String,
}

/// Capability set the generator needs from a schema.
pub trait SchemaAccess {
    type Type: Clone + Debug;

    /// Whether any top-level declaration (interface, alias or enum) has this name.
    fn has_declaration(&self, name: &str) -> bool;

    /// Find a top-level interface declaration by name.
    fn find_interface(&self, name: &str) -> Option<Self::Type>;

    /// Members of an object-like type, in declaration order. Non-object and
    /// unresolvable types have none.
    fn properties(&self, ty: &Self::Type) -> Vec<Property<Self::Type>>;

    fn property(&self, ty: &Self::Type, name: &str) -> Option<Property<Self::Type>> {
        self.properties(ty).into_iter().find(|prop| prop.name == name)
    }

    /// Whether the type resolves to `never`.
    fn is_never(&self, ty: &Self::Type) -> bool;

    /// Source-level text of the type as written.
    fn render(&self, ty: &Self::Type) -> String;

    /// The written type when it is an indexed access keyed by a string literal.
    fn indexed_access(&self, ty: &Self::Type) -> Option<IndexedAccess>;
}
