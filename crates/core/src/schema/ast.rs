//! Syntax tree for the declaration files read by [`super::DeclarationSchema`].
//!
//! Only the shapes openapi-typescript emits are modelled structurally. Anything
//! else (function types, mapped types, template literals, `typeof` queries) is
//! kept as normalized source text in [`TypeNode::Opaque`] so it can still be
//! rendered back faithfully.

use std::fmt;

use crate::ir::utils::{escape_js_string, quote_if_needed};

/// A parsed declaration file.
#[derive(Debug, Clone, Default)]
pub struct DeclarationFile {
    pub declarations: Vec<Declaration>,
}

impl DeclarationFile {
    /// Find a top-level declaration by name.
    pub fn find(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|decl| decl.name == name)
    }
}

/// A top-level `interface`, `type` or `enum` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub type_params: Vec<String>,
    pub docs: Option<String>,
    pub kind: DeclarationKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    Interface {
        extends: Vec<TypeNode>,
        body: ObjectType,
    },
    TypeAlias(TypeNode),
    Enum,
}

/// A property signature inside an interface or object type literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub optional: bool,
    pub readonly: bool,
    pub ty: TypeNode,
    pub docs: Option<String>,
}

/// `[key: K]: V`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSignature {
    pub key_name: String,
    pub key: TypeNode,
    pub value: TypeNode,
    pub readonly: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectType {
    pub members: Vec<Member>,
    pub index_signatures: Vec<IndexSignature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    Bigint,
    Symbol,
    Object,
}

impl Keyword {
    pub fn from_name(name: &str) -> Option<Self> {
        let keyword = match name {
            "any" => Keyword::Any,
            "unknown" => Keyword::Unknown,
            "never" => Keyword::Never,
            "void" => Keyword::Void,
            "undefined" => Keyword::Undefined,
            "null" => Keyword::Null,
            "string" => Keyword::String,
            "number" => Keyword::Number,
            "boolean" => Keyword::Boolean,
            "bigint" => Keyword::Bigint,
            "symbol" => Keyword::Symbol,
            "object" => Keyword::Object,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::Never => "never",
            Keyword::Void => "void",
            Keyword::Undefined => "undefined",
            Keyword::Null => "null",
            Keyword::String => "string",
            Keyword::Number => "number",
            Keyword::Boolean => "boolean",
            Keyword::Bigint => "bigint",
            Keyword::Symbol => "symbol",
            Keyword::Object => "object",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOperator {
    Keyof,
    Readonly,
    Unique,
}

impl TypeOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeOperator::Keyof => "keyof",
            TypeOperator::Readonly => "readonly",
            TypeOperator::Unique => "unique",
        }
    }
}

/// A type expression as written in the declaration file.
///
/// Parentheses are not kept; [`fmt::Display`] reinserts them where precedence
/// requires.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Keyword(Keyword),
    /// `Name` or `Name<Args>`, possibly namespace-qualified.
    Reference { name: String, args: Vec<TypeNode> },
    StringLiteral(String),
    NumberLiteral(String),
    BooleanLiteral(bool),
    Object(ObjectType),
    Array(Box<TypeNode>),
    Tuple(Vec<TypeNode>),
    /// `Object[Index]`
    IndexedAccess {
        object: Box<TypeNode>,
        index: Box<TypeNode>,
    },
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    Operator {
        operator: TypeOperator,
        operand: Box<TypeNode>,
    },
    Conditional {
        check: Box<TypeNode>,
        extends: Box<TypeNode>,
        then: Box<TypeNode>,
        otherwise: Box<TypeNode>,
    },
    /// Source text of a construct that is rendered but never inspected.
    Opaque(String),
}

impl TypeNode {
    pub fn reference(name: impl Into<String>) -> Self {
        TypeNode::Reference {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// The literal value when this is a string or number literal type.
    pub fn literal_key(&self) -> Option<&str> {
        match self {
            TypeNode::StringLiteral(value) | TypeNode::NumberLiteral(value) => Some(value),
            _ => None,
        }
    }

    fn is_compound(&self) -> bool {
        matches!(
            self,
            TypeNode::Union(_)
                | TypeNode::Intersection(_)
                | TypeNode::Conditional { .. }
                | TypeNode::Operator { .. }
        ) || matches!(self, TypeNode::Opaque(text) if text.contains("=>"))
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn grouped(node: &TypeNode, group: bool) -> String {
    if group {
        format!("({node})")
    } else {
        node.to_string()
    }
}

fn join(nodes: &[TypeNode], separator: &str, group: impl Fn(&TypeNode) -> bool) -> String {
    nodes
        .iter()
        .map(|node| grouped(node, group(node)))
        .collect::<Vec<_>>()
        .join(separator)
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Keyword(keyword) => f.write_str(keyword.as_str()),
            TypeNode::Reference { name, args } if args.is_empty() => f.write_str(name),
            TypeNode::Reference { name, args } => {
                write!(f, "{name}<{}>", join(args, ", ", |_| false))
            }
            TypeNode::StringLiteral(value) => write!(f, "\"{}\"", escape_js_string(value)),
            TypeNode::NumberLiteral(value) => f.write_str(value),
            TypeNode::BooleanLiteral(value) => write!(f, "{value}"),
            TypeNode::Object(object) => write!(f, "{object}"),
            TypeNode::Array(element) => write!(f, "{}[]", grouped(element, element.is_compound())),
            TypeNode::Tuple(elements) => write!(f, "[{}]", join(elements, ", ", |_| false)),
            TypeNode::IndexedAccess { object, index } => {
                write!(f, "{}[{index}]", grouped(object, object.is_compound()))
            }
            TypeNode::Union(members) => f.write_str(&join(members, " | ", |member| {
                matches!(member, TypeNode::Conditional { .. })
                    || matches!(member, TypeNode::Opaque(text) if text.contains("=>"))
            })),
            TypeNode::Intersection(members) => f.write_str(&join(members, " & ", |member| {
                matches!(member, TypeNode::Union(_) | TypeNode::Conditional { .. })
                    || matches!(member, TypeNode::Opaque(text) if text.contains("=>"))
            })),
            TypeNode::Operator { operator, operand } => {
                let group = matches!(
                    **operand,
                    TypeNode::Union(_) | TypeNode::Intersection(_) | TypeNode::Conditional { .. }
                );
                write!(f, "{} {}", operator.as_str(), grouped(operand, group))
            }
            TypeNode::Conditional {
                check,
                extends,
                then,
                otherwise,
            } => {
                let check_group = matches!(**check, TypeNode::Conditional { .. });
                let extends_group = matches!(**extends, TypeNode::Conditional { .. });
                write!(
                    f,
                    "{} extends {} ? {then} : {otherwise}",
                    grouped(check, check_group),
                    grouped(extends, extends_group)
                )
            }
            TypeNode::Opaque(text) => f.write_str(text),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.members.is_empty() && self.index_signatures.is_empty() {
            return f.write_str("{}");
        }
        let mut parts = Vec::with_capacity(self.members.len() + self.index_signatures.len());
        for member in &self.members {
            let readonly = if member.readonly { "readonly " } else { "" };
            let optional = if member.optional { "?" } else { "" };
            parts.push(format!(
                "{readonly}{}{optional}: {}",
                quote_if_needed(&member.name),
                member.ty
            ));
        }
        for signature in &self.index_signatures {
            let readonly = if signature.readonly { "readonly " } else { "" };
            parts.push(format!(
                "{readonly}[{}: {}]: {}",
                signature.key_name, signature.key, signature.value
            ));
        }
        write!(f, "{{ {} }}", parts.join("; "))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn member(name: &str, optional: bool, ty: TypeNode) -> Member {
        Member {
            name: name.into(),
            optional,
            readonly: false,
            ty,
            docs: None,
        }
    }

    #[test]
    fn test_render_object_quotes_non_identifier_keys() {
        let node = TypeNode::Object(ObjectType {
            members: vec![
                member("X-API-Version", true, TypeNode::Keyword(Keyword::String)),
                member("limit", false, TypeNode::Keyword(Keyword::Number)),
            ],
            index_signatures: vec![IndexSignature {
                key_name: "name".into(),
                key: TypeNode::Keyword(Keyword::String),
                value: TypeNode::Keyword(Keyword::Unknown),
                readonly: false,
            }],
        });
        assert_eq!(
            node.to_string(),
            "{ \"X-API-Version\"?: string; limit: number; [name: string]: unknown }"
        );
    }

    #[test]
    fn test_render_groups_by_precedence() {
        let union = TypeNode::Union(vec![
            TypeNode::Keyword(Keyword::String),
            TypeNode::Keyword(Keyword::Null),
        ]);
        assert_eq!(TypeNode::Array(Box::new(union.clone())).to_string(), "(string | null)[]");
        assert_eq!(
            TypeNode::Intersection(vec![union, TypeNode::reference("Extra")]).to_string(),
            "(string | null) & Extra"
        );
    }

    #[test]
    fn test_render_indexed_access() {
        let node = TypeNode::IndexedAccess {
            object: Box::new(TypeNode::reference("operations")),
            index: Box::new(TypeNode::StringLiteral("list-pets".into())),
        };
        assert_eq!(node.to_string(), "operations[\"list-pets\"]");
    }

    #[test]
    fn test_render_generic_reference() {
        let node = TypeNode::Reference {
            name: "Record".into(),
            args: vec![
                TypeNode::Keyword(Keyword::String),
                TypeNode::Keyword(Keyword::Never),
            ],
        };
        assert_eq!(node.to_string(), "Record<string, never>");
    }
}
