//! [`SchemaAccess`] over a parsed declaration file.

use tracing::debug;

use super::ast::{
    DeclarationFile, DeclarationKind, Keyword, ObjectType, TypeNode, TypeOperator,
};
use super::parser::parse_declarations;
use super::{IndexedAccess, Property, SchemaAccess};
use crate::error::GenerateError;

/// Resolution depth after which a type is treated as opaque. Keeps cyclic
/// aliases from recursing forever.
const MAX_DEPTH: usize = 32;

type Members = Vec<Property<TypeNode>>;

/// A declaration file ready to be queried.
#[derive(Debug, Clone, Default)]
pub struct DeclarationSchema {
    file: DeclarationFile,
}

impl DeclarationSchema {
    pub fn new(file: DeclarationFile) -> Self {
        Self { file }
    }

    /// Parse declaration source text.
    pub fn parse(source: &str) -> Result<Self, GenerateError> {
        parse_declarations(source).map(Self::new)
    }

    pub fn file(&self) -> &DeclarationFile {
        &self.file
    }

    fn members(&self, ty: &TypeNode, depth: usize) -> Option<Members> {
        if depth > MAX_DEPTH {
            debug!(ty = %ty, "Type resolution depth exceeded.");
            return None;
        }
        match ty {
            TypeNode::Object(object) => Some(declared_members(object)),
            TypeNode::Keyword(Keyword::Never) => Some(Vec::new()),
            TypeNode::Reference { name, args } => self.reference_members(name, args, depth),
            TypeNode::IndexedAccess { object, index } => {
                let key = index.literal_key()?;
                let prop = self
                    .members(object, depth + 1)?
                    .into_iter()
                    .find(|prop| prop.name == key)?;
                self.members(&prop.ty, depth + 1)
            }
            TypeNode::Intersection(parts) => {
                let mut merged: Members = Vec::new();
                let mut resolved = false;
                for part in parts {
                    let Some(members) = self.members(part, depth + 1) else {
                        continue;
                    };
                    resolved = true;
                    for member in members {
                        if !merged.iter().any(|existing| existing.name == member.name) {
                            merged.push(member);
                        }
                    }
                }
                resolved.then_some(merged)
            }
            TypeNode::Union(options) => {
                let mut candidates = options
                    .iter()
                    .filter(|option| !self.is_absent(option, depth + 1));
                match (candidates.next(), candidates.next()) {
                    (Some(single), None) => self.members(single, depth + 1),
                    _ => None,
                }
            }
            TypeNode::Operator {
                operator: TypeOperator::Readonly,
                operand,
            } => self.members(operand, depth + 1),
            _ => None,
        }
    }

    fn reference_members(&self, name: &str, args: &[TypeNode], depth: usize) -> Option<Members> {
        match (name, args) {
            ("Record", [keys, value]) => {
                let Some(keys) = self.literal_keys(keys, depth + 1) else {
                    // string- or number-keyed records have no named members
                    return Some(Vec::new());
                };
                Some(
                    keys.into_iter()
                        .map(|name| Property {
                            name,
                            optional: false,
                            ty: value.clone(),
                            docs: None,
                            declared: false,
                        })
                        .collect(),
                )
            }
            ("Partial" | "Required" | "Readonly" | "NonNullable", [inner]) => {
                let mut members = self.members(inner, depth + 1)?;
                for member in &mut members {
                    match name {
                        "Partial" => member.optional = true,
                        "Required" => member.optional = false,
                        _ => {}
                    }
                }
                Some(members)
            }
            ("Pick" | "Omit", [inner, keys]) => {
                let keys = self.literal_keys(keys, depth + 1)?;
                let keep = name == "Pick";
                let mut members = self.members(inner, depth + 1)?;
                members.retain(|member| keys.contains(&member.name) == keep);
                Some(members)
            }
            _ => {
                let declaration = self.file.find(name)?;
                match &declaration.kind {
                    DeclarationKind::Interface { extends, body } => {
                        let mut members = declared_members(body);
                        for base in extends {
                            for inherited in self.members(base, depth + 1).unwrap_or_default() {
                                if !members.iter().any(|own| own.name == inherited.name) {
                                    members.push(inherited);
                                }
                            }
                        }
                        Some(members)
                    }
                    DeclarationKind::TypeAlias(aliased) if declaration.type_params.is_empty() => {
                        self.members(aliased, depth + 1)
                    }
                    _ => None,
                }
            }
        }
    }

    /// Keys of a literal or union-of-literals key type.
    fn literal_keys(&self, ty: &TypeNode, depth: usize) -> Option<Vec<String>> {
        if depth > MAX_DEPTH {
            return None;
        }
        match ty {
            TypeNode::StringLiteral(key) | TypeNode::NumberLiteral(key) => Some(vec![key.clone()]),
            TypeNode::Union(options) => {
                let mut keys = Vec::new();
                for option in options {
                    keys.extend(self.literal_keys(option, depth + 1)?);
                }
                Some(keys)
            }
            TypeNode::Reference { name, args } if args.is_empty() => {
                match &self.file.find(name)?.kind {
                    DeclarationKind::TypeAlias(aliased) => self.literal_keys(aliased, depth + 1),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn never(&self, ty: &TypeNode, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return false;
        }
        match ty {
            TypeNode::Keyword(Keyword::Never) => true,
            TypeNode::Union(options) => options.iter().all(|option| self.never(option, depth + 1)),
            TypeNode::Reference { name, args } if args.is_empty() => {
                match self.file.find(name) {
                    Some(declaration) if declaration.type_params.is_empty() => {
                        match &declaration.kind {
                            DeclarationKind::TypeAlias(aliased) => self.never(aliased, depth + 1),
                            _ => false,
                        }
                    }
                    _ => false,
                }
            }
            TypeNode::IndexedAccess { object, index } => index
                .literal_key()
                .and_then(|key| {
                    self.members(object, depth + 1)?
                        .into_iter()
                        .find(|prop| prop.name == key)
                })
                .is_some_and(|prop| self.never(&prop.ty, depth + 1)),
            _ => false,
        }
    }

    /// `never`, `undefined` or `null`: union members that never carry properties.
    fn is_absent(&self, ty: &TypeNode, depth: usize) -> bool {
        matches!(
            ty,
            TypeNode::Keyword(Keyword::Undefined | Keyword::Null)
        ) || self.never(ty, depth)
    }
}

fn declared_members(object: &ObjectType) -> Members {
    object
        .members
        .iter()
        .map(|member| Property {
            name: member.name.clone(),
            optional: member.optional,
            ty: member.ty.clone(),
            docs: member.docs.clone(),
            declared: true,
        })
        .collect()
}

impl SchemaAccess for DeclarationSchema {
    type Type = TypeNode;

    fn has_declaration(&self, name: &str) -> bool {
        self.file.find(name).is_some()
    }

    fn find_interface(&self, name: &str) -> Option<TypeNode> {
        match self.file.find(name)?.kind {
            DeclarationKind::Interface { .. } => Some(TypeNode::reference(name)),
            _ => None,
        }
    }

    fn properties(&self, ty: &TypeNode) -> Vec<Property<TypeNode>> {
        self.members(ty, 0).unwrap_or_default()
    }

    fn is_never(&self, ty: &TypeNode) -> bool {
        self.never(ty, 0)
    }

    fn render(&self, ty: &TypeNode) -> String {
        ty.to_string()
    }

    fn indexed_access(&self, ty: &TypeNode) -> Option<IndexedAccess> {
        let TypeNode::IndexedAccess { object, index } = ty else {
            return None;
        };
        match (object.as_ref(), index.as_ref()) {
            (TypeNode::Reference { name, args }, TypeNode::StringLiteral(key)) if args.is_empty() => {
                Some(IndexedAccess {
                    object: name.clone(),
                    key: key.clone(),
                })
            }
            _ => None,
        }
    }
}
