//! TypeScript IR types for code generation.
//!
//! This module defines the TypeScript representation the client is built from:
//! - TsType: Types, including the key-set operators used by the header formula
//! - TsExpr: Expressions (identifiers, calls, object literals, etc.)
//! - TsClass: The generated client class and its members

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, never
    Primitive(TsPrimitive),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Intersection type: A & B & C
    Intersection(Vec<TsType>),
    /// Object type: { foo: string; bar?: number }
    Object(Vec<TsProp>),
    /// Record type: Record<K, V>
    Record {
        key: Box<TsType>,
        value: Box<TsType>,
    },
    /// Literal type: "foo"
    Literal(TsLiteral),
    /// Named type reference or schema type text, emitted as-is
    Ref(String),
    /// keyof T
    KeyOf(Box<TsType>),
    /// Extract<T, U>: keys present in both
    Extract(Box<TsType>, Box<TsType>),
    /// Exclude<T, U>: keys of T not in U
    Exclude(Box<TsType>, Box<TsType>),
    /// Pick<T, K>
    Pick { ty: Box<TsType>, keys: Box<TsType> },
    /// Omit<T, K>
    Omit { ty: Box<TsType>, keys: Box<TsType> },
    /// Partial<T>
    Partial(Box<TsType>),
    /// Tuple type: [A, B]
    Tuple(Vec<TsType>),
    /// Conditional: C extends E ? T : F
    Conditional {
        check: Box<TsType>,
        extends: Box<TsType>,
        then: Box<TsType>,
        otherwise: Box<TsType>,
    },
}

impl TsType {
    pub fn never() -> Self {
        TsType::Primitive(TsPrimitive::Never)
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        TsType::Literal(TsLiteral::String(value.into()))
    }

    /// Union of string literals, or `never` when there are none.
    pub fn literal_union<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut members: Vec<TsType> = values.into_iter().map(TsType::string_literal).collect();
        match members.len() {
            0 => TsType::never(),
            1 => members.remove(0),
            _ => TsType::Union(members),
        }
    }
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Never,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
}

/// TypeScript expression
#[derive(Debug, Clone, PartialEq)]
pub enum TsExpr {
    /// Identifier: foo
    Ident(String),
    /// Literal value: "bar"
    Literal(TsLiteral),
    /// Function call: foo<T>(a, b)
    Call {
        callee: Box<TsExpr>,
        type_args: Vec<TsType>,
        args: Vec<TsExpr>,
    },
    /// Object literal: { a: 1, ...rest }
    Object(Vec<ObjectEntry>),
    /// Member access: foo.bar
    Member { object: Box<TsExpr>, prop: String },
    /// Optional chaining member access: foo?.bar
    OptionalMember { object: Box<TsExpr>, prop: String },
    /// Await expression: await fetch()
    Await(Box<TsExpr>),
    /// Binary expression: a ?? b
    BinOp {
        left: Box<TsExpr>,
        op: BinOp,
        right: Box<TsExpr>,
    },
    /// Assignment: target = value
    Assign {
        target: Box<TsExpr>,
        value: Box<TsExpr>,
    },
    /// Type cast: expr as Type
    Cast { expr: Box<TsExpr>, ty: TsType },
    /// Parenthesized expression: (expr)
    Paren(Box<TsExpr>),
}

impl TsExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TsExpr::Ident(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        TsExpr::Literal(TsLiteral::String(value.into()))
    }

    pub fn member(self, prop: impl Into<String>) -> Self {
        TsExpr::Member {
            object: Box::new(self),
            prop: prop.into(),
        }
    }

    pub fn optional_member(self, prop: impl Into<String>) -> Self {
        TsExpr::OptionalMember {
            object: Box::new(self),
            prop: prop.into(),
        }
    }
}

/// Entry of an object literal
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEntry {
    /// key: value
    Prop(String, TsExpr),
    /// ...expr
    Spread(TsExpr),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    NullishCoalescing,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    pub name: String,
    pub ty: Option<TsType>,
    pub optional: bool,
}

/// Statement in a function body
#[derive(Debug, Clone, PartialEq)]
pub enum TsStmt {
    /// Expression statement
    Expr(TsExpr),
    /// Return statement
    Return(Option<TsExpr>),
}

/// JSDoc block, one entry per line (without the leading ` * `)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsDoc {
    pub lines: Vec<String>,
}

impl TsDoc {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Module-Level IR (for printer)
// =============================================================================

/// Import statement
#[derive(Debug, Clone, PartialEq)]
pub struct TsImport {
    /// Default import binding
    pub default: Option<String>,
    /// Items to import
    pub items: Vec<ImportItem>,
    /// Module path
    pub from: String,
    /// Whether this is a type-only import
    pub type_only: bool,
}

/// Import item
#[derive(Debug, Clone, PartialEq)]
pub struct ImportItem {
    pub name: String,
    pub alias: Option<String>,
    /// Inline `type` modifier
    pub type_only: bool,
}

/// Generic type parameter: `HT extends Record<string, string>`
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeParam {
    pub name: String,
    pub constraint: Option<TsType>,
}

/// Class field declaration
#[derive(Debug, Clone, PartialEq)]
pub struct TsField {
    pub name: String,
    pub ty: TsType,
    pub is_private: bool,
    pub is_readonly: bool,
}

/// Method definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsMethod {
    pub doc: TsDoc,
    pub name: String,
    pub params: Vec<TsParam>,
    pub body: Vec<TsStmt>,
    pub is_async: bool,
}

/// Class definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsClass {
    pub name: String,
    pub type_params: Vec<TsTypeParam>,
    pub fields: Vec<TsField>,
    pub constructor_params: Vec<TsParam>,
    pub constructor_body: Vec<TsStmt>,
    pub methods: Vec<TsMethod>,
    pub is_export: bool,
}

/// Complete TypeScript module
#[derive(Debug, Clone, PartialEq)]
pub struct TsModule {
    /// Leading line comments
    pub banner: Vec<String>,
    pub imports: Vec<TsImport>,
    pub classes: Vec<TsClass>,
}
