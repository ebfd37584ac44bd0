//! TypeScript code emission via the Emit trait.
//!
//! This module provides a trait-based approach to converting TypeScript AST nodes
//! to string representations. Each AST type implements `Emit` for clean, composable
//! code generation.

use super::types::{
    BinOp, ImportItem, ObjectEntry, TsClass, TsDoc, TsExpr, TsField, TsImport, TsLiteral,
    TsMethod, TsModule, TsParam, TsPrimitive, TsProp, TsStmt, TsType, TsTypeParam,
};
use super::utils::{escape_js_string, needs_bracket_notation, quote_if_needed};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

fn emit_list<T: Emit>(items: &[T], separator: &str) -> String {
    items.iter().map(Emit::emit).collect::<Vec<_>>().join(separator)
}

// =============================================================================
// Primitive Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Never => "never".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

fn wrap_if(ty: &TsType, wrap: bool) -> String {
    if wrap {
        format!("({})", ty.emit())
    } else {
        ty.emit()
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Union(types) => types
                .iter()
                .map(|t| {
                    wrap_if(t, matches!(t, TsType::Intersection(_) | TsType::Conditional { .. }))
                })
                .collect::<Vec<_>>()
                .join(" | "),
            TsType::Intersection(types) => types
                .iter()
                .map(|t| wrap_if(t, matches!(t, TsType::Union(_) | TsType::Conditional { .. })))
                .collect::<Vec<_>>()
                .join(" & "),
            TsType::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", emit_list(props, "; "))
                }
            }
            TsType::Record { key, value } => {
                format!("Record<{}, {}>", key.emit(), value.emit())
            }
            TsType::Literal(lit) => lit.emit(),
            TsType::Ref(name) => name.clone(),
            TsType::KeyOf(inner) => {
                let wrap = matches!(
                    **inner,
                    TsType::Union(_) | TsType::Intersection(_) | TsType::Conditional { .. }
                );
                format!("keyof {}", wrap_if(inner, wrap))
            }
            TsType::Extract(from, to) => format!("Extract<{}, {}>", from.emit(), to.emit()),
            TsType::Exclude(from, to) => format!("Exclude<{}, {}>", from.emit(), to.emit()),
            TsType::Pick { ty, keys } => format!("Pick<{}, {}>", ty.emit(), keys.emit()),
            TsType::Omit { ty, keys } => format!("Omit<{}, {}>", ty.emit(), keys.emit()),
            TsType::Partial(inner) => format!("Partial<{}>", inner.emit()),
            TsType::Tuple(items) => format!("[{}]", emit_list(items, ", ")),
            TsType::Conditional {
                check,
                extends,
                then,
                otherwise,
            } => format!(
                "{} extends {} ? {} : {}",
                wrap_if(check, matches!(**check, TsType::Conditional { .. })),
                wrap_if(extends, matches!(**extends, TsType::Conditional { .. })),
                then.emit(),
                otherwise.emit()
            ),
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", key, opt, self.ty.emit())
    }
}

impl Emit for TsTypeParam {
    fn emit(&self) -> String {
        match &self.constraint {
            Some(constraint) => format!("{} extends {}", self.name, constraint.emit()),
            None => self.name.clone(),
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for BinOp {
    fn emit(&self) -> String {
        match self {
            BinOp::NullishCoalescing => "??".to_string(),
        }
    }
}

fn emit_member(object: &TsExpr, prop: &str, optional: bool) -> String {
    let object = object.emit();
    match (needs_bracket_notation(prop), optional) {
        (true, true) => format!("{}?.[\"{}\"]", object, escape_js_string(prop)),
        (true, false) => format!("{}[\"{}\"]", object, escape_js_string(prop)),
        (false, true) => format!("{object}?.{prop}"),
        (false, false) => format!("{object}.{prop}"),
    }
}

impl Emit for ObjectEntry {
    fn emit(&self) -> String {
        match self {
            ObjectEntry::Prop(key, value) => format!("{}: {}", quote_if_needed(key), value.emit()),
            ObjectEntry::Spread(expr) => format!("...{}", expr.emit()),
        }
    }
}

impl Emit for TsExpr {
    fn emit(&self) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Literal(lit) => lit.emit(),
            TsExpr::Call {
                callee,
                type_args,
                args,
            } => {
                let type_args_str = if type_args.is_empty() {
                    String::new()
                } else {
                    format!("<{}>", emit_list(type_args, ", "))
                };
                format!("{}{}({})", callee.emit(), type_args_str, emit_list(args, ", "))
            }
            TsExpr::Object(entries) => {
                if entries.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", emit_list(entries, ", "))
                }
            }
            TsExpr::Member { object, prop } => emit_member(object, prop, false),
            TsExpr::OptionalMember { object, prop } => emit_member(object, prop, true),
            TsExpr::Await(expr) => format!("await {}", expr.emit()),
            TsExpr::BinOp { left, op, right } => {
                format!("{} {} {}", left.emit(), op.emit(), right.emit())
            }
            TsExpr::Assign { target, value } => format!("{} = {}", target.emit(), value.emit()),
            TsExpr::Cast { expr, ty } => format!("{} as {}", expr.emit(), ty.emit()),
            TsExpr::Paren(expr) => format!("({})", expr.emit()),
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        match &self.ty {
            Some(ty) => format!("{}{}: {}", self.name, opt, ty.emit()),
            None => format!("{}{}", self.name, opt),
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for TsStmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl TsStmt {
    /// Emit with specified indentation level (2 spaces per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        match self {
            TsStmt::Expr(expr) => format!("{}{};\n", prefix, expr.emit()),
            TsStmt::Return(expr) => match expr {
                Some(e) => format!("{}return {};\n", prefix, e.emit()),
                None => format!("{prefix}return;\n"),
            },
        }
    }
}

impl TsDoc {
    /// Emit as a `/** */` block; an empty doc emits nothing.
    pub fn emit_indented(&self, indent: usize) -> String {
        if self.is_empty() {
            return String::new();
        }
        let prefix = "  ".repeat(indent);
        let mut output = format!("{prefix}/**\n");
        for line in &self.lines {
            let line = line.replace("*/", "*\\/");
            if line.is_empty() {
                output.push_str(&format!("{prefix} *\n"));
            } else {
                output.push_str(&format!("{prefix} * {line}\n"));
            }
        }
        output.push_str(&format!("{prefix} */\n"));
        output
    }
}

// =============================================================================
// Classes
// =============================================================================

impl TsField {
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        let private = if self.is_private { "private " } else { "" };
        let readonly = if self.is_readonly { "readonly " } else { "" };
        format!("{}{}{}{}: {};\n", prefix, private, readonly, self.name, self.ty.emit())
    }
}

fn emit_block(prefix: &str, head: &str, body: &[TsStmt], indent: usize) -> String {
    if body.is_empty() {
        return format!("{prefix}{head} {{}}\n");
    }
    let mut output = format!("{prefix}{head} {{\n");
    for stmt in body {
        output.push_str(&stmt.emit_indented(indent + 1));
    }
    output.push_str(&format!("{prefix}}}\n"));
    output
}

impl TsMethod {
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        let async_str = if self.is_async { "async " } else { "" };
        let head = format!("{}{}({})", async_str, self.name, emit_list(&self.params, ", "));
        let mut output = self.doc.emit_indented(indent);
        output.push_str(&emit_block(&prefix, &head, &self.body, indent));
        output
    }
}

impl Emit for TsClass {
    fn emit(&self) -> String {
        let export = if self.is_export { "export " } else { "" };
        let type_params_str = if self.type_params.is_empty() {
            String::new()
        } else {
            format!("<{}>", emit_list(&self.type_params, ", "))
        };
        let mut output = format!("{}class {}{} {{\n", export, self.name, type_params_str);

        for field in &self.fields {
            output.push_str(&field.emit_indented(1));
        }

        let head = format!("constructor({})", emit_list(&self.constructor_params, ", "));
        if !self.fields.is_empty() {
            output.push('\n');
        }
        output.push_str(&emit_block("  ", &head, &self.constructor_body, 1));

        for method in &self.methods {
            output.push('\n');
            output.push_str(&method.emit_indented(1));
        }

        output.push_str("}\n");
        output
    }
}

// =============================================================================
// Imports
// =============================================================================

impl Emit for ImportItem {
    fn emit(&self) -> String {
        let type_str = if self.type_only { "type " } else { "" };
        match &self.alias {
            Some(alias) => format!("{}{} as {}", type_str, self.name, alias),
            None => format!("{}{}", type_str, self.name),
        }
    }
}

impl Emit for TsImport {
    fn emit(&self) -> String {
        let type_keyword = if self.type_only { "type " } else { "" };
        let mut bindings = Vec::new();
        if let Some(default) = &self.default {
            bindings.push(default.clone());
        }
        if !self.items.is_empty() {
            bindings.push(format!("{{ {} }}", emit_list(&self.items, ", ")));
        }
        format!(
            "import {}{} from \"{}\";\n",
            type_keyword,
            bindings.join(", "),
            self.from
        )
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsModule {
    fn emit(&self) -> String {
        let mut output = String::new();

        for line in &self.banner {
            output.push_str(&format!("// {line}\n"));
        }
        if !self.banner.is_empty() {
            output.push('\n');
        }

        for import in &self.imports {
            output.push_str(&import.emit());
        }
        if !self.imports.is_empty() {
            output.push('\n');
        }

        let classes: Vec<String> = self.classes.iter().map(Emit::emit).collect();
        output.push_str(&classes.join("\n"));

        output
    }
}

// =============================================================================
// Tests
// =============================================================================
