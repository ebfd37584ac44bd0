//! Pest-backed reader turning declaration source into [`DeclarationFile`].

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use tracing::debug;

use super::ast::{
    Declaration, DeclarationFile, DeclarationKind, IndexSignature, Keyword, Member, ObjectType,
    TypeNode, TypeOperator,
};
use crate::error::GenerateError;

#[derive(Parser)]
#[grammar = "schema/grammar.pest"]
struct GrammarParser;

/// Parse a declaration file.
pub fn parse_declarations(source: &str) -> Result<DeclarationFile, GenerateError> {
    let source = source.trim_start_matches('\u{feff}');
    let mut pairs =
        GrammarParser::parse(Rule::file, source).map_err(|err| GenerateError::SchemaParse {
            message: err.to_string(),
        })?;

    let reader = Reader {
        source,
        comments: scan_comments(source),
    };
    let mut file = DeclarationFile::default();
    let Some(root) = pairs.next() else {
        return Ok(file);
    };
    for pair in root.into_inner() {
        let declaration = match pair.as_rule() {
            Rule::interface_decl => reader.interface(pair),
            Rule::type_alias => reader.type_alias(pair),
            Rule::enum_decl => reader.enum_decl(pair),
            _ => continue,
        };
        if let Some(declaration) = declaration {
            file.declarations.push(declaration);
        }
    }

    debug!(declarations = file.declarations.len(), "Parsed declaration file.");
    Ok(file)
}

fn is_keyword_token(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::export_kw
            | Rule::declare_kw
            | Rule::interface_kw
            | Rule::type_kw
            | Rule::enum_kw
            | Rule::const_kw
            | Rule::extends_kw
            | Rule::readonly_kw
            | Rule::typeof_kw
            | Rule::in_kw
            | Rule::as_kw
    )
}

/// Collapse whitespace runs so opaque text renders on one line.
fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentKind {
    Line,
    Block,
}

/// Byte span of a comment; `end` excludes trailing whitespace of line comments.
#[derive(Debug, Clone, Copy)]
struct Comment {
    start: usize,
    end: usize,
    kind: CommentKind,
}

/// Comment spans in source order. String and template literals are skipped so
/// `"image/*"` in a type never opens a comment.
fn scan_comments(source: &str) -> Vec<Comment> {
    let bytes = source.as_bytes();
    let mut comments = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'"' | b'\'' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let line_end = source[i..].find('\n').map_or(source.len(), |n| i + n);
                let end = i + source[i..line_end].trim_end().len();
                comments.push(Comment {
                    start: i,
                    end,
                    kind: CommentKind::Line,
                });
                i = line_end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = source[i + 2..]
                    .find("*/")
                    .map_or(source.len(), |n| i + 2 + n + 2);
                comments.push(Comment {
                    start: i,
                    end,
                    kind: CommentKind::Block,
                });
                i = end;
            }
            _ => i += 1,
        }
    }
    comments
}

/// JSDoc block preceding `offset`, with comment decoration removed. Line
/// comments in between are skipped; any other block comment hides the JSDoc.
fn leading_docs(source: &str, comments: &[Comment], offset: usize) -> Option<String> {
    let mut end = source.get(..offset)?.trim_end().len();
    loop {
        let index = comments
            .binary_search_by_key(&end, |comment| comment.end)
            .ok()?;
        let comment = comments[index];
        match comment.kind {
            CommentKind::Line => end = source.get(..comment.start)?.trim_end().len(),
            CommentKind::Block => return jsdoc_body(source.get(comment.start..comment.end)?),
        }
    }
}

fn jsdoc_body(comment: &str) -> Option<String> {
    let inner = comment.strip_prefix("/**")?.strip_suffix("*/")?;
    let lines: Vec<&str> = inner
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect();
    let first = lines.iter().position(|line| !line.is_empty())?;
    let last = lines.iter().rposition(|line| !line.is_empty())?;
    Some(lines[first..=last].join("\n"))
}

struct Reader<'s> {
    source: &'s str,
    comments: Vec<Comment>,
}

impl Reader<'_> {
    fn docs(&self, pair: &Pair<'_, Rule>) -> Option<String> {
        leading_docs(self.source, &self.comments, pair.as_span().start())
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn interface(&self, pair: Pair<'_, Rule>) -> Option<Declaration> {
        let docs = self.docs(&pair);
        let mut name = None;
        let mut type_params = Vec::new();
        let mut extends = Vec::new();
        let mut body = ObjectType::default();
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::ident => name = Some(child.as_str().to_string()),
                Rule::type_params => type_params = Self::type_params(child),
                Rule::heritage => {
                    extends = child
                        .into_inner()
                        .filter(|item| item.as_rule() == Rule::type_reference)
                        .map(|item| self.type_node(item))
                        .collect();
                }
                Rule::object_type => body = self.object(child),
                _ => {}
            }
        }
        Some(Declaration {
            name: name?,
            type_params,
            docs,
            kind: DeclarationKind::Interface { extends, body },
        })
    }

    fn type_alias(&self, pair: Pair<'_, Rule>) -> Option<Declaration> {
        let docs = self.docs(&pair);
        let mut name = None;
        let mut type_params = Vec::new();
        let mut aliased = None;
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::ident => name = Some(child.as_str().to_string()),
                Rule::type_params => type_params = Self::type_params(child),
                Rule::ts_type => aliased = Some(self.type_node(child)),
                _ => {}
            }
        }
        Some(Declaration {
            name: name?,
            type_params,
            docs,
            kind: DeclarationKind::TypeAlias(aliased?),
        })
    }

    fn enum_decl(&self, pair: Pair<'_, Rule>) -> Option<Declaration> {
        let docs = self.docs(&pair);
        let name = pair
            .into_inner()
            .find(|child| child.as_rule() == Rule::ident)?
            .as_str()
            .to_string();
        Some(Declaration {
            name,
            type_params: Vec::new(),
            docs,
            kind: DeclarationKind::Enum,
        })
    }

    fn type_params(pair: Pair<'_, Rule>) -> Vec<String> {
        pair.into_inner()
            .filter_map(|param| {
                param
                    .into_inner()
                    .find(|child| child.as_rule() == Rule::ident)
                    .map(|ident| ident.as_str().to_string())
            })
            .collect()
    }

    // =========================================================================
    // Members
    // =========================================================================

    fn object(&self, pair: Pair<'_, Rule>) -> ObjectType {
        let mut object = ObjectType::default();
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::property_signature => {
                    if let Some(member) = self.property(child) {
                        object.members.push(member);
                    }
                }
                Rule::method_signature => {
                    if let Some(member) = self.method(child) {
                        object.members.push(member);
                    }
                }
                Rule::index_signature => {
                    if let Some(signature) = self.index_signature(child) {
                        object.index_signatures.push(signature);
                    }
                }
                _ => {}
            }
        }
        object
    }

    fn property_name(pair: &Pair<'_, Rule>) -> Option<String> {
        match pair.as_rule() {
            Rule::ident | Rule::number_literal => Some(pair.as_str().to_string()),
            Rule::string_literal => Some(
                pair.clone()
                    .into_inner()
                    .next()
                    .map(|inner| unescape(inner.as_str()))
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }

    fn property(&self, pair: Pair<'_, Rule>) -> Option<Member> {
        let docs = self.docs(&pair);
        let mut name = None;
        let mut optional = false;
        let mut readonly = false;
        let mut ty = None;
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::readonly_kw => readonly = true,
                Rule::optional_mark => optional = true,
                Rule::ts_type => ty = Some(self.type_node(child)),
                _ => {
                    if name.is_none() {
                        name = Self::property_name(&child);
                    }
                }
            }
        }
        Some(Member {
            name: name?,
            optional,
            readonly,
            ty: ty?,
            docs,
        })
    }

    fn method(&self, pair: Pair<'_, Rule>) -> Option<Member> {
        let docs = self.docs(&pair);
        let mut name = None;
        let mut optional = false;
        let mut params = String::new();
        let mut returns = String::from("any");
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::optional_mark => optional = true,
                Rule::parameter_list => params = normalize_text(child.as_str()),
                Rule::ts_type => returns = self.type_node(child).to_string(),
                Rule::type_params => {}
                _ => {
                    if name.is_none() {
                        name = Self::property_name(&child);
                    }
                }
            }
        }
        Some(Member {
            name: name?,
            optional,
            readonly: false,
            ty: TypeNode::Opaque(format!("({params}) => {returns}")),
            docs,
        })
    }

    fn index_signature(&self, pair: Pair<'_, Rule>) -> Option<IndexSignature> {
        let mut readonly = false;
        let mut key_name = None;
        let mut types = Vec::with_capacity(2);
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::readonly_kw => readonly = true,
                Rule::ident => key_name = Some(child.as_str().to_string()),
                Rule::ts_type => types.push(self.type_node(child)),
                _ => {}
            }
        }
        let mut types = types.into_iter();
        Some(IndexSignature {
            key_name: key_name?,
            key: types.next()?,
            value: types.next()?,
            readonly,
        })
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn type_node(&self, pair: Pair<'_, Rule>) -> TypeNode {
        let text = pair.as_str();
        match pair.as_rule() {
            Rule::ts_type => {
                let parts: Vec<TypeNode> = pair
                    .into_inner()
                    .filter(|child| !is_keyword_token(child.as_rule()))
                    .map(|child| self.type_node(child))
                    .collect();
                let mut parts = parts.into_iter();
                match (parts.next(), parts.next(), parts.next(), parts.next()) {
                    (Some(check), Some(extends), Some(then), Some(otherwise)) => {
                        TypeNode::Conditional {
                            check: Box::new(check),
                            extends: Box::new(extends),
                            then: Box::new(then),
                            otherwise: Box::new(otherwise),
                        }
                    }
                    (Some(single), None, None, None) => single,
                    _ => TypeNode::Opaque(normalize_text(text)),
                }
            }
            Rule::union_type => self.collect(pair, TypeNode::Union),
            Rule::intersection_type => self.collect(pair, TypeNode::Intersection),
            Rule::operator_type => {
                let mut operators = Vec::new();
                let mut operand = None;
                for child in pair.into_inner() {
                    if child.as_rule() == Rule::type_operator {
                        operators.push(match child.as_str() {
                            "keyof" => TypeOperator::Keyof,
                            "readonly" => TypeOperator::Readonly,
                            _ => TypeOperator::Unique,
                        });
                    } else {
                        operand = Some(self.type_node(child));
                    }
                }
                let Some(operand) = operand else {
                    return TypeNode::Opaque(normalize_text(text));
                };
                operators
                    .into_iter()
                    .rev()
                    .fold(operand, |operand, operator| TypeNode::Operator {
                        operator,
                        operand: Box::new(operand),
                    })
            }
            Rule::postfix_type => {
                let mut inner = pair.into_inner();
                let Some(primary) = inner.next() else {
                    return TypeNode::Opaque(normalize_text(text));
                };
                let mut node = self.type_node(primary);
                for suffix in inner {
                    node = match suffix.as_rule() {
                        Rule::array_suffix => TypeNode::Array(Box::new(node)),
                        _ => match suffix.into_inner().next() {
                            Some(index) => TypeNode::IndexedAccess {
                                object: Box::new(node),
                                index: Box::new(self.type_node(index)),
                            },
                            None => node,
                        },
                    };
                }
                node
            }
            Rule::parenthesized_type => match pair.into_inner().next() {
                Some(inner) => self.type_node(inner),
                None => TypeNode::Opaque(normalize_text(text)),
            },
            Rule::object_type => TypeNode::Object(self.object(pair)),
            Rule::tuple_type => {
                TypeNode::Tuple(pair.into_inner().map(|child| self.type_node(child)).collect())
            }
            Rule::string_literal => TypeNode::StringLiteral(
                pair.into_inner()
                    .next()
                    .map(|inner| unescape(inner.as_str()))
                    .unwrap_or_default(),
            ),
            Rule::number_literal => TypeNode::NumberLiteral(text.to_string()),
            Rule::boolean_literal => TypeNode::BooleanLiteral(text == "true"),
            Rule::type_reference => {
                let mut name = String::new();
                let mut args = Vec::new();
                for child in pair.into_inner() {
                    match child.as_rule() {
                        Rule::qualified_name => name = child.as_str().to_string(),
                        Rule::type_arguments => {
                            args = child.into_inner().map(|arg| self.type_node(arg)).collect();
                        }
                        _ => {}
                    }
                }
                match Keyword::from_name(&name) {
                    Some(keyword) if args.is_empty() => TypeNode::Keyword(keyword),
                    _ => TypeNode::Reference { name, args },
                }
            }
            _ => TypeNode::Opaque(normalize_text(text)),
        }
    }

    fn collect(&self, pair: Pair<'_, Rule>, wrap: fn(Vec<TypeNode>) -> TypeNode) -> TypeNode {
        let mut parts: Vec<TypeNode> = pair.into_inner().map(|child| self.type_node(child)).collect();
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            wrap(parts)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn alias(file: &DeclarationFile, name: &str) -> TypeNode {
        match &file.find(name).expect("declaration").kind {
            DeclarationKind::TypeAlias(node) => node.clone(),
            other => panic!("expected alias, got {other:?}"),
        }
    }

    fn interface_body(file: &DeclarationFile, name: &str) -> ObjectType {
        match &file.find(name).expect("declaration").kind {
            DeclarationKind::Interface { body, .. } => body.clone(),
            other => panic!("expected interface, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_interface_members() {
        let file = parse_declarations(
            r#"
export interface paths {
    "/pets/{petId}": {
        parameters: {
            query?: never;
            path: { petId: string };
        };
        get: operations["showPetById"];
        put?: never;
    };
}
"#,
        )
        .unwrap();

        let body = interface_body(&file, "paths");
        assert_eq!(body.members.len(), 1);
        assert_eq!(body.members[0].name, "/pets/{petId}");
        let TypeNode::Object(item) = &body.members[0].ty else {
            panic!("expected object type");
        };
        let names: Vec<_> = item.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["parameters", "get", "put"]);
        assert!(item.members[2].optional);
        assert_eq!(item.members[1].ty.to_string(), "operations[\"showPetById\"]");
    }

    #[test]
    fn test_parse_skips_imports_and_exports() {
        let file = parse_declarations(
            r#"
import type { Foo } from "./foo";
import {
    Bar,
    Baz,
} from "./bar";
export type $defs = Record<string, never>;
export {};
"#,
        )
        .unwrap();
        assert_eq!(file.declarations.len(), 1);
        assert_eq!(alias(&file, "$defs").to_string(), "Record<string, never>");
    }

    #[test]
    fn test_parse_jsdoc_on_declarations_and_members() {
        let file = parse_declarations(
            r"
/** Top level doc */
export interface operations {
    /**
     * List all pets
     * @description Paginated
     */
    listPets: {
        // plain comment, not a doc
        responses: never;
    };
}
",
        )
        .unwrap();
        let decl = file.find("operations").unwrap();
        assert_eq!(decl.docs.as_deref(), Some("Top level doc"));
        let body = interface_body(&file, "operations");
        assert_eq!(
            body.members[0].docs.as_deref(),
            Some("List all pets\n@description Paginated")
        );
        let TypeNode::Object(inner) = &body.members[0].ty else {
            panic!("expected object type");
        };
        assert_eq!(inner.members[0].docs, None);
    }

    #[test]
    fn test_parse_type_expressions() {
        let file = parse_declarations(
            r#"
type A = | "a" | "b";
type B = (string | null)[];
type C = keyof components["schemas"];
type D = T extends string ? { ok: true } : never;
type E = readonly [number, ...string[]];
type F = (input: string) => void;
type G = { [K in Keys]?: V };
type H = `prefix-${string}`;
type I = Partial<Record<"x" | "y", never>> & { z: 1 };
"#,
        )
        .unwrap();
        assert_eq!(alias(&file, "A").to_string(), "\"a\" | \"b\"");
        assert_eq!(alias(&file, "B").to_string(), "(string | null)[]");
        assert_eq!(alias(&file, "C").to_string(), "keyof components[\"schemas\"]");
        assert_eq!(
            alias(&file, "D").to_string(),
            "T extends string ? { ok: true } : never"
        );
        assert_eq!(alias(&file, "E").to_string(), "readonly [number, string[]]");
        assert_eq!(alias(&file, "F").to_string(), "(input: string) => void");
        assert_eq!(alias(&file, "G").to_string(), "{ [K in Keys]?: V }");
        assert_eq!(alias(&file, "H").to_string(), "`prefix-${string}`");
        assert_eq!(
            alias(&file, "I").to_string(),
            "Partial<Record<\"x\" | \"y\", never>> & { z: 1 }"
        );
    }

    #[test]
    fn test_parse_keywords_need_word_boundary() {
        let file = parse_declarations(
            r"
export interface Things {
    typeName: string;
    readonly exported: boolean;
    readonly: number;
    keyofThing: neverland;
}
",
        )
        .unwrap();
        let body = interface_body(&file, "Things");
        let names: Vec<_> = body.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["typeName", "exported", "readonly", "keyofThing"]);
        assert!(body.members[1].readonly);
        assert!(!body.members[2].readonly);
        assert_eq!(body.members[3].ty, TypeNode::reference("neverland"));
    }

    #[test]
    fn test_parse_methods_and_index_signatures() {
        let file = parse_declarations(
            r"
interface Mixed {
    [key: string]: unknown;
    call(a: string, b?: number): Promise<void>;
}
",
        )
        .unwrap();
        let body = interface_body(&file, "Mixed");
        assert_eq!(body.index_signatures.len(), 1);
        assert_eq!(body.members[0].name, "call");
        assert_eq!(
            body.members[0].ty.to_string(),
            "(a: string, b?: number) => Promise<void>"
        );
    }

    #[test]
    fn test_parse_enum_and_interface_extends() {
        let file = parse_declarations(
            r"
export enum Color { Red = 'red', Blue = 'blue' }
export interface Base { id: string }
export interface Derived extends Base, Other<string> { name: string }
",
        )
        .unwrap();
        assert_eq!(file.find("Color").unwrap().kind, DeclarationKind::Enum);
        match &file.find("Derived").unwrap().kind {
            DeclarationKind::Interface { extends, .. } => {
                assert_eq!(extends.len(), 2);
                assert_eq!(extends[1].to_string(), "Other<string>");
            }
            other => panic!("expected interface, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_declarations("export interface paths {").unwrap_err();
        assert!(matches!(err, GenerateError::SchemaParse { .. }));
    }

    fn docs_at(source: &str, offset: usize) -> Option<String> {
        leading_docs(source, &scan_comments(source), offset)
    }

    #[test]
    fn test_leading_docs_ignores_plain_block_comments() {
        let source = "/** doc */ /* note */ x";
        assert_eq!(docs_at(source, source.len() - 1), None);
        let source = "/** doc */\nx";
        assert_eq!(docs_at(source, source.len() - 1).as_deref(), Some("doc"));
    }

    #[test]
    fn test_leading_docs_keeps_slash_star_in_text() {
        let source = "/** Accepts image/* uploads */\nx";
        assert_eq!(
            docs_at(source, source.len() - 1).as_deref(),
            Some("Accepts image/* uploads")
        );
        let source = "/**\n * @description Lists /api/* and\n *   text/* entries\n */\nx";
        assert_eq!(
            docs_at(source, source.len() - 1).as_deref(),
            Some("@description Lists /api/* and\n  text/* entries")
        );
    }

    #[test]
    fn test_leading_docs_skips_line_comments() {
        let source = "/** Summary */\n// note\n  // another   \nx";
        assert_eq!(docs_at(source, source.len() - 1).as_deref(), Some("Summary"));
        let source = "a: string; // trailing\nx";
        assert_eq!(docs_at(source, source.len() - 1), None);
    }

    #[test]
    fn test_comment_scan_skips_string_literals() {
        let source = "type A = \"image/*\"; /** doc */ x";
        let comments = scan_comments(source);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].kind, CommentKind::Block);
        assert_eq!(docs_at(source, source.len() - 1).as_deref(), Some("doc"));
    }

    #[test]
    fn test_parse_docs_with_glob_text() {
        let file = parse_declarations(
            "export interface paths {\n  \"/files\": {\n    /** Lists files under /api/* prefixes */\n    // query only\n    get: {\n      parameters: {\n        query: {\n          /** Glob like /tmp/* */\n          q: string;\n        };\n      };\n    };\n  };\n}\n",
        )
        .unwrap();
        let DeclarationKind::Interface { body, .. } = &file.find("paths").unwrap().kind else {
            panic!("paths is an interface");
        };
        let TypeNode::Object(entry) = &body.members[0].ty else {
            panic!("path entry is an object");
        };
        let get = &entry.members[0];
        assert_eq!(get.docs.as_deref(), Some("Lists files under /api/* prefixes"));
        let TypeNode::Object(operation) = &get.ty else {
            panic!("operation is an object");
        };
        let TypeNode::Object(parameters) = &operation.members[0].ty else {
            panic!("parameters is an object");
        };
        let TypeNode::Object(query) = &parameters.members[0].ty else {
            panic!("query is an object");
        };
        assert_eq!(query.members[0].docs.as_deref(), Some("Glob like /tmp/*"));
    }
}
