//! Common utilities for TypeScript code generation.
//!
//! Naming helpers shared by the endpoint extractor and the client emitter, plus
//! the quoting rules used when rendering keys and string literals.

use std::collections::HashSet;

use tracing::warn;

/// Check if a name needs quoting (or bracket notation) to be used as a property key.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name.chars().all(is_identifier_char)
}

/// Whether `name` can be used verbatim as a method or property identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    !needs_bracket_notation(name)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Escape a string for use in JavaScript/TypeScript string literals.
/// Escapes backslashes and double quotes.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a string if needed for use as a property key.
pub fn quote_if_needed(name: &str) -> String {
    if needs_bracket_notation(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

/// Turn an operation key or path template into a `_`-separated identifier body.
///
/// Braces are dropped, every other character outside `[A-Za-z0-9_$]` becomes
/// `_`, runs of `_` collapse, and one leading `_` is stripped. Applying it to
/// its own output is a no-op.
pub fn sanitize_for_operation(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '{' || c == '}' {
            continue;
        }
        let c = if is_identifier_char(c) { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    match out.strip_prefix('_') {
        Some(rest) => rest.to_string(),
        None => out,
    }
}

/// Camel-case a path template: `/pets/{petId}` becomes `petsPetid`, or
/// `PetsPetid` with `upper_first`.
pub fn to_camel_case_path(path: &str, upper_first: bool) -> String {
    sanitize_for_operation(path)
        .split('_')
        .enumerate()
        .map(|(index, segment)| {
            if index == 0 && !upper_first {
                segment.to_lowercase()
            } else {
                title_case(segment)
            }
        })
        .collect()
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

/// Reserve `base` in `used`, appending `2`, `3`, … until the name is free.
pub fn unique_name(base: &str, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{base}{n}");
        if used.insert(candidate.clone()) {
            warn!(name = %base, renamed = %candidate, "Duplicate method name disambiguated.");
            return candidate;
        }
        n += 1;
    }
}

/// Wrap rendered type text in parentheses when it has a top-level union,
/// intersection, conditional or function arrow, so it can be used as an
/// operand of `keyof`, `&` and friends.
pub fn group_if_compound(text: &str) -> String {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut compound = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
            '=' if chars.peek() == Some(&'>') => {
                chars.next();
                if depth == 0 {
                    compound = true;
                }
            }
            '|' | '&' | '?' if depth == 0 => compound = true,
            _ => {}
        }
    }
    if compound {
        format!("({text})")
    } else {
        text.to_string()
    }
}
