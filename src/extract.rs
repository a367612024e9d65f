//! Syntax-tree extraction of docstring candidates.
//!
//! Parses Python source with tree-sitter and walks the tree with an
//! explicit worklist, yielding one `Candidate` per scope (module, class,
//! function) in document order: a parent scope precedes its nested
//! scopes, siblings appear in source order. A scope's docstring is its
//! first body statement when that statement is a bare string-literal
//! expression; anything else yields a candidate with `text = None`.

use std::fmt;

use tree_sitter::Node;

#[derive(Debug, thiserror::Error)]
/// Errors from parsing a source file into candidates.
pub enum ExtractError {
    #[error("python grammar failed to load")]
    Grammar,
    #[error("syntax error near line {line}")]
    Syntax { line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The kind of scope a candidate belongs to.
pub enum ScopeKind {
    Module,
    Class,
    Function,
    AsyncFunction,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Module => write!(f, "module"),
            ScopeKind::Class => write!(f, "class"),
            ScopeKind::Function => write!(f, "function"),
            ScopeKind::AsyncFunction => write!(f, "async function"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One scope paired with its docstring, if any.
///
/// `text` holds the decoded literal content: prefixes and quote
/// characters stripped, adjacent segments concatenated, and escape
/// sequences resolved (raw strings keep their backslashes). For scopes
/// without a docstring, `start_line` points at the first body statement
/// instead of an opening quote.
pub struct Candidate {
    pub kind: ScopeKind,
    pub name: String,
    pub text: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
}

/// Parse `source` and collect docstring candidates in document order.
///
/// Files tree-sitter cannot build a clean tree for (ERROR or MISSING
/// nodes anywhere) produce `ExtractError::Syntax` and no candidates.
pub fn extract(source: &str) -> Result<Vec<Candidate>, ExtractError> {
    let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language)
        .map_err(|_| ExtractError::Grammar)?;
    let tree = parser.parse(source, None).ok_or(ExtractError::Grammar)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(ExtractError::Syntax {
            line: first_error_line(root),
        });
    }

    let mut out = Vec::new();
    // Explicit worklist instead of recursion; children are pushed in
    // reverse so pop order matches source order.
    let mut stack: Vec<(Node, String)> = vec![(root, String::new())];
    while let Some((node, prefix)) = stack.pop() {
        match node.kind() {
            "module" => {
                out.push(candidate_for(ScopeKind::Module, "<module>".to_string(), node, source));
                push_children(&mut stack, node, &prefix);
            }
            "class_definition" | "function_definition" => {
                let name = node
                    .child_by_field_name("name")
                    .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                    .unwrap_or("<anonymous>");
                let qualname = if prefix.is_empty() {
                    name.to_string()
                } else {
                    format!("{prefix}.{name}")
                };
                if let Some(body) = node.child_by_field_name("body") {
                    out.push(candidate_for(scope_kind(node), qualname.clone(), body, source));
                }
                push_children(&mut stack, node, &qualname);
            }
            _ => push_children(&mut stack, node, &prefix),
        }
    }
    Ok(out)
}

fn push_children<'t>(stack: &mut Vec<(Node<'t>, String)>, node: Node<'t>, prefix: &str) {
    for i in (0..node.named_child_count()).rev() {
        if let Some(child) = node.named_child(i) {
            stack.push((child, prefix.to_string()));
        }
    }
}

fn scope_kind(node: Node) -> ScopeKind {
    if node.kind() == "class_definition" {
        ScopeKind::Class
    } else if node.child(0).is_some_and(|c| c.kind() == "async") {
        ScopeKind::AsyncFunction
    } else {
        ScopeKind::Function
    }
}

/// Build the candidate for one scope given its body (the module node
/// itself, or a `block`).
fn candidate_for(kind: ScopeKind, name: String, body: Node, source: &str) -> Candidate {
    let stmt = first_statement(body);
    let expr = stmt.and_then(docstring_expr);
    let text = expr.and_then(|e| literal_text(e, source));
    match (expr, text) {
        (Some(e), Some(text)) => Candidate {
            kind,
            name,
            text: Some(text),
            start_line: e.start_position().row + 1,
            end_line: e.end_position().row + 1,
        },
        _ => {
            // No docstring: anchor the candidate at the first body line.
            let anchor = stmt.unwrap_or(body).start_position().row + 1;
            Candidate {
                kind,
                name,
                text: None,
                start_line: anchor,
                end_line: anchor,
            }
        }
    }
}

fn first_statement(body: Node) -> Option<Node> {
    (0..body.named_child_count())
        .filter_map(|i| body.named_child(i))
        .find(|n| n.kind() != "comment")
}

/// The string expression of a bare string-literal statement, if that is
/// what `stmt` is. Assignments, calls, and tuples do not qualify.
fn docstring_expr(stmt: Node) -> Option<Node> {
    if stmt.kind() != "expression_statement" || stmt.named_child_count() != 1 {
        return None;
    }
    let expr = stmt.named_child(0)?;
    matches!(expr.kind(), "string" | "concatenated_string").then_some(expr)
}

/// Decode a string expression to its logical content.
///
/// Returns `None` for f-strings and bytes literals, which are not
/// docstrings. Implicitly concatenated segments become one literal.
fn literal_text(expr: Node, source: &str) -> Option<String> {
    match expr.kind() {
        "string" => decode_string_token(expr.utf8_text(source.as_bytes()).ok()?),
        "concatenated_string" => {
            let mut out = String::new();
            for i in 0..expr.named_child_count() {
                let seg = expr.named_child(i)?;
                if seg.kind() == "comment" {
                    continue;
                }
                if seg.kind() != "string" {
                    return None;
                }
                out.push_str(&decode_string_token(seg.utf8_text(source.as_bytes()).ok()?)?);
            }
            Some(out)
        }
        _ => None,
    }
}

/// Strip prefix and quotes from one string token and decode escapes.
fn decode_string_token(token: &str) -> Option<String> {
    let quote_at = token.find(['"', '\''])?;
    let (prefix, rest) = token.split_at(quote_at);
    let prefix = prefix.to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') {
        return None;
    }
    let body = strip_quotes(rest)?;
    if prefix.contains('r') {
        Some(body.to_string())
    } else {
        Some(decode_escapes(body))
    }
}

fn strip_quotes(rest: &str) -> Option<&str> {
    for q in ["\"\"\"", "'''"] {
        if rest.starts_with(q) && rest.len() >= 6 && rest.ends_with(q) {
            return rest.get(3..rest.len() - 3);
        }
    }
    for q in ["\"", "'"] {
        if rest.starts_with(q) && rest.len() >= 2 && rest.ends_with(q) {
            return rest.get(1..rest.len() - 1);
        }
    }
    None
}

/// Resolve escape sequences to their character values.
///
/// A backslash before a newline is a line continuation and joins the
/// two physical lines. Unrecognized escapes keep their backslash, as
/// CPython does; `\N{...}` is left verbatim.
fn decode_escapes(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            out.push(c);
            i += 1;
            continue;
        }
        let Some(&next) = chars.get(i + 1) else {
            out.push('\\');
            break;
        };
        i += 2;
        match next {
            '\n' => {}
            '\r' => {
                // CRLF sources: the continuation swallows both bytes.
                if chars.get(i) == Some(&'\n') {
                    i += 1;
                }
            }
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            'x' => match take_hex(&chars, i, 2) {
                Some(v) => {
                    i += 2;
                    push_scalar(&mut out, v, "\\x");
                }
                None => out.push_str("\\x"),
            },
            'u' => match take_hex(&chars, i, 4) {
                Some(v) => {
                    i += 4;
                    push_scalar(&mut out, v, "\\u");
                }
                None => out.push_str("\\u"),
            },
            'U' => match take_hex(&chars, i, 8) {
                Some(v) => {
                    i += 8;
                    push_scalar(&mut out, v, "\\U");
                }
                None => out.push_str("\\U"),
            },
            d @ '0'..='7' => {
                let mut v = d as u32 - '0' as u32;
                let mut taken = 0;
                while taken < 2 {
                    match chars.get(i) {
                        Some(&o @ '0'..='7') => {
                            v = v * 8 + (o as u32 - '0' as u32);
                            i += 1;
                            taken += 1;
                        }
                        _ => break,
                    }
                }
                push_scalar(&mut out, v, "\\");
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

fn take_hex(chars: &[char], at: usize, n: usize) -> Option<u32> {
    let mut v = 0u32;
    for k in 0..n {
        v = v * 16 + chars.get(at + k)?.to_digit(16)?;
    }
    Some(v)
}

fn push_scalar(out: &mut String, v: u32, fallback: &str) {
    match char::from_u32(v) {
        Some(c) => out.push(c),
        None => out.push_str(fallback),
    }
}

/// First line carrying an ERROR or MISSING node, for diagnostics.
fn first_error_line(root: Node) -> usize {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return node.start_position().row + 1;
        }
        if node.has_error() {
            for i in (0..node.child_count()).rev() {
                if let Some(child) = node.child(i) {
                    stack.push(child);
                }
            }
        }
    }
    1
}
