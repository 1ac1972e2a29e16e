//! Printer
//!
//! Prints a [`Document`] by splicing edits into the original source text.
//! Pristine nodes are never re-rendered, so formatting outside the edited
//! nodes is preserved byte-for-byte.

use crate::document::Document;
use crate::node::{ElementId, ImportDecl, JsxElement, NodeState, Origin};

#[derive(Debug)]
struct Edit {
    start: u32,
    end: u32,
    text: String,
}

impl Edit {
    fn replace(start: u32, end: u32, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    fn insert(at: u32, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }

    fn delete(start: u32, end: u32) -> Self {
        Self::replace(start, end, String::new())
    }
}

pub(crate) fn print(doc: &Document) -> String {
    let mut edits = Vec::new();
    collect_import_edits(doc, &mut edits);
    for (id, element) in doc.elements() {
        collect_element_edits(doc, id, element, &mut edits);
    }
    splice(&doc.source, edits)
}

fn splice(source: &str, mut edits: Vec<Edit>) -> String {
    // Stable: insertions at the same offset keep their collection order.
    edits.sort_by_key(|e| (e.start, e.end));

    let mut out = String::with_capacity(source.len() + 64);
    let mut cursor = 0u32;
    for edit in edits {
        // Nested inside a range that was already replaced.
        if edit.start < cursor {
            continue;
        }
        out.push_str(&source[cursor as usize..edit.start as usize]);
        out.push_str(&edit.text);
        cursor = edit.end;
    }
    out.push_str(&source[cursor as usize..]);
    out
}

// --- Imports ---

fn collect_import_edits(doc: &Document, edits: &mut Vec<Edit>) {
    let order = &doc.import_order;
    let parsed_at = |i: usize| doc.import(order[i]).origin.span().is_some();

    // Inserted declarations hang off the nearest parsed declaration: before the
    // next one if there is one, otherwise after the previous one.
    let mut before: Vec<Vec<String>> = vec![Vec::new(); order.len()];
    let mut after: Vec<Vec<String>> = vec![Vec::new(); order.len()];
    let mut unanchored = Vec::new();

    for (i, id) in order.iter().enumerate() {
        let decl = doc.import(*id);
        if decl.origin.span().is_some() || decl.is_removed() {
            continue;
        }
        let rendered = render_import(decl);
        if let Some(next) = (i + 1..order.len()).find(|j| parsed_at(*j)) {
            before[next].push(rendered);
        } else if let Some(prev) = (0..i).rev().find(|j| parsed_at(*j)) {
            after[prev].push(rendered);
        } else {
            unanchored.push(rendered);
        }
    }

    for (i, id) in order.iter().enumerate() {
        let decl = doc.import(*id);
        let Origin::Parsed(span) = decl.origin else {
            continue;
        };
        if decl.state == NodeState::Pristine && before[i].is_empty() && after[i].is_empty() {
            continue;
        }

        let own = match decl.state {
            NodeState::Pristine => Some(span.source_text(&doc.source).to_string()),
            NodeState::Modified => Some(render_import(decl)),
            NodeState::Removed => None,
        };
        let parts: Vec<String> = before[i]
            .iter()
            .cloned()
            .chain(own)
            .chain(after[i].iter().cloned())
            .collect();

        if parts.is_empty() {
            edits.push(Edit::delete(span.start, end_of_line(&doc.source, span.end)));
        } else {
            edits.push(Edit::replace(span.start, span.end, parts.join("\n")));
        }
    }

    if !unanchored.is_empty() {
        let mut text = unanchored.join("\n");
        text.push('\n');
        edits.push(Edit::insert(0, text));
    }
}

/// Offset just past the line break following `pos`, if only whitespace is in between.
fn end_of_line(source: &str, pos: u32) -> u32 {
    let rest = &source[pos as usize..];
    let trimmed = rest.trim_start_matches([' ', '\t']);
    let skipped = (rest.len() - trimmed.len()) as u32;
    if trimmed.starts_with("\r\n") {
        pos + skipped + 2
    } else if trimmed.starts_with('\n') {
        pos + skipped + 1
    } else {
        pos
    }
}

pub(crate) fn render_import(decl: &ImportDecl) -> String {
    let mut out = String::from("import ");
    if decl.type_only {
        out.push_str("type ");
    }

    let mut clauses = Vec::new();
    if let Some(default) = &decl.default_binding {
        clauses.push(default.clone());
    }
    if let Some(namespace) = &decl.namespace_binding {
        clauses.push(format!("* as {}", namespace));
    }
    if !decl.specifiers.is_empty() {
        let specifiers: Vec<String> = decl
            .specifiers
            .iter()
            .map(|s| {
                let mut spec = String::new();
                if s.type_only && !decl.type_only {
                    spec.push_str("type ");
                }
                if is_identifier(&s.imported) {
                    spec.push_str(&s.imported);
                } else {
                    spec.push_str(&format!("{q}{}{q}", s.imported, q = decl.quote));
                }
                if s.is_aliased() {
                    spec.push_str(" as ");
                    spec.push_str(&s.local);
                }
                spec
            })
            .collect();
        clauses.push(format!("{{ {} }}", specifiers.join(", ")));
    }

    if clauses.is_empty() {
        out = String::from("import ");
    } else {
        out.push_str(&clauses.join(", "));
        out.push_str(" from ");
    }
    out.push(decl.quote);
    out.push_str(&decl.source);
    out.push(decl.quote);
    if decl.semicolon {
        out.push(';');
    }
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

// --- Elements ---

fn collect_element_edits(doc: &Document, id: ElementId, element: &JsxElement, edits: &mut Vec<Edit>) {
    if !element.leading_comments.is_empty() {
        edits.push(Edit::insert(element.span.start, leading_comments(doc, element)));
    }

    if element.is_renamed() {
        edits.push(Edit::replace(
            element.name_span.start,
            element.name_span.end,
            element.name.clone(),
        ));
        if let Some(closing) = element.closing_name_span {
            edits.push(Edit::replace(closing.start, closing.end, element.name.clone()));
        }
    }

    for attr_id in &element.attributes {
        let attr = doc.attr(*attr_id);
        debug_assert_eq!(attr.element, id);
        match (attr.origin, attr.state) {
            (_, NodeState::Pristine) => {}
            (Origin::Parsed(span), NodeState::Removed) => {
                edits.push(Edit::delete(attr.removal_start, span.end));
            }
            (Origin::Parsed(_), NodeState::Modified) => {
                if attr.name_changed {
                    edits.push(Edit::replace(
                        attr.name_span.start,
                        attr.name_span.end,
                        attr.name.clone(),
                    ));
                }
                if attr.value_changed {
                    match (attr.value_span, &attr.value) {
                        (Some(span), Some(value)) => {
                            edits.push(Edit::replace(span.start, span.end, value.to_string()));
                        }
                        (Some(span), None) => {
                            edits.push(Edit::delete(attr.name_span.end, span.end));
                        }
                        (None, Some(value)) => {
                            edits.push(Edit::insert(attr.name_span.end, format!("={}", value)));
                        }
                        (None, None) => {}
                    }
                }
            }
            (Origin::Inserted, NodeState::Removed) => {}
            (Origin::Inserted, NodeState::Modified) => {
                let text = match &attr.value {
                    Some(value) => format!(" {}={}", attr.name, value),
                    None => format!(" {}", attr.name),
                };
                edits.push(Edit::insert(element.attr_insert_at, text));
            }
        }
    }
}

fn leading_comments(doc: &Document, element: &JsxElement) -> String {
    let indent = line_indent(&doc.source, element.span.start);
    let mut out = String::new();
    for comment in &element.leading_comments {
        let body = comment.replace("*/", "* /");
        if element.in_jsx_children {
            out.push_str(&format!("{{/* {} */}}", body));
        } else {
            out.push_str(&format!("/* {} */", body));
        }
        match indent {
            Some(indent) => {
                out.push('\n');
                out.push_str(indent);
            }
            // Whitespace between JSX children is visible text.
            None if element.in_jsx_children => {}
            None => out.push(' '),
        }
    }
    out
}

/// Indentation of the line containing `pos` when only whitespace precedes it.
fn line_indent(source: &str, pos: u32) -> Option<&str> {
    let before = &source[..pos as usize];
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let prefix = &before[line_start..];
    prefix.chars().all(|c| c == ' ' || c == '\t').then_some(prefix)
}
