//! OXC front-end
//!
//! Parses a source file with `oxc_parser` and lowers the parts the engine
//! works on (top-level imports, JSX elements and their attributes) into the
//! document arenas. The oxc AST is dropped once lowering is done; every node
//! keeps its byte span so the printer can splice edits into the original text.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Expression, ImportDeclaration, ImportDeclarationSpecifier, JSXAttributeItem,
    JSXAttributeValue, JSXChild, JSXElement, ModuleExportName, ObjectExpression,
    ObjectPropertyKind, Statement,
};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};
use oxc_syntax::operator::UnaryOperator;
use smallvec::SmallVec;

use crate::document::Document;
use crate::error::ParseError;
use crate::node::{
    AttrId, ElementId, ImportDecl, ImportSpec, JsxAttribute, JsxElement, NodeState, Origin, Span,
};
use crate::value::{AttrValue, JsExpr, ObjectEntry, ObjectLiteral, Scalar};

pub(crate) fn parse(source: &str, path: &Path) -> Result<Document, ParseError> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::tsx());
    let ret = Parser::new(&allocator, source, source_type).parse();

    let display = path.display().to_string();
    if ret.panicked {
        return Err(ParseError::Panicked { path: display });
    }
    if !ret.errors.is_empty() {
        return Err(ParseError::Syntax {
            path: display,
            messages: ret.errors.iter().map(|e| e.to_string()).collect(),
        });
    }

    let mut doc = Document::empty(source, path);

    for stmt in &ret.program.body {
        if let Statement::ImportDeclaration(decl) = stmt {
            let import = lower_import(source, decl);
            let id = doc.push_import(import);
            doc.import_order.push(id);
        }
    }

    let mut collector = ElementCollector {
        source,
        doc: &mut doc,
        stack: Vec::new(),
        direct_child: false,
    };
    collector.visit_program(&ret.program);

    Ok(doc)
}

fn lower_import(source: &str, decl: &ImportDeclaration<'_>) -> ImportDecl {
    let span = Span::from(decl.span);
    let quote = source[decl.source.span.start as usize..]
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .unwrap_or('"');

    let mut import = ImportDecl {
        source: decl.source.value.to_string(),
        type_only: decl.import_kind.is_type(),
        default_binding: None,
        namespace_binding: None,
        specifiers: Vec::new(),
        origin: Origin::Parsed(span),
        state: NodeState::Pristine,
        quote,
        semicolon: span.source_text(source).trim_end().ends_with(';'),
    };

    if let Some(specifiers) = &decl.specifiers {
        for specifier in specifiers {
            match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    import.specifiers.push(ImportSpec {
                        imported: module_export_name(&s.imported),
                        local: s.local.name.to_string(),
                        type_only: s.import_kind.is_type(),
                    });
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    import.default_binding = Some(s.local.name.to_string());
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                    import.namespace_binding = Some(s.local.name.to_string());
                }
            }
        }
    }

    import
}

fn module_export_name(name: &ModuleExportName<'_>) -> String {
    match name {
        ModuleExportName::IdentifierName(id) => id.name.to_string(),
        ModuleExportName::IdentifierReference(id) => id.name.to_string(),
        ModuleExportName::StringLiteral(s) => s.value.to_string(),
    }
}

/// Walks the program and records every JSX element with its parent.
struct ElementCollector<'s, 'd> {
    source: &'s str,
    doc: &'d mut Document,
    stack: Vec<ElementId>,
    /// Set while descending from a `JSXChild::Element` into its element.
    direct_child: bool,
}

impl<'a> Visit<'a> for ElementCollector<'_, '_> {
    fn visit_jsx_child(&mut self, it: &JSXChild<'a>) {
        if matches!(it, JSXChild::Element(_)) {
            self.direct_child = true;
        }
        walk::walk_jsx_child(self, it);
    }

    fn visit_jsx_element(&mut self, it: &JSXElement<'a>) {
        let in_jsx_children = std::mem::take(&mut self.direct_child);
        let id = self.record(it, in_jsx_children);
        self.stack.push(id);
        walk::walk_jsx_element(self, it);
        self.stack.pop();
    }
}

impl ElementCollector<'_, '_> {
    fn text(&self, span: oxc_span::Span) -> String {
        self.source[span.start as usize..span.end as usize].to_string()
    }

    fn record(&mut self, it: &JSXElement<'_>, in_jsx_children: bool) -> ElementId {
        let id = ElementId(self.doc.elements.len() as u32);
        let opening = &it.opening_element;
        let name_span = Span::from(opening.name.span());
        let name = name_span.source_text(self.source).to_string();

        let mut attributes = SmallVec::new();
        let mut attr_insert_at = tag_end(self.source, Span::from(opening.span));

        for item in &opening.attributes {
            let attr_id = AttrId(self.doc.attributes.len() as u32);
            let span = Span::from(item.span());
            let removal_start = span.start - leading_whitespace(self.source, span.start);
            let attribute = match item {
                JSXAttributeItem::Attribute(attr) => {
                    let attr_name_span = Span::from(attr.name.span());
                    JsxAttribute {
                        element: id,
                        name: attr_name_span.source_text(self.source).to_string(),
                        value: attr.value.as_ref().map(|v| self.lower_value(v)),
                        spread: false,
                        origin: Origin::Parsed(span),
                        state: NodeState::Pristine,
                        name_span: attr_name_span,
                        value_span: attr.value.as_ref().map(|v| Span::from(v.span())),
                        removal_start,
                        name_changed: false,
                        value_changed: false,
                    }
                }
                JSXAttributeItem::SpreadAttribute(_) => JsxAttribute {
                    element: id,
                    name: String::new(),
                    value: None,
                    spread: true,
                    origin: Origin::Parsed(span),
                    state: NodeState::Pristine,
                    name_span: span,
                    value_span: None,
                    removal_start,
                    name_changed: false,
                    value_changed: false,
                },
            };
            self.doc.attributes.push(attribute);
            attributes.push(attr_id);
            attr_insert_at = span.end;
        }

        self.doc.elements.push(JsxElement {
            name: name.clone(),
            original_name: name,
            span: Span::from(it.span),
            name_span,
            closing_name_span: it
                .closing_element
                .as_ref()
                .map(|c| Span::from(c.name.span())),
            parent: self.stack.last().copied(),
            in_jsx_children,
            attributes,
            attr_insert_at,
            leading_comments: Vec::new(),
        });
        id
    }

    fn lower_value(&self, value: &JSXAttributeValue<'_>) -> AttrValue {
        match value {
            JSXAttributeValue::StringLiteral(s) => AttrValue::Str(s.value.to_string()),
            JSXAttributeValue::ExpressionContainer(container) => {
                match container.expression.as_expression() {
                    Some(expr) => AttrValue::Expr(self.lower_expression(expr)),
                    None => {
                        let raw = self.text(container.span);
                        let inner = raw
                            .strip_prefix('{')
                            .and_then(|r| r.strip_suffix('}'))
                            .unwrap_or(&raw);
                        AttrValue::Expr(JsExpr::Raw(inner.to_string()))
                    }
                }
            }
            other => AttrValue::Expr(JsExpr::Raw(self.text(other.span()))),
        }
    }

    fn lower_expression(&self, expr: &Expression<'_>) -> JsExpr {
        match expr {
            Expression::StringLiteral(s) => Scalar::Str(s.value.to_string()).into(),
            Expression::NumericLiteral(n) => Scalar::Number(n.value).into(),
            Expression::BooleanLiteral(b) => Scalar::Bool(b.value).into(),
            Expression::RegExpLiteral(r) => Scalar::Regex(self.text(r.span)).into(),
            Expression::TemplateLiteral(t) if t.expressions.is_empty() && t.quasis.len() == 1 => {
                match &t.quasis[0].value.cooked {
                    Some(cooked) => Scalar::Str(cooked.to_string()).into(),
                    None => JsExpr::Raw(self.text(t.span)),
                }
            }
            Expression::UnaryExpression(u) if u.operator == UnaryOperator::UnaryNegation => {
                match &u.argument {
                    Expression::NumericLiteral(n) => Scalar::Number(-n.value).into(),
                    _ => JsExpr::Raw(self.text(u.span)),
                }
            }
            Expression::ParenthesizedExpression(p) => self.lower_expression(&p.expression),
            Expression::ObjectExpression(o) => match self.lower_object(o) {
                Some(object) => JsExpr::Object(object),
                None => JsExpr::Raw(self.text(o.span)),
            },
            other => JsExpr::Raw(self.text(other.span())),
        }
    }

    /// Objects with spreads, computed keys or methods stay raw.
    fn lower_object(&self, object: &ObjectExpression<'_>) -> Option<ObjectLiteral> {
        let mut entries = Vec::with_capacity(object.properties.len());
        for property in &object.properties {
            let ObjectPropertyKind::ObjectProperty(prop) = property else {
                return None;
            };
            if prop.computed || prop.method {
                return None;
            }
            let key = prop.key.static_name()?;
            entries.push(ObjectEntry {
                key: key.to_string(),
                key_raw: self.text(prop.key.span()),
                value: self.lower_expression(&prop.value),
                raw: Some(self.text(prop.span)),
            });
        }
        Some(ObjectLiteral::new(entries))
    }
}

/// Offset right after the tag name and type arguments of an opening tag,
/// i.e. before `>` or `/>`.
fn tag_end(source: &str, opening: Span) -> u32 {
    let text = opening.source_text(source);
    let text = text.strip_suffix('>').unwrap_or(text);
    let text = text.strip_suffix('/').unwrap_or(text);
    opening.start + text.trim_end().len() as u32
}

fn leading_whitespace(source: &str, pos: u32) -> u32 {
    let before = &source[..pos as usize];
    (before.len() - before.trim_end().len()) as u32
}
