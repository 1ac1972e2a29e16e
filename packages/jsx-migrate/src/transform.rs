//! Property transformer
//!
//! Resolves the new name and value of one attribute from a declarative
//! [`ValueMapping`]: literal extraction, global passthrough values, enum
//! remapping, a custom scalar callback, and a fallback to an unsafe or
//! review-me name. Object literals are treated as responsive values and
//! transformed per breakpoint.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use jsx_tree::{AttrValue, JsExpr, ObjectLiteral, Scalar};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::TransformError;
use crate::rules::{PropChange, PropContext, PropName, PropTarget, PropUpdate, PropertyMapper};

/// CSS-wide keywords valid for any style property.
pub const GLOBAL_VALUES: &[&str] = &["inherit", "initial", "revert", "revert-layer", "unset"];

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// How a source enum key is spelled in the target library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyTransform {
    #[default]
    None,
    Lowercase,
    Uppercase,
    KebabCase,
    CamelCase,
}

impl KeyTransform {
    pub fn apply(&self, key: &str) -> String {
        match self {
            KeyTransform::None => key.to_string(),
            KeyTransform::Lowercase => key.to_lowercase(),
            KeyTransform::Uppercase => key.to_uppercase(),
            KeyTransform::KebabCase => CAMEL_BOUNDARY
                .replace_all(key, "$1-$2")
                .replace('_', "-")
                .to_lowercase(),
            KeyTransform::CamelCase => {
                let mut out = String::with_capacity(key.len());
                let mut upper = false;
                for c in key.chars() {
                    if c == '-' || c == '_' {
                        upper = true;
                    } else if upper {
                        out.extend(c.to_uppercase());
                        upper = false;
                    } else {
                        out.push(c);
                    }
                }
                out
            }
        }
    }
}

/// Source and target key sets of an enum-valued property.
#[derive(Debug, Clone, Default)]
pub struct EnumTable {
    pub source: IndexSet<String>,
    pub target: IndexSet<String>,
    pub transform: KeyTransform,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EnumResolution {
    Same,
    Rewrite(String),
}

impl EnumTable {
    pub fn new<S, T>(source: S, target: T, transform: KeyTransform) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            source: source.into_iter().map(Into::into).collect(),
            target: target.into_iter().map(Into::into).collect(),
            transform,
        }
    }

    fn resolve(&self, key: &str) -> Option<EnumResolution> {
        if !self.source.contains(key) {
            return None;
        }
        if self.target.contains(key) {
            return Some(EnumResolution::Same);
        }
        let transformed = self.transform.apply(key);
        self.target
            .contains(&transformed)
            .then_some(EnumResolution::Rewrite(transformed))
    }
}

pub type ScalarMapper = Arc<dyn Fn(&Scalar, &PropContext<'_>) -> Option<PropChange> + Send + Sync>;

/// Declarative options for transforming one property's values.
#[derive(Clone)]
pub struct ValueMapping {
    /// Name used when the value maps cleanly; defaults to the original name.
    pub target_name: Option<String>,
    /// Escape-hatch name used when no rule covers the value.
    pub unsafe_name: Option<String>,
    pub global_values: Vec<String>,
    pub enum_table: Option<EnumTable>,
    pub custom: Option<ScalarMapper>,
}

impl Default for ValueMapping {
    fn default() -> Self {
        Self {
            target_name: None,
            unsafe_name: None,
            global_values: GLOBAL_VALUES.iter().map(|v| v.to_string()).collect(),
            enum_table: None,
            custom: None,
        }
    }
}

impl fmt::Debug for ValueMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueMapping")
            .field("target_name", &self.target_name)
            .field("unsafe_name", &self.unsafe_name)
            .field("global_values", &self.global_values)
            .field("enum_table", &self.enum_table)
            .field("custom", &self.custom.as_ref().map(|_| ".."))
            .finish()
    }
}

impl ValueMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }

    pub fn unsafe_name(mut self, name: impl Into<String>) -> Self {
        self.unsafe_name = Some(name.into());
        self
    }

    pub fn enum_table(mut self, table: EnumTable) -> Self {
        self.enum_table = Some(table);
        self
    }

    pub fn global_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.global_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn custom<F>(mut self, f: F) -> Self
    where
        F: Fn(&Scalar, &PropContext<'_>) -> Option<PropChange> + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(f));
        self
    }

    pub fn into_mapper(self) -> PropertyMapper {
        let mapping = Arc::new(self);
        Arc::new(move |value: Option<&AttrValue>, ctx: &PropContext<'_>| {
            transform(value, &mapping, ctx)
        })
    }

    pub fn into_target(self) -> PropTarget {
        PropTarget::Mapper(self.into_mapper())
    }
}

/// How a new scalar should be written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueShape {
    /// `name="…"`
    AttrString,
    /// `name={…}`
    Expression,
}

impl ValueShape {
    fn of(value: Option<&AttrValue>) -> Self {
        match value {
            Some(AttrValue::Str(_)) => ValueShape::AttrString,
            _ => ValueShape::Expression,
        }
    }

    fn wrap(self, scalar: Scalar) -> AttrValue {
        match (self, scalar) {
            (ValueShape::AttrString, Scalar::Str(s)) => AttrValue::Str(s),
            (_, scalar) => AttrValue::scalar(scalar),
        }
    }
}

enum Extracted<'v> {
    Literal(Scalar),
    Responsive(&'v ObjectLiteral),
    Unresolvable(String),
}

fn extract(value: Option<&AttrValue>) -> Extracted<'_> {
    match value {
        None => Extracted::Literal(Scalar::Bool(true)),
        Some(AttrValue::Str(s)) => Extracted::Literal(Scalar::Str(s.clone())),
        Some(AttrValue::Expr(JsExpr::Scalar(s))) => Extracted::Literal(s.clone()),
        Some(AttrValue::Expr(JsExpr::Object(o))) => Extracted::Responsive(o),
        Some(AttrValue::Expr(JsExpr::Raw(raw))) => Extracted::Unresolvable(raw.clone()),
    }
}

/// Transform one attribute value. Never mutates `original`.
pub fn transform(
    original: Option<&AttrValue>,
    mapping: &ValueMapping,
    ctx: &PropContext<'_>,
) -> Result<PropChange, TransformError> {
    match extract(original) {
        Extracted::Literal(scalar) => Ok(transform_scalar(
            &scalar,
            mapping,
            ctx,
            ValueShape::of(original),
        )),
        Extracted::Responsive(object) => transform_responsive(object, mapping, ctx),
        Extracted::Unresolvable(raw) => {
            ctx.logger.warn(&format!(
                "{}: cannot resolve `{}` on <{}>, left as is: {}",
                ctx.rule.file_path.display(),
                ctx.prop_name,
                ctx.occurrence.tag_name(),
                raw
            ));
            Ok(PropChange::Keep)
        }
    }
}

fn transform_scalar(
    scalar: &Scalar,
    mapping: &ValueMapping,
    ctx: &PropContext<'_>,
    shape: ValueShape,
) -> PropChange {
    let key = scalar.as_key();
    let target = mapping.target_name.as_deref().unwrap_or(ctx.prop_name);

    if mapping.global_values.iter().any(|v| *v == key) {
        return PropChange::Keep;
    }

    if let Some(resolution) = mapping.enum_table.as_ref().and_then(|t| t.resolve(&key)) {
        return match resolution {
            EnumResolution::Same if target == ctx.prop_name => PropChange::Keep,
            EnumResolution::Same => PropUpdate::rename(PropName::named(target)).into(),
            EnumResolution::Rewrite(new_key) => PropUpdate::rename(PropName::named(target))
                .with_value(shape.wrap(Scalar::Str(new_key)))
                .into(),
        };
    }

    if let Some(change) = mapping.custom.as_ref().and_then(|f| f(scalar, ctx)) {
        return change;
    }

    let fallback = match &mapping.unsafe_name {
        Some(name) => PropName::Unsafe(name.clone()),
        None => PropName::Unresolved(ctx.prop_name.to_string()),
    };
    ctx.logger.debug(&format!(
        "{}: no rule for `{}={}` on <{}>, using `{}`",
        ctx.rule.file_path.display(),
        ctx.prop_name,
        key,
        ctx.occurrence.tag_name(),
        fallback
    ));
    PropUpdate::rename(fallback).into()
}

fn transform_responsive(
    object: &ObjectLiteral,
    mapping: &ValueMapping,
    ctx: &PropContext<'_>,
) -> Result<PropChange, TransformError> {
    let mut proposed: Vec<PropName> = Vec::new();
    let mut entries = Vec::with_capacity(object.entries.len());
    let mut value_changed = false;
    let mut todo_comments = Vec::new();
    let mut migration_notes = Vec::new();

    for entry in &object.entries {
        let Some(scalar) = entry.value.as_scalar() else {
            entries.push(entry.clone());
            continue;
        };
        match transform_scalar(scalar, mapping, ctx, ValueShape::Expression) {
            PropChange::Keep => entries.push(entry.clone()),
            PropChange::Remove => {
                return Err(TransformError::MalformedResponsive {
                    prop: ctx.prop_name.to_string(),
                    breakpoint: entry.key.clone(),
                    snippet: object.to_string(),
                });
            }
            PropChange::Update(update) => {
                let name = update
                    .to
                    .unwrap_or_else(|| PropName::named(ctx.prop_name));
                if !proposed.contains(&name) {
                    proposed.push(name);
                }
                match update.value.map(into_expr) {
                    Some(expr) if expr != entry.value => {
                        value_changed = true;
                        entries.push(entry.with_value(expr));
                    }
                    _ => entries.push(entry.clone()),
                }
                extend_unique(&mut todo_comments, update.todo_comments);
                extend_unique(&mut migration_notes, update.migration_notes);
            }
        }
    }

    let name = pick_name(&proposed).unwrap_or_else(|| PropName::named(ctx.prop_name));
    let renamed = name != PropName::named(ctx.prop_name);
    if !value_changed && !renamed {
        return Ok(PropChange::Keep);
    }

    Ok(PropUpdate {
        to: Some(name),
        value: value_changed.then(|| AttrValue::Expr(JsExpr::Object(ObjectLiteral::new(entries)))),
        todo_comments,
        migration_notes,
    }
    .into())
}

/// Highest priority wins; the first proposal wins ties.
fn pick_name(proposed: &[PropName]) -> Option<PropName> {
    proposed
        .iter()
        .fold(None::<&PropName>, |best, name| match best {
            Some(b) if b.priority() >= name.priority() => Some(b),
            _ => Some(name),
        })
        .cloned()
}

fn into_expr(value: AttrValue) -> JsExpr {
    match value {
        AttrValue::Str(s) => JsExpr::Scalar(Scalar::Str(s)),
        AttrValue::Expr(expr) => expr,
    }
}

fn extend_unique(into: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}
