//! Property-level rules.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use jsx_tree::AttrValue;

use super::occurrence::{Occurrence, RuleContext};
use crate::error::TransformError;
use crate::logging::Logger;

/// Prefix of attribute names that still need a human decision.
pub const REVIEW_MARKER: &str = "MIGRATION_TODO_";

/// Target name proposed for an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropName {
    Named(String),
    /// Escape-hatch property of the target library.
    Unsafe(String),
    /// No rule covers the value; printed with [`REVIEW_MARKER`].
    Unresolved(String),
}

impl PropName {
    pub fn named(name: impl Into<String>) -> Self {
        PropName::Named(name.into())
    }

    /// Name written into the source.
    pub fn attribute_name(&self) -> String {
        match self {
            PropName::Named(name) | PropName::Unsafe(name) => name.clone(),
            PropName::Unresolved(name) => format!("{}{}", REVIEW_MARKER, name),
        }
    }

    pub fn needs_review(&self) -> bool {
        matches!(self, PropName::Unresolved(_))
    }

    /// Unsafe > Unresolved > Named when breakpoints disagree.
    pub(crate) fn priority(&self) -> u8 {
        match self {
            PropName::Unsafe(_) => 2,
            PropName::Unresolved(_) => 1,
            PropName::Named(_) => 0,
        }
    }
}

impl fmt::Display for PropName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.attribute_name())
    }
}

/// Rename and/or revalue an attribute. Omitted fields keep the original.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropUpdate {
    pub to: Option<PropName>,
    pub value: Option<AttrValue>,
    pub todo_comments: Vec<String>,
    pub migration_notes: Vec<String>,
}

impl PropUpdate {
    pub fn rename(to: PropName) -> Self {
        Self {
            to: Some(to),
            ..Self::default()
        }
    }

    pub fn value(value: AttrValue) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn with_to(mut self, to: PropName) -> Self {
        self.to = Some(to);
        self
    }

    pub fn with_value(mut self, value: AttrValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_todo(mut self, comment: impl Into<String>) -> Self {
        self.todo_comments.push(comment.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.migration_notes.push(note.into());
        self
    }
}

/// Result of a property mapper.
#[derive(Debug, Clone, PartialEq)]
pub enum PropChange {
    /// Leave the attribute untouched.
    Keep,
    Remove,
    Update(PropUpdate),
}

impl From<PropUpdate> for PropChange {
    fn from(update: PropUpdate) -> Self {
        PropChange::Update(update)
    }
}

/// What a property mapper can see.
#[derive(Clone, Copy)]
pub struct PropContext<'a> {
    /// Attribute name as written in the source.
    pub prop_name: &'a str,
    pub occurrence: Occurrence<'a>,
    pub rule: &'a RuleContext<'a>,
    pub logger: &'a dyn Logger,
}

pub type PropertyMapper = Arc<
    dyn Fn(Option<&AttrValue>, &PropContext<'_>) -> Result<PropChange, TransformError>
        + Send
        + Sync,
>;

pub type AdditionFn =
    Arc<dyn Fn(&Occurrence<'_>, &RuleContext<'_>) -> Option<AttrValue> + Send + Sync>;

/// How an attribute is mapped.
#[derive(Clone)]
pub enum PropTarget {
    Rename(String),
    Mapper(PropertyMapper),
}

impl PropTarget {
    pub fn rename(to: impl Into<String>) -> Self {
        PropTarget::Rename(to.into())
    }

    /// Mapper that cannot fail.
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(Option<&AttrValue>, &PropContext<'_>) -> PropChange + Send + Sync + 'static,
    {
        PropTarget::Mapper(Arc::new(
            move |value: Option<&AttrValue>, ctx: &PropContext<'_>| Ok(f(value, ctx)),
        ))
    }

    pub fn try_map<F>(f: F) -> Self
    where
        F: Fn(Option<&AttrValue>, &PropContext<'_>) -> Result<PropChange, TransformError>
            + Send
            + Sync
            + 'static,
    {
        PropTarget::Mapper(Arc::new(f))
    }
}

impl fmt::Debug for PropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropTarget::Rename(to) => f.debug_tuple("Rename").field(to).finish(),
            PropTarget::Mapper(_) => f.write_str("Mapper(..)"),
        }
    }
}

/// An attribute to add to every migrated occurrence.
#[derive(Clone)]
pub enum Addition {
    Value(AttrValue),
    /// Bare attribute (`<X isQuiet />`).
    Flag,
    /// Computed per occurrence; `None` skips the addition.
    Computed(AdditionFn),
}

impl Addition {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Occurrence<'_>, &RuleContext<'_>) -> Option<AttrValue> + Send + Sync + 'static,
    {
        Addition::Computed(Arc::new(f))
    }

    /// `None` when nothing should be added; `Some(None)` for a bare attribute.
    pub fn resolve(&self, occurrence: &Occurrence<'_>, ctx: &RuleContext<'_>) -> Option<Option<AttrValue>> {
        match self {
            Addition::Value(value) => Some(Some(value.clone())),
            Addition::Flag => Some(None),
            Addition::Computed(f) => f(occurrence, ctx).map(Some),
        }
    }
}

impl fmt::Debug for Addition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addition::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Addition::Flag => f.write_str("Flag"),
            Addition::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Property rules of one component (or the table-wide defaults).
#[derive(Debug, Clone, Default)]
pub struct PropsMeta {
    pub mappings: IndexMap<String, PropTarget>,
    pub additions: IndexMap<String, Addition>,
    pub removals: Vec<String>,
}

impl PropsMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.mappings.insert(from.into(), PropTarget::rename(to));
        self
    }

    pub fn mapping(mut self, from: impl Into<String>, target: PropTarget) -> Self {
        self.mappings.insert(from.into(), target);
        self
    }

    pub fn add(mut self, name: impl Into<String>, addition: Addition) -> Self {
        self.additions.insert(name.into(), addition);
        self
    }

    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.removals.push(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty() && self.additions.is_empty() && self.removals.is_empty()
    }
}
