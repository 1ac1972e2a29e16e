//! Component-level rules.

use std::fmt;
use std::sync::Arc;

use super::occurrence::{Occurrence, RuleContext};
use super::props::PropsMeta;

/// Candidate rule: claims an occurrence with metadata or declines with `None`.
pub type CandidateFn =
    Arc<dyn Fn(&Occurrence<'_>, &RuleContext<'_>) -> Option<ComponentMeta> + Send + Sync>;

pub type TodoFn = Arc<dyn Fn(&Occurrence<'_>, &RuleContext<'_>) -> Vec<String> + Send + Sync>;

/// Inline review comments attached to each migrated occurrence.
#[derive(Clone)]
pub enum TodoComments {
    Text(String),
    List(Vec<String>),
    Computed(TodoFn),
}

impl TodoComments {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Occurrence<'_>, &RuleContext<'_>) -> Vec<String> + Send + Sync + 'static,
    {
        TodoComments::Computed(Arc::new(f))
    }

    pub fn resolve(&self, occurrence: &Occurrence<'_>, ctx: &RuleContext<'_>) -> Vec<String> {
        match self {
            TodoComments::Text(text) => vec![text.clone()],
            TodoComments::List(list) => list.clone(),
            TodoComments::Computed(f) => f(occurrence, ctx),
        }
    }
}

impl From<&str> for TodoComments {
    fn from(text: &str) -> Self {
        TodoComments::Text(text.to_string())
    }
}

impl From<String> for TodoComments {
    fn from(text: String) -> Self {
        TodoComments::Text(text)
    }
}

impl From<Vec<String>> for TodoComments {
    fn from(list: Vec<String>) -> Self {
        TodoComments::List(list)
    }
}

impl fmt::Debug for TodoComments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoComments::Text(text) => f.debug_tuple("Text").field(text).finish(),
            TodoComments::List(list) => f.debug_tuple("List").field(list).finish(),
            TodoComments::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Resolved rule for one occurrence.
#[derive(Debug, Clone, Default)]
pub struct ComponentMeta {
    /// Target component name; defaults to the source name.
    pub to: Option<String>,
    pub props: Option<PropsMeta>,
    pub todo_comments: Option<TodoComments>,
    pub migration_notes: Vec<String>,
    /// Rename call sites but never touch the target module's imports.
    pub skip_import: bool,
}

impl ComponentMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to(name: impl Into<String>) -> Self {
        Self {
            to: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_props(mut self, props: PropsMeta) -> Self {
        self.props = Some(props);
        self
    }

    pub fn with_todo(mut self, comments: impl Into<TodoComments>) -> Self {
        self.todo_comments = Some(comments.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.migration_notes.push(note.into());
        self
    }

    pub fn skip_import(mut self) -> Self {
        self.skip_import = true;
        self
    }

    /// Target declared name for a component called `source_name`.
    pub fn target_name<'s>(&'s self, source_name: &'s str) -> &'s str {
        self.to.as_deref().unwrap_or(source_name)
    }
}

/// Rule of one component in the mapping table.
#[derive(Clone)]
pub enum ComponentRule {
    /// Plain rename, no property changes.
    Alias(String),
    Static(ComponentMeta),
    /// Evaluated in order per occurrence; the first defined result wins.
    Candidates(Vec<CandidateFn>),
}

impl ComponentRule {
    pub fn alias(to: impl Into<String>) -> Self {
        ComponentRule::Alias(to.into())
    }

    pub fn candidates(candidates: impl IntoIterator<Item = CandidateFn>) -> Self {
        ComponentRule::Candidates(candidates.into_iter().collect())
    }
}

impl From<ComponentMeta> for ComponentRule {
    fn from(meta: ComponentMeta) -> Self {
        ComponentRule::Static(meta)
    }
}

impl fmt::Debug for ComponentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentRule::Alias(to) => f.debug_tuple("Alias").field(to).finish(),
            ComponentRule::Static(meta) => f.debug_tuple("Static").field(meta).finish(),
            ComponentRule::Candidates(list) => write!(f, "Candidates({} fns)", list.len()),
        }
    }
}

/// Wrap a closure as a [`CandidateFn`].
pub fn candidate<F>(f: F) -> CandidateFn
where
    F: Fn(&Occurrence<'_>, &RuleContext<'_>) -> Option<ComponentMeta> + Send + Sync + 'static,
{
    Arc::new(f)
}
