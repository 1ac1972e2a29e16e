//! Arena nodes
//!
//! Every node lives in a per-kind arena owned by [`Document`](crate::Document)
//! and is addressed by a `Copy` handle. Handles stay valid for the lifetime of
//! the document: removing a node flips its [`NodeState`], it never reindexes
//! the arena.

use smallvec::SmallVec;

use crate::value::AttrValue;

/// Byte range in the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn source_text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start as usize..self.end as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<oxc_span::Span> for Span {
    fn from(span: oxc_span::Span) -> Self {
        Self::new(span.start, span.end)
    }
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_handle!(
    /// Handle to a [`JsxElement`].
    ElementId
);
define_handle!(
    /// Handle to a [`JsxAttribute`].
    AttrId
);
define_handle!(
    /// Handle to an [`ImportDecl`].
    ImportId
);

/// Lifecycle of a parsed or inserted node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    /// Untouched since parsing; printed verbatim from the source.
    #[default]
    Pristine,
    Modified,
    Removed,
}

/// Where a node comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Parsed(Span),
    Inserted,
}

impl Origin {
    pub fn span(&self) -> Option<Span> {
        match self {
            Origin::Parsed(span) => Some(*span),
            Origin::Inserted => None,
        }
    }
}

/// One JSX element (opening/closing tag pair or a self-closing tag).
#[derive(Debug, Clone)]
pub struct JsxElement {
    /// Current tag name.
    pub name: String,
    /// Tag name as written in the source.
    pub original_name: String,
    pub span: Span,
    pub name_span: Span,
    pub closing_name_span: Option<Span>,
    pub parent: Option<ElementId>,
    /// `true` when the element is a direct child of another element or fragment,
    /// which decides how leading comments are printed.
    pub in_jsx_children: bool,
    pub attributes: SmallVec<[AttrId; 4]>,
    /// Offset after the last parsed attribute (or the tag name) where new
    /// attributes are spliced in.
    pub(crate) attr_insert_at: u32,
    pub leading_comments: Vec<String>,
}

impl JsxElement {
    pub fn is_renamed(&self) -> bool {
        self.name != self.original_name
    }
}

/// A JSX attribute or spread attribute.
#[derive(Debug, Clone)]
pub struct JsxAttribute {
    pub element: ElementId,
    /// Attribute name; empty for spread attributes.
    pub name: String,
    pub value: Option<AttrValue>,
    pub spread: bool,
    pub origin: Origin,
    pub state: NodeState,
    pub(crate) name_span: Span,
    pub(crate) value_span: Option<Span>,
    /// Start of the whitespace preceding the attribute, so removal leaves no gap.
    pub(crate) removal_start: u32,
    pub(crate) name_changed: bool,
    pub(crate) value_changed: bool,
}

impl JsxAttribute {
    pub fn is_removed(&self) -> bool {
        self.state == NodeState::Removed
    }
}

/// One named binding of an import declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportSpec {
    /// Exported name in the imported module.
    pub imported: String,
    /// Binding name in this file.
    pub local: String,
    /// Specifier-level `type` modifier (`import { type X }`).
    pub type_only: bool,
}

impl ImportSpec {
    pub fn new(imported: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            imported: imported.into(),
            local: local.into(),
            type_only: false,
        }
    }

    pub fn with_type_only(mut self, type_only: bool) -> Self {
        self.type_only = type_only;
        self
    }

    pub fn is_aliased(&self) -> bool {
        self.imported != self.local
    }
}

/// A top-level `import` declaration.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub source: String,
    pub type_only: bool,
    pub default_binding: Option<String>,
    pub namespace_binding: Option<String>,
    pub specifiers: Vec<ImportSpec>,
    pub origin: Origin,
    pub state: NodeState,
    pub(crate) quote: char,
    pub(crate) semicolon: bool,
}

impl ImportDecl {
    /// A fresh declaration that does not exist in the source yet.
    pub fn new(source: impl Into<String>, type_only: bool, specifiers: Vec<ImportSpec>) -> Self {
        Self {
            source: source.into(),
            type_only,
            default_binding: None,
            namespace_binding: None,
            specifiers,
            origin: Origin::Inserted,
            state: NodeState::Modified,
            quote: '"',
            semicolon: true,
        }
    }

    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    pub fn quote(&self) -> char {
        self.quote
    }

    pub fn with_semicolon(mut self, semicolon: bool) -> Self {
        self.semicolon = semicolon;
        self
    }

    pub fn has_semicolon(&self) -> bool {
        self.semicolon
    }

    pub fn is_removed(&self) -> bool {
        self.state == NodeState::Removed
    }

    /// `true` when nothing would be left to import.
    pub fn is_empty(&self) -> bool {
        self.specifiers.is_empty()
            && self.default_binding.is_none()
            && self.namespace_binding.is_none()
    }

    pub fn find_specifier(&self, imported: &str, local: &str) -> Option<&ImportSpec> {
        self.specifiers
            .iter()
            .find(|s| s.imported == imported && s.local == local)
    }
}
