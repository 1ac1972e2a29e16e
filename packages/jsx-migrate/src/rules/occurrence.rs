//! Read-only views handed to rule functions.

use std::path::Path;

use jsx_tree::{AttrValue, Document, ElementId, JsxAttribute, Scalar};

use crate::repo::RepoMetadata;

/// Per-file, read-only context passed to every rule function.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub file_path: &'a Path,
    pub source_package: &'a str,
    pub target_package: &'a str,
    pub repo: Option<&'a dyn RepoMetadata>,
}

impl<'a> RuleContext<'a> {
    /// Link to the current file in the repository browser, when known.
    pub fn file_url(&self) -> Option<String> {
        self.repo.and_then(|repo| repo.file_url(self.file_path))
    }
}

/// One usage of a component in the file being migrated.
#[derive(Clone, Copy)]
pub struct Occurrence<'d> {
    doc: &'d Document,
    element: ElementId,
}

impl<'d> Occurrence<'d> {
    pub fn new(doc: &'d Document, element: ElementId) -> Self {
        Self { doc, element }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn document(&self) -> &'d Document {
        self.doc
    }

    /// Current tag name.
    pub fn tag_name(&self) -> &'d str {
        &self.doc.element(self.element).name
    }

    pub fn attribute(&self, name: &str) -> Option<&'d JsxAttribute> {
        self.doc
            .attribute(self.element, name)
            .map(|id| self.doc.attr(id))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn value(&self, name: &str) -> Option<&'d AttrValue> {
        self.attribute(name).and_then(|a| a.value.as_ref())
    }

    /// Literal value of an attribute; a bare attribute reads as `true`.
    pub fn literal(&self, name: &str) -> Option<Scalar> {
        let attr = self.attribute(name)?;
        match &attr.value {
            None => Some(Scalar::Bool(true)),
            Some(value) => value.literal(),
        }
    }

    pub fn attribute_names(&self) -> Vec<&'d str> {
        self.doc
            .attributes(self.element)
            .filter(|(_, a)| !a.spread)
            .map(|(_, a)| a.name.as_str())
            .collect()
    }

    pub fn has_spread(&self) -> bool {
        self.doc.has_spread(self.element)
    }

    pub fn parent_name(&self) -> Option<&'d str> {
        self.doc
            .element(self.element)
            .parent
            .map(|p| self.doc.element(p).name.as_str())
    }

    /// `true` when any enclosing element is currently named `component`.
    pub fn is_within(&self, component: &str) -> bool {
        self.doc
            .ancestors(self.element)
            .any(|a| self.doc.element(a).name == component)
    }
}
