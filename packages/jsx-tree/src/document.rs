//! Document
//!
//! The query/mutation facade over one parsed source file. Nodes are stored in
//! arenas and addressed by handles, so a rename or an attribute removal never
//! invalidates a handle obtained earlier (parent scans keep working after the
//! tree has been edited).

use std::path::{Path, PathBuf};

use crate::error::ParseError;
use crate::node::{
    AttrId, ElementId, ImportDecl, ImportId, ImportSpec, JsxAttribute, JsxElement, NodeState,
    Origin, Span,
};
use crate::value::AttrValue;

#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) source: String,
    pub(crate) path: PathBuf,
    pub(crate) elements: Vec<JsxElement>,
    pub(crate) attributes: Vec<JsxAttribute>,
    pub(crate) imports: Vec<ImportDecl>,
    /// Statement order of the import declarations, inserted ones included.
    pub(crate) import_order: Vec<ImportId>,
}

impl Document {
    /// Parse `source` as JSX/TSX. The dialect is derived from `path`.
    pub fn parse(source: &str, path: impl AsRef<Path>) -> Result<Self, ParseError> {
        crate::parser::parse(source, path.as_ref())
    }

    pub(crate) fn empty(source: &str, path: &Path) -> Self {
        Self {
            source: source.to_string(),
            path: path.to_path_buf(),
            elements: Vec::new(),
            attributes: Vec::new(),
            imports: Vec::new(),
            import_order: Vec::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Print the document with every edit applied.
    pub fn print(&self) -> String {
        crate::printer::print(self)
    }

    /// `true` once any node has been edited.
    pub fn is_modified(&self) -> bool {
        self.elements
            .iter()
            .any(|e| e.is_renamed() || !e.leading_comments.is_empty())
            || self
                .attributes
                .iter()
                .any(|a| a.state != NodeState::Pristine)
            || self.imports.iter().any(|i| i.state != NodeState::Pristine)
    }

    // --- Elements ---

    pub fn element(&self, id: ElementId) -> &JsxElement {
        &self.elements[id.index()]
    }

    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &JsxElement)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i as u32), e))
    }

    /// Elements whose tag was written as `name`, in document order.
    pub fn elements_named(&self, name: &str) -> Vec<ElementId> {
        self.elements()
            .filter(|(_, e)| e.original_name == name)
            .map(|(id, _)| id)
            .collect()
    }

    /// Enclosing elements, innermost first.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.element(id).parent, move |p| self.element(*p).parent)
    }

    pub fn rename_element(&mut self, id: ElementId, name: impl Into<String>) {
        self.elements[id.index()].name = name.into();
    }

    /// Attach a block comment printed right before the opening tag.
    pub fn add_leading_comment(&mut self, id: ElementId, text: impl Into<String>) {
        self.elements[id.index()].leading_comments.push(text.into());
    }

    // --- Attributes ---

    pub fn attr(&self, id: AttrId) -> &JsxAttribute {
        &self.attributes[id.index()]
    }

    /// Live attributes of an element in order, spreads included.
    pub fn attributes(&self, element: ElementId) -> impl Iterator<Item = (AttrId, &JsxAttribute)> {
        self.element(element)
            .attributes
            .iter()
            .map(move |id| (*id, self.attr(*id)))
            .filter(|(_, a)| !a.is_removed())
    }

    /// First live, non-spread attribute called `name`.
    pub fn attribute(&self, element: ElementId, name: &str) -> Option<AttrId> {
        self.attributes(element)
            .find(|(_, a)| !a.spread && a.name == name)
            .map(|(id, _)| id)
    }

    pub fn has_spread(&self, element: ElementId) -> bool {
        self.attributes(element).any(|(_, a)| a.spread)
    }

    pub fn set_attribute_name(&mut self, id: AttrId, name: impl Into<String>) {
        let name = name.into();
        let attr = &mut self.attributes[id.index()];
        if attr.spread || attr.is_removed() || attr.name == name {
            return;
        }
        attr.name = name;
        attr.name_changed = true;
        attr.state = NodeState::Modified;
    }

    pub fn set_attribute_value(&mut self, id: AttrId, value: Option<AttrValue>) {
        let attr = &mut self.attributes[id.index()];
        if attr.spread || attr.is_removed() || attr.value == value {
            return;
        }
        attr.value = value;
        attr.value_changed = true;
        attr.state = NodeState::Modified;
    }

    pub fn remove_attribute(&mut self, id: AttrId) {
        self.attributes[id.index()].state = NodeState::Removed;
    }

    /// Append a new attribute after the existing ones.
    pub fn add_attribute(
        &mut self,
        element: ElementId,
        name: impl Into<String>,
        value: Option<AttrValue>,
    ) -> AttrId {
        let id = AttrId(self.attributes.len() as u32);
        self.attributes.push(JsxAttribute {
            element,
            name: name.into(),
            value,
            spread: false,
            origin: Origin::Inserted,
            state: NodeState::Modified,
            name_span: Span::default(),
            value_span: None,
            removal_start: 0,
            name_changed: true,
            value_changed: true,
        });
        self.elements[element.index()].attributes.push(id);
        id
    }

    // --- Imports ---

    pub fn import(&self, id: ImportId) -> &ImportDecl {
        &self.imports[id.index()]
    }

    /// Live import declarations in statement order.
    pub fn imports(&self) -> impl Iterator<Item = (ImportId, &ImportDecl)> {
        self.import_order
            .iter()
            .map(move |id| (*id, self.import(*id)))
            .filter(|(_, i)| !i.is_removed())
    }

    /// Live declarations importing from `module`, in statement order.
    pub fn imports_from(&self, module: &str) -> Vec<ImportId> {
        self.imports()
            .filter(|(_, i)| i.source == module)
            .map(|(id, _)| id)
            .collect()
    }

    /// Replace the named specifiers of a declaration.
    pub fn set_import_specifiers(&mut self, id: ImportId, specifiers: Vec<ImportSpec>) {
        let decl = &mut self.imports[id.index()];
        if decl.specifiers == specifiers {
            return;
        }
        decl.specifiers = specifiers;
        decl.state = NodeState::Modified;
    }

    pub fn remove_import(&mut self, id: ImportId) {
        self.imports[id.index()].state = NodeState::Removed;
    }

    /// Insert a declaration before every other import.
    pub fn insert_import_first(&mut self, decl: ImportDecl) -> ImportId {
        let id = self.push_import(decl);
        self.import_order.insert(0, id);
        id
    }

    /// Insert a declaration immediately after `anchor`.
    pub fn insert_import_after(&mut self, anchor: ImportId, decl: ImportDecl) -> ImportId {
        let id = self.push_import(decl);
        let position = self
            .import_order
            .iter()
            .position(|i| *i == anchor)
            .map(|p| p + 1)
            .unwrap_or(self.import_order.len());
        self.import_order.insert(position, id);
        id
    }

    pub(crate) fn push_import(&mut self, decl: ImportDecl) -> ImportId {
        let id = ImportId(self.imports.len() as u32);
        self.imports.push(decl);
        id
    }
}
