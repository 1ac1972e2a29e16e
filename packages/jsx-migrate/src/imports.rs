//! Import consolidator
//!
//! Keeps two things true for a file: the target module imports exactly one
//! specifier per `(declared, local)` pair a migration introduced, and the
//! source module keeps only the specifiers that still have unmigrated
//! occurrences.

use std::cmp::Ordering;
use std::collections::HashSet;

use indexmap::IndexSet;
use jsx_tree::{Document, ImportDecl, ImportId, ImportSpec};

/// A named import of a component from the source module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportCase {
    pub declared: String,
    pub local: String,
    /// The declaration or the specifier is `type`-only.
    pub type_only: bool,
}

/// Every distinct `(declared, local)` binding of `component` imported from
/// `source_module`, in declaration order.
pub fn find_import_cases(doc: &Document, source_module: &str, component: &str) -> Vec<ImportCase> {
    let mut cases: Vec<ImportCase> = Vec::new();
    for id in doc.imports_from(source_module) {
        let decl = doc.import(id);
        for spec in decl.specifiers.iter().filter(|s| s.imported == component) {
            if cases.iter().any(|c| c.local == spec.local) {
                continue;
            }
            cases.push(ImportCase {
                declared: spec.imported.clone(),
                local: spec.local.clone(),
                type_only: decl.type_only || spec.type_only,
            });
        }
    }
    cases
}

/// A source binding and the target binding replacing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationCase {
    pub declared: String,
    pub local: String,
    pub new_declared: String,
    pub new_local: String,
    pub type_only: bool,
}

impl MigrationCase {
    /// An aliased binding keeps its alias; otherwise the local name follows
    /// the new declared name.
    pub fn new(case: &ImportCase, new_declared: impl Into<String>) -> Self {
        let new_declared = new_declared.into();
        let new_local = if case.declared != case.local {
            case.local.clone()
        } else {
            new_declared.clone()
        };
        Self {
            declared: case.declared.clone(),
            local: case.local.clone(),
            new_declared,
            new_local,
            type_only: case.type_only,
        }
    }

    /// Binding for a case with no JSX occurrence to rename: the local name
    /// stays, so type positions and value references keep resolving.
    pub fn keeping_local(case: &ImportCase, new_declared: impl Into<String>) -> Self {
        Self {
            declared: case.declared.clone(),
            local: case.local.clone(),
            new_declared: new_declared.into(),
            new_local: case.local.clone(),
            type_only: case.type_only,
        }
    }
}

/// Alphabetical by local name, case-insensitive, then byte order.
pub fn compare_specifiers(a: &ImportSpec, b: &ImportSpec) -> Ordering {
    a.local
        .to_lowercase()
        .cmp(&b.local.to_lowercase())
        .then_with(|| a.local.cmp(&b.local))
        .then_with(|| a.imported.cmp(&b.imported))
}

pub fn sort_specifiers(specifiers: &mut [ImportSpec]) {
    specifiers.sort_by(compare_specifiers);
}

/// Quote and semicolon style of a neighboring declaration.
fn styled_like(decl: ImportDecl, neighbor: Option<&ImportDecl>) -> ImportDecl {
    match neighbor {
        Some(n) => decl.with_quote(n.quote()).with_semicolon(n.has_semicolon()),
        None => decl,
    }
}

pub struct ImportConsolidator {
    source_module: String,
    target_module: String,
    migrated: IndexSet<(String, String)>,
}

impl ImportConsolidator {
    pub fn new(source_module: impl Into<String>, target_module: impl Into<String>) -> Self {
        Self {
            source_module: source_module.into(),
            target_module: target_module.into(),
            migrated: IndexSet::new(),
        }
    }

    /// Record that `(declared, local)` had a migrated occurrence, without
    /// touching the target module.
    pub fn mark_migrated(&mut self, declared: &str, local: &str) {
        self.migrated
            .insert((declared.to_string(), local.to_string()));
    }

    /// Make sure the target module imports the case's new binding.
    ///
    /// Returns `false` when an equal specifier was already imported.
    pub fn add(&mut self, doc: &mut Document, case: &MigrationCase) -> bool {
        self.mark_migrated(&case.declared, &case.local);

        let targets = doc.imports_from(&self.target_module);
        let already_imported = targets.iter().any(|id| {
            doc.import(*id)
                .find_specifier(&case.new_declared, &case.new_local)
                .is_some()
        });
        if already_imported {
            return false;
        }

        let spec = ImportSpec::new(&case.new_declared, &case.new_local);
        let mergeable = |id: &ImportId| {
            let decl = doc.import(*id);
            decl.namespace_binding.is_none() && decl.type_only == case.type_only
        };

        if let Some(id) = targets.iter().copied().find(mergeable) {
            let mut specifiers = doc.import(id).specifiers.clone();
            specifiers.push(spec);
            sort_specifiers(&mut specifiers);
            doc.set_import_specifiers(id, specifiers);
            return true;
        }

        if case.type_only {
            let value_import = targets.iter().copied().find(|id| {
                let decl = doc.import(*id);
                !decl.type_only && decl.namespace_binding.is_none()
            });
            if let Some(anchor) = value_import {
                let decl = styled_like(
                    ImportDecl::new(&self.target_module, true, vec![spec]),
                    Some(doc.import(anchor)),
                );
                doc.insert_import_after(anchor, decl);
                return true;
            }
        }

        let decl = styled_like(
            ImportDecl::new(&self.target_module, case.type_only, vec![spec]),
            doc.imports().next().map(|(_, d)| d),
        );
        doc.insert_import_first(decl);
        true
    }

    /// Drop source specifiers whose local name has no unmigrated occurrence
    /// left; delete declarations that end up importing nothing.
    pub fn finish(self, doc: &mut Document, retained: &HashSet<String>) {
        for id in doc.imports_from(&self.source_module) {
            let decl = doc.import(id);
            let mut kept: Vec<ImportSpec> = decl
                .specifiers
                .iter()
                .filter(|s| {
                    retained.contains(&s.local)
                        || !self.migrated.contains(&(s.imported.clone(), s.local.clone()))
                })
                .cloned()
                .collect();
            if kept.len() == decl.specifiers.len() {
                continue;
            }
            if kept.is_empty() && decl.default_binding.is_none() && decl.namespace_binding.is_none() {
                doc.remove_import(id);
            } else {
                sort_specifiers(&mut kept);
                doc.set_import_specifiers(id, kept);
            }
        }
    }
}
