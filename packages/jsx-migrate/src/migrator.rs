//! Orchestrator
//!
//! Drives one file through the whole migration: every component of the
//! table in declared order, every import binding of it in declaration order
//! and every occurrence in document order. The document is mutated in place;
//! imports are consolidated once all occurrences have been visited.

use std::collections::HashSet;
use std::path::Path;

use jsx_tree::{AttrId, AttrValue, Document, ElementId};

use crate::annotations::{attach_todo_comments, forward_migration_notes};
use crate::error::{MigrateError, TransformError};
use crate::imports::{find_import_cases, ImportConsolidator, MigrationCase};
use crate::logging::Logger;
use crate::notes::NotesSink;
use crate::repo::RepoMetadata;
use crate::resolver::MappingResolver;
use crate::rules::{
    ComponentMeta, MappingTable, Occurrence, PropChange, PropContext, PropTarget, RuleContext,
};

/// Collaborators of one file, built by the caller.
#[derive(Clone, Copy)]
pub struct FileContext<'a> {
    pub path: &'a Path,
    pub logger: &'a dyn Logger,
    pub notes: Option<&'a dyn NotesSink>,
    pub repo: Option<&'a dyn RepoMetadata>,
}

impl<'a> FileContext<'a> {
    pub fn new(path: &'a Path, logger: &'a dyn Logger) -> Self {
        Self {
            path,
            logger,
            notes: None,
            repo: None,
        }
    }

    pub fn with_notes(mut self, notes: &'a dyn NotesSink) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn with_repo(mut self, repo: &'a dyn RepoMetadata) -> Self {
        self.repo = Some(repo);
        self
    }
}

/// An attribute that could not be migrated and was left as written.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub component: String,
    pub prop: String,
    /// Byte offset of the element in the source.
    pub offset: u32,
    pub error: TransformError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileReport {
    /// Occurrences rewritten.
    pub migrated: usize,
    /// Occurrences no rule claimed.
    pub unresolved: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    pub code: String,
    pub changed: bool,
    pub report: FileReport,
}

pub struct Migrator<'t> {
    table: &'t MappingTable,
    resolver: MappingResolver<'t>,
}

/// Per-occurrence results that outlive the occurrence.
#[derive(Default)]
struct OccurrenceResult {
    todo_comments: Vec<String>,
    migration_notes: Vec<String>,
}

impl<'t> Migrator<'t> {
    pub fn new(table: &'t MappingTable) -> Self {
        Self {
            table,
            resolver: MappingResolver::new(table),
        }
    }

    pub fn table(&self) -> &'t MappingTable {
        self.table
    }

    /// Parse, migrate and print one file.
    pub fn migrate_source(
        &self,
        source: &str,
        ctx: &FileContext<'_>,
    ) -> Result<MigrationOutcome, MigrateError> {
        let mut doc = Document::parse(source, ctx.path)?;
        let report = self.migrate_document(&mut doc, ctx);
        let changed = doc.is_modified();
        let code = if changed {
            doc.print()
        } else {
            source.to_string()
        };
        Ok(MigrationOutcome {
            code,
            changed,
            report,
        })
    }

    pub fn migrate_document(&self, doc: &mut Document, ctx: &FileContext<'_>) -> FileReport {
        let rule_ctx = RuleContext {
            file_path: ctx.path,
            source_package: &self.table.source_package,
            target_package: &self.table.target_package,
            repo: ctx.repo,
        };
        let mut report = FileReport::default();
        let mut consolidator =
            ImportConsolidator::new(&self.table.source_package, &self.table.target_package);
        let mut retained: HashSet<String> = HashSet::new();

        for component in self.table.component_names() {
            let mut component_notes: Vec<String> = Vec::new();

            for case in find_import_cases(doc, &self.table.source_package, component) {
                let mut migrations: Vec<(MigrationCase, bool)> = Vec::new();
                let elements = doc.elements_named(&case.local);

                if elements.is_empty() {
                    // Type positions and plain value references only.
                    match self.resolver.resolve_static(component) {
                        Some(meta) if !meta.skip_import => {
                            let mcase =
                                MigrationCase::keeping_local(&case, meta.target_name(component));
                            extend_unique(
                                &mut component_notes,
                                meta.migration_notes.iter().cloned(),
                            );
                            migrations.push((mcase, false));
                        }
                        _ => {
                            ctx.logger.debug(&format!(
                                "{}: `{}` has no JSX occurrence and no static target, left as is",
                                ctx.path.display(),
                                case.local
                            ));
                            retained.insert(case.local.clone());
                        }
                    }
                }

                for element in elements {
                    let occurrence = Occurrence::new(doc, element);
                    let Some(meta) = self.resolver.resolve_target(component, &occurrence, &rule_ctx)
                    else {
                        ctx.logger.debug(&format!(
                            "{}: no rule claimed <{}>, left as is",
                            ctx.path.display(),
                            case.local
                        ));
                        retained.insert(case.local.clone());
                        report.unresolved += 1;
                        continue;
                    };

                    let mcase = MigrationCase::new(&case, meta.target_name(component));
                    let result = self.migrate_occurrence(
                        doc,
                        element,
                        component,
                        &meta,
                        &mcase.new_local,
                        &rule_ctx,
                        ctx,
                        &mut report,
                    );
                    extend_unique(&mut component_notes, meta.migration_notes.iter().cloned());
                    extend_unique(&mut component_notes, result.migration_notes);
                    report.migrated += 1;

                    let entry = (mcase, meta.skip_import);
                    if !migrations.contains(&entry) {
                        migrations.push(entry);
                    }
                }

                for (mcase, skip_import) in &migrations {
                    if *skip_import {
                        consolidator.mark_migrated(&mcase.declared, &mcase.local);
                    } else {
                        consolidator.add(doc, mcase);
                    }
                }
            }

            forward_migration_notes(ctx.notes, component, &component_notes, ctx.path, ctx.logger);
        }

        consolidator.finish(doc, &retained);

        if report.migrated > 0 || !report.diagnostics.is_empty() {
            ctx.logger.info(&format!(
                "{}: migrated {} occurrence(s), {} unresolved, {} diagnostic(s)",
                ctx.path.display(),
                report.migrated,
                report.unresolved,
                report.diagnostics.len()
            ));
        }
        report
    }

    #[allow(clippy::too_many_arguments)]
    fn migrate_occurrence(
        &self,
        doc: &mut Document,
        element: ElementId,
        component: &str,
        meta: &ComponentMeta,
        new_local: &str,
        rule_ctx: &RuleContext<'_>,
        ctx: &FileContext<'_>,
        report: &mut FileReport,
    ) -> OccurrenceResult {
        let mut result = OccurrenceResult::default();
        let props = self.resolver.resolve_props(meta);

        // Computed additions and comments see the occurrence as written.
        let additions: Vec<(&String, Option<AttrValue>)> = {
            let occurrence = Occurrence::new(doc, element);
            props
                .additions
                .iter()
                .filter_map(|(name, addition)| {
                    addition
                        .resolve(&occurrence, rule_ctx)
                        .map(|value| (name, value))
                })
                .collect()
        };
        let mut comments = meta
            .todo_comments
            .as_ref()
            .map(|todo| todo.resolve(&Occurrence::new(doc, element), rule_ctx))
            .unwrap_or_default();

        doc.rename_element(element, new_local);

        for name in &props.removals {
            if let Some(id) = doc.attribute(element, name) {
                doc.remove_attribute(id);
            }
        }

        // Captured up front so a renamed attribute is never mapped twice.
        let mapped: Vec<(AttrId, String, &PropTarget)> = doc
            .attributes(element)
            .filter(|(_, attr)| !attr.spread)
            .filter_map(|(id, attr)| {
                props
                    .mappings
                    .get(&attr.name)
                    .map(|target| (id, attr.name.clone(), target))
            })
            .collect();

        for (id, name, target) in mapped {
            match target {
                PropTarget::Rename(to) => doc.set_attribute_name(id, to.as_str()),
                PropTarget::Mapper(mapper) => {
                    let change = {
                        let value = doc.attr(id).value.clone();
                        let prop_ctx = PropContext {
                            prop_name: &name,
                            occurrence: Occurrence::new(doc, element),
                            rule: rule_ctx,
                            logger: ctx.logger,
                        };
                        mapper(value.as_ref(), &prop_ctx)
                    };
                    match change {
                        Ok(PropChange::Keep) => {}
                        Ok(PropChange::Remove) => doc.remove_attribute(id),
                        Ok(PropChange::Update(update)) => {
                            if let Some(to) = update.to {
                                doc.set_attribute_name(id, to.attribute_name());
                            }
                            if let Some(value) = update.value {
                                doc.set_attribute_value(id, Some(value));
                            }
                            extend_unique(&mut result.todo_comments, update.todo_comments);
                            extend_unique(&mut result.migration_notes, update.migration_notes);
                        }
                        Err(error) => {
                            let offset = doc.element(element).span.start;
                            ctx.logger.warn(&format!(
                                "{}: left `{}` on <{}> unchanged: {}",
                                ctx.path.display(),
                                name,
                                new_local,
                                error
                            ));
                            report.diagnostics.push(Diagnostic {
                                component: component.to_string(),
                                prop: name,
                                offset,
                                error,
                            });
                        }
                    }
                }
            }
        }

        for (name, value) in additions {
            if doc.attribute(element, name).is_none() {
                doc.add_attribute(element, name.as_str(), value);
            }
        }

        extend_unique(&mut comments, result.todo_comments.drain(..));
        attach_todo_comments(doc, element, &comments);

        result
    }
}

fn extend_unique(into: &mut Vec<String>, items: impl IntoIterator<Item = String>) {
    for item in items {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}
