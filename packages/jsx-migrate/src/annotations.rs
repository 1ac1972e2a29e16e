//! Annotation attacher

use std::path::Path;

use jsx_tree::{Document, ElementId};

use crate::logging::Logger;
use crate::notes::NotesSink;

/// Prefix of every inline todo comment.
pub const TODO_PREFIX: &str = "TODO: (jsx-migrate)";

/// Attach each comment as a block comment printed right before the element.
pub fn attach_todo_comments(doc: &mut Document, element: ElementId, comments: &[String]) {
    for comment in comments {
        let text = comment.trim();
        if text.is_empty() {
            continue;
        }
        doc.add_leading_comment(element, format!("{} {}", TODO_PREFIX, text));
    }
}

/// Forward a component's notes to the sink. Sink failures are logged and
/// never abort the file.
pub fn forward_migration_notes(
    sink: Option<&dyn NotesSink>,
    component: &str,
    notes: &[String],
    file: &Path,
    logger: &dyn Logger,
) {
    let Some(sink) = sink else {
        return;
    };
    if notes.is_empty() {
        return;
    }
    if let Err(err) = sink.add_migration_notes(component, notes, file) {
        logger.warn(&format!(
            "{}: dropped migration notes for {}: {}",
            file.display(),
            component,
            err
        ));
    }
}
