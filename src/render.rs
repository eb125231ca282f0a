//! Plain-text rendering of a [`ViewState`].

use crate::consts::truncate;
use crate::evaluation::Entity;
use crate::view::{Status, ViewState};

/// Longest entity text shown before truncation.
const MAX_ENTITY_TEXT: usize = 60;

/// Render the result area of the view.
pub fn render(state: &ViewState) -> String {
    let mut out = String::new();

    if let Status::Awaiting { in_flight } = state.status {
        out.push_str(&format!("  … awaiting {in_flight} response(s)\n"));
    }

    if let Some(error) = &state.error {
        out.push_str(&format!("  ✗ {error}\n"));
        return out;
    }

    if let Some(report) = &state.report {
        out.push_str(&format!("  score     {}/100\n", report.score));
        for line in &report.feedback {
            out.push_str(&format!("  • {line}\n"));
        }
        return out;
    }

    if state.entities.is_empty() {
        out.push_str("  (no entities)\n");
        return out;
    }

    for entity in &state.entities {
        out.push_str(&format!("  • {}\n", render_entity(entity)));
    }
    out
}

/// One entity on one line: `text [LABEL]`, or compact JSON when the entity
/// has no `text` field.
pub fn render_entity(entity: &Entity) -> String {
    match (entity.text(), entity.label()) {
        (Some(text), Some(label)) => format!("{} [{label}]", truncate(text, MAX_ENTITY_TEXT)),
        (Some(text), None) => truncate(text, MAX_ENTITY_TEXT),
        _ => entity.value().to_string(),
    }
}
