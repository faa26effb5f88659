//! Plain-text rendering of archetype records for terminal display.
//!
//! Output is Markdown-flavoured: a heading per archetype followed by one
//! bold-labelled line per field, lists joined with `", "`.

use crate::catalog::ArchetypeRecord;
use std::fmt::Write as _;

/// Render the full card shown when an archetype is selected.
pub fn record_card(record: &ArchetypeRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "### {}", record.name);
    let _ = writeln!(out, "**Narrative:** {}", record.narrative);
    let _ = writeln!(out, "**Tone:** {}", record.tone);
    let _ = writeln!(out, "**Values:** {}", join_list(&record.values));
    let _ = writeln!(out, "**Risks:** {}", join_list(&record.risks));
    let _ = writeln!(out, "**Features:** {}", join_list(&record.features));
    let _ = writeln!(out, "**Care Ritual:** {}", record.ritual);
    if !record.cms_tags.is_empty() {
        let _ = writeln!(out, "**CMS Tags:** {}", join_list(&record.cms_tags));
    }
    out
}

pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}
