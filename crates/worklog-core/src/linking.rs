//! Linking calendar events to the meeting-note documents written for them.
//!
//! Meeting notes are created on the day of the meeting and are named after
//! it, usually as `<event title> <date>` or with the event title's first
//! word. The heuristics here pick the first drive document that fits.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{Event, NoteDocument};

fn trailing_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+\d{4}年\d+月\d+日$").expect("date suffix pattern is valid"))
}

/// Event title without a trailing ` 2026年3月2日` style date.
pub fn strip_date_suffix(title: &str) -> &str {
    match trailing_date_re().find(title) {
        Some(m) => &title[..m.start()],
        None => title,
    }
}

/// Whether `doc` looks like the meeting note of `event`.
pub fn is_note_for(event: &Event, doc: &NoteDocument) -> bool {
    if !doc.is_docx() {
        return false;
    }
    let created = doc.created_at.with_timezone(&event.start_time().timezone());
    if created.date_naive() != event.start_date() {
        return false;
    }

    let base_title = strip_date_suffix(event.title());
    if !base_title.is_empty() && doc.name.contains(base_title) {
        return true;
    }
    match doc.name.split(' ').next() {
        Some(first) if !first.is_empty() => event.title().contains(first),
        _ => false,
    }
}

/// First document in `documents` that is the meeting note of `event`.
pub fn match_note_document<'a>(
    event: &Event,
    documents: &'a [NoteDocument],
) -> Option<&'a NoteDocument> {
    documents.iter().find(|doc| is_note_for(event, doc))
}
