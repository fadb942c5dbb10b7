//! Best-effort field extraction from fetched article markup.
//!
//! Pure function of the input bytes: no I/O, deterministic, and total;
//! parse problems surface as [`ExtractionStatus::Failed`], never as an
//! error. Partial results are normal outcomes the rest of the pipeline
//! must tolerate.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::models::{ExtractionResult, ExtractionStatus};

/// Minimum body length for a candidate to be accepted outright, and for
/// the final classification to count the body as present.
pub const BODY_MIN_CHARS: usize = 100;

/// Persisted bodies are truncated to this many characters.
pub const BODY_MAX_CHARS: usize = 5000;

/// Non-content elements whose text must never leak into title or body.
const STRIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer", "header"];

fn parse_probes(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .map(|s| Selector::parse(s).expect("static selector"))
        .collect()
}

/// Title strategies, probed in order; first non-empty match wins.
static TITLE_PROBES: LazyLock<Vec<Selector>> =
    LazyLock::new(|| parse_probes(&["h1", "title", r#"[class*="headline"]"#, r#"[class*="title"]"#]));

/// Body strategies, probed in order; first candidate over the length
/// threshold wins, otherwise the first non-empty candidate is kept.
static BODY_PROBES: LazyLock<Vec<Selector>> =
    LazyLock::new(|| parse_probes(&["article", "main", r#"[class*="content"]"#, "body"]));

/// Extract title and body from raw fetched content.
pub fn extract(raw: &[u8]) -> ExtractionResult {
    let html = match std::str::from_utf8(raw) {
        Ok(s) => s,
        Err(e) => {
            return ExtractionResult {
                title: None,
                body: None,
                status: ExtractionStatus::Failed(format!("Parsing error: invalid UTF-8: {e}")),
            };
        }
    };

    let doc = Html::parse_document(html);

    let title = probe_title(&doc);
    let body = probe_body(&doc).map(|b| truncate_chars(b, BODY_MAX_CHARS));
    let status = classify(title.as_deref(), body.as_deref());

    ExtractionResult {
        title,
        body,
        status,
    }
}

fn probe_title(doc: &Html) -> Option<String> {
    for selector in TITLE_PROBES.iter() {
        if let Some(element) = doc.select(selector).next() {
            let text = visible_text(element);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn probe_body(doc: &Html) -> Option<String> {
    let mut fallback: Option<String> = None;
    for selector in BODY_PROBES.iter() {
        if let Some(element) = doc.select(selector).next() {
            let text = visible_text(element);
            if text.chars().count() > BODY_MIN_CHARS {
                return Some(text);
            }
            if fallback.is_none() && !text.is_empty() {
                fallback = Some(text);
            }
        }
    }
    fallback
}

/// Visible text of an element: descendant text nodes trimmed and joined
/// with single spaces, skipping [`STRIPPED_TAGS`] subtrees entirely.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut chunks = Vec::new();
    collect_text(element, &mut chunks);
    chunks.join(" ")
}

fn collect_text(element: ElementRef<'_>, chunks: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !STRIPPED_TAGS.contains(&child_element.value().name()) {
                collect_text(child_element, chunks);
            }
        }
    }
}

/// Body-missing takes precedence when both fields fail: the record carries
/// a single error field, and only the last detected problem is retained.
fn classify(title: Option<&str>, body: Option<&str>) -> ExtractionStatus {
    let body_present = body.is_some_and(|b| b.chars().count() >= BODY_MIN_CHARS);
    if !body_present {
        ExtractionStatus::PartialBodyMissing
    } else if title.is_none() {
        ExtractionStatus::PartialTitleMissing
    } else {
        ExtractionStatus::Ok
    }
}

fn truncate_chars(s: String, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s,
    }
}
