use std::borrow::Cow;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde_json::Value;

/// Shown when a response carries no usable notes.
pub const NO_NOTES_FALLBACK: &str = "No specific notes available.";

const NOTES_FIELD: &str = "additionalNotes";
const NOTES_LABEL: &str = "additionalNotes:";

/// Captures the string value of an `"additionalNotes": "..."` pair in text
/// that is not valid JSON as a whole.
static NOTES_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""additionalNotes"\s*:\s*"((?:[^"\\]|\\.)*)""#)
        .expect("additionalNotes field regex")
});

static STRONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("strong emphasis regex"));

/// A renderable unit of normalized notes.
///
/// Text is the cleaned line with `**` pairs turned into `<strong>` spans.
/// Everything else is literal; renderers escape it for HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    BulletList(Vec<String>),
}

impl Block {
    /// The fallback block used when there is nothing to show.
    pub fn fallback() -> Self {
        Block::Paragraph(NO_NOTES_FALLBACK.to_string())
    }
}

/// Convert a loosely formatted notes blob into paragraphs and bullet lists.
///
/// Accepts plain prose, pseudo-Markdown (`* item`, `- item`, `**bold**`) or a
/// JSON object that accidentally wraps the notes in an `additionalNotes`
/// field. Never fails: unparseable input degrades to the stripped text, and
/// empty input yields a single [`NO_NOTES_FALLBACK`] paragraph.
pub fn normalize_notes(raw: Option<&str>) -> Vec<Block> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return vec![Block::fallback()];
    };

    let text = unwrap_code_fence(raw);
    let text = unwrap_embedded_json(text);
    let text = strip_symbols(&text);
    let text = convert_emphasis(&text);

    let blocks = segment_blocks(&text);
    if blocks.is_empty() {
        debug!("notes were empty after cleanup, using fallback");
        return vec![Block::fallback()];
    }
    blocks
}

/// Remove a surrounding Markdown code fence (```` ```json ```` or ```` ``` ````).
fn unwrap_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return text;
    }
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}

/// Replace text that is a serialized recommendation object with its notes.
///
/// Valid JSON is read structurally; anything else starting with `{` falls back
/// to a pattern search for the labeled field. Otherwise the text is kept.
fn unwrap_embedded_json(text: &str) -> Cow<'_, str> {
    let trimmed = text.trim();
    if !trimmed.starts_with('{') {
        return Cow::Borrowed(text);
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => match value.get(NOTES_FIELD) {
            Some(Value::String(notes)) => Cow::Owned(notes.clone()),
            Some(Value::Null) | None => {
                debug!("embedded JSON has no {NOTES_FIELD} value, keeping text");
                Cow::Borrowed(text)
            }
            Some(other) => Cow::Owned(other.to_string()),
        },
        Err(e) => {
            debug!("embedded JSON did not parse ({e}), searching for {NOTES_FIELD}");
            match NOTES_FIELD_RE.captures(text).and_then(|caps| caps.get(1)) {
                Some(m) => Cow::Owned(decode_json_escapes(m.as_str())),
                None => {
                    debug!("no {NOTES_FIELD} field found, keeping text");
                    Cow::Borrowed(text)
                }
            }
        }
    }
}

/// Decode `\n`, `\"` and friends in a captured JSON string body.
/// Returns the capture verbatim if it is not a valid JSON string.
fn decode_json_escapes(captured: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{captured}\""))
        .unwrap_or_else(|_| captured.to_string())
}

/// Drop JSON punctuation and the bare `additionalNotes:` label.
fn strip_symbols(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '{' | '}' | '"' | '[' | ']'))
        .collect::<String>()
        .replace(NOTES_LABEL, "")
}

/// Turn `**text**` pairs into `<strong>` spans. Unpaired markers stay as-is.
fn convert_emphasis(text: &str) -> String {
    STRONG_RE
        .replace_all(text, "<strong>${1}</strong>")
        .into_owned()
}

fn bullet_item(line: &str) -> Option<&str> {
    line.strip_prefix("* ")
        .or_else(|| line.strip_prefix("- "))
        .map(str::trim_start)
}

/// Split text into blocks, one line at a time.
///
/// Consecutive bullet lines share one list; blank lines are skipped and do not
/// close an open list.
fn segment_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut open_list: Option<Vec<String>> = None;

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(item) = bullet_item(line) {
            open_list.get_or_insert_with(Vec::new).push(item.to_string());
        } else {
            if let Some(items) = open_list.take() {
                blocks.push(Block::BulletList(items));
            }
            blocks.push(Block::Paragraph(line.to_string()));
        }
    }

    if let Some(items) = open_list {
        blocks.push(Block::BulletList(items));
    }
    blocks
}
