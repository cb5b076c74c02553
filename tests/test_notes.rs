mod common;

use common::{fixture, normalize};
use foodrec::notes::NO_NOTES_FALLBACK;
use foodrec::render::{blocks_to_markdown, blocks_to_text};
use foodrec::{Block, normalize_food_item, normalize_food_list, normalize_notes};

fn para(text: &str) -> Block {
    Block::Paragraph(text.to_string())
}

fn list(items: &[&str]) -> Block {
    Block::BulletList(items.iter().map(|s| s.to_string()).collect())
}

#[test]
fn test_notes_plain_prose_keeps_line_order() {
    let blocks = normalize_notes(Some("First line.\n\nSecond line.\nThird line."));
    assert_eq!(
        blocks,
        vec![para("First line."), para("Second line."), para("Third line.")]
    );
}

#[test]
fn test_notes_bullets_collapse_into_one_list() {
    assert_eq!(
        normalize_notes(Some("* a\n* b\nc")),
        vec![list(&["a", "b"]), para("c")]
    );
}

#[test]
fn test_notes_embedded_json() {
    assert_eq!(
        normalize_notes(Some(r#"{"additionalNotes": "Eat **more** fiber"}"#)),
        vec![para("Eat <strong>more</strong> fiber")]
    );
}

#[test]
fn test_notes_malformed_json_pattern_fallback() {
    assert_eq!(
        normalize_notes(Some(r#"{"additionalNotes": "A"} extra {garbage"#)),
        vec![para("A")]
    );
}

#[test]
fn test_notes_truncated_model_output() {
    let raw = fixture("notes_truncated.txt");
    assert_eq!(
        normalize_notes(Some(&raw)),
        vec![para("Stay hydrated."), list(&["Eat bland food"])]
    );
}

/// Golden test: fenced JSON notes rendered back to Markdown.
#[test]
fn test_notes_golden_fenced() {
    let raw = fixture("notes_fenced.txt");
    let markdown = blocks_to_markdown(&normalize_notes(Some(&raw)));
    let expected = include_str!("fixtures/expected/notes_fenced.md");
    assert_eq!(normalize(&markdown), normalize(expected));
}

#[test]
fn test_notes_text_output_is_idempotent() {
    let inputs = [
        "Plain sentence one.\nPlain sentence two.",
        "* a\n* b\nc",
        "Intro\n- x\n- y\nOutro",
    ];
    for input in inputs {
        let blocks = normalize_notes(Some(input));
        let flattened = blocks_to_text(&blocks);
        assert_eq!(normalize_notes(Some(&flattened)), blocks, "input: {input:?}");
    }
}

#[test]
fn test_notes_empty_and_absent() {
    assert_eq!(normalize_notes(None), vec![para(NO_NOTES_FALLBACK)]);
    assert_eq!(normalize_notes(Some("")), vec![para(NO_NOTES_FALLBACK)]);
}

#[test]
fn test_food_item_and_placeholder_list() {
    assert_eq!(normalize_food_item(r#"["Spinach"]"#), "Spinach");
    assert_eq!(normalize_food_item(""), "");

    let empty: [&str; 0] = [];
    assert_eq!(
        normalize_food_list(&empty, "No specific data provided"),
        vec!["No specific data provided"]
    );
    assert_eq!(
        normalize_food_list(&[""], "No specific data provided"),
        vec!["No specific data provided"]
    );
}
