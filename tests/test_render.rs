mod common;

use common::{fixture, normalize};
use foodrec::render::{blocks_to_html, render_view};
use foodrec::{
    OutputFormat, RawSource, RecommendationPayload, RecommendationView, ViewOptions,
    normalize_notes, render_payload,
};
use scraper::{Html, Selector};

fn texts(document: &Html, selector: &str) -> Vec<String> {
    let sel = Selector::parse(selector).unwrap();
    document
        .select(&sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect()
}

/// Golden test: payload fixture rendered as Markdown.
#[test]
fn test_render_payload_golden_markdown() {
    let json = fixture("payload.json");
    let markdown = render_payload(&json, &ViewOptions::default(), OutputFormat::Markdown).unwrap();
    let expected = include_str!("fixtures/expected/payload.md");
    assert_eq!(normalize(&markdown), normalize(expected));
}

#[test]
fn test_render_payload_html_structure() {
    let json = fixture("payload.json");
    let html = render_payload(&json, &ViewOptions::default(), OutputFormat::Html).unwrap();
    let document = Html::parse_fragment(&html);

    assert_eq!(texts(&document, "h1"), vec!["Gastritis"]);
    assert_eq!(
        texts(&document, "h2"),
        vec!["Foods to Eat", "Foods to Avoid", "Notes"]
    );
    // Two food lists plus one bullet list in the notes.
    assert_eq!(texts(&document, "ul").len(), 3);
    assert_eq!(
        texts(&document, "ul li")[..3],
        ["Oatmeal", "Bananas", "Steamed vegetables"]
    );
    assert_eq!(texts(&document, "p strong"), vec!["small"]);
    assert_eq!(texts(&document, "section.recommendation").len(), 1);
}

#[test]
fn test_render_payload_text_has_no_markup() {
    let json = fixture("payload.json");
    let text = render_payload(&json, &ViewOptions::default(), OutputFormat::Text).unwrap();
    assert!(text.starts_with(&format!("Gastritis\n{}\n", "=".repeat(9))));
    assert!(text.contains("Eat small, frequent meals."));
    assert!(!text.contains("**"));
    assert!(!text.contains("<strong>"));
    assert!(!text.contains("additionalNotes"));
}

#[test]
fn test_render_payload_invalid_json() {
    let err = render_payload("not json", &ViewOptions::default(), OutputFormat::Markdown)
        .unwrap_err();
    assert!(
        format!("{err}").contains("invalid recommendation payload"),
        "error was: {err}"
    );
}

#[test]
fn test_render_raw_response_section() {
    let payload = RecommendationPayload {
        recommendations: Some("Raw AI Response (Format Error): ```json oops".to_string()),
        ..Default::default()
    };
    let view = RecommendationView::from_payload(&payload, &ViewOptions::default());
    let markdown = render_view(&view, OutputFormat::Markdown);
    assert!(markdown.contains("## Raw Response"));
    assert!(markdown.contains("Raw AI Response (Format Error): ```json oops"));

    let hidden = RecommendationView::from_payload(
        &payload,
        &ViewOptions {
            raw_source: RawSource::None,
            ..Default::default()
        },
    );
    assert!(!render_view(&hidden, OutputFormat::Markdown).contains("Raw Response"));
}

#[test]
fn test_render_html_escapes_untrusted_text() {
    let payload = RecommendationPayload {
        foods_to_eat: vec!["<img src=x onerror=alert(1)>".to_string()],
        additional_notes: Some("<script>alert(1)</script>".to_string()),
        ..Default::default()
    };
    let view = RecommendationView::from_payload(&payload, &ViewOptions::default());
    let html = render_view(&view, OutputFormat::Html);
    assert!(!html.contains("<script>"));
    assert!(!html.contains("<img"));

    let document = Html::parse_fragment(&html);
    assert!(texts(&document, "p").iter().any(|t| t == "<script>alert(1)</script>"));
}

#[test]
fn test_blocks_to_html_lists_and_paragraphs() {
    let html = blocks_to_html(&normalize_notes(Some("Intro\n* one\n* two\nOutro")));
    let document = Html::parse_fragment(&html);
    assert_eq!(texts(&document, "p"), vec!["Intro", "Outro"]);
    assert_eq!(texts(&document, "ul li"), vec!["one", "two"]);
}
