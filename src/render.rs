use crate::notes::Block;
use crate::view::{FollowUpView, HistoryView, RecommendationView, TimelineView};

/// Target format for rendered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    #[default]
    Markdown,
    Text,
}

/// Escape `&`, `<` and `>` so text is safe inside HTML.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Block text escaped for HTML. The `<strong>` spans survive as markup.
fn html_inline(inline: &str) -> String {
    escape_html(inline)
        .replace("&lt;strong&gt;", "<strong>")
        .replace("&lt;/strong&gt;", "</strong>")
}

/// Block text with `<strong>` spans removed.
pub fn plain_text(inline: &str) -> String {
    inline.replace("<strong>", "").replace("</strong>", "")
}

/// Block text with `<strong>` spans turned back into `**` markers.
fn markdown_inline(inline: &str) -> String {
    inline.replace("<strong>", "**").replace("</strong>", "**")
}

/// Plain paragraph text. Removing emphasis can expose a leading `* ` or `- `,
/// which is escaped so the line does not read back as a bullet item.
fn text_paragraph(inline: &str) -> String {
    let text = plain_text(inline);
    let text = text.trim();
    if text.starts_with("* ") || text.starts_with("- ") {
        format!("\\{text}")
    } else {
        text.to_string()
    }
}

/// Format a Markdown heading at the given level (clamped to 1..=6).
pub fn format_heading(level: u8, text: &str) -> String {
    let level = level.clamp(1, 6);
    let hashes = "#".repeat(level as usize);
    format!("{} {}\n", hashes, text)
}

/// Format a bullet list item.
pub fn format_list_item(text: &str) -> String {
    format!("- {text}")
}

/// Render blocks as HTML: `<p>` per paragraph, `<ul>` per bullet list.
pub fn blocks_to_html(blocks: &[Block]) -> String {
    render_blocks(blocks, OutputFormat::Html)
}

/// Render blocks as Markdown. Normalizing the output again yields the same blocks.
pub fn blocks_to_markdown(blocks: &[Block]) -> String {
    render_blocks(blocks, OutputFormat::Markdown)
}

/// Render blocks as plain text, keeping `- ` list markers.
pub fn blocks_to_text(blocks: &[Block]) -> String {
    render_blocks(blocks, OutputFormat::Text)
}

pub fn render_blocks(blocks: &[Block], format: OutputFormat) -> String {
    let mut doc = DocWriter::new(format);
    doc.blocks(blocks);
    doc.finish()
}

/// Render the full results panel for one recommendation.
pub fn render_view(view: &RecommendationView, format: OutputFormat) -> String {
    let mut doc = DocWriter::new(format);
    doc.open_section("recommendation");
    doc.heading(1, &view.disease_name);
    doc.line(&format!("AI Provider: {}", view.ai_provider));

    doc.heading(2, "Foods to Eat");
    doc.items(&view.foods_to_eat);

    doc.heading(2, "Foods to Avoid");
    doc.items(&view.foods_to_avoid);

    doc.heading(2, "Notes");
    doc.blocks(&view.notes);

    if let Some(raw) = &view.raw {
        doc.heading(2, "Raw Response");
        doc.blocks(raw);
    }
    doc.close_section();
    doc.finish()
}

/// Render the history sidebar.
pub fn render_history(view: &HistoryView, format: OutputFormat) -> String {
    let mut doc = DocWriter::new(format);
    doc.open_section("history");
    doc.heading(2, "History");
    if view.entries.is_empty() {
        doc.line("No history yet");
    } else {
        let rows: Vec<String> = view
            .entries
            .iter()
            .map(|entry| {
                let mut row = match entry.id {
                    Some(id) => format!("#{id} {}", entry.title),
                    None => entry.title.clone(),
                };
                if let Some(subtitle) = &entry.subtitle {
                    row.push_str(&format!(" ({subtitle})"));
                }
                row
            })
            .collect();
        doc.items(&rows);
    }
    doc.close_section();
    doc.finish()
}

/// Render the follow-up timeline of one case.
pub fn render_timeline(view: &TimelineView, format: OutputFormat) -> String {
    let mut doc = DocWriter::new(format);
    doc.open_section("timeline");
    doc.heading(2, "Timeline");
    if view.entries.is_empty() {
        doc.line("No follow-ups yet");
    }
    for entry in &view.entries {
        let title = match &entry.date {
            Some(date) => format!("{date}: {}", entry.condition),
            None => entry.condition.clone(),
        };
        doc.heading(3, &title);
        if let Some(notes) = &entry.notes {
            doc.line(notes);
        }
        if let Some(advice) = &entry.advice {
            doc.blocks(advice);
        }
    }
    doc.close_section();
    doc.finish()
}

/// Render the analysis of a submitted follow-up.
pub fn render_follow_up(view: &FollowUpView, format: OutputFormat) -> String {
    let mut doc = DocWriter::new(format);
    doc.open_section("follow-up");
    doc.heading(2, &format!("Status: {}", view.status.label()));
    doc.blocks(&view.advice);
    doc.close_section();
    doc.finish()
}

// ---- Output assembly ----

/// Appends document elements in one format.
///
/// Markdown and text separate top-level elements with a blank line; HTML puts
/// one element per line.
struct DocWriter {
    format: OutputFormat,
    out: String,
    at_start: bool,
}

impl DocWriter {
    fn new(format: OutputFormat) -> Self {
        Self {
            format,
            out: String::new(),
            at_start: true,
        }
    }

    fn separate(&mut self) {
        if !self.at_start && self.format != OutputFormat::Html {
            self.out.push('\n');
        }
        self.at_start = false;
    }

    fn open_section(&mut self, class: &str) {
        if self.format == OutputFormat::Html {
            self.out.push_str(&format!("<section class=\"{class}\">\n"));
        }
    }

    fn close_section(&mut self) {
        if self.format == OutputFormat::Html {
            self.out.push_str("</section>\n");
        }
    }

    fn heading(&mut self, level: u8, text: &str) {
        self.separate();
        match self.format {
            OutputFormat::Html => {
                let level = level.clamp(1, 6);
                self.out
                    .push_str(&format!("<h{level}>{}</h{level}>\n", escape_html(text)));
            }
            OutputFormat::Markdown => self.out.push_str(&format_heading(level, text)),
            OutputFormat::Text => {
                self.out.push_str(text);
                self.out.push('\n');
                if level <= 2 {
                    let rule = if level == 1 { '=' } else { '-' };
                    self.out
                        .push_str(&rule.to_string().repeat(text.chars().count()));
                    self.out.push('\n');
                }
            }
        }
    }

    /// A paragraph of plain (not inline-HTML) text.
    fn line(&mut self, text: &str) {
        self.separate();
        match self.format {
            OutputFormat::Html => self.out.push_str(&format!("<p>{}</p>\n", escape_html(text))),
            OutputFormat::Markdown | OutputFormat::Text => {
                self.out.push_str(text);
                self.out.push('\n');
            }
        }
    }

    /// A bullet list of plain (not inline-HTML) items.
    fn items(&mut self, items: &[String]) {
        let escaped: Vec<String>;
        let items: &[String] = if self.format == OutputFormat::Html {
            escaped = items.iter().map(|i| escape_html(i)).collect();
            &escaped
        } else {
            items
        };
        self.list(items);
    }

    fn list(&mut self, items: &[String]) {
        self.separate();
        match self.format {
            OutputFormat::Html => {
                self.out.push_str("<ul>\n");
                for item in items {
                    self.out.push_str(&format!("<li>{item}</li>\n"));
                }
                self.out.push_str("</ul>\n");
            }
            OutputFormat::Markdown | OutputFormat::Text => {
                for item in items {
                    self.out.push_str(&format_list_item(item));
                    self.out.push('\n');
                }
            }
        }
    }

    fn blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            match block {
                Block::Paragraph(text) => {
                    self.separate();
                    let text = match self.format {
                        OutputFormat::Html => format!("<p>{}</p>", html_inline(text)),
                        OutputFormat::Markdown => markdown_inline(text),
                        OutputFormat::Text => text_paragraph(text),
                    };
                    self.out.push_str(&text);
                    self.out.push('\n');
                }
                Block::BulletList(items) => {
                    let items: Vec<String> = match self.format {
                        OutputFormat::Html => items.iter().map(|i| html_inline(i)).collect(),
                        OutputFormat::Markdown => {
                            items.iter().map(|i| markdown_inline(i)).collect()
                        }
                        OutputFormat::Text => items.iter().map(|i| plain_text(i)).collect(),
                    };
                    self.list(&items);
                }
            }
        }
    }

    fn finish(self) -> String {
        self.out
    }
}
