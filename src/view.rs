//! Declarative view models built from API payloads.
//!
//! Views hold display-ready data only; the `render` module turns them into
//! HTML, Markdown or plain text.

use chrono::NaiveDateTime;

use crate::food::{NO_DATA_PLACEHOLDER, normalize_food_list};
use crate::notes::{Block, normalize_notes};
use crate::payload::{
    CaseRecord, FollowUpAnalysis, FollowUpStatus, HistoryPage, RecommendationPayload,
    TimelineEntry,
};

const UNKNOWN: &str = "Unknown";

/// Which payload field feeds the "raw response" section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RawSource {
    AdditionalNotes,
    #[default]
    Recommendations,
    /// Do not show a raw response section.
    None,
}

/// Options controlling how a payload becomes a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub raw_source: RawSource,
    /// Shown when there is nothing in `foodsToEat`.
    pub eat_placeholder: String,
    /// Shown when there is nothing in `foodsToAvoid`.
    pub avoid_placeholder: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            raw_source: RawSource::default(),
            eat_placeholder: NO_DATA_PLACEHOLDER.to_string(),
            avoid_placeholder: NO_DATA_PLACEHOLDER.to_string(),
        }
    }
}

/// Everything the results panel shows for one recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationView {
    pub disease_name: String,
    pub ai_provider: String,
    /// Never empty; holds the placeholder when the payload had no items.
    pub foods_to_eat: Vec<String>,
    /// Never empty; holds the placeholder when the payload had no items.
    pub foods_to_avoid: Vec<String>,
    pub notes: Vec<Block>,
    pub raw: Option<Vec<Block>>,
}

impl RecommendationView {
    pub fn from_payload(payload: &RecommendationPayload, options: &ViewOptions) -> Self {
        let raw_text = match options.raw_source {
            RawSource::AdditionalNotes => payload.additional_notes.as_deref(),
            RawSource::Recommendations => payload.recommendations.as_deref(),
            RawSource::None => None,
        };

        Self {
            disease_name: non_blank(payload.disease_name()).unwrap_or(UNKNOWN).to_string(),
            ai_provider: non_blank(payload.ai_provider.as_deref())
                .unwrap_or(UNKNOWN)
                .to_string(),
            foods_to_eat: normalize_food_list(&payload.foods_to_eat, &options.eat_placeholder),
            foods_to_avoid: normalize_food_list(
                &payload.foods_to_avoid,
                &options.avoid_placeholder,
            ),
            notes: normalize_notes(payload.additional_notes.as_deref()),
            raw: non_blank(raw_text).map(|text| normalize_notes(Some(text))),
        }
    }
}

/// One row of the history sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntryView {
    pub id: Option<u64>,
    pub title: String,
    /// Disease type and creation date, when known.
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryView {
    pub entries: Vec<HistoryEntryView>,
    pub total_elements: u64,
}

impl HistoryView {
    pub fn from_page(page: &HistoryPage) -> Self {
        Self {
            entries: page.content.iter().map(history_entry).collect(),
            total_elements: page.total_elements,
        }
    }

    pub fn from_cases(cases: &[CaseRecord]) -> Self {
        Self {
            entries: cases.iter().map(history_entry).collect(),
            total_elements: cases.len() as u64,
        }
    }
}

fn history_entry(record: &CaseRecord) -> HistoryEntryView {
    let parts: Vec<String> = [
        non_blank(record.disease_type.as_deref()).map(str::to_string),
        record.created_at.as_deref().and_then(display_date),
    ]
    .into_iter()
    .flatten()
    .collect();

    HistoryEntryView {
        id: record.id,
        title: non_blank(record.disease_name.as_deref())
            .unwrap_or(UNKNOWN)
            .to_string(),
        subtitle: (!parts.is_empty()).then(|| parts.join(", ")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntryView {
    pub date: Option<String>,
    pub condition: String,
    pub notes: Option<String>,
    pub advice: Option<Vec<Block>>,
}

/// Follow-ups of one case, in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineView {
    pub entries: Vec<TimelineEntryView>,
}

impl TimelineView {
    pub fn from_entries(entries: &[TimelineEntry]) -> Self {
        let entries = entries
            .iter()
            .map(|entry| TimelineEntryView {
                date: entry.date.as_deref().and_then(display_date),
                condition: non_blank(entry.user_condition.as_deref())
                    .unwrap_or(UNKNOWN)
                    .to_string(),
                notes: non_blank(entry.user_notes.as_deref()).map(str::to_string),
                advice: non_blank(entry.ai_advice.as_deref()).map(|a| normalize_notes(Some(a))),
            })
            .collect();
        Self { entries }
    }
}

/// The answer to a submitted follow-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUpView {
    pub status: FollowUpStatus,
    pub advice: Vec<Block>,
}

impl FollowUpView {
    pub fn from_analysis(analysis: &FollowUpAnalysis) -> Self {
        Self {
            status: analysis.status,
            advice: normalize_notes(analysis.message.as_deref()),
        }
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// `YYYY-MM-DD` from an ISO-8601 local date-time. Unparseable values are
/// shown as they came.
fn display_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<NaiveDateTime>() {
        Ok(datetime) => Some(datetime.date().to_string()),
        Err(_) => Some(raw.to_string()),
    }
}
