//! JSON shapes exchanged with the recommendation API.
//!
//! Response types default every field: the backend omits or nulls fields
//! freely, and a partial payload is still worth rendering.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Whether a condition is long-lived or short-lived. Shapes the AI prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseType {
    #[default]
    Chronic,
    Acute,
}

/// Body of `POST /recommend` and `POST /recommend/detailed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub disease_name: String,
    pub disease_type: DiseaseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_provider: Option<String>,
    /// 1..=10. Sent as a string: the backend reads a string map.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "severity_as_string"
    )]
    pub severity: Option<u8>,
}

fn severity_as_string<S: Serializer>(severity: &Option<u8>, s: S) -> Result<S::Ok, S::Error> {
    match severity {
        Some(level) => s.serialize_str(&level.to_string()),
        None => s.serialize_none(),
    }
}

impl RecommendationRequest {
    pub fn new(disease_name: impl Into<String>) -> Self {
        Self {
            disease_name: disease_name.into(),
            disease_type: DiseaseType::default(),
            ai_provider: None,
            severity: None,
        }
    }

    pub fn with_disease_type(mut self, disease_type: DiseaseType) -> Self {
        self.disease_type = disease_type;
        self
    }

    pub fn with_severity(mut self, severity: u8) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_ai_provider(mut self, provider: impl Into<String>) -> Self {
        self.ai_provider = Some(provider.into());
        self
    }

    /// Reject requests the backend would refuse, before any network I/O.
    pub fn validate(&self) -> Result<(), Error> {
        if self.disease_name.trim().is_empty() {
            return Err(Error::InvalidRequest {
                reason: "Disease name is required".to_string(),
            });
        }
        if let Some(level) = self.severity
            && !(1..=10).contains(&level)
        {
            return Err(Error::InvalidRequest {
                reason: format!("severity must be between 1 and 10, got {level}"),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Disease {
    pub name: Option<String>,
}

/// A recommendation as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationPayload {
    pub disease: Option<Disease>,
    pub ai_provider: Option<String>,
    /// Raw model output, when the backend keeps it.
    pub recommendations: Option<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub foods_to_eat: Vec<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub foods_to_avoid: Vec<String>,
    pub additional_notes: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: Option<i64>,
}

impl RecommendationPayload {
    pub fn disease_name(&self) -> Option<&str> {
        self.disease.as_ref().and_then(|d| d.name.as_deref())
    }
}

fn nullable_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Option::<Vec<String>>::deserialize(d).map(Option::unwrap_or_default)
}

/// Body of `POST /recommend/feedback/{caseId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowUpRequest {
    /// How the patient feels, e.g. "Feeling better".
    pub condition: String,
    pub notes: String,
}

impl FollowUpRequest {
    pub fn new(condition: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            notes: notes.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.condition.trim().is_empty() {
            return Err(Error::InvalidRequest {
                reason: "condition is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Triage outcome of a follow-up.
///
/// Anything the backend sends besides the two definite outcomes, including a
/// missing status, reads as `Monitoring`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "Option<String>")]
pub enum FollowUpStatus {
    Recovered,
    DoctorRequired,
    #[default]
    Monitoring,
}

impl From<Option<String>> for FollowUpStatus {
    fn from(status: Option<String>) -> Self {
        match status.as_deref().map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("RECOVERED") => FollowUpStatus::Recovered,
            Some("DOCTOR_REQUIRED") => FollowUpStatus::DoctorRequired,
            _ => FollowUpStatus::Monitoring,
        }
    }
}

impl FollowUpStatus {
    pub fn label(self) -> &'static str {
        match self {
            FollowUpStatus::Recovered => "Recovered",
            FollowUpStatus::DoctorRequired => "Doctor required",
            FollowUpStatus::Monitoring => "Monitoring",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowUpAnalysis {
    pub status: FollowUpStatus,
    pub message: Option<String>,
}

/// A stored recommendation ("case") as listed by the history endpoints.
///
/// The food lists are stored server-side as JSON-encoded strings, e.g.
/// `"[\"Spinach\",\"Kale\"]"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseRecord {
    pub id: Option<u64>,
    pub disease_name: Option<String>,
    pub disease_type: Option<String>,
    pub ai_provider: Option<String>,
    pub severity: Option<String>,
    pub foods_to_eat: Option<String>,
    pub foods_to_avoid: Option<String>,
    pub additional_notes: Option<String>,
    pub raw_response: Option<String>,
    /// ISO-8601 local date-time, e.g. `2025-03-14T09:26:53.589`.
    pub created_at: Option<String>,
}

impl CaseRecord {
    /// The stored case as a recommendation payload, ready to render.
    pub fn to_payload(&self) -> RecommendationPayload {
        RecommendationPayload {
            disease: self.disease_name.clone().map(|name| Disease { name: Some(name) }),
            ai_provider: self.ai_provider.clone(),
            recommendations: self.raw_response.clone(),
            foods_to_eat: stored_food_list(self.foods_to_eat.as_deref()),
            foods_to_avoid: stored_food_list(self.foods_to_avoid.as_deref()),
            additional_notes: self.additional_notes.clone(),
            timestamp: None,
        }
    }
}

/// Decode a food list stored as a JSON string.
///
/// Text that is not a JSON string array is split on commas; the pieces keep
/// their stray brackets and quotes for `normalize_food_item` to strip.
fn stored_food_list(stored: Option<&str>) -> Vec<String> {
    let Some(stored) = stored.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Option<Vec<String>>>(stored) {
        Ok(items) => items.unwrap_or_default(),
        Err(e) => {
            log::debug!("stored food list is not a JSON array ({e}), splitting on commas");
            stored.split(',').map(str::to_string).collect()
        }
    }
}

/// One page of `GET /history`, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryPage {
    pub content: Vec<CaseRecord>,
    pub total_pages: u32,
    pub total_elements: u64,
}

/// A follow-up on a case, from `GET /cases/{id}/timeline`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineEntry {
    pub id: Option<u64>,
    pub date: Option<String>,
    pub user_condition: Option<String>,
    pub user_notes: Option<String>,
    pub ai_advice: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub message: Option<String>,
}

/// Error body of a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiErrorBody {
    pub error: Option<String>,
}

/// Body of a successful `DELETE /history/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MessageBody {
    pub message: Option<String>,
}
