pub mod client;
pub mod config;
pub mod error;
pub mod food;
pub mod notes;
pub mod payload;
pub mod render;
pub mod session;
pub mod view;

#[cfg(feature = "async")]
pub use client::AsyncApiClient;
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::Error;
pub use food::{normalize_food_item, normalize_food_list};
pub use notes::{Block, normalize_notes};
pub use payload::{
    DiseaseType, FollowUpAnalysis, FollowUpRequest, FollowUpStatus, HistoryPage,
    RecommendationPayload, RecommendationRequest,
};
pub use render::OutputFormat;
pub use session::Session;
pub use view::{RawSource, RecommendationView, ViewOptions};

/// Parse a recommendation payload and render it in one step.
///
/// The payload is the JSON body returned by `POST /recommend`.
pub fn render_payload(
    json: &str,
    options: &ViewOptions,
    format: OutputFormat,
) -> Result<String, Error> {
    let payload: RecommendationPayload =
        serde_json::from_str(json).map_err(|e| Error::InvalidResponse {
            reason: format!("invalid recommendation payload: {e}"),
        })?;
    let view = RecommendationView::from_payload(&payload, options);
    Ok(render::render_view(&view, format))
}
