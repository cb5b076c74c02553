use crate::error::Error;
use crate::payload::HistoryPage;

/// The case that follow-ups attach to.
///
/// Passed explicitly to every call that needs it instead of being kept in
/// shared state between requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub case_id: Option<u64>,
}

impl Session {
    /// A session with no case selected yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_case(case_id: u64) -> Self {
        Self {
            case_id: Some(case_id),
        }
    }

    /// The most recent case of a newest-first history page. A record without
    /// an id selects no case.
    pub fn latest(page: &HistoryPage) -> Self {
        Self {
            case_id: page.content.first().and_then(|record| record.id),
        }
    }

    pub fn case_id(&self) -> Result<u64, Error> {
        self.case_id.ok_or(Error::MissingSession)
    }
}
