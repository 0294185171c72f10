use serde::{Deserialize, Serialize};

use crate::services::analysis::EntryAnalysis;

/// Body of `POST /`.
///
/// Both fields are optional at the wire level so that a missing field is
/// reported with the service's own 400 message instead of a serde error.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeEntryRequest {
    #[serde(default)]
    pub entry: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl AnalyzeEntryRequest {
    /// Returns `(entry, timestamp)` when both are present and non-empty.
    pub fn into_parts(self) -> Option<(String, String)> {
        match (self.entry, self.timestamp) {
            (Some(entry), Some(timestamp)) if !entry.is_empty() && !timestamp.is_empty() => {
                Some((entry, timestamp))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeEntryResponse {
    /// Raw text returned by the model, or the fallback literal.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<EntryAnalysis>,
}
