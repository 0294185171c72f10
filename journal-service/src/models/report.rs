use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Upper bound on logs per report; keeps the rendered prompt bounded.
pub const MAX_REPORT_LOGS: usize = 31;

/// One stored journal entry as assembled by the mobile client.
///
/// Older records may carry `null` for any field; those read as the default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entry: String,
    /// Client-extracted score, nominally in [-1, +1].
    #[serde(default, deserialize_with = "null_as_default")]
    pub mood_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub supportive_message: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /report`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TrendReportRequest {
    #[serde(default)]
    #[validate(length(max = 31))]
    pub logs: Option<Vec<LogRecord>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReportResponse {
    pub report: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_mood_score: Option<f64>,
}

/// Mean of the clamped mood scores; `None` for an empty slice.
pub fn average_mood_score(logs: &[LogRecord]) -> Option<f64> {
    let scores: Vec<f64> = logs
        .iter()
        .map(|log| log.mood_score)
        .filter(|score| score.is_finite())
        .map(|score| score.clamp(-1.0, 1.0))
        .collect();

    if scores.is_empty() {
        return None;
    }

    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(score: f64) -> LogRecord {
        LogRecord {
            mood_score: score,
            ..Default::default()
        }
    }

    #[test]
    fn average_of_empty_is_none() {
        assert_eq!(average_mood_score(&[]), None);
    }

    #[test]
    fn average_clamps_out_of_range_scores() {
        let avg = average_mood_score(&[log(3.0), log(-0.5)]).unwrap();
        assert!((avg - 0.25).abs() < 1e-9);
    }

    #[test]
    fn defaults_fill_missing_client_fields() {
        let parsed: LogRecord =
            serde_json::from_str(r#"{"entry":"hello","timestamp":"2025-01-01T10:00:00Z"}"#)
                .unwrap();
        assert_eq!(parsed.mood_score, 0.0);
        assert!(parsed.supportive_message.is_empty());
    }

    #[test]
    fn explicit_nulls_read_as_defaults() {
        let parsed: LogRecord = serde_json::from_str(
            r#"{"entry":null,"moodScore":null,"timestamp":"2025-01-01T10:00:00Z","supportiveMessage":null}"#,
        )
        .unwrap();
        assert!(parsed.entry.is_empty());
        assert_eq!(parsed.mood_score, 0.0);
        assert_eq!(parsed.timestamp, "2025-01-01T10:00:00Z");
        assert!(parsed.supportive_message.is_empty());
    }

    #[test]
    fn rejects_more_than_max_logs() {
        let request = TrendReportRequest {
            logs: Some(vec![LogRecord::default(); MAX_REPORT_LOGS + 1]),
        };
        assert!(request.validate().is_err());

        let request = TrendReportRequest {
            logs: Some(vec![LogRecord::default(); MAX_REPORT_LOGS]),
        };
        assert!(request.validate().is_ok());
    }
}
