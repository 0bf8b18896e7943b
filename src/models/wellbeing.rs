use std::collections::BTreeMap;
use std::fmt;

use serde::{ Serialize, Deserialize };
use serde_json::Value;

/// Reply of `/api/analyze-sentiment`. The score range is whatever the server
/// model produces; it is only ever rendered, never compared.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SentimentResult {
    pub message: String,
    pub label: String,
    pub score: f64,
}

impl SentimentResult {
    pub fn summary(&self) -> String {
        format!("{} (Label: {}, Score: {:.2})", self.message, self.label, self.score)
    }
}

/// One past analysis as returned by `/api/history`. Ordering is decided by
/// the server and preserved as received.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub label: String,
    pub score: f64,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {} ({:.2})", self.text, self.label, self.score)
    }
}

/// Questionnaire submission. `answers` is opaque to the client and kept in
/// the order the user supplied them.
#[derive(Clone, Debug, Serialize)]
pub struct AssessmentPayload {
    pub user_id: String,
    pub score: i64,
    pub answers: Vec<Value>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatMessage {
    pub user_id: String,
    pub message: String,
}

/// Input to `/predict_fused`: the questionnaire total plus named behavior
/// features, both interpreted entirely server-side.
#[derive(Clone, Debug, Serialize)]
pub struct FusedPredictionInput {
    pub questionnaire_score: f64,
    pub behavior_features: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sentiment_summary_renders_two_decimals() {
        let result = SentimentResult {
            message: "Positive".to_string(),
            label: "POS".to_string(),
            score: 0.87,
        };
        assert_eq!(result.summary(), "Positive (Label: POS, Score: 0.87)");
    }

    #[test]
    fn history_entry_display_matches_dashboard_line() {
        let entry = HistoryEntry {
            text: "feeling great".to_string(),
            label: "positive".to_string(),
            score: 0.9,
        };
        assert_eq!(entry.to_string(), "feeling great → positive (0.90)");
    }
}
