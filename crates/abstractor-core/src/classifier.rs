//! Remote SDG classifier adapter.
//!
//! The classifier is an external collaborator: its availability must never
//! decide whether an extraction request succeeds. Any transport failure,
//! non-success status or malformed body degrades to an empty result set.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Aurora SDG multi-label classifier endpoint.
pub const DEFAULT_CLASSIFIER_URL: &str =
    "https://aurora-sdg.labs.vu.nl/classifier/classify/aurora-sdg-multi";

/// Predictions below this confidence are dropped.
pub const DEFAULT_MIN_SCORE: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub url: String,
    pub min_score: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CLASSIFIER_URL.to_string(),
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

/// One retained classification: the goal label and its confidence as a
/// percentage rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdgScore {
    pub label: String,
    pub score: f64,
}

pub struct SdgClassifier {
    client: reqwest::Client,
    config: ClassifierConfig,
}

impl SdgClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Classify `abstract_text` against the remote SDG classifier.
    ///
    /// Never fails: errors are logged and reported as an empty Vec so the
    /// extraction result is still returned to the caller.
    pub async fn classify(&self, abstract_text: &str) -> Vec<SdgScore> {
        let resp = match self
            .client
            .post(&self.config.url)
            .json(&serde_json::json!({ "text": abstract_text }))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "SDG classifier unreachable");
                return Vec::new();
            }
        };

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "SDG classifier returned non-success");
            return Vec::new();
        }

        let body: serde_json::Value = match resp.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "SDG classifier returned malformed JSON");
                return Vec::new();
            }
        };

        parse_predictions(&body, self.config.min_score)
    }
}

impl Default for SdgClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

/// Extract retained predictions from the classifier response body:
/// `{"predictions": [{"sdg": {"label": ...}, "prediction": <0..1>}, ...]}`.
/// Confidence is reported as a percentage rounded to two decimals.
fn parse_predictions(body: &serde_json::Value, min_score: f64) -> Vec<SdgScore> {
    body["predictions"]
        .as_array()
        .map(|preds| {
            preds
                .iter()
                .filter_map(|p| {
                    let prediction = p["prediction"].as_f64()?;
                    if prediction < min_score {
                        return None;
                    }
                    let label = p["sdg"]["label"].as_str()?.to_string();
                    Some(SdgScore {
                        label,
                        score: (prediction * 10000.0).round() / 100.0,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_predictions_filters_and_rounds() {
        let body = serde_json::json!({
            "predictions": [
                { "sdg": { "label": "Goal 7" }, "prediction": 0.91234 },
                { "sdg": { "label": "Goal 13" }, "prediction": 0.15 },
                { "sdg": { "label": "Goal 1" }, "prediction": 0.1499 },
            ]
        });
        let scores = parse_predictions(&body, DEFAULT_MIN_SCORE);
        assert_eq!(
            scores,
            vec![
                SdgScore { label: "Goal 7".into(), score: 91.23 },
                SdgScore { label: "Goal 13".into(), score: 15.0 },
            ]
        );
    }

    #[test]
    fn test_parse_predictions_tolerates_malformed_entries() {
        let body = serde_json::json!({
            "predictions": [
                { "sdg": {}, "prediction": 0.9 },
                { "prediction": 0.8 },
                { "sdg": { "label": "Goal 4" } },
                { "sdg": { "label": "Goal 5" }, "prediction": 0.5 },
            ]
        });
        let scores = parse_predictions(&body, DEFAULT_MIN_SCORE);
        assert_eq!(scores, vec![SdgScore { label: "Goal 5".into(), score: 50.0 }]);
    }

    #[test]
    fn test_parse_predictions_missing_array() {
        assert!(parse_predictions(&serde_json::json!({}), 0.15).is_empty());
        assert!(parse_predictions(&serde_json::json!({"predictions": "x"}), 0.15).is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades_to_empty() {
        let classifier = SdgClassifier::new(ClassifierConfig {
            // Port 1 on localhost: connection refused, no network dependency.
            url: "http://127.0.0.1:1/classify".to_string(),
            min_score: DEFAULT_MIN_SCORE,
        });
        assert!(classifier.classify("some abstract").await.is_empty());
    }
}
