//! Emotion classification service.
//!
//! Wraps a [`Classifier`] with the response contract callers rely on:
//! results sorted by descending score, empty input short-circuits, and a
//! failing classifier yields an empty result rather than an error.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::warn;

use crate::events::{names, EventSink, NoOpEventSink};
use crate::providers::{Classifier, LabelScore};

/// Classification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// Text to classify.
    pub text: String,
}

/// Classification response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Labels with scores, highest first.
    pub results: Vec<LabelScore>,
}

impl ClassifyResponse {
    /// The highest scoring label, if any.
    #[must_use]
    pub fn top(&self) -> Option<&LabelScore> {
        self.results.first()
    }
}

/// Applies the classification contract on top of a [`Classifier`].
#[derive(Clone)]
pub struct ClassifierService {
    classifier: Arc<dyn Classifier>,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for ClassifierService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierService").finish_non_exhaustive()
    }
}

impl ClassifierService {
    /// Creates a service around `classifier`.
    #[must_use]
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            events: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Classifies `text`.
    pub async fn classify(&self, text: &str) -> ClassifyResponse {
        let text = text.trim();
        if text.is_empty() {
            return ClassifyResponse::default();
        }

        match self.classifier.classify(text).await {
            Ok(mut results) => {
                sort_by_score(&mut results);
                ClassifyResponse { results }
            }
            Err(e) => {
                warn!(error = %e, "Classification failed, returning no labels");
                self.events
                    .emit(names::CLASSIFY_FAILED, Some(json!({ "error": e.to_string() })))
                    .await;
                ClassifyResponse::default()
            }
        }
    }

    /// Handles a transport-level request.
    pub async fn classify_request(&self, request: &ClassifyRequest) -> ClassifyResponse {
        self.classify(&request.text).await
    }
}

/// Sorts by descending score, keeping the input order for ties. NaN scores
/// go last.
pub fn sort_by_score(results: &mut [LabelScore]) {
    results.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
    });
}

/// Turns raw model logits into a sorted label distribution with a
/// numerically stable softmax. Logits and labels are paired by index; extra
/// entries on either side are ignored.
#[must_use]
pub fn label_scores_from_logits<S: AsRef<str>>(logits: &[f32], labels: &[S]) -> Vec<LabelScore> {
    let n = logits.len().min(labels.len());
    if n == 0 {
        return Vec::new();
    }
    let logits = &logits[..n];
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    let mut results: Vec<LabelScore> = labels[..n]
        .iter()
        .zip(exps)
        .map(|(label, e)| LabelScore::new(label.as_ref(), e / sum))
        .collect();
    sort_by_score(&mut results);
    results
}
