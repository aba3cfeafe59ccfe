//! Question entries - the weighted leaves of the catalogue.

use serde::{Deserialize, Serialize};

/// Largest weight an entry may hold; weights approach 1.0 but never reach it.
pub const MAX_WEIGHT: f64 = 1.0 - f64::EPSILON / 2.0;

/// A candidate question with its learned relevance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionEntry {
    /// Canonical question text, shown verbatim as a suggestion.
    #[serde(rename = "q")]
    pub text: String,

    /// Learned relevance in `[0.0, 1.0)`. Higher sorts first.
    pub weight: f64,
}

impl QuestionEntry {
    /// Create an entry. The weight is clamped into `[0.0, MAX_WEIGHT]`.
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight: clamp_weight(weight),
        }
    }

    /// Whether this entry has been engaged with enough to be highlighted.
    pub fn is_popular(&self, threshold: f64) -> bool {
        self.weight > threshold
    }

    /// Whether the weight lies in the valid range.
    pub fn has_valid_weight(&self) -> bool {
        self.weight.is_finite() && (0.0..1.0).contains(&self.weight)
    }
}

pub(crate) fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, MAX_WEIGHT)
    }
}

/// Record of a single weight update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightChange {
    pub category: String,
    pub question: String,
    pub old_weight: f64,
    pub new_weight: f64,
    /// Position of the entry within its category after re-ranking.
    pub new_rank: usize,
}

impl std::fmt::Display for WeightChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' weight: {:.2} -> {:.2}",
            self.question, self.old_weight, self.new_weight
        )
    }
}
