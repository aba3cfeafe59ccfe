//! Fuzzy Matcher - maps free text onto the closest catalogue question.
//!
//! 1. **Normalize**: lowercase both the input and each question
//! 2. **Score**: Ratcliff/Obershelp similarity for every `(category, entry)` pair
//! 3. **Select**: keep the first pair with the strictly highest score
//! 4. **Gate**: report it only if the score is strictly above the threshold
//!
//! Matching is pure; it never touches weights.

mod sequence;

pub use sequence::*;

use serde::{Deserialize, Serialize};

use crate::catalogue::Catalogue;

/// A catalogue question that free text was matched against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionMatch {
    pub category: String,
    /// Canonical catalogue text, not the user's wording.
    pub question: String,
    pub ratio: f64,
}

/// Finds the best-matching catalogue entry for free text.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl FuzzyMatcher {
    /// Similarity a match must strictly exceed.
    pub const DEFAULT_THRESHOLD: f64 = 0.8;

    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn with_defaults() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The highest-scoring entry regardless of threshold.
    ///
    /// Later pairs replace the current best only on a strictly greater ratio,
    /// so ties resolve to the first entry in catalogue order. Returns `None`
    /// when nothing scores above zero.
    pub fn best_candidate(&self, text: &str, catalogue: &Catalogue) -> Option<QuestionMatch> {
        let needle = text.to_lowercase();
        let mut best: Option<(&str, &str, f64)> = None;
        let mut best_ratio = 0.0;

        for (category, entry) in catalogue.entries() {
            let r = ratio(&needle, &entry.text.to_lowercase());
            if r > best_ratio {
                best_ratio = r;
                best = Some((category, entry.text.as_str(), r));
            }
        }

        best.map(|(category, question, ratio)| QuestionMatch {
            category: category.to_string(),
            question: question.to_string(),
            ratio,
        })
    }

    /// The best entry, if its similarity is strictly above the threshold.
    pub fn best_match(&self, text: &str, catalogue: &Catalogue) -> Option<QuestionMatch> {
        self.best_candidate(text, catalogue)
            .filter(|m| m.ratio > self.threshold)
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}
