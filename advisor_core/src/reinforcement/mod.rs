//! Regression Updater - bounded reinforcement of question weights.
//!
//! Each reinforcement moves a weight a fixed fraction of the way to 1.0:
//!
//! `w' = w + α (1 - w)`, equivalently `1 - w' = (1 - α)(1 - w)`
//!
//! so after `n` updates `1 - wₙ = (1 - w₀)(1 - α)ⁿ`. The category is
//! re-ranked and the catalogue written through to disk after every update.

use tracing::{info, warn};

use crate::catalogue::{Catalogue, CatalogueStore, WeightChange};

/// Applies the reinforcement rule and persists the result.
#[derive(Debug, Clone)]
pub struct Reinforcer {
    learning_rate: f64,
}

impl Reinforcer {
    /// Fraction of the remaining distance to 1.0 covered per update.
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

    /// Create a reinforcer. `learning_rate` must lie in `(0, 1)`.
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    pub fn with_defaults() -> Self {
        Self::new(Self::DEFAULT_LEARNING_RATE)
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// The weight after one reinforcement.
    pub fn next_weight(&self, weight: f64) -> f64 {
        weight + self.learning_rate * (1.0 - weight)
    }

    /// Reinforce the entry whose text equals `question` exactly within `category`.
    ///
    /// Unknown categories or questions are ignored and nothing is written.
    /// A failed write is logged; the in-memory update stands either way.
    pub fn reinforce(
        &self,
        catalogue: &mut Catalogue,
        store: &CatalogueStore,
        category: &str,
        question: &str,
    ) -> Option<WeightChange> {
        let change = catalogue.update_weight(category, question, |w| self.next_weight(w))?;

        info!(
            category = %change.category,
            rank = change.new_rank,
            "updated {}",
            change
        );

        if let Err(e) = store.save(catalogue) {
            warn!(path = %store.path().display(), error = %e, "failed to persist catalogue");
        }

        Some(change)
    }
}

impl Default for Reinforcer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
