//! Advisor engine - the API the presentation layer drives.
//!
//! A turn runs in this order:
//! 1. **Match**: free text is fuzzy-matched against the catalogue (skipped
//!    when the user picked a suggestion directly)
//! 2. **Reinforce**: the matched or chosen question gains weight and the
//!    catalogue is written through
//! 3. **Assemble**: session context, recent history, and the utterance form a prompt
//! 4. **Generate**: the prompt goes to the generator under a timeout
//! 5. **Record**: the exchange is appended to history only if a reply came back
//!
//! Dropping a turn's future cancels it. Reinforcement done before the
//! generator was called stays applied; history is not touched.

use field_state::{HandoffFile, SessionContext};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::catalogue::{Catalogue, CatalogueStore};
use crate::config::AdvisorConfig;
use crate::context_assembler::{AssemblerConfig, ContextAssembler};
use crate::generation::{GenerationError, Generator};
use crate::history::ConversationHistory;
use crate::matcher::FuzzyMatcher;
use crate::reinforcement::Reinforcer;

/// Prefix of every reply that reports a generation failure.
pub const ERROR_INDICATOR: &str = "⚠️ Connection Error:";

/// Owns the catalogue, session, and history for one advisory session.
pub struct AdvisorEngine {
    catalogue: Catalogue,
    store: CatalogueStore,
    session: SessionContext,
    history: ConversationHistory,
    matcher: FuzzyMatcher,
    reinforcer: Reinforcer,
    assembler: ContextAssembler,
    generator: Box<dyn Generator>,
    timeout: Duration,
    popular_weight: f64,
}

impl AdvisorEngine {
    /// Load the session handoff and persisted catalogue, falling back to
    /// defaults for either, and wire up the components from `config`.
    pub fn initialize(config: &AdvisorConfig, generator: Box<dyn Generator>) -> Self {
        let store = CatalogueStore::new(&config.storage.catalogue_path);
        let session = HandoffFile::new(&config.storage.handoff_path).load_session();
        let catalogue = store.load();

        info!(
            crop = %session.crop,
            condition = %session.condition,
            health = %session.health(),
            categories = catalogue.len(),
            generator = generator.name(),
            "advisor engine initialized"
        );

        Self {
            catalogue,
            store,
            session,
            history: ConversationHistory::new(),
            matcher: FuzzyMatcher::new(config.learning.match_threshold),
            reinforcer: Reinforcer::new(config.learning.learning_rate),
            assembler: ContextAssembler::new(AssemblerConfig {
                history_window: config.learning.history_window,
            }),
            generator,
            timeout: config.generation.timeout(),
            popular_weight: config.learning.popular_weight,
        }
    }

    /// Override the generation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read-only view of the ranked catalogue, for rendering suggestions.
    pub fn current_catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Weight above which a suggestion should be highlighted.
    pub fn popular_weight(&self) -> f64 {
        self.popular_weight
    }

    /// Handle free text typed by the user.
    pub async fn on_user_utterance(&mut self, text: &str) -> String {
        match self.matcher.best_match(text, &self.catalogue) {
            Some(found) => {
                debug!(
                    category = %found.category,
                    question = %found.question,
                    ratio = found.ratio,
                    "utterance matched catalogue"
                );
                self.reinforcer.reinforce(
                    &mut self.catalogue,
                    &self.store,
                    &found.category,
                    &found.question,
                );
            }
            None => debug!("utterance matched no catalogue question"),
        }
        self.respond(text).await
    }

    /// Handle a suggestion the user picked; the question text becomes the utterance.
    pub async fn on_suggestion_chosen(&mut self, category: &str, question: &str) -> String {
        if self
            .reinforcer
            .reinforce(&mut self.catalogue, &self.store, category, question)
            .is_none()
        {
            debug!(category, question, "chosen suggestion not in catalogue");
        }
        self.respond(question).await
    }

    async fn respond(&mut self, text: &str) -> String {
        match self.generate_reply(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(generator = self.generator.name(), error = %e, "generation failed");
                format!("{} {}", ERROR_INDICATOR, e)
            }
        }
    }

    async fn generate_reply(&mut self, text: &str) -> Result<String, GenerationError> {
        let prompt = self
            .assembler
            .build_prompt(&self.session, &self.history, text);
        debug!(chars = prompt.len(), "assembled prompt");

        let reply = tokio::time::timeout(self.timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))??;

        let id = self.history.push(text, reply.clone());
        debug!(exchange = %id, "recorded exchange");
        Ok(reply)
    }
}
