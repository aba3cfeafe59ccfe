//! Context Assembler - builds the generation prompt from fixed context,
//! recent history, and the new utterance.
//!
//! The prompt is assembled in five parts, always in this order:
//! 1. **Preamble**: the advisor's role and response policy
//! 2. **Context**: crop, condition, and status from the session
//! 3. **History**: the last few exchanges, oldest first, as `User:`/`Bot:` lines
//! 4. **Question**: the new utterance, labeled as the farmer's
//! 5. **Cue**: the label the reply continues from
//!
//! Assembly is a pure function of its inputs.

use field_state::SessionContext;
use serde::{Deserialize, Serialize};

use crate::history::ConversationHistory;

/// Label the generated reply continues from.
pub const REPLY_CUE: &str = "AGRO-TWIN:";

/// Label for the person asking.
pub const ASKER_LABEL: &str = "Farmer:";

const PREAMBLE: &str = "You are AGRO-TWIN, an advanced agricultural AI agent.";

const INSTRUCTIONS: [&str; 4] = [
    "Answer specifically for the crop and condition mentioned above.",
    "Be concise, empathetic, and scientific.",
    "If the status is HEALTHY, advise on maintenance.",
    "Otherwise, advise on treatment.",
];

/// Configuration for prompt assembly.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Number of most recent exchanges rendered into the prompt.
    pub history_window: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self { history_window: 3 }
    }
}

/// Builds prompts for the generation service.
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    config: AssemblerConfig,
}

impl ContextAssembler {
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(AssemblerConfig::default())
    }

    pub fn history_window(&self) -> usize {
        self.config.history_window
    }

    /// Collect the prompt parts without rendering them.
    pub fn assemble(
        &self,
        session: &SessionContext,
        history: &ConversationHistory,
        user_text: &str,
    ) -> AssembledPrompt {
        AssembledPrompt {
            session: session.clone(),
            recent_history: history
                .recent(self.config.history_window)
                .iter()
                .map(|e| (e.user.clone(), e.reply.clone()))
                .collect(),
            user_text: user_text.to_string(),
        }
    }

    /// Build the final prompt string.
    pub fn build_prompt(
        &self,
        session: &SessionContext,
        history: &ConversationHistory,
        user_text: &str,
    ) -> String {
        self.assemble(session, history, user_text).to_prompt_string()
    }
}

/// The parts of a prompt, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledPrompt {
    pub session: SessionContext,

    /// `(user, reply)` pairs, oldest first.
    pub recent_history: Vec<(String, String)>,

    pub user_text: String,
}

impl AssembledPrompt {
    /// Format as the prompt string sent to the generator.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(PREAMBLE);
        prompt.push_str("\n\n");

        prompt.push_str("## Current Context\n");
        prompt.push_str(&format!("Crop: {}\n", self.session.crop));
        prompt.push_str(&format!("Condition: {}\n", self.session.condition));
        prompt.push_str(&format!("Status: {}\n", self.session.status));
        prompt.push('\n');

        prompt.push_str("## Instructions\n");
        for (i, line) in INSTRUCTIONS.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, line));
        }
        prompt.push('\n');

        if !self.recent_history.is_empty() {
            prompt.push_str("## Recent History\n");
            for (user, reply) in &self.recent_history {
                prompt.push_str(&format!("User: {}\nBot: {}\n", user, reply));
            }
            prompt.push('\n');
        }

        prompt.push_str(&format!("{} {}\n", ASKER_LABEL, self.user_text));
        prompt.push_str(REPLY_CUE);

        prompt
    }
}
