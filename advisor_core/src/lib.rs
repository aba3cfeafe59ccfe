//! # Advisor Core
//!
//! The adaptive question recommendation engine behind the Field Advisor.
//! It keeps a weighted catalogue of suggested questions, learns which ones
//! farmers actually ask, and assembles context-augmented prompts for an
//! external text-generation service.
//!
//! ## Core Components
//!
//! - **catalogue**: Categories of weighted questions, persisted as JSON
//! - **matcher**: Ratcliff/Obershelp fuzzy matching of free text to questions
//! - **reinforcement**: Bounded weight updates that re-rank a category
//! - **history**: Append-only record of completed exchanges
//! - **context_assembler**: Builds the prompt from session, history, and input
//! - **generation**: The prompt-in/text-out seam and its Ollama backend
//! - **engine**: Orchestrates a turn end to end
//!
//! ## Design Philosophy
//!
//! - **Owned State**: The engine owns its catalogue; nothing mutates it from outside
//! - **Always Answers**: Storage and generation failures degrade to defaults or
//!   an error string, never a fault
//! - **Write-Through**: Every weight change is persisted immediately

pub mod catalogue;
pub mod config;
pub mod context_assembler;
pub mod engine;
pub mod generation;
pub mod history;
pub mod matcher;
pub mod reinforcement;

pub use catalogue::*;
pub use config::*;
pub use context_assembler::*;
pub use engine::*;
pub use generation::*;
pub use history::*;
pub use matcher::*;
pub use reinforcement::*;
