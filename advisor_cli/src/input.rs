//! Chat line parsing.

use advisor_core::Catalogue;

pub const HELP: &str = "\
Type a question, or:
  /pick <category> <question>   ask a suggested question by its numbers
  /suggest                      show the ranked suggestions
  /help                         show this help
  /quit                         leave (Ctrl-D also works; Ctrl-C cancels a pending reply)";

/// What a line of chat input asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatInput {
    Empty,
    Ask(String),
    Pick { category: String, question: String },
    Suggest,
    Help,
    Quit,
    Invalid(String),
}

/// Parse one line against the catalogue currently on screen.
pub fn parse(line: &str, catalogue: &Catalogue) -> ChatInput {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ChatInput::Ask(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match parts.next().unwrap_or_default() {
        "quit" | "exit" => ChatInput::Quit,
        "help" => ChatInput::Help,
        "suggest" => ChatInput::Suggest,
        "pick" => {
            let (Some(c), Some(q), None) = (parts.next(), parts.next(), parts.next()) else {
                return ChatInput::Invalid("usage: /pick <category> <question>".to_string());
            };
            pick(catalogue, c, q)
        }
        other => ChatInput::Invalid(format!("unknown command: /{}", other)),
    }
}

fn pick(catalogue: &Catalogue, category: &str, question: &str) -> ChatInput {
    let (Some(c), Some(q)) = (one_based(category), one_based(question)) else {
        return ChatInput::Invalid("category and question must be numbers from 1".to_string());
    };
    let Some(group) = catalogue.categories().get(c) else {
        return ChatInput::Invalid(format!("no category {}", category));
    };
    let Some(entry) = group.entries.get(q) else {
        return ChatInput::Invalid(format!("no question {} in {}", question, group.name));
    };
    ChatInput::Pick {
        category: group.name.clone(),
        question: entry.text.clone(),
    }
}

fn one_based(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok()?.checked_sub(1)
}
