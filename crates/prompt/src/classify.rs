//! Classification prompt: map free-text context to one macro-category id.

use lens_core::MacroCategory;

use crate::clean::truncate_chars;
use crate::ChatMessage;

const MAX_CLASSIFY_CHARS: usize = 500;

pub fn classification_messages(text: &str) -> Vec<ChatMessage> {
    let options = MacroCategory::ALL
        .iter()
        .map(|c| format!("- {}: {}", c.id(), c.label()))
        .collect::<Vec<_>>()
        .join("\n");
    let system = format!(
        "Classify the topic of the user's text into exactly one category.\n\
Categories:\n{}\n\
Reply with the category id only, in lowercase, without punctuation.",
        options
    );
    vec![
        ChatMessage::system(system),
        ChatMessage::user(truncate_chars(text.trim(), MAX_CLASSIFY_CHARS)),
    ]
}
