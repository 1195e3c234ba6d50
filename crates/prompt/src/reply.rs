//! Reply-drafting prompt for the inline comment assistant.

use lens_core::Platform;

use crate::clean::{clean_markup, truncate_chars};
use crate::ChatMessage;

const MAX_THREAD_CHARS: usize = 4000;

/// Messages asking the model to draft a reply to `thread` on `platform`.
///
/// `instruction` carries the user's intent (stance, tone, key points). When the platform
/// has a `limit` the model is told to stay under it; the caller still enforces it.
pub fn reply_messages(
    platform: Platform,
    thread: &str,
    instruction: Option<&str>,
    limit: Option<usize>,
) -> Vec<ChatMessage> {
    let mut system = format!(
        "You help a user write a reply on {}. Write in the language of the thread. \
Output only the reply text, no quotes, no preamble.",
        platform.display_name()
    );
    if let Some(max) = limit {
        system.push_str(&format!(
            " The reply must stay under {} characters (URLs count as 23, emoji and CJK characters as 2).",
            max
        ));
    }

    let mut user = String::from("Thread:\n");
    user.push_str(&truncate_chars(&clean_markup(thread), MAX_THREAD_CHARS));
    if let Some(instr) = instruction.map(str::trim).filter(|s| !s.is_empty()) {
        user.push_str("\n\nWhat I want to say:\n");
        user.push_str(instr);
    }

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}
