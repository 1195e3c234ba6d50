//! Markup cleaning for scraped page content.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").expect("valid regex")
});

static LINE_BREAK_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|blockquote|tr)>").expect("valid regex")
});

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

static NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);").expect("valid regex"));

static INLINE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").expect("valid regex"));

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n+").expect("valid regex"));

const NAMED_ENTITIES: [(&str, &str); 7] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&hellip;", "…"),
    // must stay last so "&amp;lt;" decodes to "&lt;" rather than "<"
    ("&amp;", "&"),
];

/// Strips HTML markup and normalises whitespace.
///
/// `<script>`/`<style>` bodies are dropped, block-level closers and `<br>` become line
/// breaks, common entities are decoded, runs of blank lines collapse to one.
pub fn clean_markup(input: &str) -> String {
    let text = SCRIPT_STYLE.replace_all(input, "");
    let text = LINE_BREAK_TAGS.replace_all(&text, "\n");
    let text = TAGS.replace_all(&text, "");

    let text = NUMERIC_ENTITY.replace_all(&text, |caps: &regex::Captures| {
        let raw = &caps[1];
        let code = match raw.strip_prefix('x').or_else(|| raw.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    let mut text = text.into_owned();
    for (entity, replacement) in NAMED_ENTITIES {
        text = text.replace(entity, replacement);
    }

    let text = INLINE_SPACE.replace_all(&text, " ");
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let joined = lines.join("\n");
    BLANK_LINES.replace_all(&joined, "\n\n").trim().to_string()
}

/// Keeps at most `max_chars` code points, appending `…` when something was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}…", &text[..byte_idx]),
        None => text.to_string(),
    }
}
