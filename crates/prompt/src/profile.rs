//! Profile analysis prompt: category-specific system instruction + assembled user content.

use lens_core::{ContentItem, ContentKind, MacroCategory, Platform, UserInfo};

use crate::clean::{clean_markup, truncate_chars};
use crate::ChatMessage;

/// Per-item budget in code points after cleaning.
pub const MAX_ITEM_CHARS: usize = 1200;

/// Budget for the whole content section; items beyond it are dropped.
pub const MAX_PROMPT_CHARS: usize = 12000;

const SECTION_CONTEXT: &str = "Analysis context:";
const SECTION_CONTENT: &str = "Recent public content";

const GENERAL_LABELS: &[&str] = &[
    "Openness",
    "Conscientiousness",
    "Extraversion",
    "Agreeableness",
    "Emotional stability",
];

/// Value-dimension labels the model scores for `category`.
pub fn labels_for(category: MacroCategory) -> &'static [&'static str] {
    match category {
        MacroCategory::General => GENERAL_LABELS,
        MacroCategory::Politics => &[
            "Progressive vs Conservative",
            "Libertarian vs Authoritarian",
            "Globalist vs Nationalist",
            "Reformist vs Traditionalist",
        ],
        MacroCategory::Economy => &[
            "Free market vs State intervention",
            "Growth vs Redistribution",
            "Risk-seeking vs Risk-averse",
        ],
        MacroCategory::Society => &[
            "Individualism vs Collectivism",
            "Egalitarian vs Hierarchical",
            "Secular vs Religious",
        ],
        MacroCategory::Technology => &[
            "Tech optimism vs Tech skepticism",
            "Open vs Proprietary",
            "Privacy vs Convenience",
        ],
        MacroCategory::Culture => &[
            "Modern vs Traditional",
            "Universalism vs Particularism",
            "Rational vs Intuitive",
        ],
        MacroCategory::Entertainment => &[
            "Mainstream vs Niche",
            "Casual vs Hardcore",
            "Appreciative vs Critical",
        ],
        MacroCategory::Lifestyle => &[
            "Frugal vs Hedonistic",
            "Family-centered vs Independent",
            "Routine vs Spontaneous",
        ],
    }
}

/// System instruction for profile generation; the category hint selects the label set.
pub fn profile_system_prompt(category: MacroCategory) -> String {
    let labels = labels_for(category)
        .iter()
        .map(|l| format!("- {}", l))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You analyse a person's public social media activity and describe their personality \
and value orientation. Focus area: {label}.\n\
Base every statement on the provided content; say so when the evidence is thin.\n\
Score each of these dimensions from -1.0 to 1.0:\n{labels}\n\
Answer with a single JSON object and nothing else, using this shape:\n\
{{\"nickname\": string, \"summary\": string, \"value_orientation\": \
[{{\"label\": string, \"score\": number, \"evidence\": string}}], \
\"topics\": [string], \"tone\": string}}",
        label = category.label(),
        labels = labels,
    )
}

fn kind_label(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Answer => "answer",
        ContentKind::Article => "article",
        ContentKind::Post => "post",
        ContentKind::Comment => "comment",
        ContentKind::Tweet => "tweet",
        ContentKind::Question => "question",
    }
}

/// Builds the user message for profile generation.
///
/// Order: platform + user line, optional explicit context, then numbered cleaned items.
/// Each item is capped at [`MAX_ITEM_CHARS`]; items stop once [`MAX_PROMPT_CHARS`] is reached.
/// Items that are empty after cleaning are skipped.
pub fn assemble_profile_prompt(
    platform: Platform,
    user_info: Option<&UserInfo>,
    context: Option<&str>,
    items: &[ContentItem],
) -> String {
    let mut out = String::new();
    out.push_str("Platform: ");
    out.push_str(platform.display_name());
    out.push('\n');
    if let Some(user) = user_info {
        out.push_str("User: ");
        out.push_str(&user.name);
        if let Some(headline) = user.headline.as_deref().filter(|h| !h.trim().is_empty()) {
            out.push_str(" — ");
            out.push_str(headline.trim());
        }
        out.push('\n');
    }
    out.push('\n');

    if let Some(ctx) = context.map(str::trim).filter(|c| !c.is_empty()) {
        out.push_str(SECTION_CONTEXT);
        out.push('\n');
        out.push_str(ctx);
        out.push_str("\n\n");
    }

    let mut blocks: Vec<String> = Vec::new();
    let mut used = 0;
    for item in items {
        let body = clean_markup(&item.content);
        if body.is_empty() {
            continue;
        }
        let mut block = format!("[{}] ({})", blocks.len() + 1, kind_label(item.kind));
        if let Some(title) = item.title.as_deref().map(clean_markup).filter(|t| !t.is_empty()) {
            block.push(' ');
            block.push_str(&title);
        }
        block.push('\n');
        block.push_str(&truncate_chars(&body, MAX_ITEM_CHARS));

        let size = block.chars().count();
        if used + size > MAX_PROMPT_CHARS && !blocks.is_empty() {
            break;
        }
        used += size;
        blocks.push(block);
    }

    out.push_str(&format!("{} ({} items):\n", SECTION_CONTENT, blocks.len()));
    out.push_str(&blocks.join("\n\n"));
    out.push('\n');
    out
}

/// System + user messages for one profile generation.
pub fn profile_messages(prompt: &str, category: MacroCategory) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(profile_system_prompt(category)),
        ChatMessage::user(prompt),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, content: &str) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            kind: ContentKind::Answer,
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_every_category_has_labels() {
        for c in MacroCategory::ALL {
            assert!(!labels_for(c).is_empty());
        }
    }

    #[test]
    fn test_system_prompt_uses_category_labels() {
        let prompt = profile_system_prompt(MacroCategory::Politics);
        assert!(prompt.contains("Libertarian vs Authoritarian"));
        assert!(!prompt.contains("Openness"));
        assert!(prompt.contains("\"value_orientation\""));
    }

    #[test]
    fn test_items_are_cleaned_and_numbered() {
        let items = vec![
            item("1", "<p>Rust is <b>great</b></p>"),
            item("2", "<div></div>"),
            item("3", "Second&nbsp;answer"),
        ];
        let prompt = assemble_profile_prompt(Platform::Zhihu, None, None, &items);
        assert!(prompt.contains("(2 items)"));
        assert!(prompt.contains("[1] (answer)\nRust is great"));
        assert!(prompt.contains("[2] (answer)\nSecond answer"));
        assert!(!prompt.contains(SECTION_CONTEXT));
    }

    #[test]
    fn test_context_section_only_when_non_blank() {
        let items = vec![item("1", "hello")];
        let with = assemble_profile_prompt(Platform::Reddit, None, Some(" AI regulation "), &items);
        assert!(with.contains("Analysis context:\nAI regulation\n"));
        let blank = assemble_profile_prompt(Platform::Reddit, None, Some("   "), &items);
        assert!(!blank.contains(SECTION_CONTEXT));
    }

    #[test]
    fn test_user_line_includes_headline() {
        let user = UserInfo {
            name: "alice".to_string(),
            headline: Some("engineer".to_string()),
            ..Default::default()
        };
        let prompt = assemble_profile_prompt(Platform::Quora, Some(&user), None, &[]);
        assert!(prompt.starts_with("Platform: Quora\nUser: alice — engineer\n"));
        assert!(prompt.contains("(0 items)"));
    }

    #[test]
    fn test_total_budget_drops_tail_items() {
        let long = "x".repeat(MAX_ITEM_CHARS * 2);
        let items: Vec<ContentItem> = (0..20).map(|i| item(&i.to_string(), &long)).collect();
        let prompt = assemble_profile_prompt(Platform::Twitter, None, None, &items);
        // each block is ~1214 chars (header + 1200 + ellipsis), so nine fit into 12000
        assert!(prompt.contains("(9 items)"));
        assert!(!prompt.contains("[20]"));
    }

    #[test]
    fn test_profile_messages_roles() {
        let messages = profile_messages("content", MacroCategory::Technology);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, crate::MessageRole::System);
        assert_eq!(messages[1], ChatMessage::user("content"));
    }
}
