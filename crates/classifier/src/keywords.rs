//! Keyword tables per macro-category (English + Chinese).

use lens_core::MacroCategory;

/// Table order breaks ties between categories with equal hit counts.
pub(crate) const KEYWORD_TABLE: &[(MacroCategory, &[&str])] = &[
    (
        MacroCategory::Politics,
        &[
            "politics", "political", "election", "government", "president", "congress",
            "parliament", "policy", "democracy", "vote", "diplomacy", "geopolitics",
            "政治", "选举", "政府", "政策", "民主", "外交", "国际关系", "地缘",
        ],
    ),
    (
        MacroCategory::Economy,
        &[
            "economy", "economic", "inflation", "market", "stock", "finance", "investment",
            "interest rate", "gdp", "recession", "crypto", "housing price",
            "经济", "通胀", "股市", "金融", "投资", "利率", "房价", "基金", "理财",
        ],
    ),
    (
        MacroCategory::Society,
        &[
            "society", "social issue", "education", "gender", "inequality", "immigration",
            "healthcare", "crime", "welfare", "employment",
            "社会", "教育", "性别", "移民", "医疗", "就业", "婚姻", "养老", "户口",
        ],
    ),
    (
        MacroCategory::Technology,
        &[
            "technology", "tech", "ai", "artificial intelligence", "programming", "software",
            "startup", "gpu", "chip", "rust", "python", "machine learning", "llm",
            "科技", "技术", "人工智能", "编程", "程序员", "芯片", "互联网", "大模型", "算法",
        ],
    ),
    (
        MacroCategory::Culture,
        &[
            "culture", "history", "philosophy", "literature", "religion", "art", "book",
            "language", "tradition",
            "文化", "历史", "哲学", "文学", "宗教", "艺术", "读书", "传统",
        ],
    ),
    (
        MacroCategory::Entertainment,
        &[
            "movie", "film", "music", "game", "gaming", "anime", "celebrity", "tv show",
            "sports", "football", "nba",
            "电影", "音乐", "游戏", "动漫", "明星", "综艺", "电视剧", "体育", "足球",
        ],
    ),
    (
        MacroCategory::Lifestyle,
        &[
            "lifestyle", "travel", "food", "cooking", "fitness", "health", "fashion",
            "relationship", "parenting", "pet",
            "生活", "旅行", "美食", "做饭", "健身", "健康", "穿搭", "恋爱", "育儿", "宠物",
        ],
    ),
];

/// Byte offset of the first occurrence of `keyword` in the lowercase `haystack`.
///
/// ASCII keywords must sit on word boundaries ("ai" does not match "said"); CJK keywords
/// match as plain substrings since the script has no spaces.
pub(crate) fn find_keyword(haystack: &str, keyword: &str) -> Option<usize> {
    if !keyword.is_ascii() {
        return haystack.find(keyword);
    }
    let is_word = |c: char| c.is_ascii_alphanumeric();
    haystack
        .match_indices(keyword)
        .map(|(start, _)| start)
        .find(|&start| {
            let before = haystack[..start].chars().next_back();
            let after = haystack[start + keyword.len()..].chars().next();
            !before.is_some_and(is_word) && !after.is_some_and(is_word)
        })
}

pub(crate) fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    find_keyword(haystack, keyword).is_some()
}

/// Number of distinct keywords of each category found in `text`, in table order.
pub(crate) fn keyword_hits(text: &str) -> Vec<(MacroCategory, usize)> {
    let lower = text.to_lowercase();
    KEYWORD_TABLE
        .iter()
        .map(|(category, words)| {
            let hits = words.iter().filter(|w| contains_keyword(&lower, w)).count();
            (*category, hits)
        })
        .collect()
}
