//! Weighted length counting.
//!
//! [`TwitterTextCounter`] follows the public Twitter v3 counting configuration:
//! weights are expressed in hundredths (`SCALE`), code points inside [`LIGHT_RANGES`]
//! weigh 100, everything else weighs [`DEFAULT_WEIGHT`], every URL counts as
//! [`TRANSFORMED_URL_LENGTH`] characters and every emoji grapheme counts as 2.

use regex::Regex;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

pub const SCALE: u32 = 100;
pub const DEFAULT_WEIGHT: u32 = 200;
pub const EMOJI_WEIGHT: u32 = 200;
pub const TRANSFORMED_URL_LENGTH: u32 = 23;

/// Inclusive code point ranges that weigh 100.
pub const LIGHT_RANGES: [(u32, u32); 4] = [
    (0x0000, 0x10FF),
    (0x2000, 0x200D),
    (0x2010, 0x201F),
    (0x2032, 0x2037),
];

/// `scheme` matches `http(s)://…` and `www.…`; `bare` matches `label.tld` with an optional
/// port and path, validated against the TLD lists below.
const URL_PATTERN: &str = concat!(
    r"(?i)(?P<scheme>\b(?:https?://|www\.)[^\s<>]+)",
    r"|(?P<bare>(?P<labels>(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+)(?P<tld>[a-z]{2,63})\b",
    r"(?P<rest>(?::[0-9]{1,5})?(?:/[^\s<>]*)?))",
);
const URL_PREFIXES: [&str; 3] = ["https://", "http://", "www."];
const URL_TRAILING_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '\'', '"', ')', ']', '}', '。', '，', '！', '？', '；', '：',
    '）', '」', '』',
];
/// A bare domain right after one of these is part of something else (email, path, handle).
const BARE_INVALID_PRECEDING: &[char] = &['-', '_', '.', '/', '@', '#', '$'];

const GENERIC_TLDS: &str = "aero app art asia bank biz blog cat cloud club com coop dev edu \
    email gov info int jobs live mil mobi museum name net news online org page post pro shop \
    site store tech tel top travel wiki xxx xyz";

const COUNTRY_TLDS: &str = "ac ad ae af ag ai al am ao aq ar as at au aw ax az ba bb bd be bf \
    bg bh bi bj bm bn bo br bs bt bw by bz ca cc cd cf cg ch ci ck cl cm cn co cr cu cv cw cx \
    cy cz de dj dk dm do dz ec ee eg er es et eu fi fj fk fm fo fr ga gd ge gf gg gh gi gl gm \
    gn gp gq gr gs gt gu gw gy hk hm hn hr ht hu id ie il im in io iq ir is it je jm jo jp ke \
    kg kh ki km kn kp kr kw ky kz la lb lc li lk lr ls lt lu lv ly ma mc md me mg mh mk ml mm \
    mn mo mp mq mr ms mt mu mv mw mx my mz na nc ne nf ng ni nl no np nr nu nz om pa pe pf pg \
    ph pk pl pm pn pr ps pt pw py qa re ro rs ru rw sa sb sc sd se sg sh si sk sl sm sn so sr \
    ss st su sv sx sy sz tc td tf tg th tj tk tl tm tn to tr tt tv tw tz ua ug uk us uy uz va \
    vc ve vg vi vn vu wf ws ye yt za zm zw";

/// Country TLDs that are accepted as `name.tld` without a path.
const SHORT_DOMAIN_TLDS: [&str; 2] = ["co", "tv"];

fn in_list(list: &str, tld: &str) -> bool {
    list.split_whitespace().any(|t| t == tld)
}

#[derive(Error, Debug)]
pub enum CountError {
    #[error("Weighted counter unavailable: {0}")]
    Unavailable(String),

    #[error("Weighted counting failed: {0}")]
    Failed(String),
}

/// A platform-specific weighted length algorithm.
pub trait WeightedCounter: Send + Sync {
    fn weighted_length(&self, text: &str) -> Result<usize, CountError>;
}

/// Twitter/X weighted length counter.
#[derive(Debug, Clone)]
pub struct TwitterTextCounter {
    url_pattern: Regex,
}

impl TwitterTextCounter {
    pub fn new() -> Result<Self, CountError> {
        let url_pattern =
            Regex::new(URL_PATTERN).map_err(|e| CountError::Unavailable(e.to_string()))?;
        Ok(Self { url_pattern })
    }

    /// Byte spans of URLs in `text`, trailing punctuation excluded.
    pub fn url_spans(&self, text: &str) -> Vec<(usize, usize)> {
        self.url_pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(0)?;
                let trimmed = m.as_str().trim_end_matches(URL_TRAILING_PUNCTUATION);
                let accepted = if caps.name("scheme").is_some() {
                    let lower = trimmed.to_ascii_lowercase();
                    URL_PREFIXES
                        .iter()
                        .any(|p| lower.strip_prefix(p).is_some_and(|rest| !rest.is_empty()))
                } else {
                    is_bare_domain(text, &caps)
                };
                accepted.then(|| (m.start(), m.start() + trimmed.len()))
            })
            .collect()
    }
}

/// Protocol-less URL rules: a known TLD, not glued to a preceding word or `@`, and a
/// single-label country domain (`main.rs`) only counts when a path follows.
fn is_bare_domain(text: &str, caps: &regex::Captures<'_>) -> bool {
    let (Some(whole), Some(labels), Some(tld)) = (caps.get(0), caps.name("labels"), caps.name("tld"))
    else {
        return false;
    };
    let preceding = text[..whole.start()].chars().next_back();
    if preceding.is_some_and(|c| c.is_ascii_alphanumeric() || BARE_INVALID_PRECEDING.contains(&c)) {
        return false;
    }
    let tld = tld.as_str().to_ascii_lowercase();
    if in_list(GENERIC_TLDS, &tld) {
        return true;
    }
    if !in_list(COUNTRY_TLDS, &tld) {
        return false;
    }
    let has_path = caps
        .name("rest")
        .is_some_and(|r| r.as_str().trim_end_matches(URL_TRAILING_PUNCTUATION).contains('/'));
    let single_label = labels.as_str().matches('.').count() == 1;
    has_path || !single_label || SHORT_DOMAIN_TLDS.contains(&tld.as_str())
}

impl WeightedCounter for TwitterTextCounter {
    fn weighted_length(&self, text: &str) -> Result<usize, CountError> {
        let mut total: u64 = 0;
        let mut cursor = 0;
        for (start, end) in self.url_spans(text) {
            total += segment_weight(&text[cursor..start]);
            total += u64::from(TRANSFORMED_URL_LENGTH * SCALE);
            cursor = end;
        }
        total += segment_weight(&text[cursor..]);
        Ok(total.div_ceil(u64::from(SCALE)) as usize)
    }
}

fn segment_weight(segment: &str) -> u64 {
    segment
        .graphemes(true)
        .map(|g| {
            if is_emoji_grapheme(g) {
                u64::from(EMOJI_WEIGHT)
            } else {
                g.chars().map(|c| u64::from(char_weight(c))).sum()
            }
        })
        .sum()
}

fn char_weight(c: char) -> u32 {
    let cp = c as u32;
    if LIGHT_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&cp))
    {
        SCALE
    } else {
        DEFAULT_WEIGHT
    }
}

/// Emoji detection looks at the first code point, plus a U+FE0F presentation selector
/// right after it (`©️`, `™️`), so appending modifiers or joiners never lowers the
/// weight of a prefix.
fn is_emoji_grapheme(grapheme: &str) -> bool {
    let mut chars = grapheme.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if is_emoji_base(first) {
        return true;
    }
    if grapheme[first.len_utf8()..].starts_with('\u{FE0F}') {
        return true;
    }
    // keycaps: 1️⃣ #️⃣ *️⃣
    if matches!(first, '0'..='9' | '#' | '*') {
        return chars.any(|c| c == '\u{FE0F}' || c == '\u{20E3}');
    }
    false
}

fn is_emoji_base(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF
            | 0x2600..=0x27BF
            | 0x231A..=0x231B
            | 0x23E9..=0x23FA
            | 0x2934..=0x2935
            | 0x2B1B..=0x2B1C
            | 0x2B50
            | 0x2B55
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(text: &str) -> usize {
        TwitterTextCounter::new()
            .unwrap()
            .weighted_length(text)
            .unwrap()
    }

    #[test]
    fn test_latin_counts_one_per_char() {
        assert_eq!(count("hello world"), 11);
        assert_eq!(count(""), 0);
    }

    #[test]
    fn test_cjk_counts_double() {
        assert_eq!(count("你好"), 4);
        assert_eq!(count("知乎a"), 5);
    }

    #[test]
    fn test_url_counts_fixed_length() {
        let short = "see https://t.co/x";
        let long = "see https://example.com/a/very/long/path/that/keeps/going?with=query&and=more";
        assert_eq!(count(short), 4 + 23);
        assert_eq!(count(long), 4 + 23);
        assert_eq!(count("www.example.com"), 23);
    }

    #[test]
    fn test_url_trailing_punctuation_is_text() {
        assert_eq!(count("https://example.com."), 24);
        assert_eq!(count("(https://example.com)"), 25);
    }

    #[test]
    fn test_bare_scheme_is_not_a_url() {
        assert_eq!(count("https://"), 8);
    }

    #[test]
    fn test_emoji_sequences_count_two() {
        assert_eq!(count("👍"), 2);
        assert_eq!(count("👍🏽"), 2);
        assert_eq!(count("👨\u{200D}👩\u{200D}👧"), 2);
        assert_eq!(count("🇨🇳"), 2);
        assert_eq!(count("1\u{FE0F}\u{20E3}"), 2);
        assert_eq!(count("☀"), 2);
    }

    #[test]
    fn test_bare_domains_count_as_urls() {
        assert_eq!(count("example.com"), 23);
        assert_eq!(count("see github.com/rust-lang/rust/issues/12345?x=1#frag now"), 4 + 23 + 4);
        assert_eq!(count("bbc.co.uk"), 23);
        assert_eq!(count("t.co/abc"), 23);
        assert_eq!(count("example.com."), 24);

        let reply = format!("{} example.com", "a".repeat(260));
        assert_eq!(count(&reply), 260 + 1 + 23);
    }

    #[test]
    fn test_non_urls_stay_plain_text() {
        // file names with a country TLD and no path
        assert_eq!(count("main.rs"), 7);
        // unknown TLD, email, dotted abbreviation
        assert_eq!(count("config.yaml"), 11);
        assert_eq!(count("me@example.com"), 14);
        assert_eq!(count("e.g."), 4);
        assert_eq!(count("example.commit"), 14);
    }

    #[test]
    fn test_emoji_presentation_selector_counts_two() {
        assert_eq!(count("\u{00A9}\u{FE0F}"), 2);
        assert_eq!(count("\u{2122}\u{FE0F}"), 2);
        assert_eq!(count("\u{00A9}"), 1);
    }

    #[test]
    fn test_long_heavy_text_does_not_overflow() {
        let text = "字".repeat(22_000_000);
        assert_eq!(count(&text), 44_000_000);
    }

    #[test]
    fn test_url_spans_skip_embedded_www() {
        let counter = TwitterTextCounter::new().unwrap();
        assert!(counter.url_spans("awww.example").is_empty());
        assert_eq!(counter.url_spans("go www.example.com now"), vec![(3, 18)]);
    }
}
