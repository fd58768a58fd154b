use once_cell::sync::Lazy;
use regex::Regex;

static OPTIONAL_IDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\boptional:\s*\((.*?)\)").expect("valid optional pattern"));

static NECESSARY_IDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bnecessary:\s*\((.*?)\)").expect("valid necessary pattern"));

static IMPROVEMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\boptional improvements:\s*(.*)").expect("valid improvements pattern")
});

/// Fields recovered from a categorization reply. Missing markers leave the
/// field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizationReply {
    pub optional_ids: Vec<i64>,
    pub necessary_ids: Vec<i64>,
    pub improvements: String,
}

/// Parse the three-part `optional: (...) necessary: (...) Optional improvements: ...`
/// reply. Each part is matched independently.
pub fn parse_reply(text: &str) -> CategorizationReply {
    CategorizationReply {
        optional_ids: capture(&OPTIONAL_IDS, text)
            .map(parse_id_list)
            .unwrap_or_default(),
        necessary_ids: capture(&NECESSARY_IDS, text)
            .map(parse_id_list)
            .unwrap_or_default(),
        improvements: capture(&IMPROVEMENTS, text)
            .map(clean_improvements)
            .unwrap_or_default(),
    }
}

fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Comma-separated integers; entries that are not integers are dropped
fn parse_id_list(list: &str) -> Vec<i64> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| entry.trim_start_matches('#').parse::<i64>().ok())
        .collect()
}

fn clean_improvements(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}
