use regex::Regex;
use std::sync::LazyLock;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?$").expect("invalid regex: iso duration")
});

static TIME_LABELS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)время приготовления:|готовится:|приготовление:|время|приготовления")
        .expect("invalid regex: time labels")
});

// Order matters: the first pattern that matches the item text wins.
static LIST_TIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d+\s*мин",
        r"\d+\s*минут",
        r"\d+\s*час",
        r"\d+\s*часа",
        r"PT\w+",
        r"\d+\s*-\s*\d+\s*мин",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("invalid regex: list time pattern"))
    .collect()
});

const TIME_VALUE: &str = r"(?:\d+\s*(?:часов|часа|час|ч)\.?(?:\s*\d+\s*(?:минут[аы]?|мин)\.?)?|\d+\s*(?:минут[аы]?|мин)\.?)";

static TEXT_TIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["Время приготовления:", "Готовится:", "Приготовление:"]
        .iter()
        .map(|label| format!(r"{label}\s*{TIME_VALUE}"))
        .chain(std::iter::once(r"\d+\s*(?:минут|мин|часа|час)".to_string()))
        .map(|pattern| Regex::new(&pattern).expect("invalid regex: text time pattern"))
        .collect()
});

/// Render an ISO-8601 `PT#H#M` duration as "H ч M мин", "H ч" or "M мин".
///
/// Anything else is returned trimmed with known label prefixes removed.
pub fn normalize_duration(raw: &str) -> String {
    let cleaned = raw.trim();

    if let Some(caps) = ISO_DURATION.captures(cleaned) {
        let hours = caps.get(1).map(|m| m.as_str());
        let minutes = caps.get(2).map(|m| m.as_str());
        match (hours, minutes) {
            (Some(h), Some(m)) => return format!("{h} ч {m} мин"),
            (Some(h), None) => return format!("{h} ч"),
            (None, Some(m)) => return format!("{m} мин"),
            (None, None) => {}
        }
    }

    TIME_LABELS
        .replace_all(cleaned, "")
        .trim_matches(|c: char| c.is_whitespace() || c == ':')
        .to_string()
}

/// Find a cooking time inside the aggregate text of a list item.
pub fn find_cooking_time(text: &str) -> Option<String> {
    let found = LIST_TIME_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(text))?
        .as_str();

    let normalized = normalize_duration(found);
    (!normalized.is_empty()).then_some(normalized)
}

/// Find a cooking time in free page text, trying labelled forms first.
pub fn find_cooking_time_in_text(text: &str) -> Option<String> {
    TEXT_TIME_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.find(text))
        .map(|found| normalize_duration(found.as_str()))
        .find(|normalized| !normalized.is_empty())
}
