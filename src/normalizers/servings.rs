use regex::Regex;
use std::sync::LazyLock;

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("invalid regex: first integer"));

static SERVING_LABELS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)количество порций:|порций в рецепте:|порций:|на|порций|порции")
        .expect("invalid regex: serving labels")
});

static LIST_SERVING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d+\s*порц",
        r"\d+\s*порции",
        r"\d+\s*порций",
        r"\d+\s*servings",
        r"\d+\s*чел",
        r"\d+\s*персоны",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("invalid regex: list serving pattern"))
    .collect()
});

static TEXT_SERVING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"Количество порций:\s*\d+",
        r"Порций:\s*\d+",
        r"На\s+\d+\s*(?:порц|порции|порций|чел|персон)",
        r"\d+\s*(?:порций|порции|порц)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("invalid regex: text serving pattern"))
    .collect()
});

/// Canonicalize a servings string to "N порц" or "N чел".
///
/// Without any integer the text is returned with label phrases removed;
/// blank input yields `None`.
pub fn normalize_servings(raw: &str) -> Option<String> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(number) = FIRST_INTEGER.find(cleaned) {
        let number = number.as_str();
        let lower = cleaned.to_lowercase();
        let unit = if lower.contains("порц") || lower.contains("serving") {
            "порц"
        } else if lower.contains("чел") || lower.contains("персон") {
            "чел"
        } else {
            "порц"
        };
        return Some(format!("{number} {unit}"));
    }

    let stripped = SERVING_LABELS.replace_all(cleaned, "");
    let stripped = stripped.trim();
    (!stripped.is_empty()).then(|| stripped.to_string())
}

/// Find a servings count inside the aggregate text of a list item.
pub fn find_servings(text: &str) -> Option<String> {
    let found = LIST_SERVING_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(text))?;
    normalize_servings(found.as_str())
}

/// Find a servings count in free page text, trying labelled forms first.
pub fn find_servings_in_text(text: &str) -> Option<String> {
    TEXT_SERVING_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.find(text))
        .find_map(|found| normalize_servings(found.as_str()))
}
