use chrono::DateTime;
use regex::Regex;
use std::sync::LazyLock;

const MAX_LITERAL_CHARS: usize = 20;

const DATE_LABELS: [&str; 4] = ["добавлено:", "опубликовано:", "создано:", "date:"];

static RELATIVE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(\d+)\s*дн", "дней"),
        (r"(\d+)\s*недел", "недель"),
        (r"(\d+)\s*месяц", "месяцев"),
        (r"(\d+)\s*год", "лет"),
    ]
    .into_iter()
    .map(|(pattern, unit)| {
        (
            Regex::new(pattern).expect("invalid regex: relative date"),
            unit,
        )
    })
    .collect()
});

static TEXT_DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"Добавлено:\s*[^\s]+(?:\s+[^\s]+){0,2}",
        r"Опубликовано:\s*[^\s]+(?:\s+[^\s]+){0,2}",
        r"Создано:\s*[^\s]+(?:\s+[^\s]+){0,2}",
        r"\d{1,2}\s+[а-я]+\s+\d{4}",
        r"\d{2}\.\d{2}\.\d{4}",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("invalid regex: text date"))
    .collect()
});

/// Canonicalize a human "added" date.
///
/// "сегодня", "вчера" and "позавчера" become fixed tokens, counts of days,
/// weeks, months or years become "N <unit> назад", anything else is kept as a
/// lowercased literal of at most 20 characters.
pub fn normalize_relative_date(raw: &str) -> Option<String> {
    let mut cleaned = raw.trim().to_lowercase();
    for label in DATE_LABELS {
        cleaned = cleaned.replace(label, "");
    }
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    if cleaned.contains("сегодня") || cleaned.contains("today") {
        return Some("сегодня".to_string());
    }
    if cleaned.contains("позавчера") {
        return Some("2 дня назад".to_string());
    }
    if cleaned.contains("вчера") || cleaned.contains("yesterday") {
        return Some("вчера".to_string());
    }

    for (pattern, unit) in RELATIVE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(cleaned) {
            return Some(format!("{} {unit} назад", &caps[1]));
        }
    }

    Some(cleaned.chars().take(MAX_LITERAL_CHARS).collect())
}

/// Find an added-date mention in free page text.
pub fn find_date_in_text(text: &str) -> Option<String> {
    TEXT_DATE_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.find(text))
        .find_map(|found| normalize_relative_date(found.as_str()))
}

/// Render an ISO-8601 timestamp as `dd.MM.yyyy` in the timestamp's own offset.
pub fn format_iso_date(raw: &str) -> Option<String> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(date) => Some(date.format("%d.%m.%Y").to_string()),
        Err(e) => {
            log::debug!("Unparseable ISO date {raw:?}: {e}");
            None
        }
    }
}

/// Keep the part before the first comma, as in "12 марта 2024, 14:05".
pub fn truncate_at_comma(raw: &str) -> Option<String> {
    let cleaned = raw.trim();
    let head = cleaned.split(',').next().unwrap_or(cleaned).trim();
    (!head.is_empty()).then(|| head.to_string())
}
