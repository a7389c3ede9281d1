use regex::Regex;
use std::sync::LazyLock;

use crate::document::collapse_whitespace;

const UNITS: &str =
    r"г|кг|мл|л|шт|ч\.л|ст\.л|стак|зуб|пуч|уп|банк|пач|кус|дольк|веточ|лист|стебель|горст|щепот";

// Leading units must end their word: abbreviations may take a dot, stems may
// take an inflection ("стакана", "зубчика"), but "л" never starts "луковица".
const WHOLE_UNITS: &str = r"гр|г|кг|мл|л|шт|уп|ч\.л|ст\.л";
const STEM_UNITS: &str = r"стак|зуб|пуч|банк|пач|кус|дольк|веточ|лист|стебель|горст|щепот";

static AMOUNT_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\d+\s*({UNITS})")).expect("invalid regex: amount with unit")
});

static AMOUNT_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)по вкусу|для украшения").expect("invalid regex: amount phrase")
});

static TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s*$").expect("invalid regex: trailing number"));

static NUMERIC_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+-\d+").expect("invalid regex: numeric range"));

// Numbers that belong to a word: "3-х литровая", "2-й", "5-литровая", "на 4 порции".
static NUMBER_IN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+-(х|й|го|литров)|\bна\s+\d+").expect("invalid regex: number in name")
});

static LEADING_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(\d+(?:[.,/]\d+)?(?:\s*-\s*\d+(?:[.,/]\d+)?)?(?:\s*(?:(?:{WHOLE_UNITS})\.?|(?:{STEM_UNITS})[а-яё]*\.?))?)\s+(\S.*)$"
    ))
    .expect("invalid regex: leading amount")
});

static TRAILING_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(.*?\S)\s+(\d+(?:[.,/]\d+)?(?:\s*-\s*\d+(?:[.,/]\d+)?)?\s*(?:(?:{UNITS})\S*)?|по вкусу|для украшения)$"
    ))
    .expect("invalid regex: trailing amount")
});

const SPACED_SEPARATORS: [&str; 3] = [" – ", " - ", " — "];
const LOOSE_SEPARATORS: [&str; 6] = [" –", "– ", " -", "- ", " —", "— "];

/// Name and amount runs taken from site markup, e.g. plain text next to a
/// bolded quantity.
#[derive(Debug, Clone, Copy)]
pub struct MarkupRuns<'a> {
    pub plain: &'a str,
    pub emphasized: &'a str,
}

/// Whether the text carries a quantity worth splitting off.
pub fn has_amount(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || text.ends_with(':') {
        return false;
    }

    let stripped = NUMBER_IN_NAME.replace_all(text, " ");
    AMOUNT_WITH_UNIT.is_match(&stripped)
        || AMOUNT_PHRASE.is_match(&stripped)
        || TRAILING_NUMBER.is_match(&stripped)
        || NUMERIC_RANGE.is_match(&stripped)
}

/// Split free ingredient text into `(name, amount)`.
///
/// Tries, in order: a dash separator outside parentheses, the markup runs,
/// a leading quantity ("300 г рис"), a trailing quantity ("Мука 200 г").
/// Without an amount signal the whole text is the name and the amount is empty.
pub fn split_ingredient(text: &str, runs: Option<MarkupRuns>) -> (String, String) {
    let text = collapse_whitespace(text);

    if has_amount(&text) {
        if let Some((name, amount)) = split_on_separator(&text) {
            return (name, amount);
        }

        if let Some(runs) = runs {
            let plain = collapse_whitespace(runs.plain);
            let emphasized = collapse_whitespace(runs.emphasized);
            if !plain.is_empty() && !emphasized.is_empty() {
                return (plain, emphasized);
            }
        }

        if let Some(caps) = LEADING_AMOUNT.captures(&text) {
            return (caps[2].trim().to_string(), caps[1].trim().to_string());
        }

        if let Some(caps) = TRAILING_AMOUNT.captures(&text) {
            let name = caps[1].trim_end_matches([',', ' ']).to_string();
            if !name.is_empty() {
                return (name, caps[2].trim().to_string());
            }
        }
    } else if let Some(runs) = runs {
        let plain = collapse_whitespace(runs.plain);
        let emphasized = collapse_whitespace(runs.emphasized);
        if !plain.is_empty() && !emphasized.is_empty() {
            return (plain, emphasized);
        }
    }

    (text, String::new())
}

fn split_on_separator(text: &str) -> Option<(String, String)> {
    for separators in [&SPACED_SEPARATORS[..], &LOOSE_SEPARATORS[..]] {
        for separator in separators {
            if let Some(parts) = split_at_balanced(text, separator) {
                return Some(parts);
            }
        }
    }
    None
}

/// Split at the last occurrence of `separator` whose prefix has balanced
/// parentheses and whose sides are both non-empty.
fn split_at_balanced(text: &str, separator: &str) -> Option<(String, String)> {
    for (index, _) in text.rmatch_indices(separator) {
        let before = &text[..index];
        let after = &text[index + separator.len()..];
        if before.matches('(').count() != before.matches(')').count() {
            continue;
        }
        let name = before.trim();
        let amount = after.trim();
        if name.is_empty() || amount.is_empty() {
            continue;
        }
        return Some((name.to_string(), amount.to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_spaced_dash() {
        assert_eq!(
            split_ingredient("Картофель – 500 г", None),
            ("Картофель".to_string(), "500 г".to_string())
        );
        assert_eq!(
            split_ingredient("Соль - по вкусу", None),
            ("Соль".to_string(), "по вкусу".to_string())
        );
    }

    #[test]
    fn test_separator_inside_parentheses_is_skipped() {
        let (name, amount) =
            split_ingredient("Сливки (по желанию - не обязательно) — 200 мл", None);
        assert_eq!(name, "Сливки (по желанию - не обязательно)");
        assert_eq!(amount, "200 мл");
    }

    #[test]
    fn test_unbalanced_only_candidate_is_rejected() {
        let (name, amount) = split_ingredient("Зелень (укроп - петрушка 1 пуч", None);
        assert_eq!(amount, "1 пуч");
        assert_eq!(name, "Зелень (укроп - петрушка");
    }

    #[test]
    fn test_split_rejoins_to_input() {
        for (input, separator) in [
            ("Мука пшеничная - 300 г", " - "),
            ("Молоко – 1 стак.", " – "),
            ("Чеснок — 2 зуб.", " — "),
        ] {
            let (name, amount) = split_ingredient(input, None);
            assert!(!name.is_empty() && !amount.is_empty());
            assert_eq!(format!("{name}{separator}{amount}"), input);
        }
    }

    #[test]
    fn test_no_amount_keeps_whole_name() {
        assert_eq!(
            split_ingredient("  Зелень петрушки ", None),
            ("Зелень петрушки".to_string(), String::new())
        );
        assert_eq!(
            split_ingredient("Для соуса:", None),
            ("Для соуса:".to_string(), String::new())
        );
    }

    #[test]
    fn test_ordinal_numbers_do_not_split() {
        assert_eq!(
            split_ingredient("3-х литровая банка", None),
            ("3-х литровая банка".to_string(), String::new())
        );
        assert_eq!(split_ingredient("Сыр 2-го сорта", None).1, "");
        assert_eq!(split_ingredient("Банка 5-литровая", None).1, "");
        assert!(!has_amount("Тесто на 4 - х человек"));
    }

    #[test]
    fn test_leading_and_trailing_amounts() {
        assert_eq!(
            split_ingredient("300 г рис", None),
            ("рис".to_string(), "300 г".to_string())
        );
        assert_eq!(
            split_ingredient("Сахар 2 ст.л.", None),
            ("Сахар".to_string(), "2 ст.л.".to_string())
        );
        assert_eq!(
            split_ingredient("Яйца 3", None),
            ("Яйца".to_string(), "3".to_string())
        );
        assert_eq!(
            split_ingredient("Свинина 500 г", None),
            ("Свинина".to_string(), "500 г".to_string())
        );
        assert_eq!(
            split_ingredient("Сметана 200 г", None),
            ("Сметана".to_string(), "200 г".to_string())
        );
    }

    #[test]
    fn test_leading_unit_ends_its_word() {
        assert_eq!(
            split_ingredient("1 луковица крупная", None),
            ("луковица крупная".to_string(), "1".to_string())
        );
        assert_eq!(
            split_ingredient("2 лимона спелых", None),
            ("лимона спелых".to_string(), "2".to_string())
        );
        assert_eq!(
            split_ingredient("2 ст.л. сахара", None),
            ("сахара".to_string(), "2 ст.л.".to_string())
        );
        assert_eq!(
            split_ingredient("2 стакана муки", None),
            ("муки".to_string(), "2 стакана".to_string())
        );
        assert_eq!(
            split_ingredient("1.5 л молока", None),
            ("молока".to_string(), "1.5 л".to_string())
        );
    }

    #[test]
    fn test_markup_runs() {
        let runs = MarkupRuns {
            plain: "Морковь",
            emphasized: "2 шт",
        };
        assert_eq!(
            split_ingredient("Морковь 2 шт", Some(runs)),
            ("Морковь".to_string(), "2 шт".to_string())
        );
        let runs = MarkupRuns {
            plain: "Лавровый лист",
            emphasized: "",
        };
        assert_eq!(split_ingredient("Лавровый лист", Some(runs)).1, "");
    }

    #[test]
    fn test_has_amount_signals() {
        assert!(has_amount("Мука 200 г"));
        assert!(has_amount("Соль по вкусу"));
        assert!(has_amount("Яйца 2-3"));
        assert!(has_amount("Перец 1"));
        assert!(has_amount("Свинина 500 г"));
        assert!(has_amount("Сметана 200 г"));
        assert!(has_amount("Говядина 1 кг"));
        assert!(!has_amount("Перец черный молотый"));
    }
}
