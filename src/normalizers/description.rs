use scraper::ElementRef;

use crate::document;

const MIN_CHARS: usize = 21;
const MAX_CHARS: usize = 299;

/// Paragraphs containing one of these are metadata rows, not descriptions.
pub const LABEL_DENYLIST: [&str; 4] = ["категория:", "ингредиенты:", "теги:", "назначение:"];

/// Pick a short description paragraph inside a list item.
///
/// Prefers the paragraph directly after the breadcrumb block; otherwise the
/// first paragraph of acceptable length that is not a label row.
pub fn select_description(container: ElementRef, breadcrumb_css: &str) -> Option<String> {
    if let Some(paragraph) = paragraph_after(container, breadcrumb_css) {
        let text = document::text(paragraph);
        if text.chars().count() >= MIN_CHARS {
            return Some(text);
        }
    }

    document::select_in(container, "p")
        .into_iter()
        .map(document::text)
        .find(|text| is_description_like(text))
}

fn paragraph_after<'a>(container: ElementRef<'a>, breadcrumb_css: &str) -> Option<ElementRef<'a>> {
    let breadcrumbs = document::first_in(container, breadcrumb_css)?;
    let next = breadcrumbs.next_siblings().find_map(ElementRef::wrap)?;
    (next.value().name() == "p").then_some(next)
}

fn is_description_like(text: &str) -> bool {
    let length = text.chars().count();
    if !(MIN_CHARS..=MAX_CHARS).contains(&length) {
        return false;
    }
    let lower = text.to_lowercase();
    !LABEL_DENYLIST.iter().any(|label| lower.contains(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn item(html: &str) -> Html {
        Html::parse_fragment(&format!(r#"<article class="item-bl">{html}</article>"#))
    }

    #[test]
    fn test_prefers_paragraph_after_breadcrumbs() {
        let html = item(
            r#"<p>Это очень длинный абзац, который идет первым</p>
               <div class="article-breadcrumbs"><a>Супы</a></div>
               <p>Наваристый борщ со сметаной и зеленью</p>"#,
        );
        let container = document::first_match(&html, "article").unwrap();
        assert_eq!(
            select_description(container, ".article-breadcrumbs").as_deref(),
            Some("Наваристый борщ со сметаной и зеленью")
        );
    }

    #[test]
    fn test_skips_labels_and_bounds() {
        let html = item(
            r#"<p>Коротко</p>
               <p>Категория: Супы, Вторые блюда и прочее</p>
               <p>Ингредиенты: свекла, капуста, картофель</p>
               <p>Подходящее описание рецепта нужной длины</p>"#,
        );
        let container = document::first_match(&html, "article").unwrap();
        assert_eq!(
            select_description(container, ".article-breadcrumbs").as_deref(),
            Some("Подходящее описание рецепта нужной длины")
        );
    }

    #[test]
    fn test_length_window() {
        assert!(!is_description_like(&"а".repeat(20)));
        assert!(is_description_like(&"а".repeat(21)));
        assert!(is_description_like(&"а".repeat(299)));
        assert!(!is_description_like(&"а".repeat(300)));
    }
}
