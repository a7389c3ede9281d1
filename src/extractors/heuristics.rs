use super::{number_steps, Extractor, ParsingContext, RecipeDraft};
use crate::document;
use crate::model::Ingredient;
use crate::normalizers::has_amount;
use log::debug;
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

// "Мука пшеничная – 200 г", "Соль - по вкусу"
static INGREDIENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\d–—\-:][^–—:]{1,60}?)\s+[–—-]\s+(\d[^–—]{0,30}|по вкусу|для украшения)$")
        .expect("invalid regex: ingredient line")
});

const MAX_LINE_CHARS: usize = 100;

/// Segments the page into steps at "Шаг N" headings.
///
/// Each `h2`/`h3` whose text mentions a step opens a step; the paragraphs
/// after it, up to the next heading, form its text.
pub struct HeadingStepsExtractor;

impl HeadingStepsExtractor {
    fn step_after(heading: ElementRef, base_url: &str) -> Option<(String, Option<String>)> {
        let mut paragraphs = Vec::new();
        let mut image = None;

        for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
            let tag = sibling.value().name();
            if tag == "h2" || tag == "h3" {
                break;
            }
            if tag == "p" {
                let text = document::text(sibling);
                if !text.is_empty() {
                    paragraphs.push(text);
                }
            } else {
                paragraphs.extend(document::select_in(sibling, "p").into_iter().map(document::text));
            }
            if image.is_none() {
                image = if tag == "img" {
                    Some(sibling)
                } else {
                    document::first_in(sibling, "img")
                }
                .and_then(|img| document::attr(img, "src"))
                .map(|src| document::absolute_url(&src, base_url));
            }
        }

        let text = paragraphs.join(" ");
        (!text.trim().is_empty()).then_some((text, image))
    }
}

impl Extractor for HeadingStepsExtractor {
    fn name(&self) -> &'static str {
        "HeadingStepsExtractor"
    }

    fn extract(&self, context: &ParsingContext) -> Option<RecipeDraft> {
        let steps = number_steps(
            document::select(&context.document, "h2, h3")
                .into_iter()
                .filter(|heading| document::text(*heading).to_lowercase().contains("шаг"))
                .filter_map(|heading| Self::step_after(heading, &context.base_url)),
        );
        debug!("HeadingStepsExtractor: Found {} steps", steps.len());

        (!steps.is_empty()).then(|| RecipeDraft {
            instructions: steps,
            ..Default::default()
        })
    }
}

/// Scans list items and paragraphs for "Name – Amount" lines.
pub struct TextIngredientsExtractor;

impl Extractor for TextIngredientsExtractor {
    fn name(&self) -> &'static str {
        "TextIngredientsExtractor"
    }

    fn extract(&self, context: &ParsingContext) -> Option<RecipeDraft> {
        let mut ingredients: Vec<Ingredient> = Vec::new();

        for line in document::texts(&context.document, "li, p") {
            if line.chars().count() > MAX_LINE_CHARS {
                continue;
            }
            let Some(caps) = INGREDIENT_LINE.captures(&line) else {
                continue;
            };
            let (name, amount) = (caps[1].trim(), caps[2].trim());
            if !has_amount(amount) || ingredients.iter().any(|i| i.name == name) {
                continue;
            }
            ingredients.push(Ingredient::new(name, amount));
        }
        debug!("TextIngredientsExtractor: Found {} ingredients", ingredients.len());

        (!ingredients.is_empty()).then(|| RecipeDraft {
            ingredients,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(body: &str) -> ParsingContext {
        ParsingContext::new(
            &format!("<html><body>{body}</body></html>"),
            "https://www.gastronom.ru/recipe/5",
            "https://www.gastronom.ru",
        )
    }

    #[test]
    fn test_heading_segmentation() {
        let context = context(
            r#"<h1>Пирог</h1>
               <h2>Шаг 1</h2>
               <p>Смешать муку</p><p>и сахар</p>
               <figure><img src="/img/1.jpg"></figure>
               <h2>Шаг 2</h2>
               <p>Выпекать 40 минут</p>
               <h2>Комментарии</h2>
               <p>Отличный рецепт</p>"#,
        );
        let draft = HeadingStepsExtractor.extract(&context).unwrap();
        assert_eq!(draft.instructions.len(), 2);
        assert_eq!(draft.instructions[0].text, "Смешать муку и сахар");
        assert_eq!(
            draft.instructions[0].image_url.as_deref(),
            Some("https://www.gastronom.ru/img/1.jpg")
        );
        assert_eq!(draft.instructions[1].step_number, 2);
        assert_eq!(draft.instructions[1].text, "Выпекать 40 минут");
    }

    #[test]
    fn test_heading_without_paragraphs_is_dropped() {
        let context = context("<h2>Шаг 1</h2><h2>Шаг 2</h2><p>Жарить</p>");
        let draft = HeadingStepsExtractor.extract(&context).unwrap();
        assert_eq!(draft.instructions.len(), 1);
        assert_eq!(draft.instructions[0].step_number, 1);
    }

    #[test]
    fn test_no_step_headings() {
        let context = context("<h2>Ингредиенты</h2><p>Мука</p>");
        assert!(HeadingStepsExtractor.extract(&context).is_none());
    }

    #[test]
    fn test_ingredient_lines() {
        let context = context(
            r#"<ul>
                 <li>Мука пшеничная – 200 г</li>
                 <li>Соль - по вкусу</li>
                 <li>Мука пшеничная – 300 г</li>
                 <li>Перемешать всё - аккуратно</li>
               </ul>
               <p>Духовку разогреть до 180 градусов, выпекать до золотистой корочки.</p>"#,
        );
        let draft = TextIngredientsExtractor.extract(&context).unwrap();
        assert_eq!(
            draft.ingredients,
            vec![
                Ingredient::new("Мука пшеничная", "200 г"),
                Ingredient::new("Соль", "по вкусу"),
            ]
        );
    }

    #[test]
    fn test_no_ingredient_lines() {
        let context = context("<p>Просто текст без списка</p>");
        assert!(TextIngredientsExtractor.extract(&context).is_none());
    }
}
