use super::BASE_URL;
use crate::document;
use crate::extractors::{number_steps, Extractor, ParsingContext, RecipeDraft};
use crate::model::{Ingredient, InstructionStep};
use crate::normalizers::{normalize_duration, normalize_servings, split_ingredient, MarkupRuns};
use log::debug;
use scraper::{ElementRef, Html};

const UNTITLED: &str = "Без названия";

const TITLE_SELECTORS: [&str; 5] = [
    "h1._title_1e2lm_19",
    "h1.recipe-title",
    "h1",
    ".recipe-title",
    "[data-title]",
];

const DESCRIPTION_SELECTORS: [&str; 4] = [
    "._description_1e2lm_33",
    ".recipe-description",
    ".description",
    "[data-description]",
];

const IMAGE_SELECTORS: [&str; 3] = ["._image_1e2lm_9 img", ".recipe-image img", ".main-image img"];

const INGREDIENT_SELECTORS: [&str; 4] = [
    "._step_1e2lm_19 div",
    "._ingredient_1e2lm_1",
    ".recipe-ingredient",
    ".ingredient-item",
];

const STEP_SELECTORS: [&str; 4] = [".recipe-step", ".cooking-step", ".instruction-step", "[data-step]"];

const TIME_SELECTORS: [&str; 4] = ["._time_1e2lm_39", ".cooking-time", ".recipe-time", "[data-time]"];

const SERVING_SELECTORS: [&str; 4] = [
    "._portions_1e2lm_44",
    ".servings",
    ".recipe-yield",
    "[data-servings]",
];

// Image-less step blocks with these words or this many characters are the
// recipe introduction, not a step.
const DESCRIPTION_MARKERS: [&str; 2] = ["осенью", "зимой"];
const DESCRIPTION_BLOCK_CHARS: usize = 200;

/// Reads gastronom.ru recipe pages rendered from editor.js content blocks.
///
/// Never gives up on the title: a page without one is kept as "Без названия".
pub struct GastronomHtmlExtractor;

impl Extractor for GastronomHtmlExtractor {
    fn name(&self) -> &'static str {
        "GastronomHtmlExtractor"
    }

    fn extract(&self, context: &ParsingContext) -> Option<RecipeDraft> {
        let doc = &context.document;
        let title = document::first_text_of(doc, &TITLE_SELECTORS).unwrap_or_else(|| {
            debug!("GastronomHtmlExtractor: No title on {}", context.url);
            UNTITLED.to_string()
        });

        let ingredients = parse_ingredients(doc);
        let instructions = parse_instructions(doc);
        debug!(
            "GastronomHtmlExtractor: {} ingredients, {} steps",
            ingredients.len(),
            instructions.len()
        );

        Some(RecipeDraft {
            title: Some(title),
            description: document::first_text_of(doc, &DESCRIPTION_SELECTORS),
            image_url: main_image(doc),
            ingredients,
            instructions,
            cooking_time: document::first_text_of(doc, &TIME_SELECTORS)
                .map(|time| normalize_duration(&time))
                .filter(|time| !time.is_empty()),
            servings: document::first_text_of(doc, &SERVING_SELECTORS)
                .and_then(|servings| normalize_servings(&servings)),
            ..Default::default()
        })
    }
}

fn main_image(doc: &Html) -> Option<String> {
    IMAGE_SELECTORS
        .iter()
        .find_map(|css| document::first_match(doc, css).and_then(|img| document::attr(img, "src")))
        .map(|src| document::absolute_url(&src, BASE_URL))
        .or_else(|| document::meta_content(doc, "meta[property='og:image']"))
}

fn parse_ingredients(doc: &Html) -> Vec<Ingredient> {
    let marked: Vec<Ingredient> = document::select(doc, "div[itemprop=recipeIngredient]")
        .into_iter()
        .filter_map(marked_ingredient)
        .collect();
    if !marked.is_empty() {
        return marked;
    }

    for css in INGREDIENT_SELECTORS {
        let ingredients: Vec<Ingredient> = document::texts(doc, css)
            .into_iter()
            .map(|text| {
                let (name, amount) = split_ingredient(&text, None);
                Ingredient::new(name, amount)
            })
            .collect();
        if !ingredients.is_empty() {
            return ingredients;
        }
    }
    Vec::new()
}

/// Plain text is the name, the bolded run is the quantity.
fn marked_ingredient(element: ElementRef) -> Option<Ingredient> {
    let full_text = document::text(element);
    if full_text.is_empty() {
        return None;
    }
    let plain = document::own_text(element);
    let emphasized = document::select_in(element, "span._bold_1e2lm_28, .bold, b, strong")
        .into_iter()
        .map(document::text)
        .collect::<Vec<_>>()
        .join(" ");

    let (name, amount) = split_ingredient(
        &full_text,
        Some(MarkupRuns {
            plain: &plain,
            emphasized: &emphasized,
        }),
    );
    Some(Ingredient::new(name, amount))
}

fn parse_instructions(doc: &Html) -> Vec<InstructionStep> {
    let steps = number_steps(
        document::select(doc, "div._editorjsContent_s0mz7_2")
            .into_iter()
            .filter_map(editor_block_step),
    );
    if !steps.is_empty() {
        return steps;
    }

    for css in STEP_SELECTORS {
        let steps = number_steps(document::texts(doc, css).into_iter().map(|text| (text, None)));
        if !steps.is_empty() {
            return steps;
        }
    }
    Vec::new()
}

fn editor_block_step(block: ElementRef) -> Option<(String, Option<String>)> {
    let header = document::first_in(block, "h2")
        .map(document::text)
        .unwrap_or_default();
    let text = document::select_in(block, "p")
        .into_iter()
        .map(document::text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let image = document::first_in(block, "figure img")
        .and_then(|img| document::attr(img, "src"))
        .map(|src| document::absolute_url(&src, BASE_URL));

    if text.is_empty() || (image.is_none() && is_description_block(&text)) {
        debug!("GastronomHtmlExtractor: Skipping non-step block");
        return None;
    }

    let text = if !header.is_empty() && header.to_lowercase().contains("шаг") {
        text.replace(&header, "").trim().to_string()
    } else {
        text
    };
    Some((text, image))
}

fn is_description_block(text: &str) -> bool {
    let lower = text.to_lowercase();
    DESCRIPTION_MARKERS.iter().any(|marker| lower.contains(marker))
        || text.chars().count() > DESCRIPTION_BLOCK_CHARS
}
