use super::BASE_URL;
use crate::document;
use crate::extractors::{number_steps, Extractor, ParsingContext, RecipeDraft};
use crate::model::{Ingredient, InstructionStep, NutritionInfo};
use crate::normalizers::{
    find_cooking_time_in_text, find_date_in_text, find_servings_in_text, normalize_duration,
    normalize_relative_date, normalize_servings, split_ingredient, MarkupRuns,
};
use log::debug;
use scraper::{ElementRef, Html};

const STEP_SELECTORS: [&str; 4] = [
    "li.cooking-bl",
    "li[itemprop=recipeInstructions]",
    ".cooking-steps li",
    ".recipe-steps li",
];

const TIME_SELECTORS: [&str; 4] = [
    "time[itemprop=totalTime]",
    "[itemprop=totalTime]",
    ".cooking-time",
    ".recipe-time",
];

const SERVING_SELECTORS: [&str; 4] = [
    "span[itemprop=recipeYield]",
    "[itemprop=recipeYield]",
    ".servings",
    ".recipe-yield",
];

const DATE_SELECTORS: [&str; 6] = [
    ".article-footer .i-time",
    ".recipe-date",
    ".date-added",
    "[itemprop=datePublished]",
    "time[datetime]",
    ".i-time",
];

/// Reads the schema.org micro-data povarenok.ru renders on recipe pages.
pub struct PovarenokMicrodataExtractor;

impl Extractor for PovarenokMicrodataExtractor {
    fn name(&self) -> &'static str {
        "PovarenokMicrodataExtractor"
    }

    fn extract(&self, context: &ParsingContext) -> Option<RecipeDraft> {
        let doc = &context.document;
        let title = document::first_text(doc, "h1[itemprop=name]")?;
        let page_text = document::document_text(doc);

        let ingredients = parse_ingredients(doc);
        let instructions = parse_instructions(doc);
        debug!(
            "PovarenokMicrodataExtractor: {} ingredients, {} steps",
            ingredients.len(),
            instructions.len()
        );

        Some(RecipeDraft {
            title: Some(title),
            description: Some(document::select_text(
                doc,
                "div.article-text[itemprop=description] p",
            ))
            .filter(|d| !d.is_empty()),
            image_url: document::first_match(doc, "img[itemprop=image]")
                .and_then(|img| document::attr(img, "src"))
                .map(|src| document::absolute_url(&src, BASE_URL)),
            categories: document::texts(doc, "span[itemprop=recipeCategory] a"),
            tags: document::texts(doc, "div.article-tags a"),
            cuisine: document::first_text(doc, "span[itemprop=recipeCuisine] a"),
            ingredients,
            instructions,
            nutrition: parse_nutrition(doc),
            cooking_time: cooking_time(doc)
                .or_else(|| find_cooking_time_in_text(&page_text)),
            servings: document::first_text_of(doc, &SERVING_SELECTORS)
                .and_then(|s| normalize_servings(&s))
                .or_else(|| find_servings_in_text(&page_text)),
            added_date: document::first_text_of(doc, &DATE_SELECTORS)
                .and_then(|d| normalize_relative_date(&d))
                .or_else(|| find_date_in_text(&page_text)),
        })
    }
}

fn parse_ingredients(doc: &Html) -> Vec<Ingredient> {
    document::select(doc, "li[itemprop=recipeIngredient]")
        .into_iter()
        .filter_map(parse_ingredient)
        .collect()
}

fn parse_ingredient(element: ElementRef) -> Option<Ingredient> {
    let name = document::select_in(element, "a span")
        .into_iter()
        .map(document::text)
        .collect::<Vec<_>>()
        .join(" ");
    if name.trim().is_empty() {
        return None;
    }

    // The last span is the quantity unless it is the name span itself.
    let amount = document::select_in(element, "span")
        .last()
        .map(|span| document::text(*span))
        .filter(|amount| *amount != name)
        .unwrap_or_default();

    let (name, amount) = split_ingredient(
        &document::text(element),
        Some(MarkupRuns {
            plain: &name,
            emphasized: &amount,
        }),
    );

    Some(Ingredient {
        name,
        amount,
        url: document::first_in(element, "a")
            .and_then(|a| document::attr(a, "href"))
            .map(|href| document::absolute_url(&href, BASE_URL)),
    })
}

fn parse_instructions(doc: &Html) -> Vec<InstructionStep> {
    for css in STEP_SELECTORS {
        let steps = number_steps(document::select(doc, css).into_iter().map(|element| {
            let text = document::select_in(element, "div p, .step-text, .instruction-text")
                .into_iter()
                .map(document::text)
                .collect::<Vec<_>>()
                .join(" ");
            let image = document::first_in(element, "img")
                .and_then(|img| document::attr(img, "src"))
                .map(|src| document::absolute_url(&src, BASE_URL));
            (text, image)
        }));
        if !steps.is_empty() {
            return steps;
        }
    }
    Vec::new()
}

fn cooking_time(doc: &Html) -> Option<String> {
    TIME_SELECTORS.iter().find_map(|css| {
        let element = document::first_match(doc, css)?;
        let text = document::text(element);
        let raw = if text.is_empty() {
            document::attr(element, "datetime").or_else(|| document::attr(element, "content"))?
        } else {
            text
        };
        Some(normalize_duration(&raw)).filter(|t| !t.is_empty())
    })
}

fn parse_nutrition(doc: &Html) -> Option<NutritionInfo> {
    let container = document::first_match(doc, "div[itemprop=nutrition]")?;
    let value = |prop: &str| {
        document::first_in(container, &format!("strong[itemprop={prop}]"))
            .map(document::text)
            .unwrap_or_default()
    };

    let mut per_100g = document::select_in(container, "tr td strong")
        .into_iter()
        .map(document::text)
        .filter(|t| !t.is_empty());

    Some(NutritionInfo {
        calories: value("calories"),
        protein: value("proteinContent"),
        fat: value("fatContent"),
        carbohydrates: value("carbohydrateContent"),
        calories_per_100g: per_100g.next().unwrap_or_default(),
        protein_per_100g: per_100g.next().unwrap_or_default(),
        fat_per_100g: per_100g.next().unwrap_or_default(),
        carbohydrates_per_100g: per_100g.next().unwrap_or_default(),
    })
}
