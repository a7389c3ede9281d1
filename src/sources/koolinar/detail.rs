use super::BASE_URL;
use crate::document;
use crate::extractors::{number_steps, Extractor, ParsingContext, RecipeDraft};
use crate::model::{Ingredient, InstructionStep};
use crate::normalizers::{normalize_duration, normalize_servings, split_ingredient, truncate_at_comma};
use log::debug;
use scraper::{ElementRef, Html};

const MIN_SENTENCE_CHARS: usize = 6;

/// Reads koolinar.ru recipe pages: `h1.fn`, ingredient micro-data, the
/// `recipe-meta` list and `itemprop` meta tags.
pub struct KoolinarMicrodataExtractor;

impl Extractor for KoolinarMicrodataExtractor {
    fn name(&self) -> &'static str {
        "KoolinarMicrodataExtractor"
    }

    fn extract(&self, context: &ParsingContext) -> Option<RecipeDraft> {
        let doc = &context.document;
        let title = document::first_text(doc, "h1.fn")
            .or_else(|| document::meta_content(doc, "meta[itemprop=name]"))?;

        let meta = RecipeMeta::parse(doc);
        let mut categories = meta.categories;
        categories.extend(document::meta_content(doc, "meta[itemprop=recipeCategory]"));

        let ingredients = parse_ingredients(doc);
        let instructions = parse_instructions(doc);
        debug!(
            "KoolinarMicrodataExtractor: {} ingredients, {} steps",
            ingredients.len(),
            instructions.len()
        );

        Some(RecipeDraft {
            title: Some(title),
            description: parse_description(doc),
            image_url: document::meta_content(doc, "meta[itemprop=image]")
                .or_else(|| {
                    document::first_match(doc, "img.photo.result-photo")
                        .and_then(|img| document::attr(img, "src"))
                })
                .map(|src| document::absolute_url(&src, BASE_URL)),
            categories,
            tags: Vec::new(),
            cuisine: meta
                .cuisine
                .or_else(|| document::meta_content(doc, "meta[itemprop=recipeCuisine]")),
            ingredients,
            instructions,
            nutrition: None,
            cooking_time: meta
                .cooking_time
                .or_else(|| document::meta_content(doc, "meta[itemprop=totalTime]"))
                .map(|time| normalize_duration(&time))
                .filter(|time| !time.is_empty()),
            servings: meta
                .servings
                .or_else(|| document::meta_content(doc, "meta[itemprop=recipeYield]"))
                .and_then(|servings| normalize_servings(&servings)),
            added_date: meta
                .created
                .or_else(|| document::meta_content(doc, "meta[itemprop=dateCreated]"))
                .and_then(|date| truncate_at_comma(&date)),
        })
    }
}

/// Labelled rows of the `div.recipe-meta` list.
#[derive(Debug, Default)]
struct RecipeMeta {
    cooking_time: Option<String>,
    servings: Option<String>,
    cuisine: Option<String>,
    categories: Vec<String>,
    created: Option<String>,
}

impl RecipeMeta {
    fn parse(doc: &Html) -> Self {
        let mut meta = RecipeMeta::default();
        let mut catalogs_seen = false;

        for item in document::select(doc, "div.recipe-meta ul li") {
            let text = document::text(item);
            if let Some(value) = labelled(&text, "Время приготовления:") {
                meta.cooking_time = Some(value);
            } else if let Some(value) = labelled(&text, "Порций в рецепте:") {
                meta.servings = Some(value);
            } else if text.contains("Кухня:") {
                meta.cuisine = first_link_text(item).or(meta.cuisine);
            } else if text.contains("Каталоги:") && !catalogs_seen {
                catalogs_seen = true;
                meta.categories = document::select_in(item, "a")
                    .into_iter()
                    .map(document::text)
                    .filter(|t| !t.is_empty())
                    .collect();
            } else if let Some(value) = labelled(&text, "Создан:") {
                meta.created = Some(value);
            }
        }
        meta
    }
}

fn labelled(text: &str, label: &str) -> Option<String> {
    if !text.contains(label) {
        return None;
    }
    let value = text.replace(label, "").trim().to_string();
    (!value.is_empty()).then_some(value)
}

fn first_link_text(item: ElementRef) -> Option<String> {
    document::first_in(item, "a")
        .map(document::text)
        .filter(|t| !t.is_empty())
}

/// The meta description reads "<title> – <description>".
fn parse_description(doc: &Html) -> Option<String> {
    let content = document::meta_content(doc, "meta[name=Description]")?;
    let description = match content.split(" – ").nth(1) {
        Some(part) => part.trim().to_string(),
        None => content,
    };
    (!description.is_empty()).then_some(description)
}

fn parse_ingredients(doc: &Html) -> Vec<Ingredient> {
    document::select(doc, "li.ingredient[itemprop=recipeIngredient]")
        .into_iter()
        .map(document::text)
        .filter(|text| !text.is_empty())
        .map(|text| {
            let (name, amount) = split_ingredient(&text, None);
            Ingredient::new(name, amount)
        })
        .collect()
}

fn parse_instructions(doc: &Html) -> Vec<InstructionStep> {
    let steps = number_steps(
        document::texts(doc, "p.instruction")
            .into_iter()
            .map(|text| (text, None)),
    );
    if !steps.is_empty() {
        return steps;
    }

    let Some(content) = document::meta_content(doc, "meta[itemprop=recipeInstructions]") else {
        return Vec::new();
    };
    number_steps(
        content
            .split(". ")
            .map(str::trim)
            .filter(|sentence| sentence.chars().count() >= MIN_SENTENCE_CHARS)
            .map(|sentence| (sentence.to_string(), None)),
    )
}
