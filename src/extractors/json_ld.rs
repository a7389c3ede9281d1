use super::{number_steps, Extractor, ParsingContext, RecipeDraft};
use crate::document;
use crate::model::Ingredient;
use crate::normalizers::{format_iso_date, normalize_duration, normalize_servings, split_ingredient};
use html_escape::decode_html_entities;
use log::debug;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

/// Structured-data tier: reads the first schema.org `Recipe` object from the
/// page's `application/ld+json` blocks.
pub struct JsonLdExtractor;

impl JsonLdExtractor {
    fn convert_to_draft(&self, recipe: JsonLdRecipe, base_url: &str) -> RecipeDraft {
        let image_url = recipe
            .image
            .and_then(|image| image.first_url())
            .map(|url| document::absolute_url(&url, base_url));

        let ingredients = match recipe.recipe_ingredient {
            Some(RecipeIngredients::Strings(items)) => items
                .iter()
                .map(|item| clean_text(item))
                .filter(|item| !item.is_empty())
                .map(|item| {
                    let (name, amount) = split_ingredient(&item, None);
                    Ingredient::new(name, amount)
                })
                .collect(),
            Some(RecipeIngredients::Objects(items)) => items
                .into_iter()
                .filter(|item| !item.name.trim().is_empty())
                .map(|item| {
                    Ingredient::new(
                        clean_text(&item.name),
                        item.amount.as_deref().map(clean_text).unwrap_or_default(),
                    )
                })
                .collect(),
            None => Vec::new(),
        };

        let instructions = number_steps(
            recipe
                .recipe_instructions
                .map(|instructions| instructions.into_steps(base_url))
                .unwrap_or_default(),
        );

        let cooking_time = recipe
            .cook_time
            .or(recipe.total_time)
            .filter(|time| !time.trim().is_empty())
            .map(|time| normalize_duration(&time));

        let servings = recipe.recipe_yield.and_then(|value| match value {
            RecipeYield::String(s) => normalize_servings(&s),
            RecipeYield::Number(n) => Some(format!("{n} порц")),
            RecipeYield::Array(values) => values
                .iter()
                .find(|s| s.contains(char::is_alphabetic))
                .or_else(|| values.first())
                .and_then(|s| normalize_servings(s)),
            RecipeYield::Unknown(value) => {
                debug!("JsonLdExtractor: unsupported recipeYield shape: {value}");
                None
            }
        });

        RecipeDraft {
            title: Some(clean_text(&recipe.name)).filter(|t| !t.is_empty()),
            description: recipe
                .description
                .map(|d| match d {
                    DescriptionType::String(s) => clean_text(&s),
                    DescriptionType::Object(o) => clean_text(&o.text),
                })
                .filter(|d| !d.is_empty()),
            image_url,
            categories: recipe.recipe_category.map(StringOrList::into_list).unwrap_or_default(),
            tags: recipe.keywords.map(StringOrList::into_list).unwrap_or_default(),
            cuisine: recipe
                .recipe_cuisine
                .map(|c| c.into_list().join(", "))
                .filter(|c| !c.is_empty()),
            ingredients,
            instructions,
            nutrition: None,
            cooking_time,
            servings,
            added_date: recipe.date_published.as_deref().and_then(format_iso_date),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    name: String,
    description: Option<DescriptionType>,
    image: Option<ImageType>,
    #[serde(rename = "recipeIngredient")]
    recipe_ingredient: Option<RecipeIngredients>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<RecipeInstructions>,
    #[serde(rename = "recipeYield")]
    recipe_yield: Option<RecipeYield>,
    #[serde(rename = "cookTime")]
    cook_time: Option<String>,
    #[serde(rename = "totalTime")]
    total_time: Option<String>,
    #[serde(rename = "recipeCategory")]
    recipe_category: Option<StringOrList>,
    #[serde(rename = "recipeCuisine")]
    recipe_cuisine: Option<StringOrList>,
    keywords: Option<StringOrList>,
    #[serde(rename = "datePublished")]
    date_published: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: String,
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionType {
    String(String),
    Object(TextObject),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    None,
    String(String),
    Object(ImageObject),
    MultipleStrings(Vec<String>),
    MultipleObjects(Vec<ImageObject>),
    Unknown(Value),
}

impl ImageType {
    fn first_url(self) -> Option<String> {
        let url = match self {
            ImageType::String(s) => Some(s),
            ImageType::Object(o) => Some(o.url),
            ImageType::MultipleStrings(v) => v.into_iter().next(),
            ImageType::MultipleObjects(v) => v.into_iter().next().map(|o| o.url),
            ImageType::None => None,
            ImageType::Unknown(value) => {
                debug!("JsonLdExtractor: unsupported image shape: {value}");
                None
            }
        }?;
        let url = decode_html_entities(url.trim()).into_owned();
        (!url.is_empty()).then_some(url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    Strings(Vec<String>),
    Objects(Vec<IngredientObject>),
}

#[derive(Debug, Deserialize)]
struct IngredientObject {
    name: String,
    amount: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    String(String),
    Multiple(Vec<String>),
    HowTo(Vec<HowTo>),
    NestedSections(Vec<Vec<HowTo>>),
    Unknown(Value),
}

impl RecipeInstructions {
    fn into_steps(self, base_url: &str) -> Vec<(String, Option<String>)> {
        match self {
            RecipeInstructions::String(text) => clean_text_lines(&text)
                .into_iter()
                .map(|line| (line, None))
                .collect(),
            RecipeInstructions::Multiple(texts) => {
                texts.iter().map(|t| (clean_text(t), None)).collect()
            }
            RecipeInstructions::HowTo(items) => items
                .into_iter()
                .flat_map(|item| item.into_steps(base_url))
                .collect(),
            RecipeInstructions::NestedSections(sections) => sections
                .into_iter()
                .flatten()
                .flat_map(|item| item.into_steps(base_url))
                .collect(),
            RecipeInstructions::Unknown(value) => {
                debug!("JsonLdExtractor: unsupported recipeInstructions shape: {value}");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "@type")]
enum HowTo {
    HowToStep(HowToStep),
    HowToSection(HowToSection),
}

impl HowTo {
    fn into_steps(self, base_url: &str) -> Vec<(String, Option<String>)> {
        match self {
            HowTo::HowToStep(step) => step.into_step(base_url).into_iter().collect(),
            HowTo::HowToSection(section) => section
                .item_list_element
                .into_iter()
                .filter_map(|step| step.into_step(base_url))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HowToStep {
    text: Option<String>,
    name: Option<String>,
    image: Option<ImageType>,
}

impl HowToStep {
    fn into_step(self, base_url: &str) -> Option<(String, Option<String>)> {
        // Prefer text over name
        let text = self.text.or(self.name)?;
        let image = self
            .image
            .and_then(ImageType::first_url)
            .map(|url| document::absolute_url(&url, base_url));
        Some((clean_text(&text), image))
    }
}

#[derive(Debug, Deserialize)]
struct HowToSection {
    #[serde(rename = "itemListElement")]
    item_list_element: Vec<HowToStep>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeYield {
    String(String),
    Number(i64),
    Array(Vec<String>),
    Unknown(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrList {
    String(String),
    Multiple(Vec<String>),
}

impl StringOrList {
    fn into_list(self) -> Vec<String> {
        let items = match self {
            StringOrList::String(s) => s.split(',').map(clean_text).collect::<Vec<_>>(),
            StringOrList::Multiple(v) => v.iter().map(|s| clean_text(s)).collect(),
        };
        items.into_iter().filter(|s| !s.is_empty()).collect()
    }
}

/// Decode entities (some sites double-encode) and strip embedded markup.
fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(&decode_html_entities(text)).into_owned();
    if decoded.contains('<') {
        let fragment = Html::parse_fragment(&decoded);
        document::collapse_whitespace(&fragment.root_element().text().collect::<Vec<_>>().join(" "))
    } else {
        document::collapse_whitespace(&decoded)
    }
}

fn clean_text_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(clean_text)
        .filter(|line| !line.is_empty())
        .collect()
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

/// Locate the recipe object in a parsed JSON-LD block: the root, an element
/// of a root array, or an element of `@graph`.
fn find_recipe(json_ld: &Value) -> Option<&Value> {
    if let Some(items) = json_ld.as_array() {
        return items.iter().find(|item| {
            let has_instructions = item.get("recipeInstructions").is_some();
            is_recipe_type(item) || has_instructions
        });
    }
    if is_recipe_type(json_ld) {
        return Some(json_ld);
    }
    json_ld
        .get("@graph")
        .and_then(Value::as_array)
        .and_then(|items| items.iter().find(|item| is_recipe_type(item)))
}

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "JsonLdExtractor"
    }

    fn extract(&self, context: &ParsingContext) -> Option<RecipeDraft> {
        let scripts = document::select(&context.document, "script[type='application/ld+json']");
        debug!("JsonLdExtractor: Found {} JSON-LD script tags", scripts.len());

        for (index, script) in scripts.iter().enumerate() {
            let raw_json = script.inner_html();
            let json_ld = match serde_json::from_str::<Value>(raw_json.trim()) {
                Ok(value) => value,
                Err(_) => match serde_json::from_str::<Value>(&sanitize_json(&raw_json)) {
                    Ok(value) => value,
                    Err(e) => {
                        debug!("JsonLdExtractor: Failed to parse JSON-LD {index}: {e}");
                        continue;
                    }
                },
            };

            let Some(recipe) = find_recipe(&json_ld) else {
                debug!("JsonLdExtractor: No recipe found in JSON-LD {index}");
                continue;
            };

            match serde_json::from_value::<JsonLdRecipe>(recipe.clone()) {
                Ok(recipe) => return Some(self.convert_to_draft(recipe, &context.base_url)),
                Err(e) => debug!("JsonLdExtractor: Failed to convert JSON-LD {index}: {e}"),
            }
        }

        None
    }
}

/// Repair common JSON-LD breakage: missing commas between members and
/// trailing or doubled commas.
fn sanitize_json(json_str: &str) -> String {
    let mut minified = String::with_capacity(json_str.len());
    let mut in_string = false;
    let mut prev_char = None;
    let mut depth = 0i32;
    let chars: Vec<char> = json_str.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '"' if prev_char != Some('\\') => {
                in_string = !in_string;
                if !in_string {
                    let next_char = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                    if matches!(next_char, Some('"' | '[' | '{')) {
                        minified.push('"');
                        minified.push(',');
                        prev_char = Some(',');
                        continue;
                    }
                }
                minified.push(c);
            }
            '[' | '{' if !in_string => {
                depth += 1;
                minified.push(c);
            }
            ']' | '}' if !in_string => {
                depth -= 1;
                minified.push(c);
                let next_char = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if depth > 0 && matches!(next_char, Some('"' | '{' | '[')) {
                    minified.push(',');
                    prev_char = Some(',');
                    continue;
                }
            }
            ',' if !in_string => {
                if prev_char != Some(',') {
                    minified.push(c);
                }
            }
            _ => {
                if in_string || !c.is_whitespace() {
                    minified.push(c);
                }
            }
        }
        prev_char = Some(c);
    }

    minified.replace(",]", "]").replace(",}", "}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_for(json_ld: &str) -> ParsingContext {
        let html = format!(
            r#"<!DOCTYPE html>
            <html>
            <head>
                <script type="application/ld+json">
                    {json_ld}
                </script>
            </head>
            <body></body>
            </html>"#
        );
        ParsingContext::new(&html, "https://www.povarenok.ru/recipes/show/7/", "https://www.povarenok.ru")
    }

    #[test]
    fn test_no_json_ld() {
        let context = ParsingContext::new("<html><body>Test</body></html>", "https://x.ru", "https://x.ru");
        assert!(JsonLdExtractor.extract(&context).is_none());
    }

    #[test]
    fn test_basic_recipe() {
        let context = context_for(
            r#"{
                "@context": "https://schema.org/",
                "@type": "Recipe",
                "name": "Плов",
                "description": "Узбекский плов",
                "image": "/upload/plov.jpg",
                "recipeIngredient": ["300 г рис", "500 г мясо", "Морковь - 2 шт"],
                "recipeInstructions": [
                    {"@type": "HowToStep", "text": "Обжарить мясо", "image": "https://img.ru/1.jpg"},
                    {"@type": "HowToStep", "text": "Добавить рис"}
                ],
                "cookTime": "PT1H30M",
                "recipeYield": "6 порций",
                "recipeCategory": ["Вторые блюда"],
                "recipeCuisine": "Узбекская",
                "keywords": "плов, рис",
                "datePublished": "2024-03-05T10:15:00+03:00"
            }"#,
        );

        let draft = JsonLdExtractor.extract(&context).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Плов"));
        assert_eq!(draft.description.as_deref(), Some("Узбекский плов"));
        assert_eq!(
            draft.image_url.as_deref(),
            Some("https://www.povarenok.ru/upload/plov.jpg")
        );
        assert_eq!(draft.ingredients.len(), 3);
        assert_eq!(draft.ingredients[0], Ingredient::new("рис", "300 г"));
        assert_eq!(draft.ingredients[2], Ingredient::new("Морковь", "2 шт"));
        assert_eq!(draft.instructions.len(), 2);
        assert_eq!(draft.instructions[0].image_url.as_deref(), Some("https://img.ru/1.jpg"));
        assert_eq!(draft.instructions[1].step_number, 2);
        assert_eq!(draft.cooking_time.as_deref(), Some("1 ч 30 мин"));
        assert_eq!(draft.servings.as_deref(), Some("6 порц"));
        assert_eq!(draft.categories, vec!["Вторые блюда"]);
        assert_eq!(draft.cuisine.as_deref(), Some("Узбекская"));
        assert_eq!(draft.tags, vec!["плов", "рис"]);
        assert_eq!(draft.added_date.as_deref(), Some("05.03.2024"));
    }

    #[test]
    fn test_recipe_in_graph_and_total_time() {
        let context = context_for(
            r#"{
                "@context": "https://schema.org",
                "@graph": [
                    {"@type": "WebSite", "name": "Сайт"},
                    {"@type": ["Recipe"], "name": "Борщ", "totalTime": "PT2H",
                     "recipeInstructions": "Сварить бульон.\nДобавить овощи."}
                ]
            }"#,
        );
        let draft = JsonLdExtractor.extract(&context).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Борщ"));
        assert_eq!(draft.cooking_time.as_deref(), Some("2 ч"));
        assert_eq!(draft.instructions.len(), 2);
        assert_eq!(draft.instructions[1].text, "Добавить овощи.");
    }

    #[test]
    fn test_non_recipe_block_is_skipped() {
        let context = context_for(r#"{"@type": "Organization", "name": "Поваренок"}"#);
        assert!(JsonLdExtractor.extract(&context).is_none());
    }

    #[test]
    fn test_unsupported_shapes_are_skipped() {
        let context = context_for(
            r#"{"@type": "Recipe", "name": "Жаркое",
                "image": 42,
                "recipeYield": {"value": 4},
                "recipeIngredient": ["Свинина 500 г", "Картофель 1 кг"]}"#,
        );
        let draft = JsonLdExtractor.extract(&context).unwrap();
        assert_eq!(draft.image_url, None);
        assert_eq!(draft.servings, None);
        assert_eq!(
            draft.ingredients,
            vec![
                Ingredient::new("Свинина", "500 г"),
                Ingredient::new("Картофель", "1 кг"),
            ]
        );
    }

    #[test]
    fn test_html_in_strings_is_stripped() {
        let context = context_for(
            r#"{"@type": "Recipe", "name": "Салат &amp;quot;Оливье&amp;quot;",
                "recipeIngredient": ["<b>Картофель</b> – 3 шт"],
                "recipeYield": 4}"#,
        );
        let draft = JsonLdExtractor.extract(&context).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Салат \"Оливье\""));
        assert_eq!(draft.ingredients[0], Ingredient::new("Картофель", "3 шт"));
        assert_eq!(draft.servings.as_deref(), Some("4 порц"));
    }

    #[test]
    fn test_sanitize_missing_commas() {
        let broken = r#"{"@type": "Recipe" "name": "Каша",}"#;
        let value: Value = serde_json::from_str(&sanitize_json(broken)).unwrap();
        assert_eq!(value["name"], "Каша");
    }
}
