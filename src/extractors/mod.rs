use crate::model::{non_empty, DetailedRecipe, Ingredient, InstructionStep, NutritionInfo, RecipeSummary};
use log::debug;
use scraper::Html;

mod heuristics;
mod json_ld;

pub use heuristics::{HeadingStepsExtractor, TextIngredientsExtractor};
pub use json_ld::JsonLdExtractor;

pub struct ParsingContext {
    pub url: String,
    pub base_url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(html: &str, url: &str, base_url: &str) -> Self {
        Self {
            url: url.to_string(),
            base_url: base_url.to_string(),
            document: Html::parse_document(html),
        }
    }
}

/// Partial recipe produced by one extraction tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub cuisine: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<InstructionStep>,
    pub nutrition: Option<NutritionInfo>,
    pub cooking_time: Option<String>,
    pub servings: Option<String>,
    pub added_date: Option<String>,
}

impl RecipeDraft {
    fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    fn needs_heuristics(&self) -> bool {
        self.ingredients.is_empty() || self.instructions.is_empty()
    }

    fn fill_gaps(&mut self, other: RecipeDraft) {
        if self.ingredients.is_empty() && !other.ingredients.is_empty() {
            self.ingredients = other.ingredients;
        }
        if self.instructions.is_empty() && !other.instructions.is_empty() {
            self.instructions = other.instructions;
        }
    }

    /// Finish the draft into a detailed record. Fails only without a title.
    pub fn into_detailed(self, source: &str, url: &str, id: String) -> Option<DetailedRecipe> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let summary = RecipeSummary {
            title: title.trim().to_string(),
            source: source.to_string(),
            url: url.to_string(),
            image_url: self.image_url,
            description: self.description,
            categories: non_empty(self.categories),
            tags: non_empty(self.tags),
            cooking_time: self.cooking_time,
            servings: self.servings,
            added_date: self.added_date,
        };
        Some(DetailedRecipe {
            summary,
            id,
            ingredients: self.ingredients,
            nutrition: self.nutrition,
            instructions: self.instructions,
            cuisine: self.cuisine,
        })
    }
}

/// One extraction strategy. Returning `None` hands over to the next tier.
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, context: &ParsingContext) -> Option<RecipeDraft>;
}

/// Ordered extraction tiers for a detail page.
///
/// The first tier returning a titled draft wins and later tiers are skipped.
/// Heuristic tiers then only fill an empty ingredient or step list.
#[derive(Default)]
pub struct FallbackChain {
    tiers: Vec<Box<dyn Extractor>>,
    heuristics: Vec<Box<dyn Extractor>>,
}

impl FallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tier(mut self, extractor: impl Extractor + 'static) -> Self {
        self.tiers.push(Box::new(extractor));
        self
    }

    pub fn heuristic(mut self, extractor: impl Extractor + 'static) -> Self {
        self.heuristics.push(Box::new(extractor));
        self
    }

    pub fn run(&self, context: &ParsingContext) -> Option<RecipeDraft> {
        let mut draft = self.tiers.iter().find_map(|tier| {
            let draft = tier.extract(context).filter(RecipeDraft::has_title);
            match &draft {
                Some(_) => debug!("{}: matched {}", tier.name(), context.url),
                None => debug!("{}: no recipe on {}", tier.name(), context.url),
            }
            draft
        })?;

        for heuristic in &self.heuristics {
            if !draft.needs_heuristics() {
                break;
            }
            if let Some(found) = heuristic.extract(context) {
                debug!(
                    "{}: filled {} ingredients, {} steps",
                    heuristic.name(),
                    found.ingredients.len(),
                    found.instructions.len()
                );
                draft.fill_gaps(found);
            }
        }

        Some(draft)
    }
}

/// Number steps contiguously from 1 in the given order, dropping empty texts.
pub fn number_steps(steps: impl IntoIterator<Item = (String, Option<String>)>) -> Vec<InstructionStep> {
    steps
        .into_iter()
        .filter(|(text, _)| !text.trim().is_empty())
        .enumerate()
        .map(|(index, (text, image_url))| InstructionStep {
            step_number: index + 1,
            text: text.trim().to_string(),
            image_url,
        })
        .collect()
}
