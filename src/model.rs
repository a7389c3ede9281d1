use serde::Serialize;

/// Recipe fields that every list page can provide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecipeSummary {
    pub title: String,
    pub source: String,
    pub url: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub cooking_time: Option<String>,
    pub servings: Option<String>,
    pub added_date: Option<String>,
}

/// A recipe enriched from its own page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedRecipe {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub id: String,
    pub ingredients: Vec<Ingredient>,
    pub nutrition: Option<NutritionInfo>,
    pub instructions: Vec<InstructionStep>,
    pub cuisine: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub name: String,
    /// Empty when no amount could be separated from the name.
    pub amount: String,
    pub url: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            url: None,
        }
    }
}

/// One numbered cooking step. Numbers start at 1 and follow extraction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionStep {
    pub step_number: usize,
    pub text: String,
    pub image_url: Option<String>,
}

/// Unavailable values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NutritionInfo {
    pub calories: String,
    pub protein: String,
    pub fat: String,
    pub carbohydrates: String,
    pub calories_per_100g: String,
    pub protein_per_100g: String,
    pub fat_per_100g: String,
    pub carbohydrates_per_100g: String,
}

/// `None` for an empty list, so absent and empty serialize alike.
pub fn non_empty(list: Vec<String>) -> Option<Vec<String>> {
    (!list.is_empty()).then_some(list)
}

/// The canonical entity handed to consumers.
///
/// A `Summary` is produced by list parsing and is replaced wholesale by a
/// `Detailed` record once the recipe page has been parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recipe {
    Summary(RecipeSummary),
    Detailed(DetailedRecipe),
}

impl Recipe {
    pub fn summary(&self) -> &RecipeSummary {
        match self {
            Recipe::Summary(summary) => summary,
            Recipe::Detailed(detailed) => &detailed.summary,
        }
    }

    pub fn title(&self) -> &str {
        &self.summary().title
    }

    pub fn url(&self) -> &str {
        &self.summary().url
    }

    pub fn is_detailed(&self) -> bool {
        matches!(self, Recipe::Detailed(_))
    }

    pub fn as_detailed(&self) -> Option<&DetailedRecipe> {
        match self {
            Recipe::Detailed(detailed) => Some(detailed),
            Recipe::Summary(_) => None,
        }
    }
}

impl From<RecipeSummary> for Recipe {
    fn from(summary: RecipeSummary) -> Self {
        Recipe::Summary(summary)
    }
}

impl From<DetailedRecipe> for Recipe {
    fn from(detailed: DetailedRecipe) -> Self {
        Recipe::Detailed(detailed)
    }
}
