pub mod config;
pub mod document;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod model;
pub mod normalizers;
pub mod pagination;
pub mod sources;

use log::info;

pub use config::LoaderConfig;
pub use error::LoaderError;
pub use fetch::{HtmlFetcher, RequestFetcher};
pub use model::{DetailedRecipe, Ingredient, InstructionStep, NutritionInfo, Recipe, RecipeSummary};
pub use pagination::{fetch_details, LoadState, PageRequest, PaginationController};
pub use sources::{RecipeSource, SourceFactory};

/// Load up to `pages` list pages of a source and return the merged summaries.
///
/// Stops early once a page adds no new recipes.
pub async fn fetch_recipes(
    source_name: &str,
    pages: u32,
    config: &LoaderConfig,
) -> Result<Vec<Recipe>, LoaderError> {
    let fetcher = RequestFetcher::from_config(config)?;
    let mut controller = PaginationController::new(SourceFactory::create(source_name)?);

    for _ in 0..pages.max(1) {
        let added = controller.load_next(&fetcher).await?;
        info!("{}: page {} added {added} recipes", controller.source().name(), controller.page());
        if !controller.has_more() {
            break;
        }
    }

    Ok(controller.recipes().to_vec())
}

/// Fetch and parse one recipe page of a source.
pub async fn fetch_recipe_details(
    source_name: &str,
    url: &str,
    config: &LoaderConfig,
) -> Result<Option<DetailedRecipe>, LoaderError> {
    let source = SourceFactory::create(source_name)?;
    let fetcher = RequestFetcher::from_config(config)?;
    let html = fetcher.fetch(url).await?;
    Ok(source.parse_detailed_recipe(&html, url))
}
