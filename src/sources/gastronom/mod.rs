use super::{recipe_id, RecipeSource};
use crate::extractors::{
    FallbackChain, HeadingStepsExtractor, JsonLdExtractor, ParsingContext, TextIngredientsExtractor,
};
use crate::model::{DetailedRecipe, RecipeSummary};
use regex::Regex;
use std::sync::LazyLock;

mod detail;
mod list;

use detail::GastronomHtmlExtractor;

pub(crate) const NAME: &str = "Gastronom.ru";
pub(crate) const BASE_URL: &str = "https://www.gastronom.ru";

static RECIPE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/recipe/(\d+)").expect("invalid regex: gastronom id"));

/// gastronom.ru: a client-rendered site whose search page ships its results
/// as a JSON island.
pub struct GastronomSource;

impl RecipeSource for GastronomSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn base_url(&self) -> &'static str {
        BASE_URL
    }

    fn build_list_url(&self, page: u32) -> String {
        if page <= 1 {
            format!("{BASE_URL}/search?pagetype=recipepage")
        } else {
            format!("{BASE_URL}/search?pagetype=recipepage&page={page}")
        }
    }

    fn parse_recipes(&self, html: &str) -> Vec<RecipeSummary> {
        list::parse_recipes(html)
    }

    fn parse_detailed_recipe(&self, html: &str, url: &str) -> Option<DetailedRecipe> {
        let context = ParsingContext::new(html, url, BASE_URL);
        let draft = FallbackChain::new()
            .tier(JsonLdExtractor)
            .tier(GastronomHtmlExtractor)
            .heuristic(HeadingStepsExtractor)
            .heuristic(TextIngredientsExtractor)
            .run(&context)?;
        draft.into_detailed(NAME, url, recipe_id(url, &RECIPE_ID))
    }
}
