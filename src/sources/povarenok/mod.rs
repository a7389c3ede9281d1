use super::{recipe_id, RecipeSource};
use crate::extractors::{FallbackChain, HeadingStepsExtractor, JsonLdExtractor, ParsingContext};
use crate::model::{DetailedRecipe, RecipeSummary};
use regex::Regex;
use std::sync::LazyLock;

mod detail;
mod list;

use detail::PovarenokMicrodataExtractor;

pub(crate) const NAME: &str = "Povarenok.ru";
pub(crate) const BASE_URL: &str = "https://www.povarenok.ru";

static RECIPE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/recipes/show/(\d+)/").expect("invalid regex: povarenok id"));

/// povarenok.ru: server-rendered list pages and schema.org micro-data on
/// recipe pages.
pub struct PovarenokSource;

impl RecipeSource for PovarenokSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn base_url(&self) -> &'static str {
        BASE_URL
    }

    fn build_list_url(&self, page: u32) -> String {
        if page <= 1 {
            format!("{BASE_URL}/recipes/")
        } else {
            format!("{BASE_URL}/recipes/~{page}/")
        }
    }

    fn parse_recipes(&self, html: &str) -> Vec<RecipeSummary> {
        list::parse_recipes(html)
    }

    fn parse_detailed_recipe(&self, html: &str, url: &str) -> Option<DetailedRecipe> {
        let context = ParsingContext::new(html, url, BASE_URL);
        let draft = FallbackChain::new()
            .tier(JsonLdExtractor)
            .tier(PovarenokMicrodataExtractor)
            .heuristic(HeadingStepsExtractor)
            .run(&context)?;
        draft.into_detailed(NAME, url, recipe_id(url, &RECIPE_ID))
    }
}
