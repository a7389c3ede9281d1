use super::{recipe_id, RecipeSource};
use crate::extractors::{FallbackChain, HeadingStepsExtractor, JsonLdExtractor, ParsingContext};
use crate::model::{DetailedRecipe, RecipeSummary};
use regex::Regex;
use std::sync::LazyLock;

mod detail;
mod list;

use detail::KoolinarMicrodataExtractor;

pub(crate) const NAME: &str = "Koolinar.ru";
pub(crate) const BASE_URL: &str = "https://www.koolinar.ru";

static RECIPE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/recipe/view/(\d+)").expect("invalid regex: koolinar id"));

/// koolinar.ru: card-based catalog pages, micro-data and meta tags on
/// recipe pages.
pub struct KoolinarSource;

impl RecipeSource for KoolinarSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn base_url(&self) -> &'static str {
        BASE_URL
    }

    fn build_list_url(&self, page: u32) -> String {
        if page <= 1 {
            format!("{BASE_URL}/catalog/recent")
        } else {
            format!("{BASE_URL}/catalog/recent?page={page}")
        }
    }

    fn parse_recipes(&self, html: &str) -> Vec<RecipeSummary> {
        list::parse_recipes(html)
    }

    fn parse_detailed_recipe(&self, html: &str, url: &str) -> Option<DetailedRecipe> {
        let context = ParsingContext::new(html, url, BASE_URL);
        let draft = FallbackChain::new()
            .tier(JsonLdExtractor)
            .tier(KoolinarMicrodataExtractor)
            .heuristic(HeadingStepsExtractor)
            .run(&context)?;
        draft.into_detailed(NAME, url, recipe_id(url, &RECIPE_ID))
    }
}
