use crate::error::LoaderError;
use crate::model::{DetailedRecipe, RecipeSummary};
use regex::Regex;

mod gastronom;
mod koolinar;
mod povarenok;

pub use gastronom::GastronomSource;
pub use koolinar::KoolinarSource;
pub use povarenok::PovarenokSource;

/// One recipe site: its identity, list-page URLs and page parsers.
///
/// Parsing is synchronous and pure; fetching the HTML is the caller's job.
pub trait RecipeSource: Send + Sync {
    /// Display name stored on every record, e.g. "Povarenok.ru"
    fn name(&self) -> &'static str;

    fn base_url(&self) -> &'static str;

    /// URL of list page `page` (1-based).
    fn build_list_url(&self, page: u32) -> String;

    /// Parse a list page into summaries, in page order.
    fn parse_recipes(&self, html: &str) -> Vec<RecipeSummary>;

    /// Parse a recipe page. `None` when no title can be found.
    fn parse_detailed_recipe(&self, html: &str, url: &str) -> Option<DetailedRecipe>;
}

pub struct SourceFactory;

impl SourceFactory {
    /// Create a source by its short name
    pub fn create(source_name: &str) -> Result<Box<dyn RecipeSource>, LoaderError> {
        match source_name.to_ascii_lowercase().as_str() {
            "povarenok" => Ok(Box::new(PovarenokSource)),
            "koolinar" => Ok(Box::new(KoolinarSource)),
            "gastronom" => Ok(Box::new(GastronomSource)),
            _ => Err(LoaderError::UnknownSource(source_name.to_string())),
        }
    }

    /// List all available source names
    pub fn available_sources() -> Vec<&'static str> {
        vec!["povarenok", "koolinar", "gastronom"]
    }
}

/// Numeric id captured by `pattern` from the URL, or a random UUID.
pub(crate) fn recipe_id(url: &str, pattern: &Regex) -> String {
    match pattern.captures(url).and_then(|caps| caps.get(1)) {
        Some(id) => id.as_str().to_string(),
        None => {
            log::debug!("No recipe id in {url}, generating one");
            uuid::Uuid::new_v4().to_string()
        }
    }
}

/// Make a list-item link absolute, dropping items without one.
pub(crate) fn item_url(href: Option<String>, base_url: &str) -> Option<String> {
    href.filter(|h| !h.trim().is_empty())
        .map(|h| crate::document::absolute_url(&h, base_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_each_source() {
        for name in SourceFactory::available_sources() {
            let source = SourceFactory::create(name).unwrap();
            assert!(source.base_url().starts_with("https://www."));
            assert!(source.name().to_lowercase().starts_with(name));
        }
    }

    #[test]
    fn test_create_unknown_source() {
        let result = SourceFactory::create("eda");
        assert!(matches!(result, Err(LoaderError::UnknownSource(name)) if name == "eda"));
    }

    #[test]
    fn test_list_urls() {
        let povarenok = SourceFactory::create("povarenok").unwrap();
        assert_eq!(povarenok.build_list_url(1), "https://www.povarenok.ru/recipes/");
        assert_eq!(povarenok.build_list_url(3), "https://www.povarenok.ru/recipes/~3/");

        let koolinar = SourceFactory::create("Koolinar").unwrap();
        assert_eq!(koolinar.build_list_url(1), "https://www.koolinar.ru/catalog/recent");
        assert_eq!(
            koolinar.build_list_url(2),
            "https://www.koolinar.ru/catalog/recent?page=2"
        );

        let gastronom = SourceFactory::create("gastronom").unwrap();
        assert_eq!(
            gastronom.build_list_url(1),
            "https://www.gastronom.ru/search?pagetype=recipepage"
        );
        assert_eq!(
            gastronom.build_list_url(4),
            "https://www.gastronom.ru/search?pagetype=recipepage&page=4"
        );
    }

    #[test]
    fn test_recipe_id_fallback() {
        let pattern = Regex::new(r"/recipe/(\d+)").unwrap();
        assert_eq!(recipe_id("https://www.gastronom.ru/recipe/6157/plov", &pattern), "6157");
        let generated = recipe_id("https://www.gastronom.ru/news", &pattern);
        assert!(uuid::Uuid::parse_str(&generated).is_ok());
        assert_ne!(generated, recipe_id("https://www.gastronom.ru/news", &pattern));
    }
}
