use super::{BASE_URL, NAME};
use crate::document;
use crate::model::RecipeSummary;
use crate::normalizers::format_iso_date;
use crate::sources::item_url;
use log::{debug, warn};
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

const PAGE_CONTEXT_SCRIPT: &str = "script#vite-plugin-ssr_pageContext";

#[derive(Debug, Deserialize)]
struct PageContext {
    #[serde(rename = "pageProps")]
    page_props: PageProps,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(rename = "pagesBySearch")]
    pages_by_search: PagesBySearch,
}

#[derive(Debug, Deserialize)]
struct PagesBySearch {
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: Option<String>,
    #[serde(rename = "previewContent")]
    preview_content: Option<PreviewContent>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PreviewContent {
    link: Option<String>,
    image: Option<String>,
    description: Option<String>,
    #[serde(rename = "typeSpecificData")]
    type_specific_data: Option<Value>,
}

/// Read search results from the page-context JSON island.
pub(super) fn parse_recipes(html: &str) -> Vec<RecipeSummary> {
    let document = Html::parse_document(html);
    let Some(script) = document::first_match(&document, PAGE_CONTEXT_SCRIPT) else {
        warn!("Gastronom: No page context script on list page");
        return Vec::new();
    };

    let context: PageContext = match serde_json::from_str(script.inner_html().trim()) {
        Ok(context) => context,
        Err(e) => {
            warn!("Gastronom: Unreadable page context: {e}");
            return Vec::new();
        }
    };

    let results = context.page_props.pages_by_search.results;
    debug!("Gastronom: Found {} search results", results.len());

    results
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<SearchResult>(value) {
            Ok(result) => parse_result(result),
            Err(e) => {
                debug!("Gastronom: Skipping malformed result: {e}");
                None
            }
        })
        .collect()
}

fn parse_result(result: SearchResult) -> Option<RecipeSummary> {
    let title = result.name.map(|n| n.trim().to_string()).unwrap_or_default();
    let preview = result.preview_content?;
    let Some(url) = item_url(preview.link, BASE_URL).filter(|_| !title.is_empty()) else {
        debug!("Gastronom: Skipping result without name or link");
        return None;
    };

    let cooking_time = preview
        .type_specific_data
        .as_ref()
        .and_then(|data| data.get("cookingTime"))
        .and_then(Value::as_i64)
        .map(|minutes| format!("{minutes} мин"));

    Some(RecipeSummary {
        title,
        source: NAME.to_string(),
        url,
        image_url: preview
            .image
            .filter(|i| !i.trim().is_empty())
            .map(|i| document::absolute_url(&i, BASE_URL)),
        description: preview
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        categories: None,
        tags: None,
        cooking_time,
        servings: None,
        added_date: result.published_at.as_deref().and_then(format_iso_date),
    })
}
