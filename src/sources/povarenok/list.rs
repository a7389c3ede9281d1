use super::{BASE_URL, NAME};
use crate::document;
use crate::model::{non_empty, RecipeSummary};
use crate::normalizers::{
    find_cooking_time, find_servings, normalize_duration, normalize_relative_date,
    normalize_servings, select_description,
};
use crate::sources::item_url;
use log::debug;
use scraper::{ElementRef, Html};

const DATE_SELECTORS: [&str; 6] = [
    ".i-time",
    ".article-footer .i-time",
    ".time",
    ".date",
    "time",
    "[datetime]",
];

pub(super) fn parse_recipes(html: &str) -> Vec<RecipeSummary> {
    let document = Html::parse_document(html);
    let items = document::select(&document, "article.item-bl");
    debug!("Povarenok: Found {} list items", items.len());

    items.into_iter().filter_map(parse_item).collect()
}

fn parse_item(item: ElementRef) -> Option<RecipeSummary> {
    let link = document::first_in(item, "h2 a");
    let title = link.map(document::text).unwrap_or_default();
    let url = item_url(link.and_then(|l| document::attr(l, "href")), BASE_URL);
    let Some(url) = url.filter(|_| !title.is_empty()) else {
        debug!("Povarenok: Skipping item without title or link");
        return None;
    };

    let item_text = document::text(item);
    let cooking_time = find_cooking_time(&item_text).or_else(|| {
        document::first_text_in(item, &["time[itemprop=totalTime]"])
            .map(|time| normalize_duration(&time))
    });
    let servings = find_servings(&item_text).or_else(|| {
        document::first_text_in(item, &["[itemprop=recipeYield]"])
            .and_then(|yield_text| normalize_servings(&yield_text))
    });

    Some(RecipeSummary {
        title,
        source: NAME.to_string(),
        url,
        image_url: document::first_in(item, ".m-img img")
            .and_then(|img| document::attr(img, "src"))
            .map(|src| document::absolute_url(&src, BASE_URL)),
        description: select_description(item, ".article-breadcrumbs"),
        categories: non_empty(link_texts(item, ".article-breadcrumbs a")),
        tags: non_empty(link_texts(item, ".article-tags .tab-content a")),
        cooking_time,
        servings,
        added_date: added_date(item),
    })
}

fn link_texts(item: ElementRef, css: &str) -> Vec<String> {
    document::select_in(item, css)
        .into_iter()
        .map(document::text)
        .filter(|t| !t.is_empty())
        .collect()
}

fn added_date(item: ElementRef) -> Option<String> {
    document::first_text_in(item, &DATE_SELECTORS)
        .or_else(|| document::first_in(item, "time").and_then(|t| document::attr(t, "datetime")))
        .and_then(|date| normalize_relative_date(&date))
}
