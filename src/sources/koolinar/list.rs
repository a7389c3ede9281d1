use super::{BASE_URL, NAME};
use crate::document;
use crate::model::RecipeSummary;
use crate::normalizers::{find_cooking_time, find_servings, select_description, truncate_at_comma};
use crate::sources::item_url;
use log::debug;
use scraper::{ElementRef, Html};

pub(super) fn parse_recipes(html: &str) -> Vec<RecipeSummary> {
    let document = Html::parse_document(html);
    let items = document::select(&document, "div.b-item");
    debug!("Koolinar: Found {} list items", items.len());

    items.into_iter().filter_map(parse_item).collect()
}

fn parse_item(item: ElementRef) -> Option<RecipeSummary> {
    let link = document::first_in(item, "a.b-item__main");
    let title = document::first_in(item, "span.b-item__title")
        .map(document::text)
        .unwrap_or_default();
    let url = item_url(link.and_then(|l| document::attr(l, "href")), BASE_URL);
    let Some(url) = url.filter(|_| !title.is_empty()) else {
        debug!("Koolinar: Skipping item without title or link");
        return None;
    };

    let item_text = document::text(item);

    Some(RecipeSummary {
        title,
        source: NAME.to_string(),
        url,
        image_url: document::first_in(item, "a.b-item__main img")
            .and_then(|img| document::attr(img, "src"))
            .map(|src| document::absolute_url(&src, BASE_URL)),
        description: document::first_text_in(item, &["div.b-item__description"])
            .or_else(|| select_description(item, ".b-item__breadcrumbs")),
        categories: None,
        tags: None,
        cooking_time: find_cooking_time(&item_text),
        servings: find_servings(&item_text),
        added_date: document::first_text_in(item, &[".date-font"])
            .and_then(|date| truncate_at_comma(&date)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cards() {
        let html = r#"
            <div class="b-item">
                <a class="b-item__main" href="/recipe/view/4321">
                    <img src="/images/4321.jpg">
                    <span class="b-item__title">Сырники</span>
                </a>
                <div class="b-item__description">Пышные сырники из творога</div>
                <span class="date-font">12 марта 2024, 14:05</span>
            </div>
            <div class="b-item">
                <a class="b-item__main"><span class="b-item__title">Без ссылки</span></a>
            </div>
            <div class="b-item">
                <a class="b-item__main" href="/recipe/view/1"></a>
            </div>"#;

        let recipes = parse_recipes(html);
        assert_eq!(recipes.len(), 1);
        let syrniki = &recipes[0];
        assert_eq!(syrniki.title, "Сырники");
        assert_eq!(syrniki.source, "Koolinar.ru");
        assert_eq!(syrniki.url, "https://www.koolinar.ru/recipe/view/4321");
        assert_eq!(
            syrniki.image_url.as_deref(),
            Some("https://www.koolinar.ru/images/4321.jpg")
        );
        assert_eq!(syrniki.description.as_deref(), Some("Пышные сырники из творога"));
        assert_eq!(syrniki.added_date.as_deref(), Some("12 марта 2024"));
        assert!(syrniki.cooking_time.is_none());
    }

    #[test]
    fn test_time_and_servings_from_card_text() {
        let html = r#"
            <div class="b-item">
                <a class="b-item__main" href="/recipe/view/7"><span class="b-item__title">Щи</span></a>
                <p>Варить 1 час, 4 порции</p>
            </div>"#;
        let recipes = parse_recipes(html);
        assert_eq!(recipes[0].cooking_time.as_deref(), Some("1 час"));
        assert_eq!(recipes[0].servings.as_deref(), Some("4 порц"));
    }
}
