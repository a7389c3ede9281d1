use async_trait::async_trait;
use recipe_loader::{
    fetch_details, HtmlFetcher, LoadState, LoaderError, PaginationController, Recipe,
    SourceFactory,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned pages and records every requested URL.
struct ScriptedFetcher {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    fn new(pages: &[(&str, String)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.clone()))
                .collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl HtmlFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, LoaderError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| LoaderError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}

fn list_page(items: &[(&str, u32)]) -> String {
    let articles: String = items
        .iter()
        .map(|(title, id)| {
            format!(
                r#"<article class="item-bl"><h2><a href="/recipes/show/{id}/">{title}</a></h2></article>"#
            )
        })
        .collect();
    format!("<html><body>{articles}</body></html>")
}

const PAGE_1: &str = "https://www.povarenok.ru/recipes/";
const PAGE_2: &str = "https://www.povarenok.ru/recipes/~2/";
const PAGE_3: &str = "https://www.povarenok.ru/recipes/~3/";

fn three_pages() -> ScriptedFetcher {
    ScriptedFetcher::new(&[
        (PAGE_1, list_page(&[("Борщ", 1), ("Плов", 2)])),
        (PAGE_2, list_page(&[("Плов", 2), ("Щи", 3)])),
        (PAGE_3, list_page(&[("Щи", 3)])),
    ])
}

fn titles(controller: &PaginationController) -> Vec<&str> {
    controller.recipes().iter().map(Recipe::title).collect()
}

fn povarenok() -> PaginationController {
    PaginationController::new(SourceFactory::create("povarenok").unwrap())
}

#[tokio::test]
async fn test_load_next_walks_pages_until_exhausted() {
    let fetcher = three_pages();
    let mut controller = povarenok();

    assert_eq!(controller.load_next(&fetcher).await.unwrap(), 2);
    assert_eq!(controller.load_next(&fetcher).await.unwrap(), 1);
    assert_eq!(titles(&controller), vec!["Борщ", "Плов", "Щи"]);
    assert_eq!(controller.state(), LoadState::Idle);

    assert_eq!(controller.load_next(&fetcher).await.unwrap(), 0);
    assert_eq!(controller.state(), LoadState::Exhausted);
    assert_eq!(controller.page(), 3);

    let result = controller.load_next(&fetcher).await;
    assert!(matches!(result, Err(LoaderError::LoadRejected { page: 4, .. })));
    assert_eq!(fetcher.requested(), vec![PAGE_1, PAGE_2, PAGE_3]);
}

#[tokio::test]
async fn test_refresh_replaces_without_duplicates() {
    let fetcher = three_pages();
    let mut controller = povarenok();
    controller.load_next(&fetcher).await.unwrap();
    controller.load_next(&fetcher).await.unwrap();

    assert_eq!(controller.refresh(&fetcher).await.unwrap(), 2);
    assert_eq!(titles(&controller), vec!["Борщ", "Плов"]);
    assert_eq!(controller.page(), 1);
    assert!(controller.has_more());
}

#[tokio::test]
async fn test_refresh_after_exhaustion() {
    let fetcher = three_pages();
    let mut controller = povarenok();
    for _ in 0..3 {
        controller.load_next(&fetcher).await.unwrap();
    }
    assert!(!controller.has_more());

    controller.refresh(&fetcher).await.unwrap();
    assert_eq!(controller.state(), LoadState::Idle);
    assert_eq!(controller.load_next(&fetcher).await.unwrap(), 1);
}

#[tokio::test]
async fn test_failed_fetch_releases_load_slot() {
    let fetcher = ScriptedFetcher::new(&[(PAGE_1, list_page(&[("Борщ", 1)]))]);
    let mut controller = povarenok();
    controller.load_next(&fetcher).await.unwrap();

    let result = controller.load_next(&fetcher).await;
    assert!(matches!(result, Err(LoaderError::HttpStatus { status: 404, .. })));
    assert_eq!(controller.state(), LoadState::Idle);
    assert_eq!(controller.page(), 1);
    assert_eq!(titles(&controller), vec!["Борщ"]);

    // The same page can be tried again.
    assert!(controller.load_next(&fetcher).await.is_err());
    assert_eq!(fetcher.requested(), vec![PAGE_1, PAGE_2, PAGE_2]);
}

#[tokio::test]
async fn test_empty_first_page_exhausts() {
    let fetcher = ScriptedFetcher::new(&[(PAGE_1, list_page(&[]))]);
    let mut controller = povarenok();
    assert_eq!(controller.load_next(&fetcher).await.unwrap(), 0);
    assert!(controller.recipes().is_empty());
    assert_eq!(controller.state(), LoadState::Exhausted);
}

#[tokio::test]
async fn test_details_are_fetched_once() {
    let detail_url = "https://www.povarenok.ru/recipes/show/2/";
    let fetcher = ScriptedFetcher::new(&[
        (PAGE_1, list_page(&[("Борщ", 1), ("Плов", 2)])),
        (
            detail_url,
            r#"<html><body>
                <h1 itemprop="name">Плов</h1>
                <ul><li class="cooking-bl">Обжарить мясо.</li></ul>
            </body></html>"#
                .to_string(),
        ),
    ]);
    let mut controller = povarenok();
    controller.load_next(&fetcher).await.unwrap();

    let summary = controller.recipes()[1].clone();
    assert!(!summary.is_detailed());
    let detailed = fetch_details(controller.source(), &fetcher, &summary)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detailed.id, "2");
    assert!(controller.apply_detail(detailed));

    let stored = controller.recipes()[1].clone();
    assert!(stored.is_detailed());
    let again = fetch_details(controller.source(), &fetcher, &stored)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(Some(&again), stored.as_detailed());
    assert_eq!(fetcher.requested(), vec![PAGE_1, detail_url]);
}

#[tokio::test]
async fn test_detail_page_without_recipe() {
    let fetcher = ScriptedFetcher::new(&[
        (PAGE_1, list_page(&[("Борщ", 1)])),
        (
            "https://www.povarenok.ru/recipes/show/1/",
            "<html><body><p>Рецепт удалён</p></body></html>".to_string(),
        ),
    ]);
    let mut controller = povarenok();
    controller.load_next(&fetcher).await.unwrap();

    let recipe = controller.recipes()[0].clone();
    let details = fetch_details(controller.source(), &fetcher, &recipe).await.unwrap();
    assert!(details.is_none());
}
