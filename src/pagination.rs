use crate::error::LoaderError;
use crate::fetch::HtmlFetcher;
use crate::model::{DetailedRecipe, Recipe, RecipeSummary};
use crate::sources::RecipeSource;
use log::{debug, info, warn};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Exhausted,
}

/// An accepted list-page load, returned by [`PaginationController::begin_load`]
/// and handed back with the parsed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub url: String,
}

/// Drives list pagination for one source and owns the merged results.
///
/// At most one page load is in flight. Page 1 replaces the results; later
/// pages append only titles not seen yet. A page adding nothing marks the
/// source exhausted until the next refresh.
pub struct PaginationController {
    source: Box<dyn RecipeSource>,
    state: LoadState,
    page: u32,
    recipes: Vec<Recipe>,
}

impl PaginationController {
    pub fn new(source: Box<dyn RecipeSource>) -> Self {
        Self {
            source,
            state: LoadState::Idle,
            page: 1,
            recipes: Vec::new(),
        }
    }

    pub fn source(&self) -> &dyn RecipeSource {
        self.source.as_ref()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Last page successfully loaded, 1 before any load.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn has_more(&self) -> bool {
        self.state != LoadState::Exhausted
    }

    /// Claim the single load slot for `page`.
    pub fn begin_load(&mut self, page: u32) -> Result<PageRequest, LoaderError> {
        if self.state == LoadState::Loading {
            return Err(LoaderError::LoadRejected {
                page,
                reason: "another page is loading",
            });
        }
        if page > 1 && self.state == LoadState::Exhausted {
            return Err(LoaderError::LoadRejected {
                page,
                reason: "no more pages",
            });
        }

        self.state = LoadState::Loading;
        Ok(PageRequest {
            page,
            url: self.source.build_list_url(page),
        })
    }

    /// Merge a parsed page. Returns the number of recipes added.
    pub fn complete_load(&mut self, request: PageRequest, summaries: Vec<RecipeSummary>) -> usize {
        let received = summaries.len();
        let mut seen: HashSet<String> = if request.page == 1 {
            HashSet::new()
        } else {
            self.recipes.iter().map(|r| r.title().to_string()).collect()
        };
        let fresh: Vec<Recipe> = summaries
            .into_iter()
            .filter(|summary| seen.insert(summary.title.clone()))
            .map(Recipe::from)
            .collect();
        let added = fresh.len();

        if request.page == 1 {
            self.recipes = fresh;
        } else {
            self.recipes.extend(fresh);
        }
        self.page = request.page;
        self.state = if added == 0 {
            LoadState::Exhausted
        } else {
            LoadState::Idle
        };

        debug!(
            "{}: page {} gave {received} recipes, {added} new",
            self.source.name(),
            request.page
        );
        if self.state == LoadState::Exhausted {
            info!("{}: no more recipes after page {}", self.source.name(), request.page);
        }
        added
    }

    /// Release the load slot after a failed fetch, keeping current results.
    pub fn fail_load(&mut self, request: &PageRequest) {
        warn!("{}: page {} failed to load", self.source.name(), request.page);
        if self.state == LoadState::Loading {
            self.state = LoadState::Idle;
        }
    }

    /// Back to page 1 and `Idle`, whatever the current state.
    pub fn reset(&mut self) {
        self.page = 1;
        self.state = LoadState::Idle;
    }

    /// Fetch, parse and merge list page `page`.
    pub async fn load_page(&mut self, fetcher: &dyn HtmlFetcher, page: u32) -> Result<usize, LoaderError> {
        let request = self.begin_load(page)?;
        let html = match fetcher.fetch(&request.url).await {
            Ok(html) => html,
            Err(e) => {
                self.fail_load(&request);
                return Err(e);
            }
        };
        let summaries = self.source.parse_recipes(&html);
        Ok(self.complete_load(request, summaries))
    }

    /// Reset and reload page 1.
    pub async fn refresh(&mut self, fetcher: &dyn HtmlFetcher) -> Result<usize, LoaderError> {
        self.reset();
        self.load_page(fetcher, 1).await
    }

    /// Load the page after the last loaded one.
    pub async fn load_next(&mut self, fetcher: &dyn HtmlFetcher) -> Result<usize, LoaderError> {
        let next = if self.recipes.is_empty() { 1 } else { self.page + 1 };
        self.load_page(fetcher, next).await
    }

    /// Replace the summary with the same URL by its detailed record.
    ///
    /// Returns false when the record is no longer in the results, e.g. after a
    /// refresh dropped it.
    pub fn apply_detail(&mut self, detailed: DetailedRecipe) -> bool {
        match self
            .recipes
            .iter()
            .position(|recipe| recipe.url() == detailed.summary.url)
        {
            Some(index) => {
                self.recipes[index] = Recipe::Detailed(detailed);
                true
            }
            None => {
                debug!("Ignoring details for {}", detailed.summary.url);
                false
            }
        }
    }
}

/// Detailed record for `recipe`: returned as is when already detailed,
/// otherwise fetched and parsed. `Ok(None)` when the page has no recipe.
pub async fn fetch_details(
    source: &dyn RecipeSource,
    fetcher: &dyn HtmlFetcher,
    recipe: &Recipe,
) -> Result<Option<DetailedRecipe>, LoaderError> {
    if let Some(detailed) = recipe.as_detailed() {
        debug!("Already detailed: {}", recipe.url());
        return Ok(Some(detailed.clone()));
    }

    let html = fetcher.fetch(recipe.url()).await?;
    let detailed = source.parse_detailed_recipe(&html, recipe.url());
    if detailed.is_none() {
        warn!("{}: no recipe found at {}", source.name(), recipe.url());
    }
    Ok(detailed)
}
