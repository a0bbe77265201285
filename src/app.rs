use crate::api::{NewsClient, Query};
use crate::config::Config;
use crate::error::{FavoritesError, Result};
use crate::favorites::FavoritesStore;
use crate::models::{Article, QueryResult};
use crate::paging::Pager;
use crate::ui;

/// Orchestrator: wires user intent to the gateway, pager and favorites
/// store. Owns all mutable state; issues one gateway call at a time.
///
/// A favorites store that failed to load stays in the `Err` state for the
/// whole session: news browsing keeps working, favorites actions report
/// the load failure instead of pretending the collection is empty.
pub struct App {
    config: Config,
    client: NewsClient,
    favorites: Result<FavoritesStore, FavoritesError>,
}

/// Why a browse loop ended: `Refresh` means the underlying collection
/// changed and the caller should rebuild the pager.
enum BrowseOutcome {
    Done,
    Refresh,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let client = NewsClient::new(&config)?;
        let favorites = FavoritesStore::load(&config.favorites_path);
        if let Err(err) = &favorites {
            ui::show_error(&err.to_string());
            ui::show_info("Favorites are disabled for this session");
        }
        Ok(Self {
            config,
            client,
            favorites,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::show_header();
        loop {
            match ui::menu_choice(self.favorites_count()).as_str() {
                "1" => self.view_top_headlines().await,
                "2" => self.search_news().await,
                "3" => self.browse_by_category().await,
                "4" => self.browse_by_source().await,
                "5" => self.view_favorites(),
                "0" | "q" => {
                    ui::show_goodbye();
                    return Ok(());
                }
                other => ui::show_warning(&format!("Unknown option: {other}")),
            }
        }
    }

    async fn view_top_headlines(&mut self) {
        let mut query = Query::headlines();
        query.country = Some(self.config.country.clone());
        query.page_size = self.config.fetch_size;
        self.fetch_and_browse(query, "Top Headlines".into()).await;
    }

    async fn search_news(&mut self) {
        let text = ui::prompt("Search for");
        if text.trim().is_empty() {
            ui::show_warning("Search cancelled");
            return;
        }
        let mut query = Query::search(text.trim());
        query.language = Some(self.config.language.clone());
        query.page_size = self.config.fetch_size;
        let title = format!("Search Results: '{}'", text.trim());
        self.fetch_and_browse(query, title).await;
    }

    async fn browse_by_category(&mut self) {
        let Some(category) = ui::pick_category() else {
            return;
        };
        let mut query = Query::headlines();
        query.country = Some(self.config.country.clone());
        query.category = Some(category);
        query.page_size = self.config.fetch_size;
        let title = format!("{} News", title_case(category.as_str()));
        self.fetch_and_browse(query, title).await;
    }

    async fn browse_by_source(&mut self) {
        let mut listing = Query::sources();
        listing.language = Some(self.config.language.clone());

        let sources = match self.client.sources(&listing).await {
            Ok(sources) => sources,
            Err(err) => {
                ui::show_api_error(&err);
                ui::pause();
                return;
            }
        };
        if sources.is_empty() {
            ui::show_info("No sources available");
            ui::pause();
            return;
        }
        ui::show_sources(&sources);

        let input = ui::prompt("Source ids (comma-separated, empty to cancel)");
        let ids: Vec<String> = input
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if ids.is_empty() {
            return;
        }

        let mut query = Query::headlines();
        query.source_ids = ids;
        query.page_size = self.config.fetch_size;
        self.fetch_and_browse(query, "Headlines by Source".into())
            .await;
    }

    async fn fetch_and_browse(&mut self, query: Query, title: String) {
        let keywords = query.keywords();
        let result = match self.client.fetch(&query).await {
            Ok(result) => result,
            Err(err) => {
                ui::show_api_error(&err);
                ui::pause();
                return;
            }
        };
        if result.is_empty() {
            ui::show_info("Nothing to show right now");
            ui::pause();
            return;
        }

        let mut pager = Pager::new(result, self.config.page_size);
        self.browse_pages(&mut pager, &title, &keywords, true);
    }

    fn view_favorites(&mut self) {
        loop {
            let articles: Vec<Article> = match &self.favorites {
                Ok(store) if store.is_empty() => {
                    ui::show_info("No saved favorites yet");
                    ui::show_info("Save articles with [s] while browsing news");
                    ui::pause();
                    return;
                }
                Ok(store) => store.list().iter().map(Article::from).collect(),
                Err(err) => {
                    ui::show_error(&err.to_string());
                    ui::show_info("Favorites are disabled for this session");
                    ui::pause();
                    return;
                }
            };
            let total = articles.len() as u64;
            // Local collection rendered through the same pager; the query
            // slot is a placeholder, nothing fetched it.
            let result = QueryResult {
                articles,
                total_results: total,
                dropped: 0,
                query: Query::headlines(),
            };
            let mut pager = Pager::new(result, self.config.page_size);

            match self.browse_pages(&mut pager, "My Favorites", &[], false) {
                BrowseOutcome::Refresh => continue,
                BrowseOutcome::Done => return,
            }
        }
    }

    fn browse_pages(
        &mut self,
        pager: &mut Pager,
        title: &str,
        keywords: &[String],
        allow_save: bool,
    ) -> BrowseOutcome {
        loop {
            let action = {
                let view = pager.current_page();
                ui::show_listing(title, &view, keywords);
                ui::pagination_prompt(&view, allow_save)
            };

            match action.as_str() {
                "n" => {
                    if !pager.next_page() {
                        ui::show_warning("Already on the last page");
                    }
                }
                "p" => {
                    if !pager.previous_page() {
                        ui::show_warning("Already on the first page");
                    }
                }
                "g" => {
                    let page_count = pager.page_count();
                    if let Some(page) = ui::prompt_number("Page", 1, page_count) {
                        if let Err(err) = pager.jump_to(page - 1) {
                            ui::show_warning(&err.to_string());
                        }
                    }
                }
                "v" => self.view_detail(pager),
                "s" if allow_save => self.save_favorite(pager),
                "r" if !allow_save => {
                    if self.remove_favorite(pager) {
                        return BrowseOutcome::Refresh;
                    }
                }
                "c" if !allow_save => {
                    if ui::confirm("Remove all favorites?") {
                        if let Some(favorites) = self.favorites_mut() {
                            match favorites.clear() {
                                Ok(()) => ui::show_success("Favorites cleared"),
                                Err(err) => ui::show_error(&err.to_string()),
                            }
                        }
                        return BrowseOutcome::Refresh;
                    }
                }
                "o" => self.open_in_browser(pager),
                "b" => return BrowseOutcome::Done,
                _ => {}
            }
        }
    }

    fn view_detail(&self, pager: &Pager) {
        let Some(position) = self.pick_position(pager, "Article number to view") else {
            return;
        };
        match pager.article_at(position) {
            Ok(article) => {
                ui::show_article_detail(article, self.is_favorite(&article.url));
                ui::pause();
            }
            Err(err) => ui::show_warning(&err.to_string()),
        }
    }

    fn save_favorite(&mut self, pager: &Pager) {
        let Some(position) = self.pick_position(pager, "Article number to save") else {
            return;
        };
        let article = match pager.article_at(position) {
            Ok(article) => article,
            Err(err) => {
                ui::show_warning(&err.to_string());
                return;
            }
        };
        let Some(favorites) = self.favorites_mut() else {
            return;
        };
        match favorites.add(article) {
            Ok(()) => ui::show_success("Article saved to favorites"),
            Err(FavoritesError::AlreadyFavorited(_)) => {
                ui::show_warning("Article already in favorites");
            }
            Err(err) => ui::show_error(&err.to_string()),
        }
    }

    /// Returns whether an entry was removed (the favorites pager is then
    /// stale and must be rebuilt).
    fn remove_favorite(&mut self, pager: &Pager) -> bool {
        let Some(position) = self.pick_position(pager, "Article number to remove") else {
            return false;
        };
        let url = match pager.article_at(position) {
            Ok(article) => article.url.clone(),
            Err(err) => {
                ui::show_warning(&err.to_string());
                return false;
            }
        };
        let Some(favorites) = self.favorites_mut() else {
            return false;
        };
        match favorites.remove(&url) {
            Ok(()) => {
                ui::show_success("Removed from favorites");
                true
            }
            Err(err) => {
                ui::show_error(&err.to_string());
                false
            }
        }
    }

    fn open_in_browser(&self, pager: &Pager) {
        let Some(position) = self.pick_position(pager, "Article number to open") else {
            return;
        };
        match pager.article_at(position) {
            Ok(article) => {
                if ui::open_url(&article.url) {
                    ui::show_success("Opened in browser");
                } else {
                    ui::show_error("Failed to open browser");
                    ui::show_info(&article.url);
                }
            }
            Err(err) => ui::show_warning(&err.to_string()),
        }
    }

    /// `None` when the store failed to load; the menu shows "unavailable"
    /// instead of a count so it cannot be mistaken for empty.
    fn favorites_count(&self) -> Option<usize> {
        self.favorites.as_ref().ok().map(|store| store.len())
    }

    fn is_favorite(&self, url: &str) -> bool {
        self.favorites
            .as_ref()
            .map(|store| store.contains(url))
            .unwrap_or(false)
    }

    fn favorites_mut(&mut self) -> Option<&mut FavoritesStore> {
        match &mut self.favorites {
            Ok(store) => Some(store),
            Err(err) => {
                ui::show_error(&err.to_string());
                ui::show_info("Favorites are disabled for this session");
                None
            }
        }
    }

    /// Prompt for a 1-based position on the current page; returns the
    /// 0-based position.
    fn pick_position(&self, pager: &Pager, label: &str) -> Option<usize> {
        let on_page = pager.current_page().articles.len();
        if on_page == 0 {
            ui::show_warning("Nothing on this page");
            return None;
        }
        ui::prompt_number(label, 1, on_page).map(|n| n - 1)
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
