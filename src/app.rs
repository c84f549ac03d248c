// Application loop: ties the news client, the favorites store and the UI
// together. API failures are shown to the user and the loop carries on;
// terminal I/O failures end the session.

use crate::api::{Category, HeadlinesQuery, NewsClient, SearchQuery, SourcesQuery, MAX_PAGE_SIZE};
use crate::article::{Article, ArticleView};
use crate::config::Config;
use crate::favorites::{Change, FavoritesStore};
use crate::paginator::{PageInfo, Paginator};
use crate::ui::{open_url, MenuChoice, PageAction, Ui, ViewMode};
use anyhow::{Context, Result};
use std::io::Write;
use tracing::debug;

pub struct App<W: Write> {
    config: Config,
    client: NewsClient,
    favorites: FavoritesStore,
    ui: Ui<W>,
}

impl<W: Write> App<W> {
    pub fn new(config: Config, ui: Ui<W>) -> Result<Self> {
        let client = NewsClient::new(&config).context("Failed to build news API client")?;
        let favorites = FavoritesStore::new(&config.favorites_path);

        Ok(App {
            config,
            client,
            favorites,
            ui,
        })
    }

    /// Run the main menu until the user exits.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.ui.clear()?;
            self.ui.header()?;

            let choice = self.ui.main_menu(self.favorites.count())?;
            debug!(?choice, "Menu selection.");

            match choice {
                MenuChoice::TopHeadlines => self.top_headlines()?,
                MenuChoice::Search => self.search()?,
                MenuChoice::Category => self.browse_category()?,
                MenuChoice::Source => self.browse_source()?,
                MenuChoice::Favorites => self.show_favorites()?,
                MenuChoice::Exit => break,
            }
        }

        self.ui.clear()?;
        self.ui.goodbye()?;
        Ok(())
    }

    /// Call the API behind a spinner. On failure the error is shown and
    /// `None` returned.
    fn fetch<T>(
        &mut self,
        message: &str,
        request: impl FnOnce(&NewsClient) -> crate::Result<T>,
    ) -> Result<Option<T>> {
        let client = &self.client;
        match self.ui.with_spinner(message, || request(client)) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                self.ui.error(&format!("{message} failed: {e}"))?;
                self.ui.press_enter()?;
                Ok(None)
            }
        }
    }

    fn top_headlines(&mut self) -> Result<()> {
        let query = HeadlinesQuery::new(&self.config.country).page_size(MAX_PAGE_SIZE);
        let Some(response) = self.fetch("Fetching top headlines", |c| c.top_headlines(&query))? else {
            return Ok(());
        };

        if response.articles.is_empty() {
            return self.notice("No headlines available at the moment");
        }
        self.paginate(response.articles, "Top Headlines", &[], ViewMode::Browse)
    }

    fn search(&mut self) -> Result<()> {
        self.ui.clear()?;
        self.ui.header()?;

        let Some(query) = self.ui.search_query()? else {
            self.ui.warning("Search cancelled")?;
            self.ui.press_enter()?;
            return Ok(());
        };

        let request = SearchQuery::new(query.as_str(), self.config.language.as_str())
            .page_size(MAX_PAGE_SIZE);
        let Some(response) = self.fetch(&format!("Searching for '{query}'"), |c| c.search(&request))?
        else {
            return Ok(());
        };

        if response.articles.is_empty() {
            return self.notice(&format!("No results found for '{query}'"));
        }

        let keywords: Vec<&str> = query.split_whitespace().collect();
        self.paginate(
            response.articles,
            &format!("Search Results: '{query}'"),
            &keywords,
            ViewMode::Browse,
        )
    }

    fn browse_category(&mut self) -> Result<()> {
        self.ui.clear()?;
        self.ui.header()?;

        let Some(category) = self.ui.choose_category()? else {
            return Ok(());
        };

        let query = HeadlinesQuery::new(&self.config.country)
            .category(category)
            .page_size(MAX_PAGE_SIZE);
        let Some(response) =
            self.fetch(&format!("Fetching {category} news"), |c| c.top_headlines(&query))?
        else {
            return Ok(());
        };

        if response.articles.is_empty() {
            return self.notice(&format!("No {category} news available"));
        }
        self.paginate(
            response.articles,
            &format!("{} News", Category::title(category)),
            &[],
            ViewMode::Browse,
        )
    }

    fn browse_source(&mut self) -> Result<()> {
        self.ui.clear()?;
        self.ui.header()?;

        let query = SourcesQuery {
            language: self.config.language.clone(),
            ..SourcesQuery::default()
        };
        let Some(response) = self.fetch("Fetching available sources", |c| c.sources(&query))? else {
            return Ok(());
        };

        let mut sources = response.sources;
        if sources.is_empty() {
            return self.notice("No sources available");
        }
        sources.sort_by_key(|s| s.name.to_lowercase());

        let Some(source) = self.ui.choose_source(&sources)?.cloned() else {
            return Ok(());
        };

        let Some(response) = self.fetch(&format!("Fetching news from {}", source.name), |c| {
            c.headlines_by_source(&[source.id.as_str()], 1, MAX_PAGE_SIZE)
        })?
        else {
            return Ok(());
        };

        if response.articles.is_empty() {
            return self.notice(&format!("No headlines from {}", source.name));
        }
        self.paginate(response.articles, &source.name, &[], ViewMode::Browse)
    }

    fn show_favorites(&mut self) -> Result<()> {
        if self.favorites.is_empty() {
            self.ui.clear()?;
            self.ui.header()?;
            self.ui.info("No saved favorites yet")?;
            self.ui.info("Save articles by pressing 's' while browsing news")?;
            return self.ui.press_enter().map_err(Into::into);
        }

        let articles = self.favorite_articles();
        self.paginate(articles, "My Favorites", &[], ViewMode::Favorites)
    }

    fn favorite_articles(&self) -> Vec<Article> {
        self.favorites.list().iter().map(Article::from).collect()
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        self.ui.info(message)?;
        self.ui.press_enter()?;
        Ok(())
    }

    /// Page through `articles` until the user goes back.
    fn paginate(
        &mut self,
        articles: Vec<Article>,
        title: &str,
        keywords: &[&str],
        mode: ViewMode,
    ) -> Result<()> {
        let mut paginator = Paginator::new(articles, self.config.page_size);

        loop {
            let (page, info) = {
                let (page, info) = paginator.current();
                (page.to_vec(), info)
            };
            let views: Vec<ArticleView> = page
                .iter()
                .enumerate()
                .map(|(i, article)| ArticleView::new(article, info.start_index + i))
                .collect();

            self.ui.clear()?;
            self.ui.header()?;
            self.ui.heading(title)?;
            self.ui.articles_table(&views, &info, keywords)?;

            match self.ui.page_action(&info, mode)? {
                PageAction::Previous => {
                    paginator.prev_page();
                }
                PageAction::Next => {
                    paginator.next_page();
                }
                PageAction::First => {
                    paginator.first_page();
                }
                PageAction::Last => {
                    paginator.last_page();
                }
                PageAction::View => self.view_article(&views, &info)?,
                PageAction::Save => self.save_article(&page, &info)?,
                PageAction::Open => self.open_article(&views, &info)?,
                PageAction::Remove => {
                    if self.remove_article(&views, &info)? {
                        if self.favorites.is_empty() {
                            return Ok(());
                        }
                        let current = paginator.current_page();
                        paginator = Paginator::new(self.favorite_articles(), self.config.page_size);
                        paginator.get_page(current);
                    }
                }
                PageAction::Clear => {
                    if self.clear_favorites()? {
                        return Ok(());
                    }
                }
                PageAction::Back => return Ok(()),
            }
        }
    }

    /// Ask for an article number shown on this page and return its offset
    /// within the page.
    fn pick(&mut self, verb: &str, info: &PageInfo) -> Result<Option<usize>> {
        let prompt = format!("Enter article number to {verb}");
        let number = self.ui.number_input(&prompt, info.start_index, info.end_index)?;
        Ok(number.map(|n| n - info.start_index))
    }

    fn view_article(&mut self, views: &[ArticleView], info: &PageInfo) -> Result<()> {
        let Some(view) = self.pick("view", info)?.and_then(|i| views.get(i)) else {
            return Ok(());
        };

        let is_favorite = self.favorites.contains(&view.url);
        self.ui.clear()?;
        self.ui.header()?;
        self.ui.article_detail(view, is_favorite)?;
        self.ui.press_enter()?;
        Ok(())
    }

    fn save_article(&mut self, page: &[Article], info: &PageInfo) -> Result<()> {
        let Some(article) = self.pick("save", info)?.and_then(|i| page.get(i)) else {
            return Ok(());
        };

        match self.favorites.add(article) {
            Change::Persisted => self.ui.success("Article saved to favorites!")?,
            Change::MemoryOnly => self
                .ui
                .warning("Article saved for this session, but the favorites file could not be written")?,
            Change::Unchanged if article.url().is_none() => {
                self.ui.warning("Article has no URL and cannot be saved")?;
            }
            Change::Unchanged => self.ui.warning("Article already in favorites")?,
        }

        self.ui.press_enter()?;
        Ok(())
    }

    fn open_article(&mut self, views: &[ArticleView], info: &PageInfo) -> Result<()> {
        let Some(view) = self.pick("open", info)?.and_then(|i| views.get(i)) else {
            return Ok(());
        };

        if view.url.is_empty() {
            self.ui.error("No URL available for this article")?;
        } else if open_url(&view.url) {
            self.ui.success("Article opened in browser!")?;
        } else {
            self.ui.error("Failed to open browser")?;
            self.ui.info(&format!("URL: {}", view.url))?;
        }

        self.ui.press_enter()?;
        Ok(())
    }

    /// Returns whether a favorite was removed.
    fn remove_article(&mut self, views: &[ArticleView], info: &PageInfo) -> Result<bool> {
        let Some(view) = self.pick("remove", info)?.and_then(|i| views.get(i)) else {
            return Ok(false);
        };

        let change = self.favorites.remove(&view.url);
        match change {
            Change::Persisted => self.ui.success("Removed from favorites")?,
            Change::MemoryOnly => self
                .ui
                .warning("Removed for this session, but the favorites file could not be written")?,
            Change::Unchanged => self.ui.warning("Article is not in favorites")?,
        }

        self.ui.press_enter()?;
        Ok(change.applied())
    }

    /// Returns whether the favorites were cleared.
    fn clear_favorites(&mut self) -> Result<bool> {
        let prompt = format!("Remove all {} favorites?", self.favorites.count());
        if !self.ui.confirm(&prompt)? {
            return Ok(false);
        }

        if self.favorites.clear().is_persisted() {
            self.ui.success("All favorites removed")?;
        } else {
            self.ui
                .warning("Favorites cleared for this session, but the favorites file could not be written")?;
        }

        self.ui.press_enter()?;
        Ok(true)
    }
}
