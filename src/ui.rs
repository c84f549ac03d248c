// UI layer: renders tables and panels into an owned writer and collects
// input through `dialoguer` prompts. Nothing here talks to the network or
// touches the favorites file; the app module does that and hands the results
// over.

use crate::api::{Category, Source};
use crate::article::{highlight_keywords, ArticleView};
use crate::paginator::PageInfo;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::{style, Color, Stylize};
use crossterm::terminal::{Clear, ClearType};
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal, Stdout, Write};
use std::time::Duration;

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<Rgb> for Color {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        Color::Rgb { r, g, b }
    }
}

/// Color scheme. With `color` off, text is written unstyled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub color: bool,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub success: Rgb,
    pub warning: Rgb,
    pub error: Rgb,
    pub info: Rgb,
    pub title: Rgb,
    pub text: Rgb,
    pub dim: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            color: true,
            primary: Rgb(0x00, 0xd4, 0xff),
            secondary: Rgb(0xff, 0x00, 0xff),
            success: Rgb(0x00, 0xff, 0x00),
            warning: Rgb(0xff, 0xaa, 0x00),
            error: Rgb(0xff, 0x00, 0x00),
            info: Rgb(0x00, 0xaa, 0xff),
            title: Rgb(0xff, 0xff, 0xff),
            text: Rgb(0xcc, 0xcc, 0xcc),
            dim: Rgb(0x66, 0x66, 0x66),
        }
    }
}

impl Theme {
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::default()
        }
    }

    fn paint(&self, text: &str, color: Rgb) -> String {
        if !self.color {
            return text.to_string();
        }
        style(text).with(color.into()).to_string()
    }

    fn bold(&self, text: &str, color: Rgb) -> String {
        if !self.color {
            return text.to_string();
        }
        style(text).with(color.into()).bold().to_string()
    }
}

/// Entries of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    TopHeadlines,
    Search,
    Category,
    Source,
    Favorites,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::TopHeadlines,
        MenuChoice::Search,
        MenuChoice::Category,
        MenuChoice::Source,
        MenuChoice::Favorites,
        MenuChoice::Exit,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MenuChoice::TopHeadlines => "1",
            MenuChoice::Search => "2",
            MenuChoice::Category => "3",
            MenuChoice::Source => "4",
            MenuChoice::Favorites => "5",
            MenuChoice::Exit => "0",
        }
    }

    fn label(self) -> &'static str {
        match self {
            MenuChoice::TopHeadlines => "Top Headlines",
            MenuChoice::Search => "Search News",
            MenuChoice::Category => "Browse by Category",
            MenuChoice::Source => "Browse by Source",
            MenuChoice::Favorites => "My Favorites",
            MenuChoice::Exit => "Exit",
        }
    }

    fn description(self, favorites_count: usize) -> String {
        match self {
            MenuChoice::TopHeadlines => "View latest breaking news".to_string(),
            MenuChoice::Search => "Search by keywords".to_string(),
            MenuChoice::Category => "Filter news by topic".to_string(),
            MenuChoice::Source => "View news from specific sources".to_string(),
            MenuChoice::Favorites => format!("View saved articles ({favorites_count})"),
            MenuChoice::Exit => "Quit application".to_string(),
        }
    }

    pub fn from_key(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL.into_iter().find(|c| c.key() == input)
    }
}

/// Whether a paginated list shows search results or saved favorites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Browse,
    Favorites,
}

/// Commands available below a page of articles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Previous,
    Next,
    First,
    Last,
    View,
    Save,
    Remove,
    Clear,
    Open,
    Back,
}

impl PageAction {
    pub fn key(self) -> char {
        match self {
            PageAction::Previous => 'p',
            PageAction::Next => 'n',
            PageAction::First => 'f',
            PageAction::Last => 'l',
            PageAction::View => 'v',
            PageAction::Save => 's',
            PageAction::Remove => 'r',
            PageAction::Clear => 'c',
            PageAction::Open => 'o',
            PageAction::Back => 'b',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PageAction::Previous => "Previous Page",
            PageAction::Next => "Next Page",
            PageAction::First => "First Page",
            PageAction::Last => "Last Page",
            PageAction::View => "View Article Details",
            PageAction::Save => "Save to Favorites",
            PageAction::Remove => "Remove from Favorites",
            PageAction::Clear => "Clear All Favorites",
            PageAction::Open => "Open in Browser",
            PageAction::Back => "Back to Menu",
        }
    }

    /// Match `input` against the allowed actions, ignoring case.
    pub fn parse(input: &str, allowed: &[PageAction]) -> Option<Self> {
        let mut chars = input.trim().chars();
        let key = chars.next()?.to_ascii_lowercase();
        if chars.next().is_some() {
            return None;
        }
        allowed.iter().copied().find(|a| a.key() == key)
    }
}

/// Actions offered for a page, in display order.
pub fn page_actions(info: &PageInfo, mode: ViewMode) -> Vec<PageAction> {
    let mut actions = Vec::new();

    if info.has_prev {
        actions.push(PageAction::Previous);
    }
    if info.has_next {
        actions.push(PageAction::Next);
    }
    if info.total_pages > 1 {
        actions.extend([PageAction::First, PageAction::Last]);
    }

    actions.push(PageAction::View);
    match mode {
        ViewMode::Browse => actions.push(PageAction::Save),
        ViewMode::Favorites => actions.extend([PageAction::Remove, PageAction::Clear]),
    }
    actions.extend([PageAction::Open, PageAction::Back]);

    actions
}

/// Result of reading a number from the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberInput {
    Cancel,
    Value(usize),
    Invalid(String),
}

/// Parse a number in `min..=max`. Empty, `q` or `cancel` cancels.
pub fn parse_number(input: &str, min: usize, max: usize) -> NumberInput {
    let input = input.trim();
    if input.is_empty() || matches!(input.to_lowercase().as_str(), "q" | "quit" | "cancel") {
        return NumberInput::Cancel;
    }

    match input.parse::<usize>() {
        Ok(value) if value < min => NumberInput::Invalid(format!("Value must be at least {min}")),
        Ok(value) if value > max => NumberInput::Invalid(format!("Value must be at most {max}")),
        Ok(value) => NumberInput::Value(value),
        Err(_) => NumberInput::Invalid("Please enter a valid number".to_string()),
    }
}

/// Terminal presentation context.
///
/// Owns the output it renders to, so callers pass it around explicitly.
pub struct Ui<W: Write> {
    out: W,
    theme: Theme,
}

impl Ui<Stdout> {
    /// Render to stdout, with colors when it is a terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let theme = if out.is_terminal() {
            Theme::default()
        } else {
            Theme::plain()
        };
        Ui::new(out, theme)
    }
}

impl<W: Write> Ui<W> {
    pub fn new(out: W, theme: Theme) -> Self {
        Ui { out, theme }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn clear(&mut self) -> io::Result<()> {
        if self.theme.color {
            execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }

    pub fn header(&mut self) -> io::Result<()> {
        let t = &self.theme;
        let rule = t.paint(&"═".repeat(44), t.primary);

        writeln!(self.out, "{rule}")?;
        writeln!(
            self.out,
            "  {}{}",
            t.bold("█▀▀▄ █▀▀ █   █ █▀▀   ", t.primary),
            t.bold("█▀▀▄ █▀▀█ █▀▀ █▀▀█", t.secondary)
        )?;
        writeln!(
            self.out,
            "  {}{}",
            t.bold("█  █ █▀▀ █▄█ ▀▀▀   ", t.primary),
            t.bold("█▄▄▀ █  █ ▀▀▀ █  █", t.secondary)
        )?;
        writeln!(self.out, "      {}", t.paint("Your Gateway to Global News", t.dim))?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out)
    }

    /// Section heading above a list.
    pub fn heading(&mut self, title: &str) -> io::Result<()> {
        let title = self.theme.bold(title, self.theme.info);
        writeln!(self.out, "{title}")
    }

    fn menu_table(&mut self, favorites_count: usize) -> io::Result<()> {
        let t = &self.theme;
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![
            t.bold("Option", t.primary),
            t.bold("Action", t.primary),
            t.bold("Description", t.primary),
        ]);

        for choice in MenuChoice::ALL {
            table.add_row(vec![
                t.bold(choice.key(), t.warning),
                t.bold(choice.label(), t.title),
                t.paint(&choice.description(favorites_count), t.text),
            ]);
        }

        writeln!(self.out, "{}", self.theme.bold("Main Menu", self.theme.primary))?;
        writeln!(self.out, "{table}")
    }

    pub fn main_menu(&mut self, favorites_count: usize) -> io::Result<MenuChoice> {
        self.menu_table(favorites_count)?;
        self.out.flush()?;

        let input: String = Input::new()
            .with_prompt("Enter your choice")
            .default(MenuChoice::TopHeadlines.key().to_string())
            .validate_with(|input: &String| -> Result<(), String> {
                MenuChoice::from_key(input)
                    .map(|_| ())
                    .ok_or_else(|| "Choose one of 0-5".to_string())
            })
            .interact_text()?;

        Ok(MenuChoice::from_key(&input).unwrap_or(MenuChoice::TopHeadlines))
    }

    /// Render one page of articles. Titles have `keywords` highlighted.
    pub fn articles_table<S: AsRef<str>>(
        &mut self,
        articles: &[ArticleView],
        info: &PageInfo,
        keywords: &[S],
    ) -> io::Result<()> {
        if articles.is_empty() {
            return self.info("No articles found");
        }

        let t = &self.theme;
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                t.bold("#", t.primary),
                t.bold("Title", t.primary),
                t.bold("Source", t.primary),
                t.bold("Published", t.primary),
            ]);

        for article in articles {
            let title: String = highlight_keywords(&article.title, keywords)
                .iter()
                .map(|fragment| {
                    if fragment.highlighted {
                        t.bold(&fragment.text, t.warning)
                    } else {
                        t.bold(&fragment.text, t.title)
                    }
                })
                .collect();

            table.add_row(vec![
                t.bold(&article.index.to_string(), t.warning),
                title,
                t.paint(&article.source, t.info),
                t.paint(&article.published, t.text),
            ]);
        }

        let page = format!("Page {}/{}", info.current_page, info.total_pages);
        let caption = format!(
            "Showing {}-{} of {} articles",
            info.start_index, info.end_index, info.total_items
        );

        writeln!(self.out, "{}", t.bold(&page, t.info))?;
        writeln!(self.out, "{table}")?;
        writeln!(self.out, "{}", t.paint(&caption, t.dim))?;
        writeln!(self.out)
    }

    pub fn article_detail(&mut self, article: &ArticleView, is_favorite: bool) -> io::Result<()> {
        let t = &self.theme;
        let label = |name: &str, color: Rgb| t.bold(name, color);

        writeln!(self.out, "{}", t.bold("Article Details", t.primary))?;
        writeln!(self.out, "{}", t.paint(&"─".repeat(44), t.primary))?;
        writeln!(self.out, "{} {}", label("Title:", t.primary), t.bold(&article.title, t.title))?;
        writeln!(self.out)?;
        writeln!(self.out, "{} {}", label("Source:", t.info), t.paint(&article.source, t.text))?;
        writeln!(self.out, "{} {}", label("Author:", t.info), t.paint(&article.author, t.text))?;
        writeln!(
            self.out,
            "{} {}",
            label("Published:", t.info),
            t.paint(&article.published, t.text)
        )?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", label("Description:", t.primary))?;
        writeln!(self.out, "{}", t.paint(&article.description, t.text))?;
        writeln!(self.out)?;
        writeln!(self.out, "{} {}", label("URL:", t.info), t.paint(&article.url, t.secondary))?;

        if is_favorite {
            writeln!(self.out)?;
            writeln!(
                self.out,
                "{}{}",
                t.bold("★ ", t.warning),
                t.bold("Saved in Favorites", t.success)
            )?;
        }

        writeln!(self.out)
    }

    /// Pick a category, `None` on escape.
    pub fn choose_category(&mut self) -> io::Result<Option<Category>> {
        let t = &self.theme;
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![
            t.bold("Category", t.primary),
            t.bold("Description", t.primary),
        ]);
        for category in Category::ALL {
            table.add_row(vec![
                t.bold(category.title(), t.title),
                t.paint(category.description(), t.text),
            ]);
        }
        writeln!(self.out, "{}", t.bold("Select Category", t.primary))?;
        writeln!(self.out, "{table}")?;
        self.out.flush()?;

        let items: Vec<&str> = Category::ALL.iter().map(|c| c.title()).collect();
        let selection = Select::new()
            .with_prompt("Select category")
            .items(&items)
            .default(0)
            .interact_opt()?;

        Ok(selection.map(|i| Category::ALL[i]))
    }

    /// Pick a source, `None` on escape.
    pub fn choose_source<'a>(&mut self, sources: &'a [Source]) -> io::Result<Option<&'a Source>> {
        self.info(&format!("Found {} sources", sources.len()))?;
        self.out.flush()?;

        let items: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        let selection = Select::new()
            .with_prompt("Select source")
            .items(&items)
            .default(0)
            .interact_opt()?;

        Ok(selection.and_then(|i| sources.get(i)))
    }

    /// Search keywords, `None` if left empty.
    pub fn search_query(&mut self) -> io::Result<Option<String>> {
        self.out.flush()?;
        let query: String = Input::new()
            .with_prompt("Enter search keywords")
            .allow_empty(true)
            .interact_text()?;

        let query = query.trim();
        Ok((!query.is_empty()).then(|| query.to_string()))
    }

    fn page_menu(&mut self, actions: &[PageAction]) -> io::Result<()> {
        let t = &self.theme;
        let line = actions
            .iter()
            .map(|a| format!("{}: {}", t.bold(&a.key().to_string(), t.warning), a.label()))
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(self.out, "{line}")
    }

    pub fn page_action(&mut self, info: &PageInfo, mode: ViewMode) -> io::Result<PageAction> {
        let actions = page_actions(info, mode);
        self.page_menu(&actions)?;
        self.out.flush()?;

        let allowed = actions.clone();
        let input: String = Input::new()
            .with_prompt("Choose action")
            .validate_with(move |input: &String| -> Result<(), String> {
                PageAction::parse(input, &allowed)
                    .map(|_| ())
                    .ok_or_else(|| "Not an available action".to_string())
            })
            .interact_text()?;

        Ok(PageAction::parse(&input, &actions).unwrap_or(PageAction::Back))
    }

    /// Ask for a number in `min..=max`, `None` if cancelled.
    pub fn number_input(&mut self, prompt: &str, min: usize, max: usize) -> io::Result<Option<usize>> {
        loop {
            self.out.flush()?;
            let input: String = Input::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?;

            match parse_number(&input, min, max) {
                NumberInput::Cancel => return Ok(None),
                NumberInput::Value(value) => return Ok(Some(value)),
                NumberInput::Invalid(msg) => self.error(&msg)?,
            }
        }
    }

    pub fn confirm(&mut self, message: &str) -> io::Result<bool> {
        self.out.flush()?;
        Confirm::new().with_prompt(message).default(false).interact()
    }

    pub fn press_enter(&mut self) -> io::Result<()> {
        self.out.flush()?;
        let _: String = Input::new()
            .with_prompt("Press Enter to continue")
            .allow_empty(true)
            .interact_text()?;
        Ok(())
    }

    /// Run `f` behind a spinner.
    pub fn with_spinner<T>(&self, message: &str, f: impl FnOnce() -> T) -> T {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("{message}..."));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = f();
        spinner.finish_and_clear();
        result
    }

    pub fn success(&mut self, message: &str) -> io::Result<()> {
        let line = self.theme.bold(&format!("✓ {message}"), self.theme.success);
        writeln!(self.out, "{line}")
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        let line = self.theme.bold(&format!("✗ {message}"), self.theme.error);
        writeln!(self.out, "{line}")
    }

    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        let line = self.theme.bold(&format!("⚠ {message}"), self.theme.warning);
        writeln!(self.out, "{line}")
    }

    pub fn info(&mut self, message: &str) -> io::Result<()> {
        let line = self.theme.paint(&format!("ℹ {message}"), self.theme.info);
        writeln!(self.out, "{line}")
    }

    pub fn goodbye(&mut self) -> io::Result<()> {
        let t = &self.theme;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}{}{}",
            t.paint("✨ ", t.warning),
            t.bold("Thank you for using News Dashboard!", t.primary),
            t.paint(" ✨", t.warning)
        )?;
        writeln!(self.out, "{}", t.paint("Stay informed, stay curious!", t.text))?;
        self.out.flush()
    }
}

/// Open `url` in the default browser.
pub fn open_url(url: &str) -> bool {
    match open::that(url) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(%url, "Failed to open browser: {e}");
            false
        }
    }
}
