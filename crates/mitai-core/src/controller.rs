//! Search, pagination and watchlist controller.
//!
//! The controller owns all mutable UI state. Frontends translate user
//! input into [`Message`]s, feed them to [`Controller::update`], execute the
//! returned [`Effect`]s, and draw [`Controller::screen`].
//!
//! Every catalog request carries a generation number. Only the response to
//! the most recently issued request is applied; anything older is dropped,
//! so a slow response can never overwrite a newer result set.

use mitai_api::{CatalogPage, Media, MediaFormat, MediaSeason, PageQuery};

use crate::config::AppConfig;
use crate::storage::KeyValueStore;
use crate::view::{
    DetailsModal, MediaCard, Pager, PlayerOverlay, ResultsArea, Screen, View, WatchlistCard,
    EMPTY_WATCHLIST,
};
use crate::watchlist::Watchlist;

/// User-editable search inputs, captured into [`SearchState`] on search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub query: String,
    pub season: Option<MediaSeason>,
    pub format: Option<MediaFormat>,
}

/// State of the current search.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Always at least 1.
    pub page: u32,
    pub per_page: u32,
    pub query: String,
    pub season: Option<MediaSeason>,
    pub format: Option<MediaFormat>,
    pub results: Vec<Media>,
    /// Only meaningful for the most recently applied response.
    pub has_next_page: bool,
    pub view: View,
}

impl SearchState {
    fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            query: String::new(),
            season: None,
            format: None,
            results: Vec::new(),
            has_next_page: false,
            view: View::Home,
        }
    }

    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
            search: Some(self.query.clone()).filter(|q| !q.is_empty()),
            season: self.season,
            format: self.format,
        }
    }
}

/// User actions.
#[derive(Debug, Clone)]
pub enum Message {
    /// The search box text changed; does not search by itself.
    QueryInput(String),
    SubmitSearch,
    SeasonSelected(Option<MediaSeason>),
    FormatSelected(Option<MediaFormat>),
    PrevPage,
    NextPage,
    ShowHome,
    ShowWatchlist,
    /// Open the details overlay for a result card (0-based).
    OpenDetails(usize),
    CloseDetails,
    OpenPlayer,
    ClosePlayer,
    AddToWatchlist(usize),
    AddDetailsToWatchlist,
    WhereToWatch(usize),
    WhereToWatchDetails,
    OpenDetailsSitePage,
    OpenWatchlistEntry(u64),
    RemoveFromWatchlist(u64),
    SearchCompleted {
        generation: u64,
        result: Result<CatalogPage, String>,
    },
}

/// Side effects for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the catalog query and answer with [`Message::SearchCompleted`].
    Fetch { generation: u64, query: PageQuery },
    /// Blocking acknowledgement for the user.
    Notify(String),
    OpenUrl(String),
}

pub struct Controller<S> {
    form: SearchForm,
    state: SearchState,
    screen: Screen,
    watchlist: Watchlist<S>,
    placeholder_cards: usize,
    generation: u64,
}

impl<S: KeyValueStore> Controller<S> {
    pub fn new(watchlist: Watchlist<S>, config: &AppConfig) -> Self {
        Self {
            form: SearchForm::default(),
            state: SearchState::new(config.catalog.per_page),
            screen: Screen::default(),
            watchlist,
            placeholder_cards: config.ui.placeholder_cards,
            generation: 0,
        }
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn watchlist(&self) -> &Watchlist<S> {
        &self.watchlist
    }

    /// Initial search on launch, optionally pre-filled.
    pub fn start(&mut self, initial: SearchForm) -> Vec<Effect> {
        tracing::info!(query = %initial.query, "starting");
        self.form = initial;
        self.search(true)
    }

    /// Dispatch one user action.
    pub fn update(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::QueryInput(text) => {
                self.form.query = text;
                Vec::new()
            }
            Message::SubmitSearch => self.search(true),
            Message::SeasonSelected(season) => {
                self.form.season = season;
                self.search(true)
            }
            Message::FormatSelected(format) => {
                self.form.format = format;
                self.search(true)
            }
            Message::PrevPage if self.screen.pager.prev_enabled => self.change_page(-1),
            Message::NextPage if self.screen.pager.next_enabled => self.change_page(1),
            Message::PrevPage | Message::NextPage => {
                tracing::debug!("page control disabled, ignoring");
                Vec::new()
            }
            Message::ShowHome => self.show_home(),
            Message::ShowWatchlist => {
                self.show_watchlist();
                Vec::new()
            }
            Message::OpenDetails(index) => {
                if let Some(media) = self.card_media(index).cloned() {
                    self.open_details(&media);
                }
                Vec::new()
            }
            Message::CloseDetails => {
                self.screen.details = None;
                self.screen.player = None;
                Vec::new()
            }
            Message::OpenPlayer => {
                self.open_player();
                Vec::new()
            }
            Message::ClosePlayer => {
                self.screen.player = None;
                Vec::new()
            }
            Message::AddToWatchlist(index) => match self.card_media(index).cloned() {
                Some(media) => vec![self.add_to_watchlist(&media)],
                None => Vec::new(),
            },
            Message::AddDetailsToWatchlist => match self.screen.details.as_ref() {
                Some(modal) => {
                    let media = modal.media.clone();
                    vec![self.add_to_watchlist(&media)]
                }
                None => Vec::new(),
            },
            Message::WhereToWatch(index) => match &self.screen.results {
                ResultsArea::Cards(cards) => cards
                    .get(index)
                    .map(|card| Effect::OpenUrl(card.where_to_watch.clone()))
                    .into_iter()
                    .collect(),
                _ => Vec::new(),
            },
            Message::WhereToWatchDetails => self
                .screen
                .details
                .as_ref()
                .map(|d| Effect::OpenUrl(d.where_to_watch.clone()))
                .into_iter()
                .collect(),
            Message::OpenDetailsSitePage => self
                .screen
                .details
                .as_ref()
                .and_then(|d| d.site_url.clone())
                .map(Effect::OpenUrl)
                .into_iter()
                .collect(),
            Message::OpenWatchlistEntry(id) => self
                .watchlist_card(id)
                .map(|c| Effect::OpenUrl(c.catalog_url.clone()))
                .into_iter()
                .collect(),
            Message::RemoveFromWatchlist(id) => {
                if self.watchlist_card(id).is_some() {
                    self.remove_from_watchlist(id)
                } else {
                    Vec::new()
                }
            }
            Message::SearchCompleted { generation, result } => {
                self.search_completed(generation, result);
                Vec::new()
            }
        }
    }

    /// Run the current search, or re-render the watchlist when it is shown.
    pub fn search(&mut self, reset_page: bool) -> Vec<Effect> {
        if self.state.view == View::Watchlist {
            self.render_watchlist();
            return Vec::new();
        }

        if reset_page {
            self.state.page = 1;
        }
        self.state.query = self.form.query.trim().to_string();
        self.state.season = self.form.season;
        self.state.format = self.form.format;

        self.screen.results = ResultsArea::Placeholders(self.placeholder_cards);

        self.generation += 1;
        let query = self.state.page_query();
        tracing::info!(
            generation = self.generation,
            page = query.page,
            search = ?query.search,
            season = ?query.season,
            format = ?query.format,
            "issuing catalog search"
        );
        vec![Effect::Fetch {
            generation: self.generation,
            query,
        }]
    }

    /// Apply a catalog response, unless a newer request has been issued since.
    pub fn search_completed(&mut self, generation: u64, result: Result<CatalogPage, String>) {
        if generation != self.generation || self.state.view != View::Home {
            tracing::debug!(
                generation,
                latest = self.generation,
                "discarding stale catalog response"
            );
            return;
        }

        match result {
            Ok(page) => {
                tracing::info!(
                    page = self.state.page,
                    results = page.media.len(),
                    has_next = page.has_next_page,
                    "catalog search completed"
                );
                self.state.results = page.media;
                self.state.has_next_page = page.has_next_page;
                self.render_results();
            }
            Err(message) => {
                tracing::warn!(error = %message, "catalog search failed");
                self.state.results.clear();
                self.state.has_next_page = false;
                self.screen.pager = self.home_pager();
                self.screen.results = ResultsArea::Notice(format!("Error: {message}"));
            }
        }
    }

    /// Move `delta` pages, never below page 1, and search again.
    pub fn change_page(&mut self, delta: i32) -> Vec<Effect> {
        self.state.page = self.state.page.saturating_add_signed(delta).max(1);
        self.search(false)
    }

    /// Rebuild the result cards from `results`, in order.
    pub fn render_results(&mut self) {
        self.screen.pager = self.home_pager();
        self.screen.results =
            ResultsArea::Cards(self.state.results.iter().map(MediaCard::from_media).collect());
    }

    pub fn open_details(&mut self, media: &Media) {
        tracing::debug!(id = media.id, "opening details");
        self.screen.details = Some(DetailsModal::from_media(media));
    }

    /// Open the placeholder player for the media in the details overlay.
    pub fn open_player(&mut self) {
        if let Some(modal) = self.screen.details.as_ref() {
            self.screen.player = Some(PlayerOverlay::for_title(&modal.title));
        }
    }

    /// Switch to the search view and re-run the current search on the same page.
    pub fn show_home(&mut self) -> Vec<Effect> {
        self.state.view = View::Home;
        self.screen.view = View::Home;
        self.search(false)
    }

    /// Switch to the watchlist view. Never touches the network; any search
    /// still in flight is abandoned.
    pub fn show_watchlist(&mut self) {
        self.state.view = View::Watchlist;
        self.screen.view = View::Watchlist;
        self.generation += 1;
        self.render_watchlist();
    }

    /// Add `media` to the watchlist. The details overlay can stay open across
    /// a view switch, so a shown watchlist is re-rendered after the write.
    pub fn add_to_watchlist(&mut self, media: &Media) -> Effect {
        let effect = match self.watchlist.add(media) {
            Ok(outcome) => Effect::Notify(outcome.message().to_string()),
            Err(e) => {
                tracing::error!(error = %e, id = media.id, "failed to save watchlist");
                Effect::Notify(format!("Could not save watchlist: {e}"))
            }
        };
        if self.state.view == View::Watchlist {
            self.render_watchlist();
        }
        effect
    }

    pub fn remove_from_watchlist(&mut self, id: u64) -> Vec<Effect> {
        let effects = match self.watchlist.remove(id) {
            Ok(()) => Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, id, "failed to save watchlist");
                vec![Effect::Notify(format!("Could not save watchlist: {e}"))]
            }
        };
        self.render_watchlist();
        effects
    }

    /// Render the stored watchlist; paging is disabled in this view.
    pub fn render_watchlist(&mut self) {
        let list = self.watchlist.list();
        self.screen.pager = Pager {
            label: format!("Watchlist ({})", list.len()),
            prev_enabled: false,
            next_enabled: false,
        };
        self.screen.results = if list.is_empty() {
            ResultsArea::Notice(EMPTY_WATCHLIST.to_string())
        } else {
            ResultsArea::Watchlist(list.iter().map(WatchlistCard::from_entry).collect())
        };
    }

    fn home_pager(&self) -> Pager {
        Pager {
            label: format!("Page {}", self.state.page),
            prev_enabled: self.state.page > 1,
            next_enabled: self.state.has_next_page,
        }
    }

    /// Media behind a result card currently on screen.
    fn card_media(&self, index: usize) -> Option<&Media> {
        match &self.screen.results {
            ResultsArea::Cards(cards) if index < cards.len() => self.state.results.get(index),
            _ => None,
        }
    }

    fn watchlist_card(&self, id: u64) -> Option<&WatchlistCard> {
        match &self.screen.results {
            ResultsArea::Watchlist(cards) => cards.iter().find(|c| c.id == id),
            _ => None,
        }
    }
}
