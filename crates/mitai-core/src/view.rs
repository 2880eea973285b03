//! Renderer-independent view model.
//!
//! The controller keeps a [`Screen`] up to date; frontends only draw it.
//! Absent catalog fields render as empty strings or omitted badges.

use mitai_api::Media;

use crate::links;
use crate::models::WatchlistEntry;

pub const PLACEHOLDER_TITLE: &str = "Loading…";
pub const PLACEHOLDER_META: &str = "Please wait";
pub const EMPTY_WATCHLIST: &str = "Your watchlist is empty.";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const NO_TRAILER: &str = "No official trailer available";

/// Genres shown on a result card.
const CARD_GENRES: usize = 3;

/// Which top-level view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Watchlist,
}

/// Everything a frontend needs to draw.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Screen {
    pub view: View,
    pub pager: Pager,
    pub results: ResultsArea,
    pub details: Option<DetailsModal>,
    pub player: Option<PlayerOverlay>,
}

/// Page indicator and previous/next controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub label: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            label: "Page 1".into(),
            prev_enabled: false,
            next_enabled: false,
        }
    }
}

/// Contents of the results container.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsArea {
    /// Nothing rendered yet.
    #[default]
    Empty,
    /// `n` loading cards while a search is in flight.
    Placeholders(usize),
    Cards(Vec<MediaCard>),
    Watchlist(Vec<WatchlistCard>),
    /// A single inline message replacing the results.
    Notice(String),
}

/// A search result card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCard {
    pub id: u64,
    pub title: String,
    pub cover_url: String,
    pub meta: String,
    pub genres: String,
    pub where_to_watch: String,
}

impl MediaCard {
    pub fn from_media(media: &Media) -> Self {
        let title = media.display_title().to_string();
        Self {
            id: media.id,
            cover_url: media.cover_url().to_string(),
            meta: meta_line(media),
            genres: media
                .genres()
                .iter()
                .take(CARD_GENRES)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" • "),
            where_to_watch: links::where_to_watch(&title),
            title,
        }
    }
}

/// A saved watchlist card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistCard {
    pub id: u64,
    pub title: String,
    pub cover_url: String,
    pub catalog_url: String,
}

impl WatchlistCard {
    pub fn from_entry(entry: &WatchlistEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.display_title().to_string(),
            cover_url: entry.cover_url().to_string(),
            catalog_url: links::catalog_page(entry.id),
        }
    }
}

/// Trailer slot of the details modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailerView {
    Embed(String),
    Unavailable,
}

/// The details overlay for one media item.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsModal {
    pub media: Media,
    pub title: String,
    pub cover_url: String,
    /// Score, status and episode badges, each only when known.
    pub badges: Vec<String>,
    pub genres: Vec<String>,
    pub description: String,
    pub trailer: TrailerView,
    pub site_url: Option<String>,
    pub where_to_watch: String,
}

impl DetailsModal {
    pub fn from_media(media: &Media) -> Self {
        let title = media.display_title().to_string();

        let mut badges = Vec::new();
        if let Some(score) = media.average_score.filter(|s| *s > 0) {
            badges.push(format!("Score: {score}"));
        }
        if let Some(status) = media.status.as_deref().filter(|s| !s.is_empty()) {
            badges.push(format!("Status: {status}"));
        }
        if let Some(episodes) = media.episodes.filter(|e| *e > 0) {
            badges.push(format!("Episodes: {episodes}"));
        }

        let trailer = media
            .trailer
            .as_ref()
            .and_then(links::trailer_embed)
            .map_or(TrailerView::Unavailable, TrailerView::Embed);

        Self {
            media: media.clone(),
            cover_url: media.cover_url().to_string(),
            badges,
            genres: media.genres().to_vec(),
            description: media
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            trailer,
            site_url: media.site_url.clone().filter(|u| !u.is_empty()),
            where_to_watch: links::where_to_watch(&title),
            title,
        }
    }
}

/// Inert "official player" overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerOverlay {
    pub title: String,
}

impl PlayerOverlay {
    pub fn for_title(title: &str) -> Self {
        Self {
            title: format!("{title} • Official Player"),
        }
    }
}

/// `"FALL 2023 • TV • 28 ep"`, skipping whatever is unknown.
pub fn meta_line(media: &Media) -> String {
    let when = [
        media.season.clone().filter(|s| !s.is_empty()),
        media.season_year.map(|y| y.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    [
        Some(when).filter(|w| !w.is_empty()),
        media.format.clone().filter(|f| !f.is_empty()),
        media.episodes.filter(|e| *e > 0).map(|e| format!("{e} ep")),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" • ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frieren() -> Media {
        serde_json::from_value(serde_json::json!({
            "id": 154587,
            "title": { "romaji": "Sousou no Frieren", "english": "Frieren", "native": null },
            "coverImage": { "large": "https://img.example/frieren.jpg", "color": null },
            "season": "FALL",
            "seasonYear": 2023,
            "format": "TV",
            "episodes": 28,
            "status": "FINISHED",
            "averageScore": 90,
            "genres": ["Adventure", "Drama", "Fantasy", "Slice of Life"],
            "description": "After the party defeats the Demon King...",
            "trailer": { "id": "qgQRdK0-aIo", "site": "youtube", "thumbnail": null },
            "siteUrl": "https://anilist.co/anime/154587"
        }))
        .unwrap()
    }

    fn bare(id: u64) -> Media {
        serde_json::from_value(serde_json::json!({ "id": id })).unwrap()
    }

    #[test]
    fn test_card_from_full_media() {
        let card = MediaCard::from_media(&frieren());
        assert_eq!(card.title, "Frieren");
        assert_eq!(card.meta, "FALL 2023 • TV • 28 ep");
        assert_eq!(card.genres, "Adventure • Drama • Fantasy");
        assert_eq!(card.cover_url, "https://img.example/frieren.jpg");
        assert_eq!(card.where_to_watch, links::where_to_watch("Frieren"));
    }

    #[test]
    fn test_card_from_bare_media() {
        let card = MediaCard::from_media(&bare(1));
        assert_eq!(card.title, "Untitled");
        assert_eq!(card.meta, "");
        assert_eq!(card.genres, "");
        assert_eq!(card.cover_url, "");
    }

    #[test]
    fn test_meta_line_partial() {
        let mut media = bare(2);
        media.season_year = Some(2024);
        media.episodes = Some(12);
        assert_eq!(meta_line(&media), "2024 • 12 ep");

        media.episodes = Some(0);
        assert_eq!(meta_line(&media), "2024");
    }

    #[test]
    fn test_details_with_youtube_trailer() {
        let modal = DetailsModal::from_media(&frieren());
        assert_eq!(modal.title, "Frieren");
        assert_eq!(
            modal.badges,
            vec!["Score: 90", "Status: FINISHED", "Episodes: 28"]
        );
        assert_eq!(modal.genres.len(), 4);
        assert_eq!(
            modal.trailer,
            TrailerView::Embed("https://www.youtube.com/embed/qgQRdK0-aIo".into())
        );
        assert_eq!(
            modal.site_url.as_deref(),
            Some("https://anilist.co/anime/154587")
        );
    }

    #[test]
    fn test_details_degrade_when_absent() {
        let modal = DetailsModal::from_media(&bare(3));
        assert_eq!(modal.title, "Untitled");
        assert!(modal.badges.is_empty());
        assert!(modal.genres.is_empty());
        assert_eq!(modal.description, NO_DESCRIPTION);
        assert_eq!(modal.trailer, TrailerView::Unavailable);
        assert_eq!(modal.site_url, None);
    }

    #[test]
    fn test_details_non_youtube_trailer_unavailable() {
        let mut media = frieren();
        media.trailer.as_mut().unwrap().site = Some("dailymotion".into());
        assert_eq!(
            DetailsModal::from_media(&media).trailer,
            TrailerView::Unavailable
        );
    }

    #[test]
    fn test_watchlist_card_links_to_catalog() {
        let entry = WatchlistEntry::from(&frieren());
        let card = WatchlistCard::from_entry(&entry);
        assert_eq!(card.title, "Frieren");
        assert_eq!(card.catalog_url, "https://anilist.co/anime/154587");
    }

    #[test]
    fn test_player_overlay_title() {
        assert_eq!(
            PlayerOverlay::for_title("Frieren").title,
            "Frieren • Official Player"
        );
    }
}
