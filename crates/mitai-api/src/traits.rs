//! Catalog-agnostic types and the [`Catalog`] trait.
//!
//! Every media field except the id is optional: the catalog is free to
//! omit anything, and callers decide how an absent value is displayed.

use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A searchable anime catalog.
pub trait Catalog: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch one page of anime matching the query, sorted by popularity.
    fn search_page(
        &self,
        query: &PageQuery,
    ) -> impl Future<Output = Result<CatalogPage, Self::Error>> + Send;
}

/// Variables of a paged catalog search.
///
/// Serializes to the GraphQL variables object; unset filters are sent as
/// explicit `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
    pub season: Option<MediaSeason>,
    pub format: Option<MediaFormat>,
}

/// One page of catalog results.
#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    pub current_page: Option<u32>,
    pub has_next_page: bool,
    pub media: Vec<Media>,
}

/// A catalog media entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: u64,
    #[serde(default)]
    pub title: Option<MediaTitle>,
    #[serde(default)]
    pub cover_image: Option<CoverImage>,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub season_year: Option<u32>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub average_score: Option<u32>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub trailer: Option<Trailer>,
    #[serde(default)]
    pub site_url: Option<String>,
}

impl Media {
    /// Display title, see [`MediaTitle::resolve`].
    pub fn display_title(&self) -> &str {
        MediaTitle::resolve(self.title.as_ref())
    }

    /// Large cover URL, or `""` when the catalog has none.
    pub fn cover_url(&self) -> &str {
        self.cover_image
            .as_ref()
            .and_then(|c| c.large.as_deref())
            .unwrap_or_default()
    }

    pub fn genres(&self) -> &[String] {
        self.genres.as_deref().unwrap_or_default()
    }
}

/// A title with language variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTitle {
    #[serde(default)]
    pub romaji: Option<String>,
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub native: Option<String>,
}

impl MediaTitle {
    pub const FALLBACK: &'static str = "Untitled";

    /// Returns the display title: English, then romaji, then native, then
    /// [`Self::FALLBACK`]. Empty strings count as absent.
    pub fn display(&self) -> &str {
        [&self.english, &self.romaji, &self.native]
            .into_iter()
            .filter_map(|t| t.as_deref())
            .find(|t| !t.is_empty())
            .unwrap_or(Self::FALLBACK)
    }

    /// Same as [`Self::display`], for a title the catalog may have omitted.
    pub fn resolve(title: Option<&MediaTitle>) -> &str {
        title.map_or(Self::FALLBACK, MediaTitle::display)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Anime season (quarter of the year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaSeason {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl MediaSeason {
    pub const ALL: &[MediaSeason] = &[Self::Winter, Self::Spring, Self::Summer, Self::Fall];

    /// GraphQL `MediaSeason` enum value.
    pub fn as_anilist_str(self) -> &'static str {
        match self {
            Self::Winter => "WINTER",
            Self::Spring => "SPRING",
            Self::Summer => "SUMMER",
            Self::Fall => "FALL",
        }
    }
}

impl std::fmt::Display for MediaSeason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Winter => write!(f, "Winter"),
            Self::Spring => write!(f, "Spring"),
            Self::Summer => write!(f, "Summer"),
            Self::Fall => write!(f, "Fall"),
        }
    }
}

impl FromStr for MediaSeason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|season| season.as_anilist_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown season '{s}' (expected winter, spring, summer or fall)"))
    }
}

/// Media format filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaFormat {
    Tv,
    TvShort,
    Movie,
    Special,
    Ova,
    Ona,
    Music,
}

impl MediaFormat {
    pub const ALL: &[MediaFormat] = &[
        Self::Tv,
        Self::TvShort,
        Self::Movie,
        Self::Special,
        Self::Ova,
        Self::Ona,
        Self::Music,
    ];

    /// GraphQL `MediaFormat` enum value.
    pub fn as_anilist_str(self) -> &'static str {
        match self {
            Self::Tv => "TV",
            Self::TvShort => "TV_SHORT",
            Self::Movie => "MOVIE",
            Self::Special => "SPECIAL",
            Self::Ova => "OVA",
            Self::Ona => "ONA",
            Self::Music => "MUSIC",
        }
    }
}

impl std::fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tv => write!(f, "TV"),
            Self::TvShort => write!(f, "TV Short"),
            Self::Movie => write!(f, "Movie"),
            Self::Special => write!(f, "Special"),
            Self::Ova => write!(f, "OVA"),
            Self::Ona => write!(f, "ONA"),
            Self::Music => write!(f, "Music"),
        }
    }
}

impl FromStr for MediaFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace([' ', '-'], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.as_anilist_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown format '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(english: Option<&str>, romaji: Option<&str>, native: Option<&str>) -> MediaTitle {
        MediaTitle {
            english: english.map(Into::into),
            romaji: romaji.map(Into::into),
            native: native.map(Into::into),
        }
    }

    #[test]
    fn test_title_prefers_english() {
        let t = title(Some("Frieren"), Some("Sousou no Frieren"), Some("葬送のフリーレン"));
        assert_eq!(t.display(), "Frieren");
    }

    #[test]
    fn test_title_falls_back_in_order() {
        assert_eq!(title(None, Some("Romaji"), Some("Native")).display(), "Romaji");
        assert_eq!(title(None, None, Some("Native")).display(), "Native");
        assert_eq!(title(None, None, None).display(), "Untitled");
        assert_eq!(MediaTitle::resolve(None), "Untitled");
    }

    #[test]
    fn test_title_skips_empty_strings() {
        assert_eq!(title(Some(""), Some("Romaji"), None).display(), "Romaji");
        assert_eq!(title(Some(""), Some(""), Some("")).display(), "Untitled");
    }

    #[test]
    fn test_page_query_sends_explicit_nulls() {
        let query = PageQuery {
            page: 1,
            per_page: 18,
            search: None,
            season: None,
            format: None,
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "page": 1,
                "perPage": 18,
                "search": null,
                "season": null,
                "format": null,
            })
        );
    }

    #[test]
    fn test_page_query_filters_use_graphql_enum_names() {
        let query = PageQuery {
            page: 2,
            per_page: 18,
            search: Some("frieren".into()),
            season: Some(MediaSeason::Fall),
            format: Some(MediaFormat::TvShort),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["season"], "FALL");
        assert_eq!(json["format"], "TV_SHORT");
        assert_eq!(json["search"], "frieren");
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!("winter".parse::<MediaSeason>(), Ok(MediaSeason::Winter));
        assert_eq!("FALL".parse::<MediaSeason>(), Ok(MediaSeason::Fall));
        assert!("autumn".parse::<MediaSeason>().is_err());

        assert_eq!("tv".parse::<MediaFormat>(), Ok(MediaFormat::Tv));
        assert_eq!("tv short".parse::<MediaFormat>(), Ok(MediaFormat::TvShort));
        assert_eq!("ova".parse::<MediaFormat>(), Ok(MediaFormat::Ova));
        assert!("manga".parse::<MediaFormat>().is_err());
    }

    #[test]
    fn test_media_accessors_degrade_when_absent() {
        let media: Media = serde_json::from_str(r#"{ "id": 7 }"#).unwrap();
        assert_eq!(media.display_title(), "Untitled");
        assert_eq!(media.cover_url(), "");
        assert!(media.genres().is_empty());
    }
}
