use mitai_api::{CoverImage, Media, MediaTitle};
use serde::{Deserialize, Serialize};

/// A saved watchlist item. Serialized field names follow the catalog's
/// (`coverImage`), so stored lists stay readable by other clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub id: u64,
    #[serde(default)]
    pub title: Option<MediaTitle>,
    #[serde(default)]
    pub cover_image: Option<CoverImage>,
}

impl WatchlistEntry {
    pub fn display_title(&self) -> &str {
        MediaTitle::resolve(self.title.as_ref())
    }

    pub fn cover_url(&self) -> &str {
        self.cover_image
            .as_ref()
            .and_then(|c| c.large.as_deref())
            .unwrap_or_default()
    }
}

impl From<&Media> for WatchlistEntry {
    fn from(media: &Media) -> Self {
        Self {
            id: media.id,
            title: media.title.clone(),
            cover_image: media.cover_image.clone(),
        }
    }
}
