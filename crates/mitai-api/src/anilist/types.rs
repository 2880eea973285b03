use serde::Deserialize;

use crate::traits::{CatalogPage, Media};

// ── GraphQL response wrappers ────────────────────────────────────

/// A GraphQL response envelope. AniList returns `data: null` together
/// with an `errors` array when a query fails validation.
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
}

impl<T> GraphQLResponse<T> {
    /// Unwrap the payload, or the joined error messages when there is none.
    pub fn into_result(self) -> Result<T, String> {
        match (self.data, self.errors) {
            (Some(data), None) => Ok(data),
            (Some(data), Some(errors)) if errors.is_empty() => Ok(data),
            (_, Some(errors)) if !errors.is_empty() => Err(errors
                .into_iter()
                .map(|e| match e.status {
                    Some(status) => format!("{} ({status})", e.message),
                    None => e.message,
                })
                .collect::<Vec<_>>()
                .join("; ")),
            _ => Err("response contained no data".into()),
        }
    }
}

// ── Page query ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageResponse {
    #[serde(rename = "Page")]
    pub page: PageData,
}

#[derive(Debug, Deserialize)]
pub struct PageData {
    #[serde(rename = "pageInfo", default)]
    pub page_info: Option<PageInfo>,
    #[serde(default)]
    pub media: Option<Vec<Media>>,
}

#[derive(Debug, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "currentPage", default)]
    pub current_page: Option<u32>,
    #[serde(rename = "hasNextPage", default)]
    pub has_next_page: Option<bool>,
}

// ── Conversions ──────────────────────────────────────────────────

impl PageData {
    pub fn into_catalog_page(self) -> CatalogPage {
        let (current_page, has_next_page) = match self.page_info {
            Some(info) => (info.current_page, info.has_next_page.unwrap_or(false)),
            None => (None, false),
        };
        CatalogPage {
            current_page,
            has_next_page,
            media: self.media.unwrap_or_default(),
        }
    }
}
