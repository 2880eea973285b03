//! External URLs derived from catalog data.

use mitai_api::Trailer;

const SEARCH_BASE: &str = "https://www.google.com/search?q=";

/// Restricts the search to licensed streaming sites.
const STREAMING_SITES: &str = "+site%3Acrunchyroll.com+OR+site%3Anetflix.com+OR+site%3Aprimevideo.com+OR+site%3Adisneyplus.com";

const CATALOG_ANIME_BASE: &str = "https://anilist.co/anime/";

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Characters `urlencoding` escapes that URI components keep literal.
const COMPONENT_UNRESERVED: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Web search for legal streams of `title`.
pub fn where_to_watch(title: &str) -> String {
    let text = format!("{title} watch");
    let q = encode_component(&text);
    format!("{SEARCH_BASE}{q}{STREAMING_SITES}")
}

fn encode_component(text: &str) -> String {
    COMPONENT_UNRESERVED
        .iter()
        .fold(urlencoding::encode(text).into_owned(), |acc, (escaped, raw)| {
            acc.replace(escaped, raw)
        })
}

/// Catalog page for an anime id.
pub fn catalog_page(id: u64) -> String {
    format!("{CATALOG_ANIME_BASE}{id}")
}

/// Embeddable trailer URL. Only YouTube trailers are supported.
pub fn trailer_embed(trailer: &Trailer) -> Option<String> {
    match (trailer.site.as_deref(), trailer.id.as_deref()) {
        (Some("youtube"), Some(id)) if !id.is_empty() => Some(format!("{YOUTUBE_EMBED_BASE}{id}")),
        _ => None,
    }
}
