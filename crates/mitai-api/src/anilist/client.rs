use reqwest::Client;

use super::error::CatalogError;
use super::types::{GraphQLResponse, PageResponse};
use crate::traits::{Catalog, CatalogPage, PageQuery};

pub const API_URL: &str = "https://graphql.anilist.co";

const PAGE_QUERY: &str = r#"
query ($page: Int, $perPage: Int, $search: String, $season: MediaSeason, $format: MediaFormat) {
    Page(page: $page, perPage: $perPage) {
        pageInfo { currentPage hasNextPage }
        media(search: $search, season: $season, format: $format, type: ANIME, sort: POPULARITY_DESC) {
            id
            title { romaji english native }
            coverImage { large color }
            bannerImage
            season
            seasonYear
            format
            episodes
            status
            averageScore
            genres
            description(asHtml: false)
            trailer { id site thumbnail }
            siteUrl
        }
    }
}
"#;

/// AniList GraphQL API client. The public catalog needs no token.
#[derive(Debug, Clone)]
pub struct AniListClient {
    endpoint: String,
    http: Client,
}

impl AniListClient {
    pub fn new() -> Self {
        Self::with_endpoint(API_URL)
    }

    /// Client for a non-default endpoint (mirrors, test servers).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn graphql_request<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, CatalogError> {
        tracing::debug!(operation, endpoint = %self.endpoint, "AniList GraphQL request");

        let resp = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status_code, "AniList API error");
            return Err(CatalogError::Api {
                status: status_code,
                message: body,
            });
        }

        tracing::debug!(operation, status = %status, "AniList response received");
        let envelope = resp
            .json::<GraphQLResponse<T>>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        envelope.into_result().map_err(CatalogError::GraphQl)
    }
}

impl Default for AniListClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for AniListClient {
    type Error = CatalogError;

    async fn search_page(&self, query: &PageQuery) -> Result<CatalogPage, CatalogError> {
        let variables =
            serde_json::to_value(query).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let resp: PageResponse = self
            .graphql_request("Page", PAGE_QUERY, variables)
            .await?;
        let page = resp.page.into_catalog_page();
        tracing::debug!(
            page = query.page,
            results = page.media.len(),
            has_next = page.has_next_page,
            "catalog page decoded"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::traits::MediaSeason;

    fn query(page: u32) -> PageQuery {
        PageQuery {
            page,
            per_page: 18,
            search: None,
            season: None,
            format: None,
        }
    }

    #[tokio::test]
    async fn test_search_page_via_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("Accept", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "variables": { "page": 2, "perPage": 18, "search": "frieren", "season": "FALL", "format": null }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "Page": {
                        "pageInfo": { "currentPage": 2, "hasNextPage": false },
                        "media": [
                            { "id": 154587, "title": { "romaji": "Sousou no Frieren", "english": null, "native": null } }
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = AniListClient::with_endpoint(server.uri());
        let page = client
            .search_page(&PageQuery {
                search: Some("frieren".into()),
                season: Some(MediaSeason::Fall),
                ..query(2)
            })
            .await
            .unwrap();

        assert!(!page.has_next_page);
        assert_eq!(page.current_page, Some(2));
        assert_eq!(page.media.len(), 1);
        assert_eq!(page.media[0].display_title(), "Sousou no Frieren");
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .mount(&server)
            .await;

        let client = AniListClient::with_endpoint(server.uri());
        let err = client.search_page(&query(1)).await.unwrap_err();
        match err {
            CatalogError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Too Many Requests");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_graphql_errors_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": null,
                "errors": [{ "message": "Internal Server Error" }]
            })))
            .mount(&server)
            .await;

        let client = AniListClient::with_endpoint(server.uri());
        let err = client.search_page(&query(1)).await.unwrap_err();
        assert!(matches!(err, CatalogError::GraphQl(ref m) if m == "Internal Server Error"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = AniListClient::with_endpoint(server.uri());
        let err = client.search_page(&query(1)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
