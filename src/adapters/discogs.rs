//! Discogs catalog lookup.
//!
//! A thin pass-through to the Discogs HTTP API: one attempt per request,
//! no retries. Responses are normalized into the flat [`Release`] record
//! the composer works from.

use crate::domain::model::{Release, Track};
use crate::domain::ports::ReleaseSource;
use crate::utils::error::{LabelError, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.discogs.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Discogs terms of use require an identifying User-Agent.
const USER_AGENT: &str = concat!("caselabel/", env!("CARGO_PKG_VERSION"));

/// A reference extracted from a discogs.com URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogRef {
    Release(u64),
    Master(u64),
}

fn catalog_url_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"discogs\.com/(release|master)/(\d+)").expect("url pattern"))
}

fn artist_suffix_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"\s*\(\d+\)").expect("suffix pattern"))
}

/// Parses release/master references out of a discogs.com URL.
pub fn extract_catalog_ref(url: &str) -> Option<CatalogRef> {
    let captures = catalog_url_re().captures(url)?;
    let id: u64 = captures[2].parse().ok()?;
    match &captures[1] {
        "release" => Some(CatalogRef::Release(id)),
        "master" => Some(CatalogRef::Master(id)),
        _ => None,
    }
}

// Wire format, only the fields the label needs.

#[derive(Debug, Deserialize)]
struct ReleaseDoc {
    title: String,
    #[serde(default)]
    artists: Vec<ArtistDoc>,
    #[serde(default)]
    tracklist: Vec<TrackDoc>,
    #[serde(default)]
    images: Vec<ImageDoc>,
}

#[derive(Debug, Deserialize)]
struct ArtistDoc {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TrackDoc {
    #[serde(default)]
    position: String,
    #[serde(default, rename = "type_")]
    kind: Option<String>,
    title: String,
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
struct ImageDoc {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    uri: String,
}

#[derive(Debug, Deserialize)]
struct MasterDoc {
    main_release: u64,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(default)]
    results: Vec<SearchResultDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchResultDoc {
    id: u64,
}

pub struct DiscogsClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl DiscogsClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, token, DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub async fn release(&self, id: u64) -> Result<Release> {
        let doc: ReleaseDoc = self.get_json(&format!("/releases/{}", id), &[]).await?;
        Ok(normalize(doc))
    }

    /// A master points at its canonical pressing; fetch that.
    pub async fn master_main_release(&self, id: u64) -> Result<Release> {
        let doc: MasterDoc = self.get_json(&format!("/masters/{}", id), &[]).await?;
        self.release(doc.main_release).await
    }

    pub async fn search(&self, query: &str) -> Result<Release> {
        let doc: SearchDoc = self
            .get_json("/database/search", &[("q", query), ("type", "release")])
            .await?;
        let first = doc.results.first().ok_or_else(|| {
            LabelError::not_found(format!("no releases match '{}'", query))
        })?;
        self.release(first.id).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Discogs token={}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| LabelError::upstream(e.to_string()))?;
        let status = response.status();
        tracing::debug!("Discogs response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(LabelError::not_found(format!("{} does not exist", path)));
        }
        if !status.is_success() {
            return Err(LabelError::upstream(format!(
                "Discogs returned status {}",
                status
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LabelError::upstream(format!("malformed Discogs response: {}", e)))
    }
}

#[async_trait]
impl ReleaseSource for DiscogsClient {
    async fn lookup(&self, query: &str) -> Result<Release> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LabelError::bad_request("no search term provided"));
        }

        if let Some(catalog_ref) = extract_catalog_ref(query) {
            return match catalog_ref {
                CatalogRef::Release(id) => self.release(id).await,
                CatalogRef::Master(id) => self.master_main_release(id).await,
            };
        }
        if query.contains("discogs.com") {
            return Err(LabelError::bad_request("unrecognized Discogs URL format"));
        }

        self.search(query).await
    }
}

fn normalize(doc: ReleaseDoc) -> Release {
    let artist = doc
        .artists
        .first()
        .map(|a| clean_artist_name(&a.name))
        .unwrap_or_else(|| "Unknown Artist".to_string());

    let cover_art_url = doc
        .images
        .iter()
        .find(|i| i.kind == "primary" && !i.uri.is_empty())
        .or_else(|| doc.images.iter().find(|i| !i.uri.is_empty()))
        .map(|i| i.uri.clone());

    let tracks = doc
        .tracklist
        .into_iter()
        .filter(|t| t.kind.as_deref().map_or(true, |k| k == "track"))
        .map(|t| Track {
            position: t.position,
            title: t.title,
            duration: t.duration,
        })
        .collect();

    Release {
        artist,
        title: doc.title,
        tracks,
        cover_art_url,
    }
}

/// Discogs disambiguates same-named artists with a "(n)" suffix; that is
/// catalog bookkeeping, not part of the name.
fn clean_artist_name(name: &str) -> String {
    let cleaned = artist_suffix_re().replace_all(name, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> DiscogsClient {
        DiscogsClient::with_base_url(server.base_url(), None, 5).unwrap()
    }

    fn release_body() -> serde_json::Value {
        serde_json::json!({
            "title": "Blizzard Of Ozz",
            "artists": [{"name": "Ozzy Osbourne (2)"}],
            "tracklist": [
                {"position": "1", "type_": "track", "title": "I Don't Know", "duration": "5:16"},
                {"position": "", "type_": "heading", "title": "Bonus Tracks", "duration": ""},
                {"position": "2", "type_": "track", "title": "Crazy Train", "duration": "4:56"}
            ],
            "images": [
                {"type": "secondary", "uri": "https://img.example/back.jpg"},
                {"type": "primary", "uri": "https://img.example/front.jpg"}
            ]
        })
    }

    #[test]
    fn extracts_release_and_master_refs() {
        assert_eq!(
            extract_catalog_ref("https://www.discogs.com/release/3992501-Example"),
            Some(CatalogRef::Release(3992501))
        );
        assert_eq!(
            extract_catalog_ref("https://www.discogs.com/master/41155-Ozzy-Osbourne-Blizzard-Of-Ozz"),
            Some(CatalogRef::Master(41155))
        );
        assert_eq!(extract_catalog_ref("https://www.google.com"), None);
    }

    #[tokio::test]
    async fn fetches_and_normalizes_a_release() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/releases/3992501");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(release_body());
        });

        let release = client_for(&server).release(3992501).await.unwrap();

        mock.assert();
        assert_eq!(release.artist, "Ozzy Osbourne");
        assert_eq!(release.title, "Blizzard Of Ozz");
        assert_eq!(release.tracks.len(), 2);
        assert_eq!(release.tracks[1].title, "Crazy Train");
        assert_eq!(
            release.cover_art_url.as_deref(),
            Some("https://img.example/front.jpg")
        );
    }

    #[tokio::test]
    async fn master_lookup_follows_main_release() {
        let server = MockServer::start();
        let master_mock = server.mock(|when, then| {
            when.method(GET).path("/masters/41155");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"main_release": 3992501}));
        });
        let release_mock = server.mock(|when, then| {
            when.method(GET).path("/releases/3992501");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(release_body());
        });

        let release = client_for(&server)
            .lookup("https://www.discogs.com/master/41155-Blizzard")
            .await
            .unwrap();

        master_mock.assert();
        release_mock.assert();
        assert_eq!(release.title, "Blizzard Of Ozz");
    }

    #[tokio::test]
    async fn free_text_search_takes_the_first_result() {
        let server = MockServer::start();
        let search_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/database/search")
                .query_param("q", "blizzard of ozz")
                .query_param("type", "release");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"results": [{"id": 3992501}, {"id": 999}]}));
        });
        let release_mock = server.mock(|when, then| {
            when.method(GET).path("/releases/3992501");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(release_body());
        });

        let release = client_for(&server).lookup("blizzard of ozz").await.unwrap();

        search_mock.assert();
        release_mock.assert();
        assert_eq!(release.title, "Blizzard Of Ozz");
    }

    #[tokio::test]
    async fn empty_search_results_map_to_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/database/search");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"results": []}));
        });

        let err = client_for(&server).lookup("nonexistent album").await.unwrap_err();
        assert!(matches!(err, LabelError::NotFound { .. }));
    }

    #[tokio::test]
    async fn missing_release_maps_to_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/releases/1");
            then.status(404);
        });

        let err = client_for(&server).release(1).await.unwrap_err();
        assert!(matches!(err, LabelError::NotFound { .. }));
    }

    #[tokio::test]
    async fn server_errors_map_to_upstream() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/releases/1");
            then.status(500);
        });

        let err = client_for(&server).release(1).await.unwrap_err();
        assert!(matches!(err, LabelError::Upstream { .. }));
    }

    #[tokio::test]
    async fn malformed_json_maps_to_upstream() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/releases/1");
            then.status(200)
                .header("Content-Type", "application/json")
                .body("not json");
        });

        let err = client_for(&server).release(1).await.unwrap_err();
        assert!(matches!(err, LabelError::Upstream { .. }));
    }

    #[tokio::test]
    async fn sends_token_and_user_agent_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/releases/7")
                .header("authorization", "Discogs token=secret")
                .header_exists("user-agent");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(release_body());
        });

        let client =
            DiscogsClient::with_base_url(server.base_url(), Some("secret".into()), 5).unwrap();
        client.release(7).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_any_request() {
        let server = MockServer::start();
        let client = client_for(&server);

        let err = client.lookup("   ").await.unwrap_err();
        assert!(matches!(err, LabelError::BadRequest { .. }));
    }

    #[test]
    fn cleans_artist_disambiguation_suffix() {
        assert_eq!(clean_artist_name("Ozzy Osbourne (2)"), "Ozzy Osbourne");
        assert_eq!(clean_artist_name("Nirvana"), "Nirvana");
    }
}
