use crate::core::composer::LabelComposer;
use crate::utils::error::{LabelError, Result};
use crate::web::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Search input, accepted as `url` (the original form field name) with
/// `query` as an alias.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateParams {
    pub url: Option<String>,
    pub query: Option<String>,
}

impl GenerateParams {
    fn term(&self) -> Option<&str> {
        self.url
            .as_deref()
            .or(self.query.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

pub async fn generate_label_get(
    State(state): State<AppState>,
    Query(params): Query<GenerateParams>,
) -> Result<Response> {
    generate(state, params).await
}

pub async fn generate_label_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let params = parse_body(&headers, &body)?;
    generate(state, params).await
}

fn parse_body(headers: &HeaderMap, body: &[u8]) -> Result<GenerateParams> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/json") {
        return serde_json::from_slice(body)
            .map_err(|e| LabelError::bad_request(format!("invalid JSON body: {}", e)));
    }

    let mut params = GenerateParams::default();
    for (key, value) in url::form_urlencoded::parse(body) {
        match key.as_ref() {
            "url" => params.url = Some(value.into_owned()),
            "query" => params.query = Some(value.into_owned()),
            _ => {}
        }
    }
    Ok(params)
}

/// The one request path: validate input, look the release up, fetch
/// artwork best-effort, compose, and stream the PDF back.
async fn generate(state: AppState, params: GenerateParams) -> Result<Response> {
    let term = params
        .term()
        .ok_or_else(|| LabelError::bad_request("No URL provided"))?;

    tracing::info!("Generating label for '{}'", term);
    let release = state.releases.lookup(term).await?;

    let artwork = match &release.cover_art_url {
        Some(url) => match state.artwork.fetch(url).await {
            Ok(artwork) => Some(artwork),
            Err(e) => {
                tracing::warn!("Cover art unavailable, continuing without it: {}", e);
                None
            }
        },
        None => None,
    };

    let composer = LabelComposer::new(state.options.clone());
    let pdf = composer.compose(&release, artwork.as_ref())?;
    tracing::info!(
        "Generated label for '{} - {}' ({} bytes)",
        release.artist,
        release.title,
        pdf.len()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"jukebox_labels.pdf\"",
            ),
        ],
        pdf,
    )
        .into_response())
}
