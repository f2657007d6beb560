use crate::error::{AppError, Result};
use crate::model::{ExpandResponse, ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use nanolink_core::{ShortCode, ShortLink};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::{debug, info};

/// Bytes escaped when a stored URL becomes a `Location` header. Non-ASCII
/// bytes are always escaped; existing `%XX` sequences are left alone.
const LOCATION_ESCAPES: &AsciiSet = &CONTROLS.add(b' ');

pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>)> {
    // A body that is not JSON, or whose `url` is not a string, is treated
    // like a missing URL.
    let url = match payload {
        Ok(Json(request)) => request.url.unwrap_or_default(),
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "unreadable shorten request");
            String::new()
        }
    };

    let link = state.shortener().shorten(&url).await?;
    let short_url = link.short_code.to_url(state.base_url());
    info!(code = %link.short_code, id = link.id, "short link created");

    Ok((StatusCode::CREATED, Json(ShortenResponse { short_url })))
}

pub async fn expand_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<ExpandResponse>> {
    let link = lookup(&state, short_code).await?;

    Ok(Json(ExpandResponse {
        original_url: link.original_url,
    }))
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Response> {
    let link = lookup(&state, short_code).await?;
    let location = location_header(&link.original_url).map_err(|err| {
        AppError::Internal(format!(
            "stored URL for {} is not a valid Location header: {err}",
            link.short_code
        ))
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

fn location_header(
    original_url: &str,
) -> std::result::Result<HeaderValue, header::InvalidHeaderValue> {
    HeaderValue::from_str(&utf8_percent_encode(original_url, LOCATION_ESCAPES).to_string())
}

/// Codes that could never have been generated are answered without a
/// store round trip.
async fn lookup(state: &AppState, short_code: String) -> Result<ShortLink> {
    let code = ShortCode::new(short_code).map_err(|err| {
        debug!(error = %err, "malformed short code");
        AppError::NotFound
    })?;

    state
        .shortener()
        .resolve(&code)
        .await?
        .ok_or(AppError::NotFound)
}
