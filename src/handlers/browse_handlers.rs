//! HTTP handlers for browsing the bucket.
//!
//! Every path is either a directory (empty or `/`-terminated), answered with
//! a synthesized listing, or a file, answered by streaming the object. A file
//! path with no object behind it is retried as a directory. Object bodies are
//! streamed from the store without buffering.

use crate::{
    errors::AppError,
    services::{browse_service::BrowseService, path_codec::PathCodec, streamer::ObjectTransfer},
};
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info};

/// `GET /{*path}` — listing or object, depending on the path.
pub async fn browse(
    State(service): State<BrowseService>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    respond(&service, uri.path(), &headers).await
}

/// `GET {link_prefix}/{*path}` — the target of file links in listings.
///
/// The link prefix is dropped only when the rest names an existing object.
/// Anything else is browsed under its full path, so a real top-level
/// directory named like the prefix stays reachable.
pub async fn download(
    State(service): State<BrowseService>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let path = uri.path();
    let file_path = path
        .strip_prefix(service.policy.link_prefix.as_str())
        .filter(|rest| !PathCodec::is_directory_path(rest));

    if let Some(rest) = file_path {
        match file_response(&service, rest, &headers).await {
            Ok(Some(response)) => return response,
            Ok(None) => debug!(path, "no linked object, browsing full path"),
            Err(err) => return failure(path, err),
        }
    }
    respond(&service, path, &headers).await
}

/// The single place where failures become responses.
async fn respond(service: &BrowseService, url_path: &str, headers: &HeaderMap) -> Response {
    match dispatch(service, url_path, headers).await {
        Ok(response) => response,
        Err(err) => failure(url_path, err),
    }
}

fn failure(url_path: &str, err: AppError) -> Response {
    if err.status().is_server_error() {
        error!(path = url_path, error = %err, "request failed");
    } else {
        debug!(path = url_path, error = %err, "request rejected");
    }
    err.into_response()
}

async fn dispatch(
    service: &BrowseService,
    url_path: &str,
    headers: &HeaderMap,
) -> Result<Response, AppError> {
    let key = service.codec.url_to_key(url_path);
    if PathCodec::is_directory_path(url_path) {
        return listing_response(service, &key).await;
    }

    match file_response(service, url_path, headers).await? {
        Some(response) => Ok(response),
        None => {
            debug!(key = %key, "no object, retrying as directory");
            listing_response(service, &format!("{key}/")).await
        }
    }
}

/// Stream the object behind a file path; `None` when no object has its key.
async fn file_response(
    service: &BrowseService,
    url_path: &str,
    headers: &HeaderMap,
) -> Result<Option<Response>, AppError> {
    let key = service.codec.url_to_key(url_path);
    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    let transfer = service.stream_object(&key, range).await?;
    Ok(transfer.map(|t| object_response(t, service.policy.object_max_age)))
}

async fn listing_response(service: &BrowseService, prefix: &str) -> Result<Response, AppError> {
    let html = service.render_listing(prefix).await?;
    info!(prefix, "listing: 200");

    let mut response = Response::new(Body::from(html));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    insert_cache_control(headers, service.policy.listing_max_age);
    Ok(response)
}

fn object_response(transfer: ObjectTransfer, max_age: u64) -> Response {
    let content_length = transfer.content_length();
    let ObjectTransfer { meta, window, body } = transfer;

    let status = if window.is_some() {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };
    debug!(key = %meta.key, status = status.as_u16(), bytes = content_length, "streaming object");

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();

    let content_type = meta
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    insert_cache_control(headers, max_age);

    if let Some(range) = window {
        if let Ok(value) = HeaderValue::from_str(&range.content_range(meta.size_bytes)) {
            headers.insert(header::CONTENT_RANGE, value);
        }
    }

    if let Some(etag) = meta.etag.as_ref() {
        let quoted = format!("\"{}\"", etag.trim_matches('"'));
        if let Ok(value) = HeaderValue::from_str(&quoted) {
            headers.insert(header::ETAG, value);
        }
    }

    if let Some(created_at) = meta.created_at {
        let http_date = created_at.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        if let Ok(value) = HeaderValue::from_str(&http_date) {
            headers.insert(header::LAST_MODIFIED, value);
        }
    }

    response
}

fn insert_cache_control(headers: &mut HeaderMap, max_age: u64) {
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={max_age}")) {
        headers.insert(header::CACHE_CONTROL, value);
    }
}
