//! Photo proxy: streams a single object back when the bucket is not exposed
//! publicly. Object content at a key is treated as immutable, so responses
//! are cacheable for a year.

use crate::{errors::AppError, services::portfolio_service::PortfolioService};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Response,
};
use futures::TryStreamExt;
use std::io;

const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";
const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";

/// `GET /api/photos/{*path}`
pub async fn get_photo(
    State(service): State<PortfolioService>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let key = path.trim_start_matches('/');
    if key.is_empty() {
        return Err(missing_path());
    }

    let object = service.fetch_photo(key).await?;

    let stream = object.stream.map_err(io::Error::other);
    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = StatusCode::OK;
    set_photo_headers(
        response.headers_mut(),
        object.content_type.as_deref(),
        object.content_length,
    );

    Ok(response)
}

/// `GET /api/photos` and `GET /api/photos/` with nothing after the prefix.
pub async fn missing_photo_path() -> AppError {
    missing_path()
}

fn missing_path() -> AppError {
    AppError::bad_request("Photo path required")
}

fn set_photo_headers(headers: &mut HeaderMap, content_type: Option<&str>, length: Option<u64>) {
    headers.insert(
        header::CONTENT_TYPE,
        content_type
            .and_then(|ct| HeaderValue::from_str(ct).ok())
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
    );
    if let Some(length) = length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(IMMUTABLE_CACHE),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_default_to_jpeg() {
        let mut headers = HeaderMap::new();
        set_photo_headers(&mut headers, None, Some(42));
        assert_eq!(headers[header::CONTENT_TYPE], "image/jpeg");
        assert_eq!(headers[header::CONTENT_LENGTH], "42");
        assert_eq!(headers[header::CACHE_CONTROL], IMMUTABLE_CACHE);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn headers_keep_store_content_type() {
        let mut headers = HeaderMap::new();
        set_photo_headers(&mut headers, Some("image/webp"), None);
        assert_eq!(headers[header::CONTENT_TYPE], "image/webp");
        assert!(headers.get(header::CONTENT_LENGTH).is_none());
    }
}
