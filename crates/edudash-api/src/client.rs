// Admin API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, `{ data }` envelope
// unwrapping, and status-code mapping. Endpoint groups (auth, analytics,
// records) are implemented as inherent methods in separate files to keep
// this module focused on transport mechanics.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{DataEnvelope, ErrorBody};
use crate::transport::TransportConfig;

/// Maximum number of body characters echoed into error messages.
const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the platform's admin REST API.
///
/// All data-returning methods hand back the unwrapped `data` payload;
/// the envelope is stripped before the caller sees it.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Cookie jar reference for inspecting the session cookie.
    cookie_jar: Option<Arc<Jar>>,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). `base_url` is the API
    /// root (e.g. `https://api.example.com/api`); a trailing slash is added
    /// so relative endpoint paths join underneath it.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = transport.clone().with_session_jar();
        let cookie_jar = config.cookie_jar.clone();
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
            cookie_jar,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// Use this when the caller manages cookies itself (tests, shared clients).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            cookie_jar: None,
        }
    }

    /// The underlying HTTP client (for flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The `Cookie` header value the jar would send to the API, if any.
    pub fn cookie_header(&self) -> Option<String> {
        let jar = self.cookie_jar.as_ref()?;
        let cookies = jar.cookies(&self.base_url)?;
        cookies.to_str().ok().map(String::from)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join a relative endpoint path (e.g. `"admin/statistics/visits"`).
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Append path segments to the base URL, percent-encoding each one
    /// as a single segment (`/` and spaces included).
    pub(crate) fn endpoint_segments(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolve a media URL returned by the backend.
    ///
    /// Absolute `http(s)` URLs pass through unchanged; anything else is
    /// treated as a path on the API's origin (`/uploads/a.png` and
    /// `uploads/a.png` both resolve to `{origin}/uploads/a.png`).
    /// Empty input yields `None`.
    pub fn media_url(&self, raw: &str) -> Option<Url> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(abs) = Url::parse(raw) {
            if matches!(abs.scheme(), "http" | "https") {
                return Some(abs);
            }
        }
        let origin = self.base_url.join("/").ok()?;
        origin.join(&format!("/{}", raw.trim_start_matches('/'))).ok()
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request with query parameters and unwrap the envelope.
    pub(crate) async fn get_data<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T, Error>
    where
        T: DeserializeOwned + Default,
    {
        let url = self.endpoint(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        parse_envelope(resp).await
    }

    /// Send a PUT request with a JSON body and unwrap the envelope.
    pub(crate) async fn put_data<T, B>(&self, url: Url, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned + Default,
        B: Serialize + Sync + ?Sized,
    {
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        parse_envelope(resp).await
    }

    /// Send a multipart POST and unwrap the envelope.
    pub(crate) async fn post_multipart<T>(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned + Default,
    {
        debug!("POST (multipart) {url}");

        let resp = self.http.post(url).multipart(form).send().await?;
        parse_envelope(resp).await
    }
}

/// Check the status, then decode `{ data }` and return the payload.
///
/// A missing or `null` `data` field yields `T::default()`; an empty
/// body on a 2xx does the same.
async fn parse_envelope<T>(resp: reqwest::Response) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    let resp = check_status(resp).await?;
    let body = resp.text().await?;
    trace!(bytes = body.len(), "response body received");

    if body.trim().is_empty() {
        return Ok(T::default());
    }

    let envelope: DataEnvelope<T> =
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;

    Ok(envelope.data.unwrap_or_default())
}

/// Map non-success statuses to typed errors, passing 2xx responses through.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let path = resp.url().path().to_owned();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| preview(&body).to_owned());

    Err(match status {
        reqwest::StatusCode::UNAUTHORIZED => Error::SessionExpired,
        reqwest::StatusCode::FORBIDDEN => Error::Forbidden {
            message: if message.is_empty() {
                "admin role required".into()
            } else {
                message
            },
        },
        reqwest::StatusCode::NOT_FOUND => Error::NotFound { path },
        _ => Error::Api {
            status: status.as_u16(),
            message,
        },
    })
}

/// First `BODY_PREVIEW_CHARS` characters of a body, on a char boundary.
pub(crate) fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let c = client("https://api.example.com/api");
        assert_eq!(c.base_url().as_str(), "https://api.example.com/api/");
        assert_eq!(
            c.endpoint("admin/statistics/visits").unwrap().as_str(),
            "https://api.example.com/api/admin/statistics/visits"
        );
        assert_eq!(
            c.endpoint("/auth/login").unwrap().as_str(),
            "https://api.example.com/api/auth/login"
        );
    }

    #[test]
    fn media_url_resolution() {
        let c = client("https://api.example.com/api/");
        assert_eq!(
            c.media_url("/uploads/courses/a.png").unwrap().as_str(),
            "https://api.example.com/uploads/courses/a.png"
        );
        assert_eq!(
            c.media_url("uploads/b.jpg").unwrap().as_str(),
            "https://api.example.com/uploads/b.jpg"
        );
        assert_eq!(
            c.media_url("https://cdn.example.net/x.webp").unwrap().as_str(),
            "https://cdn.example.net/x.webp"
        );
        assert!(c.media_url("   ").is_none());
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let long = "é".repeat(300);
        assert_eq!(preview(&long).chars().count(), BODY_PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
