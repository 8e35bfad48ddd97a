//! Framework-neutral request and response values exchanged with the router.
//!
//! Hosts convert their own request type into an [`AddonRequest`] and turn the
//! resulting [`AddonResponse`] back into whatever their HTTP stack expects.

use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use serde::Serialize;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

/// An inbound request as the router sees it. The body is never read.
#[derive(Debug, Clone)]
pub struct AddonRequest {
    pub method: Method,
    /// Path component only, without the query string.
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
}

impl AddonRequest {
    /// Build a request from a `path[?query]` target.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_string(),
            query,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(target: &str) -> Self {
        Self::new(Method::GET, target)
    }

    pub fn from_parts(parts: &http::request::Parts) -> Self {
        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers.clone(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// The response being built for one request.
///
/// Providers receive it mutably and may write to it directly; the router only
/// adds to it when a provider hands back a payload.
#[derive(Debug, Clone)]
pub struct AddonResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Default for AddonResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl AddonResponse {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Append raw bytes to the body.
    pub fn write(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    /// Permissive CORS plus a JSON content type.
    pub fn set_standard_headers(&mut self) {
        let h = &mut self.headers;
        h.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
        h.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
        h.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
        h.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    }

    /// Replace the body with a plain-text error message.
    pub fn error(&mut self, status: StatusCode, message: &str) {
        self.status = status;
        self.headers.remove(header::CONTENT_LENGTH);
        self.headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_TEXT));
        self.headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        self.body = message.as_bytes().to_vec();
    }

    pub fn redirect(&mut self, location: &str, status: StatusCode) {
        let value = HeaderValue::from_str(location).unwrap_or_else(|_| HeaderValue::from_static("/"));
        self.status = status;
        self.headers.insert(header::LOCATION, value);
        self.body.clear();
    }

    /// Serialize `value` as compact JSON into the body with the standard headers.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        self.set_standard_headers();
        self.body = body;
        Ok(())
    }

    pub fn html(&mut self, html: &str) {
        self.headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_HTML));
        self.body = html.as_bytes().to_vec();
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, Vec<u8>) {
        (self.status, self.headers, self.body)
    }

    pub fn into_http(self) -> http::Response<Vec<u8>> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_splits_query() {
        let req = AddonRequest::get("/catalog/movie/top.json?lang=en");
        assert_eq!(req.path, "/catalog/movie/top.json");
        assert_eq!(req.query.as_deref(), Some("lang=en"));
        assert_eq!(req.method, Method::GET);
        assert_eq!(AddonRequest::get("/manifest.json").query, None);
    }

    #[test]
    fn request_from_http_parts() {
        let (parts, _) = http::Request::builder()
            .method(Method::OPTIONS)
            .uri("http://localhost:7000/abc/stream/movie/x.json?q=1")
            .header(header::ORIGIN, "https://web.example.org")
            .body(())
            .unwrap()
            .into_parts();
        let req = AddonRequest::from_parts(&parts);
        assert_eq!(req.method, Method::OPTIONS);
        assert_eq!(req.path, "/abc/stream/movie/x.json");
        assert_eq!(req.query.as_deref(), Some("q=1"));
        assert!(req.headers.contains_key(header::ORIGIN));
    }

    #[test]
    fn standard_headers_are_exactly_four() {
        let mut res = AddonResponse::new();
        res.set_standard_headers();
        assert_eq!(res.headers().len(), 4);
        assert_eq!(res.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
        assert_eq!(res.header(header::ACCESS_CONTROL_ALLOW_METHODS), Some("GET, POST, OPTIONS"));
        assert_eq!(res.header(header::ACCESS_CONTROL_ALLOW_HEADERS), Some("Content-Type"));
        assert_eq!(res.header(header::CONTENT_TYPE), Some("application/json"));
        assert!(res.headers().get("X-Some-Header").is_none());
    }

    #[test]
    fn error_replaces_body_with_text() {
        let mut res = AddonResponse::new();
        res.write(b"partial");
        res.error(StatusCode::NOT_FOUND, "Page not found");
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.body(), b"Page not found");
        assert_eq!(res.header(header::CONTENT_TYPE), Some(CONTENT_TYPE_TEXT));
    }

    #[test]
    fn json_is_compact() {
        let mut res = AddonResponse::new();
        res.json(&serde_json::json!({ "streams": [] })).unwrap();
        assert_eq!(res.body(), br#"{"streams":[]}"#);
        assert_eq!(res.header(header::CONTENT_TYPE), Some(CONTENT_TYPE_JSON));
    }

    #[test]
    fn into_http_keeps_everything() {
        let mut res = AddonResponse::new();
        res.redirect("/configure", StatusCode::MOVED_PERMANENTLY);
        let http = res.into_http();
        assert_eq!(http.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(http.headers()[header::LOCATION], "/configure");
        assert!(http.body().is_empty());
    }
}
