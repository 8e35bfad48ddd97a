//! Provider contract: what an addon implements to become reachable over the protocol.
//!
//! The router owns addressing, CORS and encoding. A [`Provider`] only produces
//! payloads. Whenever it wants full control of the response (an error of its
//! own, a redirect) it writes to the [`AddonResponse`] and returns
//! [`Reply::NoContent`]; the router then leaves the response untouched.

use std::sync::Arc;

use http::header::HeaderMap;
use http::{Method, StatusCode};

use crate::args::ResourceArgs;
use crate::error::PathError;
use crate::exchange::{AddonRequest, AddonResponse};
use crate::schema::{
    AddonManifest, ContentType, MetaItem, MetaPreviewList, Resource, ResourceName, StreamList,
    SubtitlesList,
};

/// Outcome of a produce call.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    /// Serialize this as the response body.
    Payload(T),
    /// The provider already wrote the response; write nothing further.
    NoContent,
}

impl<T> Reply<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Payload(value) => Reply::Payload(f(value)),
            Reply::NoContent => Reply::NoContent,
        }
    }

    pub fn is_payload(&self) -> bool {
        matches!(self, Reply::Payload(_))
    }
}

impl<T> From<T> for Reply<T> {
    fn from(value: T) -> Self {
        Reply::Payload(value)
    }
}

/// What a provider gets to see of the request.
///
/// `resource_path` is a separate value derived by the router: the inbound path
/// with the token segment removed. The inbound request itself is never rewritten.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    request: &'a AddonRequest,
    resource_path: &'a str,
    token: &'a str,
}

impl<'a> RequestContext<'a> {
    pub fn new(request: &'a AddonRequest, resource_path: &'a str, token: &'a str) -> Self {
        Self {
            request,
            resource_path,
            token,
        }
    }

    pub fn method(&self) -> &Method {
        &self.request.method
    }

    /// The path exactly as received, token included.
    pub fn original_path(&self) -> &str {
        &self.request.path
    }

    /// The path with the token stripped, always starting with `/`.
    pub fn resource_path(&self) -> &str {
        self.resource_path
    }

    pub fn query(&self) -> Option<&str> {
        self.request.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.request.headers
    }

    /// Access token; empty for unsecured providers.
    pub fn token(&self) -> &str {
        self.token
    }

    /// Decode `/{resource}/{type}/{id}[/{extra}].json` from the resource path.
    pub fn args(&self) -> Result<ResourceArgs, PathError> {
        ResourceArgs::parse(self.resource_path)
    }
}

/// A content provider. One instance is bound to a router per deployment.
///
/// Calls are synchronous and may block; the router imposes no timeout.
pub trait Provider: Send + Sync {
    fn manifest(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<AddonManifest>;

    fn catalog(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<MetaPreviewList>;

    fn meta(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<MetaItem>;

    fn stream(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<StreamList>;

    /// Providers that do not advertise subtitles can rely on this 404.
    fn subtitles(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<SubtitlesList> {
        let _ = ctx;
        res.error(StatusCode::NOT_FOUND, "Page not found");
        Reply::NoContent
    }

    /// Full control of the response; nothing is added afterwards.
    fn render_configure_page(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse);

    /// Whether every resource request must carry a token segment.
    fn is_secured(&self) -> bool;

    /// A provider that answers one whole request, so that `is_secured` and the
    /// produce call see the same state. Providers whose state can change between
    /// calls return a snapshot here; `None` routes against `self`.
    fn request_view(&self) -> Option<Arc<dyn Provider>> {
        None
    }
}

// ---------------------------------------------------------------------------
// Stub provider (for wiring and tests)
// ---------------------------------------------------------------------------

/// Unsecured provider with a minimal manifest and empty lists.
#[derive(Debug, Default)]
pub struct StubProvider;

impl StubProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn stub_manifest() -> AddonManifest {
        AddonManifest {
            id: "org.addonkit.stub".to_string(),
            version: "0.1.0".to_string(),
            name: "Stub (no provider configured)".to_string(),
            description: "Serves empty catalogs".to_string(),
            resources: vec![
                Resource::new(ResourceName::Catalog),
                Resource::new(ResourceName::Stream),
            ],
            types: vec![ContentType::Movie],
            catalogs: Vec::new(),
            ..Default::default()
        }
    }
}

impl Provider for StubProvider {
    fn manifest(&self, _ctx: &RequestContext<'_>, _res: &mut AddonResponse) -> Reply<AddonManifest> {
        Reply::Payload(Self::stub_manifest())
    }

    fn catalog(&self, _ctx: &RequestContext<'_>, _res: &mut AddonResponse) -> Reply<MetaPreviewList> {
        Reply::Payload(MetaPreviewList::default())
    }

    fn meta(&self, _ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<MetaItem> {
        res.error(StatusCode::NOT_FOUND, "Meta not found");
        Reply::NoContent
    }

    fn stream(&self, _ctx: &RequestContext<'_>, _res: &mut AddonResponse) -> Reply<StreamList> {
        Reply::Payload(StreamList::default())
    }

    fn render_configure_page(&self, _ctx: &RequestContext<'_>, res: &mut AddonResponse) {
        res.html("<!doctype html><title>addonkit</title><p>No provider configured.</p>");
    }

    fn is_secured(&self) -> bool {
        false
    }
}
