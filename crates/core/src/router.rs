//! Request router: path parsing, token handling, dispatch and response encoding.
//!
//! ```text
//! OPTIONS  any                      200, CORS headers, empty body
//! GET      /  or  /login            301 -> /configure
//! GET      /configure               provider renders the configure page
//! GET      /[<token>/]<resource>... provider payload as JSON
//! ```
//!
//! The router is stateless; the only shared data is the compile-time
//! [`ENABLED_ENDPOINTS`](crate::endpoint::ENABLED_ENDPOINTS) table.

use std::sync::Arc;

use http::{Method, StatusCode};
use serde::Serialize;

use crate::endpoint::{is_enabled, Endpoint};
use crate::exchange::{AddonRequest, AddonResponse};
use crate::provider::{Provider, Reply, RequestContext};

pub const CONFIGURE_PATH: &str = "/configure";
pub const LOGIN_SEGMENT: &str = "login";
pub const NOT_FOUND_MESSAGE: &str = "Page not found";
pub const INVALID_PATH_MESSAGE: &str = "Invalid path; expected /<token>/<resource>";

/// A provider bound to the routing logic. Cheap to clone; shares the provider.
#[derive(Clone)]
pub struct Router {
    provider: Arc<dyn Provider>,
}

impl Router {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn handle(&self, request: &AddonRequest) -> AddonResponse {
        route(request, self.provider.as_ref())
    }
}

/// Translate one request into exactly one response.
pub fn route(request: &AddonRequest, provider: &dyn Provider) -> AddonResponse {
    match provider.request_view() {
        Some(view) => dispatch(request, view.as_ref()),
        None => dispatch(request, provider),
    }
}

fn dispatch(request: &AddonRequest, provider: &dyn Provider) -> AddonResponse {
    let mut response = AddonResponse::new();

    if request.method == Method::OPTIONS {
        response.set_standard_headers();
        return response;
    }

    let parts: Vec<&str> = request.path.trim_matches('/').split('/').collect();
    let secured = provider.is_secured();

    if let [segment] = parts.as_slice() {
        match *segment {
            "" | LOGIN_SEGMENT => {
                tracing::debug!(path = %request.path, "redirecting to configure page");
                response.redirect(CONFIGURE_PATH, StatusCode::MOVED_PERMANENTLY);
                return response;
            }
            s if s == Endpoint::Configure.as_str() => {
                let ctx = RequestContext::new(request, CONFIGURE_PATH, "");
                provider.render_configure_page(&ctx, &mut response);
                return response;
            }
            // A secured deployment reports the missing token below instead.
            s if !secured && !is_enabled(s) => {
                tracing::debug!(segment = s, "unknown top-level segment");
                response.error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE);
                return response;
            }
            _ => {}
        }
    }

    let (token, resource) = if secured {
        if parts.len() < 2 {
            tracing::debug!(path = %request.path, "secured request without token segment");
            response.error(StatusCode::BAD_REQUEST, INVALID_PATH_MESSAGE);
            return response;
        }
        (parts[0], &parts[1..])
    } else {
        ("", &parts[..])
    };

    let resource_path = format!("/{}", resource.join("/"));
    let ctx = RequestContext::new(request, &resource_path, token);

    let Some(endpoint) = Endpoint::from_segment(resource[0]) else {
        tracing::debug!(segment = resource[0], "unknown resource segment");
        response.error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE);
        return response;
    };

    tracing::debug!(
        %endpoint,
        secured,
        has_token = !token.is_empty(),
        resource_path = %resource_path,
        "dispatching addon request"
    );

    match endpoint {
        Endpoint::Manifest => respond(provider.manifest(&ctx, &mut response), &mut response),
        Endpoint::Catalog => respond(provider.catalog(&ctx, &mut response), &mut response),
        Endpoint::Meta => respond(provider.meta(&ctx, &mut response), &mut response),
        Endpoint::Stream => respond(provider.stream(&ctx, &mut response), &mut response),
        Endpoint::Subtitles => respond(provider.subtitles(&ctx, &mut response), &mut response),
        Endpoint::Configure => provider.render_configure_page(&ctx, &mut response),
    }

    response
}

fn respond<T: Serialize>(reply: Reply<T>, response: &mut AddonResponse) {
    let Reply::Payload(data) = reply else {
        tracing::debug!("provider handled the response itself");
        return;
    };
    if let Err(e) = response.json(&data) {
        tracing::error!(error = %e, "failed to encode provider payload");
        response.error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    }
}
