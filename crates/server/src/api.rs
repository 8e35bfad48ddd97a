//! axum glue: every request goes to the addon router.

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::trace::TraceLayer;

use addonkit_core::exchange::{AddonRequest, AddonResponse};

use crate::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    let (parts, _body) = req.into_parts();
    let request = AddonRequest::from_parts(&parts);
    let router = state.router.clone();

    match tokio::task::spawn_blocking(move || router.handle(&request)).await {
        Ok(response) => into_response(response),
        Err(e) => {
            tracing::error!(error = %e, "provider task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

fn into_response(response: AddonResponse) -> Response {
    let (status, headers, body) = response.into_parts();
    let mut out = Response::new(Body::from(body));
    *out.status_mut() = status;
    *out.headers_mut() = headers;
    out
}
