use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::Stream;
use serde_json::{json, Value};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{debug, error, info};

use mars_core::view::{LEAD, TITLE};
use mars_core::{view, Action, CoreError, Dashboard, RoverApi};
use mars_render_html::{render_page, PageOptions};

use crate::error::AppError;
use crate::root::BroadcastRoot;

pub type SharedDashboard = Arc<Dashboard<BroadcastRoot, Arc<dyn RoverApi>>>;

/// Thin browser shell: applies rendered markup and forwards clicks.
const CLIENT_JS: &str = include_str!("client.js");

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

// ── Router ──────────────────────────────────────────────────────────

pub fn router(dashboard: SharedDashboard) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/sse", get(events))
        .route("/actions/:name", post(action))
        .with_state(dashboard)
}

// ── Handlers ────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Full page with the current snapshot already rendered into `#root`.
async fn index(State(dashboard): State<SharedDashboard>) -> Html<String> {
    let state = dashboard.snapshot().await;
    let mut opts = PageOptions::new(view(&state));
    opts.title = Some(TITLE.to_string());
    opts.description = Some(LEAD.to_string());
    opts.styles.push(BOOTSTRAP_CSS.to_string());
    opts.inline_scripts.push(CLIENT_JS.to_string());
    Html(render_page(&opts))
}

/// One `render` event with the current markup, then one per render.
async fn events(
    State(dashboard): State<SharedDashboard>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (current, rx) = dashboard.root().subscribe();
    info!(clients = dashboard.root().clients(), "sse client connected");

    let first = tokio_stream::once(Ok::<_, Infallible>(render_event(current)));
    let updates = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(markup) => Some(Ok(render_event(markup))),
        // Lagged: the next render carries the whole page anyway
        Err(_) => None,
    });

    Sse::new(first.chain(updates)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn render_event(markup: String) -> Event {
    // SSE cannot carry carriage returns; newlines are split into data lines
    Event::default().event("render").data(markup.replace('\r', ""))
}

/// Delegated UI event. The action is validated here and then runs in the
/// background; its renders reach the browser over `/sse`.
async fn action(
    State(dashboard): State<SharedDashboard>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let payload: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(format!("invalid json: {}", e)))?
    };
    let action = Action::from_parts(&name, &payload)?;

    if let Action::SelectRover { rover } = &action {
        if dashboard.snapshot().await.rover(rover).is_none() {
            return Err(CoreError::UnknownRover(rover.clone()).into());
        }
    }

    debug!(action = action.name(), "action accepted");
    tokio::spawn(async move {
        let name = action.name();
        if let Err(e) = dashboard.dispatch(action).await {
            error!(action = name, error = %e, "action failed");
        }
    });

    Ok((StatusCode::ACCEPTED, Json(json!({ "ok": true }))))
}
