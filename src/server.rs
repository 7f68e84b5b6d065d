//! HTTP front end: a landing page and the one-shot scan endpoint.
//!
//! This is the only layer that turns the scanner's and extractor's typed
//! failures into a transport-level error response.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    config::Config,
    report, scanner,
    types::{ErrorResponse, PortRecord, ScanResponse},
};

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build the application router. Kept separate from [`serve`] so tests can
/// drive it without binding a socket.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/scan", post(post_scan))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "serving UI");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Landing page showing the configured target (read-only, not editable).
async fn index(State(app): State<AppState>) -> Html<String> {
    Html(INDEX_HTML.replace("{{target}}", &app.config.target))
}

/// Trigger one scan-and-extract cycle against the configured target.
async fn post_scan(State(app): State<AppState>) -> impl IntoResponse {
    match scan_once(&app.config).await {
        Ok(ports) => (
            StatusCode::OK,
            Json(ScanResponse {
                target: app.config.target.clone(),
                ports,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "scan failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn scan_once(config: &Config) -> Result<Vec<PortRecord>> {
    let xml = scanner::run_scan(config).await?;
    let ports = report::extract(&xml)?;
    info!(open = ports.len(), "scan finished");
    Ok(ports)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>labscan</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }
  table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
  th, td { border: 1px solid #ccc; padding: 0.3rem 0.6rem; text-align: left; }
  th { background: #f2f2f2; }
  code { background: #f2f2f2; padding: 0.1rem 0.3rem; }
  #status { margin-left: 0.75rem; color: #555; }
</style>
</head>
<body>
<h1>labscan</h1>
<p>Scans the configured lab target <code>{{target}}</code> for open TCP ports
(top 100, connect scan, light service detection). Approved lab targets only.</p>
<button id="scan-btn">Run Scan</button><span id="status"></span>
<table>
  <thead><tr><th>Port</th><th>Protocol</th><th>Service</th><th>Product</th></tr></thead>
  <tbody id="results"></tbody>
</table>
<script>
const btn = document.getElementById("scan-btn");
const status = document.getElementById("status");
const results = document.getElementById("results");

btn.addEventListener("click", async () => {
  btn.disabled = true;
  status.textContent = "Scan in progress…";
  results.innerHTML = "";
  try {
    const res = await fetch("/scan", { method: "POST" });
    const data = await res.json();
    if (!res.ok || data.error) {
      status.textContent = "Scan failed: " + (data.error || "unknown error");
      return;
    }
    for (const p of data.ports) {
      const tr = document.createElement("tr");
      for (const v of [p.port, p.protocol, p.service, [p.product, p.version].filter(Boolean).join(" ")]) {
        const td = document.createElement("td");
        td.textContent = v;
        tr.appendChild(td);
      }
      results.appendChild(tr);
    }
    status.textContent = "Scan complete: " + data.ports.length + " open port(s)";
  } catch (err) {
    status.textContent = "Scan failed: " + err;
  } finally {
    btn.disabled = false;
  }
});
</script>
</body>
</html>
"#;
