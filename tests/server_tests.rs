use std::path::PathBuf;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use labscan_rs::config::Config;
use labscan_rs::server::{router, AppState};
use labscan_rs::types::{ErrorResponse, ScanResponse};

fn fake_tool(name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let dir = std::env::temp_dir().join("labscan-server-tests");
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    std::fs::write(&path, script).expect("write fake tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod +x");
    path
}

fn app_with_tool(target: &str, tool: &str) -> axum::Router {
    router(AppState::new(Config::new(
        target,
        tool,
        Duration::from_secs(5),
    )))
}

async fn body_string(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn landing_page_shows_the_configured_target() {
    let app = app_with_tool("192.0.2.7", "nmap");
    let res = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_string(res).await;
    assert!(html.contains("192.0.2.7"));
    assert!(!html.contains("{{target}}"));
}

#[tokio::test]
async fn scan_endpoint_returns_target_and_sorted_ports() {
    let tool = fake_tool(
        "nmap-ok",
        r#"#!/bin/sh
cat <<'EOF'
<?xml version="1.0"?>
<nmaprun><host><ports>
<port protocol="tcp" portid="80"><state state="open"/><service name="http" product="Apache" version="2.4"/></port>
<port protocol="tcp" portid="22"><state state="open"/></port>
<port protocol="tcp" portid="443"><state state="closed"/></port>
</ports></host></nmaprun>
EOF
"#,
    );
    let app = app_with_tool("10.0.0.5", tool.to_str().unwrap());
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/scan")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: ScanResponse = serde_json::from_str(&body_string(res).await).expect("json");
    assert_eq!(body.target, "10.0.0.5");
    let summary: Vec<(u16, &str)> = body
        .ports
        .iter()
        .map(|p| (p.port, p.service.as_str()))
        .collect();
    assert_eq!(summary, vec![(22, "unknown"), (80, "http")]);
    assert_eq!(body.ports[1].product, "Apache");
    assert_eq!(body.ports[1].version, "2.4");
}

#[tokio::test]
async fn tool_failure_becomes_a_json_500() {
    let tool = fake_tool(
        "nmap-fail",
        r#"#!/bin/sh
echo 'connection refused' >&2
exit 2
"#,
    );
    let app = app_with_tool("10.0.0.5", tool.to_str().unwrap());
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/scan")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = serde_json::from_str(&body_string(res).await).expect("json");
    assert!(body.error.contains("connection refused"), "{}", body.error);
}

#[tokio::test]
async fn malformed_report_becomes_a_json_500() {
    let tool = fake_tool(
        "nmap-garbage",
        r#"#!/bin/sh
echo 'Starting Nmap 7.94 ( https://nmap.org )'
"#,
    );
    let app = app_with_tool("10.0.0.5", tool.to_str().unwrap());
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/scan")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = serde_json::from_str(&body_string(res).await).expect("json");
    assert!(body.error.contains("malformed scan report"), "{}", body.error);
}

#[tokio::test]
async fn unlaunchable_tool_becomes_a_json_500() {
    let app = app_with_tool("10.0.0.5", "/nonexistent/labscan-no-such-nmap");
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/scan")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = serde_json::from_str(&body_string(res).await).expect("json");
    assert!(body.error.contains("failed to launch"), "{}", body.error);
}
