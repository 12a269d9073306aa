use std::time::Duration;

use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Html;
use axum::routing::get;
use sitelens_client::WebContentFetcher;
use sitelens_client::fetcher::{DEFAULT_USER_AGENT, default_headers};
use sitelens_core::traits::PageFetcher;

use crate::integration::common::{FIXTURE_HTML, refused_url, spawn_stub};

#[tokio::test]
async fn fetches_and_strips_fixture() {
    let base = spawn_stub(Router::new().route("/", get(|| async { Html(FIXTURE_HTML) }))).await;
    let fetcher = WebContentFetcher::new().unwrap();

    let page = fetcher.fetch(&format!("{base}/")).await;

    assert_eq!(page.title, "Acme Anvils");
    assert_eq!(page.text, "A\nB\nC");
    assert!(!page.is_fetch_failure());
}

#[tokio::test]
async fn sends_configured_user_agent() {
    let app = Router::new().route(
        "/",
        get(|headers: HeaderMap| async move {
            let agent = headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
                .to_string();
            Html(format!("<html><body><p>{agent}</p></body></html>"))
        }),
    );
    let base = spawn_stub(app).await;
    let fetcher = WebContentFetcher::new().unwrap();

    let page = fetcher.fetch(&format!("{base}/")).await;

    assert_eq!(page.text, DEFAULT_USER_AGENT);
}

#[tokio::test]
async fn non_success_status_becomes_sentinel() {
    let app = Router::new().route("/missing", get(|| async { StatusCode::NOT_FOUND }));
    let base = spawn_stub(app).await;
    let fetcher = WebContentFetcher::new().unwrap();
    let url = format!("{base}/missing");

    let page = fetcher.fetch(&url).await;

    assert_eq!(page.url, url);
    assert_eq!(page.title, "Error");
    assert_eq!(
        page.text,
        format!("Failed to fetch website: HTTP error: HTTP 404 for {url}")
    );
}

#[tokio::test]
async fn connection_refused_becomes_sentinel() {
    let fetcher = WebContentFetcher::new().unwrap();

    let page = fetcher.fetch(&refused_url().await).await;

    assert_eq!(page.title, "Error");
    assert!(page.text.starts_with("Failed to fetch website: "));
    assert!(page.is_fetch_failure());
}

#[tokio::test]
async fn slow_page_times_out() {
    let app = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Html("<html><body>late</body></html>")
        }),
    );
    let base = spawn_stub(app).await;
    let fetcher = WebContentFetcher::with_headers(
        default_headers(DEFAULT_USER_AGENT).unwrap(),
        Duration::from_secs(1),
    )
    .unwrap();

    let page = fetcher.fetch(&format!("{base}/slow")).await;

    assert_eq!(page.title, "Error");
    assert!(page.text.contains("timed out after 1 seconds"), "{}", page.text);
}

#[tokio::test]
async fn fetch_html_surfaces_typed_errors() {
    let fetcher = WebContentFetcher::new().unwrap();

    let err = fetcher.fetch_html(&refused_url().await).await.unwrap_err();

    assert!(err.is_retryable(), "{err}");
}
