//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full check cycle end-to-end: crawl, reconcile, report, exit code.

use linkcheck::config::{build_config, CliOverrides, FileConfig};
use linkcheck::crawler::run_check;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Runs a full check and returns the exit code and the report text
async fn check(root: &str, crawlers: usize, exclude: Vec<String>) -> (i32, String) {
    check_with_token(root, crawlers, exclude, CancellationToken::new()).await
}

async fn check_with_token(
    root: &str,
    crawlers: usize,
    exclude: Vec<String>,
    cancel: CancellationToken,
) -> (i32, String) {
    let config = build_config(
        FileConfig::default(),
        CliOverrides {
            root: Some(root.to_string()),
            crawlers: Some(crawlers),
            exclude,
        },
    )
    .expect("Failed to build config");

    let mut output = Vec::new();
    let code = run_check(&config, cancel, &mut output)
        .await
        .expect("Check failed");

    (code, String::from_utf8(output).expect("Report is not UTF-8"))
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><head><title>t</title></head><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

/// Mounts a page that must be requested exactly `times` times
async fn mount_page_expect(server: &MockServer, route: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .expect(times)
        .mount(server)
        .await;
}

/// The sample site: basic, circular, fragment and exclusion pages
async fn sample_site(server: &MockServer, external: &MockServer) {
    mount_page(server, "/basic-a.html", r#"<a href="basic-b.html">B</a>"#).await;
    mount_page(server, "/basic-b.html", r#"<a href="basic-a.html">A</a>"#).await;

    mount_page(
        server,
        "/id-good-a.html",
        r##"<a href="id-good-b.html#section">B</a><a href="#local">here</a><p id="local">x</p>"##,
    )
    .await;
    mount_page(server, "/id-good-b.html", r#"<h2 id="section">Section</h2>"#).await;

    mount_page(server, "/id-bad-a.html", r##"<a href="id-bad-b.html#section">B</a>"##).await;
    mount_page(server, "/id-bad-b.html", r#"<h2 id="other">Other</h2>"#).await;

    mount_page(
        server,
        "/external-good.html",
        &format!(r#"<a href="{}/page.html#exists">ext</a>"#, external.uri()),
    )
    .await;
    mount_page(
        server,
        "/external-bad.html",
        &format!(r#"<a href="{}/404">ext</a>"#, external.uri()),
    )
    .await;
    mount_page(
        server,
        "/excluded.html",
        &format!(r#"<a href="{}/excluded-path">skip</a>"#, external.uri()),
    )
    .await;

    mount_page(
        external,
        "/page.html",
        r#"<p id="exists">x</p><a href="/not-traversed">deeper</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/not-traversed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(external)
        .await;
    Mock::given(method("GET"))
        .and(path("/excluded-path"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(external)
        .await;
}

#[tokio::test]
async fn test_basic_failure() {
    let server = MockServer::start().await;
    let root = format!("{}/404", server.uri());

    for crawlers in [1, 5] {
        let (code, output) = check(&root, crawlers, vec![]).await;
        assert_eq!(code, 1, "crawlers={}", crawlers);
        assert!(
            output.contains("/404: 404 Not Found"),
            "unexpected output {:?}",
            output
        );
    }
}

#[tokio::test]
async fn test_basic_success() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;
    sample_site(&server, &external).await;
    let root = format!("{}/basic-a.html", server.uri());

    for crawlers in [1, 5] {
        let (code, output) = check(&root, crawlers, vec![]).await;
        assert_eq!(code, 0, "crawlers={}", crawlers);
        assert_eq!(output, "");
    }
}

#[tokio::test]
async fn test_circular_links_fetched_once() {
    let server = MockServer::start().await;
    mount_page_expect(&server, "/", r#"<a href="/circular-b.html">B</a>"#, 1).await;
    mount_page_expect(
        &server,
        "/circular-b.html",
        r##"<a href="/">home</a><a href="/#top">top</a><a href="circular-b.html">self</a>"##,
        1,
    )
    .await;

    let (code, output) = check(&format!("{}/", server.uri()), 3, vec![]).await;

    // The root has no id "top"
    assert_eq!(code, 1);
    assert_eq!(
        output,
        format!(
            "{}/circular-b.html: missing fragment: {}/#top\n",
            server.uri(),
            server.uri()
        )
    );
}

#[tokio::test]
async fn test_cycle_without_defects() {
    let server = MockServer::start().await;
    mount_page_expect(&server, "/", r#"<a href="/circular-b.html">B</a>"#, 1).await;
    mount_page_expect(&server, "/circular-b.html", r#"<a href="/">home</a>"#, 1).await;

    let (code, output) = check(&format!("{}/", server.uri()), 4, vec![]).await;
    assert_eq!(code, 0);
    assert_eq!(output, "");
    // Dropping the server verifies each page was requested exactly once
}

#[tokio::test]
async fn test_good_external_link() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;
    sample_site(&server, &external).await;

    let (code, output) = check(&format!("{}/external-good.html", server.uri()), 1, vec![]).await;
    assert_eq!(code, 0, "unexpected output {:?}", output);
    assert_eq!(output, "");
}

#[tokio::test]
async fn test_bad_external_link() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;
    sample_site(&server, &external).await;

    let (code, output) = check(&format!("{}/external-bad.html", server.uri()), 1, vec![]).await;
    assert_eq!(code, 1);
    assert!(output.contains(&format!("failed to fetch: {}/404", external.uri())));
    assert!(output.contains(&format!("{}/404: 404 Not Found", external.uri())));
}

#[tokio::test]
async fn test_good_id_link() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;
    sample_site(&server, &external).await;

    let (code, output) = check(&format!("{}/id-good-a.html", server.uri()), 1, vec![]).await;
    assert_eq!(code, 0, "unexpected output {:?}", output);
    assert_eq!(output, "");
}

#[tokio::test]
async fn test_bad_id_link() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;
    sample_site(&server, &external).await;

    let (code, output) = check(&format!("{}/id-bad-a.html", server.uri()), 1, vec![]).await;
    assert_eq!(code, 1);
    assert!(output.contains("missing fragment"));
    assert!(output.contains("id-bad-b.html#section"));
}

#[tokio::test]
async fn test_excluded_path() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;
    sample_site(&server, &external).await;

    let exclude = vec![format!("{}/excluded-path", external.uri())];
    let (code, output) = check(&format!("{}/excluded.html", server.uri()), 1, exclude).await;
    assert_eq!(code, 0, "unexpected output {:?}", output);
    assert_eq!(output, "");
}

#[tokio::test]
async fn test_non_html_resource_is_reachable() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/data.json">data</a><a href="/logo.png">logo</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"id": "x"}"#)
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG\x0D\x0A\x1A\x0A....".to_vec()))
        .mount(&server)
        .await;

    let (code, output) = check(&format!("{}/", server.uri()), 2, vec![]).await;
    assert_eq!(code, 0, "unexpected output {:?}", output);
}

#[tokio::test]
async fn test_invalid_href_reported_without_aborting() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="http://[oops">bad</a><a href="/next.html">next</a>"#,
    )
    .await;
    mount_page_expect(&server, "/next.html", "fine", 1).await;

    let (code, output) = check(&format!("{}/", server.uri()), 2, vec![]).await;
    assert_eq!(code, 1);
    assert!(output.contains("invalid link \"http://[oops\""), "{:?}", output);
    assert_eq!(output.lines().count(), 1);
}

#[tokio::test]
async fn test_defects_independent_of_crawler_count() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(
        &server,
        "/",
        r##"<a href="/a.html">a</a><a href="/b.html#b1">b</a><a href="/gone.html">gone</a><a href="/c.html#nope">c</a>"##,
    )
    .await;
    mount_page(
        &server,
        "/a.html",
        r##"<a href="/b.html#b2">b</a><a href="/missing.html#x">m</a><a href="/">home</a>"##,
    )
    .await;
    mount_page(
        &server,
        "/b.html",
        r##"<p id="b1">b1</p><a href="/c.html">c</a><a href="/a.html#a9">a</a>"##,
    )
    .await;
    mount_page(&server, "/c.html", r#"<p id="c1">c</p>"#).await;

    let root = format!("{}/", base);
    let (code_one, report_one) = check(&root, 1, vec![]).await;
    let (code_many, report_many) = check(&root, 8, vec![]).await;

    assert_eq!(code_one, 1);
    assert_eq!(code_one, code_many);
    assert_eq!(report_one, report_many);

    let expected = vec![
        format!("{}/gone.html: 404 Not Found", base),
        format!("{}/missing.html: 404 Not Found", base),
        format!("{}/: failed to fetch: {}/gone.html", base, base),
        format!("{}/: missing fragment: {}/c.html#nope", base, base),
        format!("{}/a.html: missing fragment: {}/b.html#b2", base, base),
        format!("{}/a.html: failed to fetch: {}/missing.html#x", base, base),
        format!("{}/b.html: missing fragment: {}/a.html#a9", base, base),
    ];
    assert_eq!(report_one.lines().collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn test_cancellation_reports_partial_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            html_page(r#"<a href="/child.html">child</a>"#).set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page_expect(&server, "/child.html", "never fetched", 0).await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let (code, output) = check_with_token(&format!("{}/", server.uri()), 2, vec![], cancel).await;

    // The in-flight root fetch was still folded in, so its link shows up as unvisited
    assert_eq!(code, 3);
    assert!(output.contains(&format!("failed to fetch: {}/child.html", server.uri())));
}
