//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full mirror cycle end-to-end.

use crate::{html, redirect};
use site_tap::config::HttpConfig;
use site_tap::crawler::{Fetcher, MirrorReport, SiteMirror};
use site_tap::state::PageState;
use site_tap::TapError;
use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_mirror(root: &str, output: &Path) -> Result<MirrorReport, TapError> {
    let fetcher = Fetcher::new(&HttpConfig::default()).expect("Failed to build fetcher");
    SiteMirror::new(fetcher, root, output)?.run().await
}

/// Host directory of a mock server, e.g. "127.0.0.1:41234"
fn host_dir(server: &MockServer) -> String {
    server
        .uri()
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}

fn relative(report: &MirrorReport) -> Vec<String> {
    report
        .files
        .iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect()
}

#[tokio::test]
async fn test_root_redirect_scenario() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(redirect("/docs/index.html"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/index.html"))
        .respond_with(html(
            r#"<html><body><a href="/docs/a.html">A</a> <a href="/docs/">Home</a></body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/a.html"))
        .respond_with(html(
            r#"<html><body><a href="index.html">Back</a><a href="./">Up</a></body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_mirror(&format!("{}/docs/", server.uri()), output.path())
        .await
        .expect("Mirror failed");

    let host = host_dir(&server);
    assert_eq!(
        relative(&report),
        vec![
            format!("{}/docs/a.html", host),
            format!("{}/docs/index.html", host)
        ]
    );
    assert_eq!(report.origin.base().path(), "/docs/");
    assert_eq!(report.count(PageState::Mirrored), 2);
    assert_eq!(report.count(PageState::Redirected), 1);

    let index = std::fs::read_to_string(output.path().join(&host).join("docs/index.html")).unwrap();
    assert!(index.contains("/docs/a.html"));
    assert!(output.path().join(&host).join("docs/a.html").is_file());
}

#[tokio::test]
async fn test_dedup_by_path_key() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/one.html">1</a>
               <a href="/two.html">2</a>
               <a href="/shared.html?page=2">shared with query</a>
               <a href="/shared.html#top">shared with fragment</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    for page in ["/one.html", "/two.html"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html(r#"<a href="/shared.html">shared</a><a href="/">root</a>"#))
            .expect(1)
            .mount(&server)
            .await;
    }

    // Query strings collapse onto one path-key
    Mock::given(method("GET"))
        .and(path("/shared.html"))
        .respond_with(html(r#"<a href="/one.html">cycle</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_mirror(&format!("{}/", server.uri()), output.path())
        .await
        .expect("Mirror failed");

    assert_eq!(report.files.len(), 4);
    assert_eq!(report.visited, 4);

    let host = host_dir(&server);
    for file in ["index.html", "one.html", "two.html", "shared.html"] {
        assert!(output.path().join(&host).join(file).is_file(), "{} missing", file);
    }
}

#[tokio::test]
async fn test_origin_boundary() {
    let server = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/docs/index.html"))
        .respond_with(html(&format!(
            r#"<a href="{}/docs/page.html">other host</a>
               <a href="/blog/post.html">outside prefix</a>
               <a href="/docs">no trailing slash</a>
               <a href="mailto:someone@example.com">mail</a>
               <a href="guide.html">inside</a>"#,
            elsewhere.uri()
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/guide.html"))
        .respond_with(html("<p>Guide</p>"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blog/post.html"))
        .respond_with(html("<p>Blog</p>"))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(html("<p>Docs</p>"))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(html("<p>Elsewhere</p>"))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let report = run_mirror(&format!("{}/docs/index.html", server.uri()), output.path())
        .await
        .expect("Mirror failed");

    let host = host_dir(&server);
    assert_eq!(
        relative(&report),
        vec![
            format!("{}/docs/guide.html", host),
            format!("{}/docs/index.html", host)
        ]
    );
    assert!(!output.path().join(host_dir(&elsewhere)).exists());
    assert!(!output.path().join(&host).join("blog").exists());
}

#[tokio::test]
async fn test_redirect_out_of_origin_not_mirrored() {
    let server = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/leave.html">leave</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/leave.html"))
        .respond_with(redirect(&format!("{}/landing.html", elsewhere.uri())))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/landing.html"))
        .respond_with(html(r#"<a href="/more.html">more</a>"#))
        .expect(1)
        .mount(&elsewhere)
        .await;

    Mock::given(method("GET"))
        .and(path("/more.html"))
        .respond_with(html("<p>More</p>"))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let report = run_mirror(&format!("{}/", server.uri()), output.path())
        .await
        .expect("Mirror failed");

    assert_eq!(relative(&report), vec![format!("{}/index.html", host_dir(&server))]);
    assert_eq!(report.count(PageState::OffOriginRedirect), 1);
    assert!(!output.path().join(host_dir(&elsewhere)).exists());
}

#[tokio::test]
async fn test_non_html_not_written_but_siblings_continue() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/manual.pdf">PDF</a>
               <a href="/data">Data</a>
               <a href="/about">About</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/manual.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"%PDF-1.4 <a href=\"/hidden.html\">".to_vec(), "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"a":1}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    // Links inside non-HTML bodies are never parsed
    Mock::given(method("GET"))
        .and(path("/hidden.html"))
        .respond_with(html("<p>Hidden</p>"))
        .expect(0)
        .mount(&server)
        .await;

    // Extensionless but served as HTML
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>About</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_mirror(&format!("{}/", server.uri()), output.path())
        .await
        .expect("Mirror failed");

    let host = host_dir(&server);
    assert_eq!(report.count(PageState::NonHtml), 2);
    assert!(!output.path().join(&host).join("manual.pdf").exists());
    assert!(!output.path().join(&host).join("data").exists());
    assert!(output.path().join(&host).join("about/index.html").is_file());
    assert!(output.path().join(&host).join("index.html").is_file());
}

#[tokio::test]
async fn test_failed_branch_does_not_abort_siblings() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/broken.html">broken</a>
               <a href="/error.html">error</a>
               <a href="/fine.html">fine</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken.html"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    // No retries after a server error
    Mock::given(method("GET"))
        .and(path("/error.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fine.html"))
        .respond_with(html(r#"<a href="/broken.html">again</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_mirror(&format!("{}/", server.uri()), output.path())
        .await
        .expect("Mirror failed");

    let host = host_dir(&server);
    assert_eq!(report.count(PageState::Failed), 2);
    assert_eq!(
        relative(&report),
        vec![format!("{}/fine.html", host), format!("{}/index.html", host)]
    );
}

#[tokio::test]
async fn test_root_failure_is_fatal() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = run_mirror(&format!("{}/", server.uri()), output.path()).await;

    match result {
        Err(TapError::RootFetch { source, .. }) => assert_eq!(source.status(), Some(503)),
        other => panic!("expected RootFetch error, got {:?}", other.map(|r| r.files)),
    }
    assert_eq!(
        std::fs::read_dir(output.path()).unwrap().count(),
        0,
        "nothing should be written"
    );
}

#[tokio::test]
async fn test_deep_chain_is_iterative() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();

    const DEPTH: usize = 200;
    for i in 0..DEPTH {
        Mock::given(method("GET"))
            .and(path(format!("/p{}.html", i)))
            .respond_with(html(&format!(r#"<a href="/p{}.html">next</a>"#, i + 1)))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(format!("/p{}.html", DEPTH)))
        .respond_with(html(r#"<a href="/p0.html">start</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_mirror(&format!("{}/p0.html", server.uri()), output.path())
        .await
        .expect("Mirror failed");

    assert_eq!(report.files.len(), DEPTH + 1);

    // Deepest page is persisted first
    let first: PathBuf = report.files[0].clone();
    assert!(first.ends_with(format!("p{}.html", DEPTH)));
}

#[tokio::test]
async fn test_path_collision_first_write_wins() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/about">about</a><a href="/about/">about dir</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>first</p>"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about/"))
        .respond_with(html("<p>second</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_mirror(&format!("{}/", server.uri()), output.path())
        .await
        .expect("Mirror failed");

    let written = output
        .path()
        .join(host_dir(&server))
        .join("about/index.html");
    assert_eq!(std::fs::read_to_string(written).unwrap(), "<p>first</p>");
    assert_eq!(report.count(PageState::PathCollision), 1);
    assert_eq!(report.files.len(), 2);
}

#[tokio::test]
async fn test_file_directory_clash_keeps_crawling() {
    let server = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/v1.0">v1.0</a><a href="/other.html">other</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    // "v1.0" has an extension, so it maps to a file that its own child needs
    // as a directory
    Mock::given(method("GET"))
        .and(path("/v1.0"))
        .respond_with(html(r#"<a href="/v1.0/intro.html">intro</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/intro.html"))
        .respond_with(html("<p>Intro</p>"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/other.html"))
        .respond_with(html("<p>Other</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_mirror(&format!("{}/", server.uri()), output.path())
        .await
        .expect("Mirror failed");

    let host = host_dir(&server);
    assert_eq!(
        relative(&report),
        vec![
            format!("{}/v1.0/intro.html", host),
            format!("{}/other.html", host),
            format!("{}/index.html", host)
        ]
    );
    assert_eq!(report.count(PageState::PathCollision), 1);
    assert!(output.path().join(&host).join("v1.0").is_dir());
    assert!(output.path().join(&host).join("other.html").is_file());
}
