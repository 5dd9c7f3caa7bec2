//! Fetch engine behavior against a scripted transport.

mod common;

use std::io::Write;
use std::sync::atomic::Ordering;

use flate2::Compression;
use flate2::write::GzEncoder;
use pagefetch::{CacheStore, ConnectionMode, FetchError, FetchOptions, Fetcher};
use tempfile::tempdir;

use common::{ScriptedConnector, manual_clock, ok, redirect};

#[test]
fn test_plain_get_wire_format() {
    let connector = ScriptedConnector::new([ok("hello", "")]);
    let fetcher = Fetcher::new(connector).with_options(FetchOptions::default().user_agent("test-agent"));

    let result = fetcher.fetch("http://example.org/index.html").unwrap();
    assert_eq!(result.body, b"hello");
    assert_eq!(result.effective_url, "http://example.org/index.html");

    let connector = fetcher_connector(&fetcher);
    assert_eq!(
        connector.request(0),
        "GET /index.html HTTP/1.1\r\n\
         Host: example.org\r\n\
         Connection: close\r\n\
         User-Agent: test-agent\r\n\
         Accept-Encoding: gzip\r\n\r\n"
    );
}

#[test]
fn test_keep_alive_and_extra_headers() {
    let connector = ScriptedConnector::new([ok("x", "")]);
    let options = FetchOptions::default()
        .user_agent("ua")
        .connection(ConnectionMode::KeepAlive)
        .header("Accept", "text/html");
    let fetcher = Fetcher::new(connector).with_options(options);

    fetcher.fetch("http://example.org:8080/").unwrap();
    assert_eq!(
        fetcher_connector(&fetcher).request(0),
        "GET / HTTP/1.1\r\n\
         Host: example.org:8080\r\n\
         Connection: keep-alive\r\n\
         Keep-Alive: timeout=20\r\n\
         User-Agent: ua\r\n\
         Accept-Encoding: gzip\r\n\
         Accept: text/html\r\n\r\n"
    );
}

#[test]
fn test_redirect_consumes_one_hop() {
    let connector = ScriptedConnector::new([redirect(301, "/new"), ok("landed", "")]);
    let fetcher = Fetcher::new(connector);

    let result = fetcher.fetch("http://example.org/old").unwrap();
    assert_eq!(result.body, b"landed");
    assert_eq!(result.effective_url, "http://example.org/new");

    let connector = fetcher_connector(&fetcher);
    assert_eq!(connector.connections(), 2);
    assert!(connector.request(1).starts_with("GET /new HTTP/1.1\r\n"));
    assert_eq!(connector.target(1).redirect_budget, 4);
}

#[test]
fn test_redirect_budget_exhausted() {
    let connector = ScriptedConnector::new((0..10).map(|i| redirect(302, &format!("/hop{}", i))));
    let fetcher = Fetcher::new(connector);

    let err = fetcher.fetch("http://example.org/").unwrap_err();
    assert!(matches!(err, FetchError::TooManyRedirects));
    assert_eq!(fetcher_connector(&fetcher).connections(), 5);
}

#[test]
fn test_budget_of_one_fails_on_first_redirect() {
    let connector = ScriptedConnector::new([redirect(302, "/next"), ok("never", "")]);
    let fetcher = Fetcher::new(connector);

    let err = fetcher.fetch_with("http://example.org/", false, 1).unwrap_err();
    assert!(matches!(err, FetchError::TooManyRedirects));
    assert_eq!(fetcher_connector(&fetcher).connections(), 1);
}

#[test]
fn test_view_source_survives_redirects() {
    let connector = ScriptedConnector::new([
        redirect(301, "https://secure.example/a"),
        redirect(302, "//cdn.example/b"),
        ok("<p>src</p>", ""),
    ]);
    let fetcher = Fetcher::new(connector);

    let result = fetcher.fetch("view-source:http://example.org/").unwrap();
    assert!(result.view_source);
    assert_eq!(result.effective_url, "view-source:https://cdn.example/b");

    let connector = fetcher_connector(&fetcher);
    let last = connector.target(2);
    assert!(last.secure);
    assert_eq!(last.port, 443);
    assert_eq!(last.host, "cdn.example");
}

#[test]
fn test_redirect_without_location() {
    let connector = ScriptedConnector::new(["HTTP/1.1 302 Found\r\nContent-Length: 0\r\n\r\n"]);
    let fetcher = Fetcher::new(connector);

    let err = fetcher.fetch("http://example.org/").unwrap_err();
    assert!(matches!(err, FetchError::MissingLocation { status: 302 }));
}

#[test]
fn test_redirect_to_local_file_rejected() {
    let connector = ScriptedConnector::new([redirect(302, "file:///etc/passwd")]);
    let fetcher = Fetcher::new(connector);

    let err = fetcher.fetch("http://example.org/").unwrap_err();
    assert!(matches!(err, FetchError::UnsupportedScheme(_)));
    assert_eq!(fetcher_connector(&fetcher).connections(), 1);
}

#[test]
fn test_cache_freshness_window() {
    let dir = tempdir().unwrap();
    let t0 = 1_700_000_000;
    let (now, options) = manual_clock(t0);
    let connector = ScriptedConnector::new([
        ok("first", "Cache-Control: max-age=100\r\n"),
        ok("second", "Cache-Control: max-age=100\r\n"),
    ]);
    let fetcher = Fetcher::new(connector)
        .with_options(options)
        .with_cache(CacheStore::new(dir.path()));

    assert_eq!(fetcher.fetch("http://example.org/page").unwrap().body, b"first");
    assert_eq!(fetcher_connector(&fetcher).connections(), 1);

    now.store(t0 + 50, Ordering::SeqCst);
    assert_eq!(fetcher.fetch("http://example.org/page").unwrap().body, b"first");
    assert_eq!(fetcher_connector(&fetcher).connections(), 1);

    now.store(t0 + 150, Ordering::SeqCst);
    assert_eq!(fetcher.fetch("http://example.org/page").unwrap().body, b"second");
    assert_eq!(fetcher_connector(&fetcher).connections(), 2);
}

#[test]
fn test_cache_key_ignores_port() {
    let dir = tempdir().unwrap();
    let (_now, options) = manual_clock(1_000);
    let connector = ScriptedConnector::new([ok("from 8080", "Cache-Control: max-age=60\r\n")]);
    let fetcher = Fetcher::new(connector)
        .with_options(options)
        .with_cache(CacheStore::new(dir.path()));

    fetcher.fetch("http://example.org:8080/p").unwrap();
    let result = fetcher.fetch("http://example.org/p").unwrap();
    assert_eq!(result.body, b"from 8080");
    assert_eq!(fetcher_connector(&fetcher).connections(), 1);
}

#[test]
fn test_no_store_is_not_cached() {
    let dir = tempdir().unwrap();
    let connector = ScriptedConnector::new([
        ok("one", "Cache-Control: no-store\r\n"),
        ok("two", "Cache-Control: no-store\r\n"),
    ]);
    let fetcher = Fetcher::new(connector).with_cache(CacheStore::new(dir.path()));

    assert_eq!(fetcher.fetch("http://example.org/").unwrap().body, b"one");
    assert_eq!(fetcher.fetch("http://example.org/").unwrap().body, b"two");
    assert!(!dir.path().join("http/example.org/_.html").exists());
}

#[test]
fn test_redirect_responses_are_not_cached() {
    let dir = tempdir().unwrap();
    let (_now, options) = manual_clock(1_000);
    let moved = "HTTP/1.1 301 Moved\r\nLocation: /dest\r\nCache-Control: max-age=600\r\nContent-Length: 0\r\n\r\n";
    let connector = ScriptedConnector::new([moved.to_string(), ok("dest", ""), moved.to_string(), ok("dest", "")]);
    let fetcher = Fetcher::new(connector)
        .with_options(options)
        .with_cache(CacheStore::new(dir.path()));

    fetcher.fetch("http://example.org/src").unwrap();
    fetcher.fetch("http://example.org/src").unwrap();
    assert_eq!(fetcher_connector(&fetcher).connections(), 4);
    assert!(!dir.path().join("http/example.org/src.json").exists());
}

#[test]
fn test_gzip_chunked_body() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b"<html><body>deflated</body></html>").unwrap();
    let compressed = encoder.finish().unwrap();

    let (head, tail) = compressed.split_at(compressed.len() / 2);
    let mut response =
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nContent-Encoding: gzip\r\n\r\n".to_vec();
    for chunk in [head, tail] {
        response.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        response.extend_from_slice(chunk);
        response.extend_from_slice(b"\r\n");
    }
    response.extend_from_slice(b"0\r\n\r\n");

    let fetcher = Fetcher::new(ScriptedConnector::new([response]));
    let result = fetcher.fetch("http://example.org/").unwrap();
    assert_eq!(result.text(), "<html><body>deflated</body></html>");
}

#[test]
fn test_connect_failure_propagates() {
    let fetcher = Fetcher::new(ScriptedConnector::default());
    let err = fetcher.fetch("http://example.org/").unwrap_err();
    assert!(matches!(err, FetchError::Connect { port: 80, .. }));
}

#[test]
fn test_data_url_needs_no_connection() {
    let fetcher = Fetcher::new(ScriptedConnector::default());
    let result = fetcher.fetch("data:text/html,%3Ch1%3EHi%3C%2Fh1%3E").unwrap();
    assert_eq!(result.body, b"<h1>Hi</h1>");
    assert_eq!(fetcher_connector(&fetcher).connections(), 0);
}

#[test]
fn test_unsupported_scheme() {
    let fetcher = Fetcher::new(ScriptedConnector::default());
    assert!(matches!(
        fetcher.fetch("ftp://example.org/").unwrap_err(),
        FetchError::UnsupportedScheme(s) if s == "ftp"
    ));
}

fn fetcher_connector(fetcher: &Fetcher<ScriptedConnector>) -> &ScriptedConnector { fetcher.connector() }
