//! End-to-end tests for a deck served over HTTP
//!
//! Exercises discovery, neighbourhood prefetch, single-flight fetching and
//! sanitization through the real HTTP fetcher.

use std::sync::Arc;
use std::time::Duration;

use deckview_core::{Deck, DeckConfig, DeckError, EntryState, Slide, ViewportRange};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn respond(body: &str, content_type: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), content_type)
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn deck_for(server: &MockServer) -> Deck {
    let config = DeckConfig::new().with_base_url(format!("{}/", server.uri()));
    Deck::builder(config).build().unwrap()
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn falls_back_to_html_index_and_prefetches_neighbor() {
    let server = MockServer::start().await;
    mount(&server, "/slides/index.md", ResponseTemplate::new(404)).await;
    mount(
        &server,
        "/slides/index.html",
        respond(
            r#"<ul><li><a href="a.md">Intro</a></li><li><a href="b.html">Details</a></li><li><a href="c.md">Outro</a></li></ul>"#,
            "text/html; charset=utf-8",
        ),
    )
    .await;
    mount(&server, "/slides/a.md", respond("# Intro\n\nHello *world*.", "text/markdown")).await;
    mount(&server, "/slides/b.html", respond("<h1>Details</h1>", "text/html")).await;
    mount(&server, "/slides/c.md", respond("# Outro", "text/markdown")).await;

    let deck = deck_for(&server);
    assert_eq!(deck.load().await.unwrap(), 3);
    assert_eq!(
        deck.slides().unwrap(),
        vec![
            Slide::new("/slides/a.md", "Intro"),
            Slide::new("/slides/b.html", "Details"),
            Slide::new("/slides/c.md", "Outro"),
        ]
    );
    assert_eq!(
        requested_paths(&server).await,
        vec!["/slides/index.md", "/slides/index.html"]
    );

    let body = deck.display(0).unwrap().wait().await.unwrap();
    assert_eq!(&*body, "<h1>Intro</h1>\n<p>Hello <em>world</em>.</p>");
    assert_eq!(deck.focus(), 0);

    let cache = deck.cache().unwrap();
    cache.await_ready(1).await.unwrap();
    assert_eq!(cache.state(2).unwrap(), EntryState::Uncached);

    let mut slide_requests: Vec<_> = requested_paths(&server).await.split_off(2);
    slide_requests.sort();
    assert_eq!(slide_requests, vec!["/slides/a.md", "/slides/b.html"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_displays_fetch_each_slide_once() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/slides/index.md",
        respond("* [One](one.md)\n* [Two](two.md)\n", "text/markdown"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slides/one.md"))
        .respond_with(respond("# One", "text/markdown").set_delay(Duration::from_millis(100)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slides/two.md"))
        .respond_with(respond("# Two", "text/markdown"))
        .expect(1)
        .mount(&server)
        .await;

    let deck = deck_for(&server);
    deck.load().await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..32 {
        let deck = deck.clone();
        tasks.push(tokio::spawn(async move {
            deck.display(0).unwrap().wait().await.unwrap()
        }));
    }

    let mut bodies = Vec::new();
    for task in tasks {
        bodies.push(task.await.unwrap());
    }
    assert!(bodies.iter().all(|body| Arc::ptr_eq(body, &bodies[0])));
    assert_eq!(&*bodies[0], "<h1>One</h1>");

    deck.cache().unwrap().await_ready(1).await.unwrap();
    // Mock expectations are verified when the server is dropped.
}

#[tokio::test]
async fn failed_slide_does_not_affect_others() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/slides/index.md",
        respond("* [Good](good.md)\n* [Bad](bad.md)\n", "text/markdown"),
    )
    .await;
    mount(&server, "/slides/good.md", respond("# Good", "text/markdown")).await;
    mount(&server, "/slides/bad.md", ResponseTemplate::new(500)).await;

    let deck = deck_for(&server);
    deck.load().await.unwrap();

    deck.display(0).unwrap().wait().await.unwrap();
    let err = deck.display(1).unwrap().wait().await.unwrap_err();

    assert!(matches!(err, DeckError::Slide { index: 1, .. }));
    assert!(err.to_string().contains("/slides/bad.md"));
    assert_eq!(deck.focus(), 0);

    let stats = deck.cache().unwrap().stats();
    assert_eq!((stats.ready, stats.failed), (1, 1));
}

#[tokio::test]
async fn scripts_never_reach_the_display() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/slides/index.md",
        respond("* [Evil](evil.html)\n", "text/markdown"),
    )
    .await;
    mount(
        &server,
        "/slides/evil.html",
        respond(
            r#"<h1 onclick="steal()">Hi</h1><script>steal()</script><a href="javascript:steal()">x</a>"#,
            "text/html",
        ),
    )
    .await;

    let deck = deck_for(&server);
    deck.load().await.unwrap();
    let body = deck.display(0).unwrap().wait().await.unwrap();

    assert!(!body.contains("script"));
    assert!(!body.contains("onclick"));
    assert!(!body.contains("javascript:"));
    assert!(body.contains("<h1>Hi</h1>"));
}

#[tokio::test]
async fn viewport_prefetch_is_independent_of_focus() {
    let server = MockServer::start().await;
    let index: String = (0..6).map(|i| format!("* [S{i}](s{i}.md)\n")).collect();
    mount(&server, "/slides/index.md", respond(&index, "text/markdown")).await;
    for i in 0..6 {
        mount(
            &server,
            &format!("/slides/s{i}.md"),
            respond(&format!("# S{i}"), "text/markdown"),
        )
        .await;
    }

    let deck = deck_for(&server);
    deck.load().await.unwrap();

    let requested = deck.prefetch_viewport(ViewportRange::new(4, 5)).unwrap();
    assert_eq!(requested, vec![3, 4, 5]);

    let cache = deck.cache().unwrap();
    for index in &requested {
        cache.await_ready(*index).await.unwrap();
    }
    assert_eq!(cache.state(0).unwrap(), EntryState::Uncached);
    assert_eq!(deck.focus(), 0);
}

#[tokio::test]
async fn discovery_failure_lists_every_candidate() {
    let server = MockServer::start().await;

    let deck = deck_for(&server);
    let err = deck.load().await.unwrap_err();

    let DeckError::Discovery(discovery) = err else {
        panic!("expected discovery error, got {err:?}");
    };
    assert_eq!(discovery.attempts.len(), 4);
    assert_eq!(
        requested_paths(&server).await,
        vec![
            "/slides/index.md",
            "/slides/index.html",
            "/slides/index.htm",
            "/slides"
        ]
    );
}
