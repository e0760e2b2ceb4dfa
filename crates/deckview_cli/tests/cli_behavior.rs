//! Integration tests for CLI behavior
//!
//! These tests run the `deckview` binary against a mock slide server.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a command for the deckview CLI
fn deckview_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_deckview"))
}

/// Mock server kept alive together with the runtime driving it.
struct SlideServer {
    server: MockServer,
    _runtime: Runtime,
}

impl SlideServer {
    fn uri(&self) -> String {
        format!("{}/", self.server.uri())
    }
}

fn respond(body: &str, content_type: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), content_type)
}

/// Serves a two-slide deck whose second slide is missing when `broken`.
fn start_server(broken: bool) -> SlideServer {
    let runtime = Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slides/index.md"))
            .respond_with(respond(
                "* [Intro](a.md)\n* [Details](b.html)\n",
                "text/markdown",
            ))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/slides/a.md"))
            .respond_with(respond("# Intro\n\n<script>alert(1)</script>", "text/markdown"))
            .mount(&server)
            .await;

        let details = if broken {
            ResponseTemplate::new(404)
        } else {
            respond("<h1>Details</h1>", "text/html")
        };
        Mock::given(method("GET"))
            .and(path("/slides/b.html"))
            .respond_with(details)
            .mount(&server)
            .await;

        server
    });

    SlideServer {
        server,
        _runtime: runtime,
    }
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        deckview_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        deckview_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

mod list_command {
    use super::*;

    #[test]
    fn lists_slides_as_text() {
        let server = start_server(false);

        deckview_cmd()
            .args(["--base-url", &server.uri(), "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Intro"))
            .stdout(predicate::str::contains("/slides/b.html"))
            .stdout(predicate::str::contains("2 slides"));
    }

    #[test]
    fn lists_slides_as_json() {
        let server = start_server(false);

        let output = deckview_cmd()
            .args(["--base-url", &server.uri(), "list", "--format", "json"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "index": 0, "title": "Intro", "address": "/slides/a.md" },
                { "index": 1, "title": "Details", "address": "/slides/b.html" },
            ])
        );
    }

    #[test]
    fn fails_when_no_index_is_found() {
        let runtime = Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());

        deckview_cmd()
            .args(["--base-url", &format!("{}/", server.uri()), "list"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Unable to load slide show"));
    }
}

mod show_command {
    use super::*;

    #[test]
    fn prints_sanitized_slide() {
        let server = start_server(false);

        deckview_cmd()
            .args(["--base-url", &server.uri(), "show", "0"])
            .assert()
            .success()
            .stdout(predicate::str::contains("<h1>Intro</h1>"))
            .stdout(predicate::str::contains("<script>").not());
    }

    #[test]
    fn failed_slide_exits_with_one() {
        let server = start_server(true);

        deckview_cmd()
            .args(["--base-url", &server.uri(), "show", "1"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("/slides/b.html"));
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let server = start_server(false);

        deckview_cmd()
            .args(["--base-url", &server.uri(), "show", "5"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("out of range"));
    }
}

mod export_command {
    use super::*;
    use std::fs;

    #[test]
    fn writes_every_slide_and_manifest() {
        let server = start_server(false);
        let dir = tempdir().unwrap();
        let out = dir.path().join("deck");

        deckview_cmd()
            .args(["--base-url", &server.uri(), "export"])
            .arg(&out)
            .assert()
            .success();

        assert!(fs::read_to_string(out.join("000.html")).unwrap().contains("<h1>Intro</h1>"));
        assert_eq!(
            fs::read_to_string(out.join("001.html")).unwrap(),
            "<h1>Details</h1>"
        );
        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("index.json")).unwrap()).unwrap();
        assert_eq!(manifest.as_array().unwrap().len(), 2);
    }

    #[test]
    fn failed_slide_gets_placeholder() {
        let server = start_server(true);
        let dir = tempdir().unwrap();

        deckview_cmd()
            .args(["--base-url", &server.uri(), "export"])
            .arg(dir.path())
            .assert()
            .code(1);

        let placeholder = fs::read_to_string(dir.path().join("001.html")).unwrap();
        assert!(placeholder.contains("slide-error"));
        assert!(placeholder.contains("Details"));
    }
}

mod config_file {
    use super::*;
    use std::fs;

    #[test]
    fn reads_config_from_working_directory() {
        let server = start_server(false);
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(".deckview.jsonc"),
            format!(
                "{{\n  // local server\n  \"base_url\": \"{}\",\n}}",
                server.uri()
            ),
        )
        .unwrap();

        deckview_cmd()
            .current_dir(dir.path())
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("Details"));
    }

    #[test]
    fn rejects_invalid_config() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("deck.json");
        fs::write(&config, r#"{ "timeout_secs": 0 }"#).unwrap();

        deckview_cmd()
            .arg("--config")
            .arg(&config)
            .arg("list")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Config validation failed"));
    }
}
