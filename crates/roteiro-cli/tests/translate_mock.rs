//! `roteiro translate` against a mock translation endpoint.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::{TempDir, tempdir};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn seed_script(home: &TempDir) {
    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .arg("edit")
        .write_stdin("1 - sala\nANA\n- bom dia\n\n2 - rua\n")
        .assert()
        .success();
}

#[tokio::test]
async fn test_translate_sends_dialogues_view() {
    let home = tempdir().unwrap();
    seed_script(&home);

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get"))
        .and(body_string_contains("langpair=pt%7Ces"))
        .and(body_string_contains("q=1%0AANA%0A-+bom+dia"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseData": { "translatedText": "1\nANA\n- buenos días" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .env("ROTEIRO_TRANSLATE_URL", format!("{}/get", mock_server.uri()))
        .arg("translate")
        .assert()
        .success()
        .stdout(predicate::str::contains("- buenos días"));
}

#[tokio::test]
async fn test_translate_failure_is_reported() {
    let home = tempdir().unwrap();
    seed_script(&home);

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .env("ROTEIRO_TRANSLATE_URL", format!("{}/get", mock_server.uri()))
        .arg("translate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Translation failed: HTTP 500"));
}

#[tokio::test]
async fn test_failed_translation_keeps_previous_one() {
    let home = tempdir().unwrap();
    seed_script(&home);

    let ok_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseData": { "translatedText": "hola" }
        })))
        .mount(&ok_server)
        .await;
    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .env("ROTEIRO_TRANSLATE_URL", format!("{}/get", ok_server.uri()))
        .arg("translate")
        .assert()
        .success();

    let bad_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "responseData": {} })))
        .mount(&bad_server)
        .await;
    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .env("ROTEIRO_TRANSLATE_URL", format!("{}/get", bad_server.uri()))
        .arg("translate")
        .assert()
        .failure();

    let raw = std::fs::read_to_string(home.path().join("store.json")).unwrap();
    let store: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(store["roteiro_translation"], "hola");
}

#[test]
fn test_invalid_translate_url_fails() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("roteiro")
        .env("ROTEIRO_HOME", home.path())
        .env("ROTEIRO_TRANSLATE_URL", "not a url")
        .arg("translate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid translation URL"));
}
