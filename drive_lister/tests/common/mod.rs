//! Shared fixtures for tests that talk to a mocked token endpoint and Drive API.

#![allow(dead_code)]

use drive_lister::{DriveConfig, FolderLister};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;

pub const TEST_TOKEN: &str = "test-access-token";
pub const CLIENT_EMAIL: &str = "lister@test-project.iam.gserviceaccount.com";

/// Service account payload whose token endpoint points at `server`.
pub fn service_account_key(server: &ServerGuard) -> String {
    json!({
        "type": "service_account",
        "project_id": "test-project",
        "private_key_id": "test-key-id",
        "private_key": include_str!("../fixtures/test_key.pem"),
        "client_email": CLIENT_EMAIL,
        "client_id": "123456789",
        "token_uri": format!("{}/token", server.url()),
    })
    .to_string()
}

/// A lister that sends both token and API requests to `server`.
pub fn lister(server: &ServerGuard, config: DriveConfig) -> FolderLister {
    FolderLister::with_client(&config, reqwest::Client::new())
        .unwrap()
        .with_api_base(server.url())
}

/// Token endpoint mock handing out [`TEST_TOKEN`]. Not yet created.
pub fn token_mock(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/token")
        .match_body(Matcher::Regex(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer".to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "access_token": TEST_TOKEN,
                "token_type": "Bearer",
                "expires_in": 3600
            })
            .to_string(),
        )
}

/// `files.list` mock matching the exact `q` and `fields` parameters. Not yet created.
pub fn list_mock(
    server: &mut ServerGuard,
    q: &str,
    fields: &str,
    body: serde_json::Value,
) -> Mock {
    server
        .mock("GET", "/files")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".to_string(), q.to_string()),
            Matcher::UrlEncoded("fields".to_string(), fields.to_string()),
        ]))
        .match_header("authorization", format!("Bearer {}", TEST_TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
}
