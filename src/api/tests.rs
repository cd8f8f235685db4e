//! Tests for the Box content wrapper

use super::*;
use crate::auth::{Credentials, Subject};
use crate::config::{BoxConfig, ClientSettings, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_DEVELOPER_TOKEN};
use crate::types::AuthType;
use std::collections::HashMap;
use crate::document::Document;
use crate::error::{Error, ErrorKind};
use crate::query::QueryDescriptor;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_settings(server: &MockServer) -> ClientSettings {
    ClientSettings {
        requests_per_second: None,
        representation_poll_interval_ms: 0,
        ..ClientSettings::default().with_base_url(server.uri())
    }
}

fn token_wrapper(server: &MockServer) -> BoxApiWrapper {
    BoxApiWrapper::new(
        Credentials::Token {
            token: "T".to_string(),
        },
        test_settings(server),
    )
}

fn content_path(file_id: &str) -> String {
    format!("/2.0/internal_files/{file_id}/versions/1/representations/extracted_text/content/")
}

fn info_path(file_id: &str) -> String {
    format!("/2.0/internal_files/{file_id}/versions/1/representations/extracted_text")
}

fn file_body(server: &MockServer, file_id: &str, name: &str, state: &str) -> Value {
    json!({
        "type": "file",
        "id": file_id,
        "name": name,
        "representations": {
            "entries": [
                {
                    "representation": "jpg",
                    "status": {"state": "success"},
                    "content": {"url_template": format!("{}/thumb/{{+asset_path}}", server.uri())}
                },
                {
                    "representation": "extracted_text",
                    "status": {"state": state},
                    "info": {"url": format!("{}{}", server.uri(), info_path(file_id))},
                    "content": {
                        "url_template": format!("{}{}{{+asset_path}}", server.uri(), content_path(file_id))
                    }
                }
            ]
        }
    })
}

async fn mount_text_file(server: &MockServer, file_id: &str, name: &str, text: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/2.0/files/{file_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_body(server, file_id, name, "success")))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(content_path(file_id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(text))
        .mount(server)
        .await;
}

// ============================================================================
// Text representations
// ============================================================================

#[tokio::test]
async fn test_documents_by_file_ids_single_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/files/F1"))
        .and(query_param("fields", "name,representations,type"))
        .and(header("x-rep-hints", "[extracted_text]"))
        .and(header("Authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_body(
            &server,
            "F1",
            "Q3 report.pdf",
            "success",
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(content_path("F1")))
        .and(header("Authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Revenue grew 12%."))
        .expect(1)
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let docs = wrapper
        .get_documents_by_file_ids(&["F1".to_string()])
        .await
        .unwrap();

    assert_eq!(
        docs,
        vec![Document::new(
            "Revenue grew 12%.",
            format!("{}{}", server.uri(), content_path("F1")),
            "Q3_report_pdf",
        )]
    );
}

#[tokio::test]
async fn test_missing_text_representation_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/files/F2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "file",
            "id": "F2",
            "name": "photo.png",
            "representations": {"entries": []}
        })))
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    assert_eq!(wrapper.get_text_representation("F2").await.unwrap(), None);
    assert_eq!(wrapper.get_document_by_file_id("F2").await.unwrap(), None);
}

#[tokio::test]
async fn test_file_ids_skip_files_without_text() {
    let server = MockServer::start().await;
    mount_text_file(&server, "F1", "a.txt", "alpha").await;
    mount_text_file(&server, "F3", "c.txt", "gamma").await;

    Mock::given(method("GET"))
        .and(path("/2.0/files/F2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "file", "id": "F2", "name": "b.bin"
        })))
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let ids: Vec<String> = ["F1", "F2", "F3"].iter().map(|s| s.to_string()).collect();
    let docs = wrapper.get_documents_by_file_ids(&ids).await.unwrap();

    let contents: Vec<&str> = docs.iter().map(|d| d.content.as_str()).collect();
    assert_eq!(contents, vec!["alpha", "gamma"]);
}

#[tokio::test]
async fn test_pending_representation_is_polled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/files/F1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_body(
            &server, "F1", "notes.md", "none",
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(info_path("F1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": {"state": "pending"}})))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(info_path("F1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": {"state": "success"}})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(content_path("F1")))
        .respond_with(ResponseTemplate::new(200).set_body_string("# Notes"))
        .expect(1)
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let rep = wrapper.get_text_representation("F1").await.unwrap().unwrap();
    assert_eq!(rep.content, "# Notes");
    assert_eq!(rep.file_name, "notes_md");
}

#[tokio::test]
async fn test_representation_never_ready_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/files/F1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_body(
            &server, "F1", "big.pdf", "pending",
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(info_path("F1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": {"state": "pending"}})))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(content_path("F1")))
        .respond_with(ResponseTemplate::new(200).set_body_string("never read"))
        .expect(0)
        .mount(&server)
        .await;

    let settings = ClientSettings {
        representation_poll_attempts: 2,
        ..test_settings(&server)
    };
    let wrapper = BoxApiWrapper::new(
        Credentials::Token {
            token: "T".to_string(),
        },
        settings,
    );

    assert_eq!(wrapper.get_text_representation("F1").await.unwrap(), None);
}

#[tokio::test]
async fn test_failed_representation_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/files/F1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_body(
            &server, "F1", "broken.pdf", "error",
        )))
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    assert_eq!(wrapper.get_text_representation("F1").await.unwrap(), None);
}

#[tokio::test]
async fn test_text_is_truncated_to_limit() {
    let server = MockServer::start().await;
    mount_text_file(&server, "F1", "long.txt", &"x".repeat(50)).await;

    let settings = ClientSettings {
        text_limit: 10,
        ..test_settings(&server)
    };
    let wrapper = BoxApiWrapper::new(
        Credentials::Token {
            token: "T".to_string(),
        },
        settings,
    );

    let rep = wrapper.get_text_representation("F1").await.unwrap().unwrap();
    assert_eq!(rep.content, "x".repeat(10));
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/files/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "type": "error", "status": 404, "code": "not_found"
        })))
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let err = wrapper.get_text_representation("nope").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_server_error_is_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/files/F1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let err = wrapper.get_text_representation("F1").await.unwrap_err();
    assert!(matches!(err, Error::Api { ref operation, .. } if operation == "getting text rep"));
    assert_eq!(err.kind(), ErrorKind::Upstream);
}

// ============================================================================
// Folders
// ============================================================================

#[tokio::test]
async fn test_folder_items_follow_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/folders/0/items"))
        .and(query_param("fields", "id,type,name"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 3,
            "entries": [
                {"id": "1", "type": "file", "name": "a.txt"},
                {"id": "10", "type": "folder", "name": "sub"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2.0/folders/0/items"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 3,
            "entries": [{"id": "2", "type": "web_link", "name": "link"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ClientSettings {
        page_size: 2,
        ..test_settings(&server)
    };
    let wrapper = BoxApiWrapper::new(
        Credentials::Token {
            token: "T".to_string(),
        },
        settings,
    );

    let items = wrapper.get_folder_items("0").await.unwrap();
    let ids: Vec<&str> = items.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "10", "2"]);
    assert_eq!(items[1].kind(), Some(crate::types::ItemType::Folder));
}

#[tokio::test]
async fn test_folder_file_ids_recursive() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/folders/0/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 3,
            "entries": [
                {"id": "1", "type": "file"},
                {"id": "10", "type": "folder"},
                {"id": "2", "type": "file"}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2.0/folders/10/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "entries": [{"id": "3", "type": "file"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);

    let flat = wrapper.get_folder_file_ids("0", false).await.unwrap();
    assert_eq!(flat, vec!["1".to_string(), "2".to_string()]);

    let deep = wrapper.get_folder_file_ids("0", true).await.unwrap();
    assert_eq!(deep, vec!["1".to_string(), "2".to_string(), "3".to_string()]);
}

#[tokio::test]
async fn test_documents_by_folder_id() {
    let server = MockServer::start().await;
    mount_text_file(&server, "1", "one.txt", "first").await;

    Mock::given(method("GET"))
        .and(path("/2.0/folders/7/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "entries": [{"id": "1", "type": "file"}, {"id": "8", "type": "folder"}]
        })))
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let docs = wrapper.get_documents_by_folder_id("7", false).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title, "one_txt");
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_filters_by_type_and_extension() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/search"))
        .and(query_param("query", "quarterly"))
        .and(query_param("fields", "id,type,extension"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 6,
            "entries": [
                {"id": "a", "type": "file", "extension": "pdf"},
                {"id": "b", "type": "folder"},
                {"id": "c", "type": "file", "extension": "png"},
                {"id": "d", "type": "file", "extension": "DOCX"},
                {"id": "e", "type": "web_link"},
                {"id": "f", "type": "file"}
            ]
        })))
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let ids = wrapper.get_search_results("quarterly").await.unwrap();
    assert_eq!(ids, vec!["a".to_string(), "d".to_string()]);
}

#[tokio::test]
async fn test_search_respects_max_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 500,
            "entries": [
                {"id": "a", "type": "file", "extension": "pdf"},
                {"id": "b", "type": "file", "extension": "pdf"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ClientSettings {
        page_size: 2,
        max_items: Some(2),
        ..test_settings(&server)
    };
    let wrapper = BoxApiWrapper::new(
        Credentials::Token {
            token: "T".to_string(),
        },
        settings,
    );

    let ids = wrapper.get_search_results("anything").await.unwrap();
    assert_eq!(ids.len(), 2);
}

#[tokio::test]
async fn test_search_stops_at_offset_ceiling() {
    let server = MockServer::start().await;
    let page_size: u32 = 2_000;
    let page: Vec<Value> = (0..page_size)
        .map(|i| json!({"id": i.to_string(), "type": "file", "extension": "pdf"}))
        .collect();

    Mock::given(method("GET"))
        .and(path("/2.0/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 50_000,
            "entries": page
        })))
        .mount(&server)
        .await;

    let settings = ClientSettings {
        page_size,
        ..test_settings(&server)
    };
    let wrapper = BoxApiWrapper::new(
        Credentials::Token {
            token: "T".to_string(),
        },
        settings,
    );

    let ids = wrapper.get_search_results("everything").await.unwrap();

    let offsets: Vec<u64> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|req| {
            req.url
                .query_pairs()
                .find(|(k, _)| k == "offset")
                .and_then(|(_, v)| v.parse().ok())
        })
        .collect();
    assert_eq!(offsets, vec![0, 2_000, 4_000, 6_000, 8_000, 10_000]);
    assert!(offsets.iter().all(|offset| *offset <= SEARCH_MAX_OFFSET));
    assert_eq!(ids.len(), 6 * page_size as usize);
}

#[tokio::test]
async fn test_search_without_matches_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 0,
            "entries": []
        })))
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    assert!(wrapper.get_documents_by_search("nothing").await.unwrap().is_empty());
}

// ============================================================================
// Metadata queries
// ============================================================================

#[tokio::test]
async fn test_metadata_query_follows_markers() {
    let server = MockServer::start().await;

    let expected_body = json!({
        "from": "enterprise_123.contractTemplate",
        "query": "amount >= :value",
        "query_params": {"value": 100},
        "ancestor_folder_id": "0"
    });

    Mock::given(method("POST"))
        .and(path("/2.0/metadata_queries/execute_read"))
        .and(body_partial_json(json!({"marker": "m1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{"id": "3", "type": "file"}],
            "next_marker": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/2.0/metadata_queries/execute_read"))
        .and(body_partial_json(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{"id": "1", "type": "file"}, {"id": "2", "type": "folder"}],
            "next_marker": "m1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let params = json!({"value": 100}).as_object().cloned().unwrap();
    let ids = wrapper
        .get_metadata_query_results("amount >= :value", "contractTemplate", &params, "123")
        .await
        .unwrap();

    assert_eq!(ids, vec!["1".to_string(), "3".to_string()]);
}

// ============================================================================
// Box AI
// ============================================================================

#[tokio::test]
async fn test_ask_ai_without_ids_is_invalid_argument() {
    let server = MockServer::start().await;
    let wrapper = token_wrapper(&server);

    let err = wrapper.ask_ai("Summarize", &[]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ask_ai_single_item() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2.0/ai/ask"))
        .and(body_partial_json(json!({
            "mode": "single_item_qa",
            "prompt": "Summarize",
            "items": [{"id": "F1", "type": "file"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "A short contract.",
            "created_at": "2024-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let doc = wrapper.ask_ai("Summarize", &["F1".to_string()]).await.unwrap();
    assert_eq!(
        doc,
        Document::new("A short contract.", "Box AI", "Box AI Summarize")
    );
}

#[tokio::test]
async fn test_ask_ai_multiple_items() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2.0/ai/ask"))
        .and(body_partial_json(json!({"mode": "multiple_item_qa"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "Both."})))
        .expect(1)
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let answer = wrapper
        .ask_ai_answer("Compare", &["F1".to_string(), "F2".to_string()])
        .await
        .unwrap();
    assert_eq!(answer, "Both.");
}

// ============================================================================
// Client lifecycle
// ============================================================================

#[test]
fn test_from_config_reads_missing_secrets_from_environment() {
    let env: HashMap<&str, &str> = [
        (ENV_DEVELOPER_TOKEN, "env-token"),
        (ENV_CLIENT_ID, "env-client"),
        (ENV_CLIENT_SECRET, "env-secret"),
    ]
    .into_iter()
    .collect();
    let lookup = |key: &str| env.get(key).map(|v| (*v).to_string());

    let wrapper =
        BoxApiWrapper::from_config_with_lookup(&BoxConfig::new(AuthType::Token), lookup).unwrap();
    assert_eq!(
        wrapper.credentials(),
        &Credentials::Token {
            token: "env-token".to_string()
        }
    );

    let config = BoxConfig {
        box_client_id: Some("explicit-client".to_string()),
        box_enterprise_id: Some("1".to_string()),
        ..BoxConfig::new(AuthType::Ccg)
    };
    let wrapper = BoxApiWrapper::from_config_with_lookup(&config, lookup).unwrap();
    assert_eq!(
        wrapper.credentials(),
        &Credentials::Ccg {
            client_id: "explicit-client".to_string(),
            client_secret: "env-secret".to_string(),
            subject: Subject::enterprise("1"),
        }
    );

    let err = BoxApiWrapper::from_config_with_lookup(&BoxConfig::new(AuthType::Token), |_| None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_failed_resolution_is_sticky() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "The client credentials are invalid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let wrapper = BoxApiWrapper::new(
        Credentials::Ccg {
            client_id: "cid".to_string(),
            client_secret: "bad".to_string(),
            subject: Subject::enterprise("1"),
        },
        test_settings(&server),
    );

    let first = wrapper.get_search_results("x").await.unwrap_err();
    assert_eq!(first.kind(), ErrorKind::Authentication);

    let second = wrapper.get_search_results("x").await.unwrap_err();
    assert_eq!(second.kind(), ErrorKind::Authentication);
    assert_eq!(second.to_string(), first.to_string());
    assert_eq!(
        second.to_string().matches("Authentication failed").count(),
        1
    );
}

#[tokio::test]
async fn test_unavailable_token_endpoint_is_retried_next_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ccg-token",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2.0/users/me"))
        .and(header("Authorization", "Bearer ccg-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "user", "id": "99", "name": "Service Account"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let wrapper = BoxApiWrapper::new(
        Credentials::Ccg {
            client_id: "cid".to_string(),
            client_secret: "secret".to_string(),
            subject: Subject::enterprise("1"),
        },
        test_settings(&server),
    );

    let err = wrapper.current_user().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert!(err.to_string().contains("503"));
    assert_eq!(err.to_string().matches("Box API error").count(), 1);

    let user = wrapper.current_user().await.unwrap();
    assert_eq!(user.id, "99");
}

#[tokio::test]
async fn test_ccg_client_resolved_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ccg-token",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2.0/users/me"))
        .and(header("Authorization", "Bearer ccg-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "user", "id": "99", "name": "Service Account", "login": "sa@box.com"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let wrapper = BoxApiWrapper::new(
        Credentials::Ccg {
            client_id: "cid".to_string(),
            client_secret: "secret".to_string(),
            subject: Subject::enterprise("1"),
        },
        test_settings(&server),
    );

    let user = wrapper.current_user().await.unwrap();
    assert_eq!(user.id, "99");

    let check = wrapper.check().await.unwrap();
    assert!(check.success);
    assert_eq!(check.user.unwrap().login.as_deref(), Some("sa@box.com"));
}

#[tokio::test]
async fn test_check_reports_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/users/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let check = wrapper.check().await.unwrap();
    assert!(!check.success);
    assert!(check.message.unwrap().contains("401"));
}

// ============================================================================
// Streams
// ============================================================================

#[tokio::test]
async fn test_stream_is_lazy() {
    let server = MockServer::start().await;
    mount_text_file(&server, "F1", "a.txt", "alpha").await;

    let wrapper = token_wrapper(&server);
    let query = QueryDescriptor::FileIds {
        ids: vec!["F1".to_string()],
    };

    let stream = wrapper.stream_documents(&query);
    assert!(server.received_requests().await.unwrap().is_empty());

    let docs: Vec<Document> = stream.try_collect().await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].content, "alpha");
}

#[tokio::test]
async fn test_stream_search_documents() {
    let server = MockServer::start().await;
    mount_text_file(&server, "a", "a.pdf", "from search").await;

    Mock::given(method("GET"))
        .and(path("/2.0/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "entries": [
                {"id": "a", "type": "file", "extension": "pdf"},
                {"id": "b", "type": "file", "extension": "zip"}
            ]
        })))
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let query = QueryDescriptor::Search {
        query: "report".to_string(),
    };
    let docs: Vec<Document> = wrapper.stream_documents(&query).try_collect().await.unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].content, "from search");
}

#[tokio::test]
async fn test_stream_surfaces_listing_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/folders/5/items"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .mount(&server)
        .await;

    let wrapper = token_wrapper(&server);
    let query = QueryDescriptor::Folder {
        id: "5".to_string(),
        recursive: false,
    };
    let err = wrapper
        .stream_documents(&query)
        .try_collect::<Vec<_>>()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}
