//! HTTP client tests against a mocked backend: bundle decoding, toggle
//! responses, error classification, and the bearer header.

mod common;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use painel::api::resources::{Courses, Permissions, Users};
use painel::api::{ApiClient, ApiError, BundleQuery, SyncClient};
use painel::models::CourseForm;
use common::*;

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(format!("{}/api/v1", server.uri()), Duration::from_secs(2))
        .expect("api client")
        .with_token(TOKEN)
}

// ============================================================================
// ROLE-PERMISSION BUNDLE
// ============================================================================

#[tokio::test]
async fn test_fetch_bundle_sends_filters_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/role-permissions/5"))
        .and(query_param("permission_search", "ed"))
        .and(query_param("permission_page", "2"))
        .and(query_param("user_page", "1"))
        .and(query_param_is_missing("user_search"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": bundle_json(&[1]) })))
        .expect(1)
        .mount(&server)
        .await;

    let query = BundleQuery {
        permission_search: "ed".into(),
        permission_page: 2,
        ..BundleQuery::default()
    };
    let bundle = client_for(&server).fetch_bundle(ROLE_ID, &query).await.expect("bundle");

    assert_eq!(bundle.role.name, "editor");
    assert_eq!(bundle.role_permissions, vec![1]);
    assert_eq!(bundle.permissions.data.len(), 3);
    assert_eq!(bundle.users.data.len(), 2);
}

#[tokio::test]
async fn test_fetch_bundle_with_bare_user_list() {
    let server = MockServer::start().await;
    let mut body = bundle_json(&[]);
    body["users"] = json!([user_json(10, "Ana", &[ROLE_ID])]);
    Mock::given(method("GET"))
        .and(path("/api/v1/role-permissions/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": body })))
        .mount(&server)
        .await;

    let bundle = client_for(&server)
        .fetch_bundle(ROLE_ID, &BundleQuery::default())
        .await
        .expect("bundle");
    assert_eq!(bundle.users.data.len(), 1);
    assert_eq!(bundle.users.last_page, 1);
}

#[tokio::test]
async fn test_malformed_bundle_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/role-permissions/5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_bundle(ROLE_ID, &BundleQuery::default())
        .await
        .expect_err("not json");
    assert!(matches!(err, ApiError::Decode(_)), "{err:?}");
    assert_eq!(err.user_message(), "Resposta inesperada do servidor.");
}

#[tokio::test]
async fn test_missing_role_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/role-permissions/5"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Perfil não encontrado" })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_bundle(ROLE_ID, &BundleQuery::default())
        .await
        .expect_err("404");
    assert!(err.is_not_found());
}

// ============================================================================
// TOGGLES
// ============================================================================

#[tokio::test]
async fn test_toggle_permission_reads_reported_state() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/role-permissions/5/7"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok", "granted": true })))
        .expect(1)
        .mount(&server)
        .await;

    let state = client_for(&server).toggle_permission(ROLE_ID, 7).await.expect("toggle");
    assert_eq!(state, Some(true));
}

#[tokio::test]
async fn test_toggle_user_with_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/role-permissions/5/toggle-user/10"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let state = client_for(&server).toggle_user(ROLE_ID, 10).await.expect("toggle");
    assert_eq!(state, None);
}

#[tokio::test]
async fn test_toggle_rejection_carries_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/role-permissions/5/7"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "error": "Permissão protegida" })))
        .mount(&server)
        .await;

    let err = client_for(&server).toggle_permission(ROLE_ID, 7).await.expect_err("422");
    match err {
        ApiError::Rejected { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Permissão protegida");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthenticated." })))
        .mount(&server)
        .await;

    let err = client_for(&server).toggle_user(ROLE_ID, 10).await.expect_err("401");
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    // Grab a free port and close it again so nothing is listening there.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .expect("free port");
    let client = ApiClient::new(format!("http://{addr}/api/v1"), Duration::from_secs(2))
        .expect("api client")
        .with_token(TOKEN);

    let err = client.toggle_permission(ROLE_ID, 1).await.expect_err("nothing listening");
    assert!(err.is_network(), "{err:?}");
    assert_eq!(err.user_message(), "Erro de conexão com o servidor, tente novamente mais tarde.");
}

#[tokio::test]
async fn test_slow_backend_times_out_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = ApiClient::new(format!("{}/api/v1", server.uri()), Duration::from_millis(200))
        .expect("api client")
        .with_token(TOKEN);
    let err = client.toggle_permission(ROLE_ID, 1).await.expect_err("timeout");
    assert!(err.is_network(), "{err:?}");
}

// ============================================================================
// ADMIN RESOURCES
// ============================================================================

#[tokio::test]
async fn test_list_decodes_wrapped_pages_and_passes_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/cursos"))
        .and(query_param("page", "2"))
        .and(query_param("search", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": page_json(vec![json!({ "id": 3, "name": "Rust" })], 2, 4)
        })))
        .mount(&server)
        .await;

    let page = client_for(&server).list::<Courses>(2, " rust ").await.expect("page");
    assert_eq!(page.data[0].name, "Rust");
    assert_eq!(page.current_page, 2);
    assert!(page.has_next());
}

#[tokio::test]
async fn test_list_all_walks_every_page() {
    let server = MockServer::start().await;
    for page in 1..=2u32 {
        Mock::given(method("GET"))
            .and(path("/api/v1/permissions"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                vec![permission_json(i64::from(page), &format!("perm-{page}"))],
                page,
                2,
            )))
            .expect(1)
            .mount(&server)
            .await;
    }

    let all = client_for(&server).list_all::<Permissions>().await.expect("all pages");
    let ids: Vec<i64> = all.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_create_posts_payload_and_returns_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/cursos"))
        .and(body_json(json!({ "name": "Rust" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "Curso cadastrado!", "data": { "id": 9, "name": "Rust" } })))
        .expect(1)
        .mount(&server)
        .await;

    let message = client_for(&server)
        .create::<Courses>(&CourseForm { name: "Rust".into() })
        .await
        .expect("created");
    assert_eq!(message.as_deref(), Some("Curso cadastrado!"));
}

#[tokio::test]
async fn test_error_field_on_success_status_is_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/users/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "Usuário possui vínculos" })))
        .mount(&server)
        .await;

    let err = client_for(&server).delete::<Users>(4).await.expect_err("rejected");
    assert_eq!(err.user_message(), "Usuário possui vínculos");
}
