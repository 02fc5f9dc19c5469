//! Registry client integration tests against a loopback stub server.
//!
//! Run with: `cargo test -p vidsync-registry --test client_test`

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use vidsync_core::RegistryConfig;
use vidsync_registry::{RegistryApi, RegistryClient, RegistryError};

async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base_url: &str, token: Option<&str>) -> RegistryClient {
    RegistryClient::new(RegistryConfig {
        base_url: base_url.to_string(),
        token: token.map(str::to_string),
        timeout_secs: 5,
    })
    .unwrap()
}

fn record(canonical_id: &str, client_id: &str) -> serde_json::Value {
    json!({
        "edx_video_id": canonical_id,
        "client_video_id": client_id,
        "encoded_videos": [{"profile": "youtube", "url": "yt123"}]
    })
}

#[tokio::test]
async fn list_follows_pagination_in_order() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let next_url = format!("{}/videos/?page=2", base);

    let app = Router::new().route(
        "/videos/",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let next_url = next_url.clone();
            async move {
                if params.get("page").map(String::as_str) == Some("2") {
                    Json(json!({"results": [record("b", "two")], "next": null}))
                } else {
                    assert_eq!(
                        params.get("course").map(String::as_str),
                        Some("OrgX/CS101/2026")
                    );
                    Json(json!({"results": [record("a", "one")], "next": next_url}))
                }
            }
        }),
    );
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = client_for(&base, None);
    let records = client.list_course_videos("OrgX/CS101/2026").await.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.canonical_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn list_returns_empty_set_on_success() {
    let app = Router::new().route(
        "/videos/",
        get(|| async { Json(json!({"results": [], "next": null})) }),
    );
    let base = spawn_stub(app).await;

    let client = client_for(&base, None);
    let records = client.list_course_videos("OrgX/CS101/2026").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn list_maps_forbidden_to_permission_denied() {
    let app = Router::new().route("/videos/", get(|| async { StatusCode::FORBIDDEN }));
    let base = spawn_stub(app).await;

    let client = client_for(&base, None);
    let err = client
        .list_course_videos("OrgX/CS101/2026")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::PermissionDenied));
}

#[tokio::test]
async fn list_maps_other_failures_to_unavailable() {
    let app = Router::new().route(
        "/videos/",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_stub(app).await;

    let client = client_for(&base, None);
    let err = client
        .list_course_videos("OrgX/CS101/2026")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Unavailable { status: 500 }));
}

#[tokio::test]
async fn list_sends_bearer_token() {
    let app = Router::new().route(
        "/videos/",
        get(|headers: HeaderMap| async move {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(|v| v == "Bearer secret-token")
                .unwrap_or(false);
            if authorized {
                Json(json!({"results": [], "next": null})).into_response()
            } else {
                StatusCode::FORBIDDEN.into_response()
            }
        }),
    );
    let base = spawn_stub(app).await;

    let denied = client_for(&base, None);
    assert!(matches!(
        denied.list_course_videos("c").await.unwrap_err(),
        RegistryError::PermissionDenied
    ));

    let allowed = client_for(&base, Some("secret-token"));
    assert!(allowed.list_course_videos("c").await.unwrap().is_empty());
}

#[tokio::test]
async fn get_video_returns_record() {
    let app = Router::new().route(
        "/videos/{id}",
        get(|Path(id): Path<String>| async move { Json(record(&id, "lecture_1")) }),
    );
    let base = spawn_stub(app).await;

    let client = client_for(&base, None);
    let fetched = client.get_video("abc").await.unwrap();
    assert_eq!(fetched.canonical_id, "abc");
    assert_eq!(fetched.client_id, "lecture_1");
    assert_eq!(fetched.youtube_url(), Some("yt123"));
}

#[tokio::test]
async fn get_video_maps_lookup_failures() {
    let app = Router::new().route(
        "/videos/{id}",
        get(|Path(id): Path<String>| async move {
            match id.as_str() {
                "forbidden" => StatusCode::FORBIDDEN,
                "missing" => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            }
        }),
    );
    let base = spawn_stub(app).await;

    let client = client_for(&base, None);
    assert!(matches!(
        client.get_video("forbidden").await.unwrap_err(),
        RegistryError::PermissionDenied
    ));
    assert!(matches!(
        client.get_video("missing").await.unwrap_err(),
        RegistryError::RecordNotFound(id) if id == "missing"
    ));
    assert!(matches!(
        client.get_video("broken").await.unwrap_err(),
        RegistryError::LookupFailed { status: 502 }
    ));
}
