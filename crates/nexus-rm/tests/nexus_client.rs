//! HTTP-level tests for `NexusClient` against a wiremock server.

use std::time::Duration;

use nexus_rm::{ComponentRepository, NexusClient, NexusConfig, NexusError};
use serde_json::json;
use wiremock::matchers::{basic_auth, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPONENTS: &str = "/service/rest/v1/components";

fn component(id: &str, version: &str) -> serde_json::Value {
    json!({
        "id": id,
        "repository": "maven-releases",
        "format": "maven2",
        "group": "com.foo",
        "name": "bar",
        "version": version,
        "assets": []
    })
}

fn client_for(server: &MockServer) -> NexusClient {
    NexusClient::new(NexusConfig::new(&server.uri()).with_credentials("ci", "s3cret")).unwrap()
}

#[tokio::test]
async fn list_components_follows_continuation_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMPONENTS))
        .and(query_param("repository", "maven-releases"))
        .and(query_param_is_missing("continuationToken"))
        .and(basic_auth("ci", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [component("c1", "1.0"), component("c2", "1.1")],
            "continuationToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(COMPONENTS))
        .and(query_param("repository", "maven-releases"))
        .and(query_param("continuationToken", "page-2"))
        .and(basic_auth("ci", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [component("c3", "2.0")],
            "continuationToken": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server)
        .list_components("maven-releases")
        .await
        .unwrap();

    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2", "c3"]);
    assert_eq!(items[2].version, "2.0");
}

#[tokio::test]
async fn list_components_surfaces_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMPONENTS))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_components("maven-releases")
        .await
        .unwrap_err();

    match err {
        NexusError::Http { status, body, .. } => {
            assert_eq!(status, 401);
            assert_eq!(body, "unauthorized");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn list_components_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMPONENTS))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_components("maven-releases")
        .await
        .unwrap_err();
    assert!(matches!(err, NexusError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn slow_server_hits_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMPONENTS))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [], "continuationToken": null }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = NexusClient::new(
        NexusConfig::new(&server.uri()).with_timeout(Duration::from_millis(50)),
    )
    .unwrap();

    let err = client.list_components("maven-releases").await.unwrap_err();
    assert!(matches!(err, NexusError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn delete_component_success() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{COMPONENTS}/c1")))
        .and(basic_auth("ci", "s3cret"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).delete_component("c1").await.unwrap();
}

#[tokio::test]
async fn delete_missing_component_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{COMPONENTS}/gone")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .delete_component("gone")
        .await
        .unwrap_err();
    assert!(matches!(err, NexusError::NotFound(ref id) if id == "gone"));
}

#[tokio::test]
async fn delete_server_error_carries_status() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{COMPONENTS}/c9")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server).delete_component("c9").await.unwrap_err();
    assert!(matches!(err, NexusError::Http { status: 500, .. }));
}

#[tokio::test]
async fn slow_delete_hits_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{COMPONENTS}/c1")))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = NexusClient::new(
        NexusConfig::new(&server.uri()).with_timeout(Duration::from_millis(50)),
    )
    .unwrap();

    let err = client.delete_component("c1").await.unwrap_err();
    assert!(matches!(err, NexusError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn delete_encodes_id_as_one_segment() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{COMPONENTS}/bWF2ZW4%2Fc1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_component("bWF2ZW4/c1")
        .await
        .unwrap();
}

#[tokio::test]
async fn repeated_continuation_token_stops_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMPONENTS))
        .and(query_param_is_missing("continuationToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [component("c1", "1.0")],
            "continuationToken": "stuck"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(COMPONENTS))
        .and(query_param("continuationToken", "stuck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [component("c2", "1.1")],
            "continuationToken": "stuck"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_components("maven-releases")
        .await
        .unwrap_err();
    assert!(
        matches!(err, NexusError::RepeatedToken { ref token, .. } if token == "stuck"),
        "got {err:?}"
    );
}
