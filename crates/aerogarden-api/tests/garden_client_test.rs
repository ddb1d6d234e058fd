#![allow(clippy::unwrap_used)]
// Integration tests for `GardenClient` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aerogarden_api::{
    CLIENT_USER_AGENT, Credentials, DeviceConfigUpdate, DeviceQuery, Error, FORM_CONTENT_TYPE,
    GardenClient, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GardenClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = GardenClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn credentials(password: &str) -> Credentials {
    Credentials::new("grower@example.com", SecretString::from(password.to_owned()))
}

async fn mount_login(server: &MockServer, reply: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/Admin/Login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(server)
        .await;
}

async fn logged_in() -> (MockServer, GardenClient) {
    let (server, client) = setup().await;
    mount_login(&server, json!({ "code": 1234 })).await;
    client.login(&credentials("hunter2")).await.unwrap();
    (server, client)
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_stores_code_as_user_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/Admin/Login"))
        .and(header("content-type", FORM_CONTENT_TYPE))
        .and(header("user-agent", CLIENT_USER_AGENT))
        .and(body_string("mail=grower%40example.com&userPwd=p%40ss+word"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 98765 })))
        .expect(1)
        .mount(&server)
        .await;

    client.login(&credentials("p@ss word")).await.unwrap();

    assert!(client.is_valid_login());
    assert_eq!(client.user_id().as_deref(), Some("98765"));
    assert_eq!(client.error(), None);
}

#[tokio::test]
async fn test_login_rejected_code_records_error() {
    let (server, client) = setup().await;
    mount_login(&server, json!({ "code": 0, "msg": "bad password" })).await;

    let result = client.login(&credentials("hunter2")).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.is_valid_login());
    assert_eq!(
        client.error().as_deref(),
        Some("Login API call returned 0: bad password")
    );
}

#[tokio::test]
async fn test_login_negative_or_missing_code_is_rejected() {
    for reply in [json!({ "code": -1 }), json!({})] {
        let (server, client) = setup().await;
        mount_login(&server, reply).await;

        let result = client.login(&credentials("hunter2")).await;
        assert!(result.unwrap_err().is_auth());
        assert!(!client.is_valid_login());
        assert!(client.error().is_some_and(|e| !e.is_empty()));
    }
}

#[tokio::test]
async fn test_login_malformed_reply_is_auth_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/Admin/Login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.login(&credentials("hunter2")).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.is_valid_login());
    assert!(client.error().is_some());
}

#[tokio::test]
async fn test_login_rejection_message_is_redacted() {
    let (server, client) = setup().await;
    mount_login(
        &server,
        json!({ "code": 0, "msg": "password hunter2 is wrong" }),
    )
    .await;

    let err = client.login(&credentials("hunter2")).await.unwrap_err();

    assert!(!err.to_string().contains("hunter2"));
    let recorded = client.error().unwrap();
    assert!(recorded.contains("password <password> is wrong"), "{recorded}");
}

#[tokio::test]
async fn test_login_http_error_keeps_existing_session() {
    let (server, client) = logged_in().await;
    server.reset().await;

    Mock::given(method("POST"))
        .and(path("/api/Admin/Login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let result = client.login(&credentials("hunter2")).await;

    assert!(
        matches!(result, Err(Error::HttpStatus { status: 500, .. })),
        "expected HttpStatus error, got: {result:?}"
    );
    assert!(result.unwrap_err().is_connection());
    assert_eq!(client.user_id().as_deref(), Some("1234"));
}

#[tokio::test]
async fn test_login_rejection_clears_previous_session() {
    let (server, client) = logged_in().await;
    server.reset().await;
    mount_login(&server, json!({ "code": 0 })).await;

    let _ = client.login(&credentials("hunter2")).await;

    assert!(!client.is_valid_login());
    assert_eq!(
        client.error().as_deref(),
        Some("Login API call returned 0: Unknown error")
    );
}

#[tokio::test]
async fn test_timeout_is_classified() {
    let server = MockServer::start().await;
    let transport = TransportConfig::default().with_timeout(Duration::from_millis(200));
    let client = GardenClient::new(Url::parse(&server.uri()).unwrap(), &transport).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/Admin/Login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 1 }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = client.login(&credentials("hunter2")).await;

    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "expected Timeout error, got: {result:?}"
    );
    assert!(!client.is_valid_login());
}

// ── Device query ────────────────────────────────────────────────────

#[tokio::test]
async fn test_query_devices_posts_user_id() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/CustomData/QueryUserDevice"))
        .and(header("content-type", FORM_CONTENT_TYPE))
        .and(body_string("userID=1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "airGuid": "AA:BB:CC:DD:EE:FF", "configID": 1, "plantedName": "UGxhbnQgTmFtZQ==" },
            { "airGuid": "11:22:33:44:55:66" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let query = client.query_user_devices().await.unwrap();

    let DeviceQuery::Devices(devices) = query else {
        panic!("expected devices, got {query:?}");
    };
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0]["airGuid"], json!("AA:BB:CC:DD:EE:FF"));
    assert_eq!(devices[1]["airGuid"], json!("11:22:33:44:55:66"));
}

#[tokio::test]
async fn test_query_devices_message_is_rejection() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/CustomData/QueryUserDevice"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Message": "An error has occurred." })),
        )
        .mount(&server)
        .await;

    let query = client.query_user_devices().await.unwrap();
    assert_eq!(
        query,
        DeviceQuery::Rejected {
            message: "An error has occurred.".into()
        }
    );
}

#[tokio::test]
async fn test_query_devices_requires_login() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.query_user_devices().await;
    assert!(
        matches!(result, Err(Error::NotLoggedIn)),
        "expected NotLoggedIn, got: {result:?}"
    );
}

// ── Device config update ────────────────────────────────────────────

#[tokio::test]
async fn test_update_device_config_body() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/Custom/UpdateDeviceConfig"))
        .and(header("content-type", FORM_CONTENT_TYPE))
        .and(body_json(json!({
            "airGuid": "AA:BB:CC:DD:EE:FF-1",
            "chooseGarden": 0,
            "userID": "1234",
            "plantConfig": "{\"lightTemp\":1}",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .update_device_config(&DeviceConfigUpdate {
            air_guid: "AA:BB:CC:DD:EE:FF-1".into(),
            choose_garden: json!(0),
            light_temp: json!(1),
        })
        .await
        .unwrap();

    assert!(response.is_success());
}

#[tokio::test]
async fn test_update_device_config_failure_code() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/Custom/UpdateDeviceConfig"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "msg": "device offline" })),
        )
        .mount(&server)
        .await;

    let response = client
        .update_device_config(&DeviceConfigUpdate {
            air_guid: "AA:BB:CC:DD:EE:FF".into(),
            choose_garden: serde_json::Value::Null,
            light_temp: json!(0),
        })
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.msg.as_deref(), Some("device offline"));
}
