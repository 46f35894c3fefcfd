use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, SEED_PROFILE_NAME};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn account_payload(name: &str) -> String {
    json!({
        "data": {
            "type": "account",
            "attributes": {
                "name": name,
                "environment": "production",
                "access": {
                    "keys": {
                        "roleArn": "arn:aws:iam::123456789000:role/CloudConformity",
                        "externalId": "ext-123",
                    }
                },
                "costPackage": false,
                "subscriptionType": "advanced",
            }
        }
    })
    .to_string()
}

// --- organisation ---

#[tokio::test]
async fn external_id_is_stable_across_calls() {
    let app = app();

    let first = app.clone().oneshot(get_request("/v1/organisation/external-id")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    assert_eq!(first["data"]["type"], "external-ids");

    let second = app.oneshot(get_request("/v1/organisation/external-id")).await.unwrap();
    let second = body_json(second).await;
    assert_eq!(first["data"]["id"], second["data"]["id"]);
}

// --- accounts ---

#[tokio::test]
async fn list_accounts_starts_empty() {
    let resp = app().oneshot(get_request("/v1/accounts")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_account_returns_200_and_echoes_attributes() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/accounts", &account_payload("prod-1")))
        .await
        .unwrap();

    // The real service answers 200 on create, never 201.
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["data"]["id"].is_string());
    assert_eq!(body["data"]["attributes"]["name"], "prod-1");
    assert_eq!(
        body["data"]["attributes"]["access"]["keys"]["roleArn"],
        "arn:aws:iam::123456789000:role/CloudConformity"
    );
}

#[tokio::test]
async fn create_account_without_attributes_is_bad_request() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/accounts", r#"{"data":{}}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_account_merges_attributes() {
    let app = app();
    let created = app
        .clone()
        .oneshot(json_request("POST", "/v1/accounts", &account_payload("prod-1")))
        .await
        .unwrap();
    let id = body_json(created).await["data"]["id"].as_str().unwrap().to_string();

    let update = json!({
        "data": { "attributes": { "name": "renamed", "tags": ["staging", "PAY"] } }
    })
    .to_string();
    let resp = app
        .oneshot(json_request("PATCH", &format!("/v1/accounts/{id}"), &update))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["attributes"]["name"], "renamed");
    assert_eq!(body["data"]["attributes"]["tags"], json!(["staging", "PAY"]));
    // Untouched attributes survive the merge.
    assert_eq!(body["data"]["attributes"]["environment"], "production");
}

#[tokio::test]
async fn update_unknown_account_is_404() {
    let resp = app()
        .oneshot(json_request(
            "PATCH",
            "/v1/accounts/00000000-0000-0000-0000-000000000000",
            r#"{"data":{"attributes":{"name":"x"}}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_account_then_delete_again_is_404() {
    let app = app();
    let created = app
        .clone()
        .oneshot(json_request("POST", "/v1/accounts", &account_payload("doomed")))
        .await
        .unwrap();
    let id = body_json(created).await["data"]["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(json_request("DELETE", &format!("/v1/accounts/{id}"), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["meta"]["status"], "deleted");

    let resp = app
        .oneshot(json_request("DELETE", &format!("/v1/accounts/{id}"), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn bot_settings_patch_echoes_sparse_object() {
    let app = app();
    let created = app
        .clone()
        .oneshot(json_request("POST", "/v1/accounts", &account_payload("bot-target")))
        .await
        .unwrap();
    let id = body_json(created).await["data"]["id"].as_str().unwrap().to_string();

    let patch = json!({
        "data": {
            "type": "accounts",
            "attributes": { "settings": { "bot": { "delay": 6, "disabledRegions": { "eu-north-1": true } } } }
        }
    })
    .to_string();
    let resp = app
        .oneshot(json_request(
            "PATCH",
            &format!("/v1/accounts/{id}/settings/bot"),
            &patch,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bot = body_json(resp).await["data"]["attributes"]["settings"]["bot"].clone();
    assert_eq!(bot["delay"], 6);
    assert_eq!(bot["disabledRegions"]["eu-north-1"], true);
}

// --- communication settings ---

#[tokio::test]
async fn channel_query_parameter_is_ignored() {
    // The documented upstream bug: filtering by channel has no effect, both
    // seeded channels come back.
    let resp = app()
        .oneshot(get_request("/v1/settings/communication?channel=email"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let entries = body_json(resp).await["data"].as_array().unwrap().clone();
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn account_id_query_parameter_is_honored() {
    // Seeded settings are organisation-level, so scoping to any account
    // yields nothing.
    let resp = app()
        .oneshot(get_request("/v1/settings/communication?accountId=A1"))
        .await
        .unwrap();
    let entries = body_json(resp).await["data"].as_array().unwrap().clone();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn delete_communication_setting_removes_entry() {
    let app = app();
    let listed = app
        .clone()
        .oneshot(get_request("/v1/settings/communication"))
        .await
        .unwrap();
    let listed = body_json(listed).await;
    let id = listed["data"][0]["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(json_request("DELETE", &format!("/v1/settings/{id}"), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let remaining = app
        .oneshot(get_request("/v1/settings/communication"))
        .await
        .unwrap();
    let remaining = body_json(remaining).await;
    assert_eq!(remaining["data"].as_array().unwrap().len(), 1);
}

// --- profiles ---

#[tokio::test]
async fn seeded_profile_is_listed_and_fetchable() {
    let app = app();
    let listed = app.clone().oneshot(get_request("/v1/profiles")).await.unwrap();
    let listed = body_json(listed).await;
    let entries = listed["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["attributes"]["name"], SEED_PROFILE_NAME);

    let id = entries[0]["id"].as_str().unwrap().to_string();
    let fetched = app.oneshot(get_request(&format!("/v1/profiles/{id}"))).await.unwrap();
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched = body_json(fetched).await;
    assert_eq!(fetched["data"]["attributes"]["name"], SEED_PROFILE_NAME);
}

#[tokio::test]
async fn unknown_profile_is_404() {
    let resp = app()
        .oneshot(get_request("/v1/profiles/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn apply_profile_echoes_account_ids() {
    let app = app();
    let listed = app.clone().oneshot(get_request("/v1/profiles")).await.unwrap();
    let id = body_json(listed).await["data"][0]["id"].as_str().unwrap().to_string();

    let payload = json!({
        "meta": {
            "accountIds": ["acct-1"],
            "types": ["rule"],
            "mode": "replace",
            "notes": "Applied from Profile: Security Baseline",
        }
    })
    .to_string();
    let resp = app
        .oneshot(json_request("POST", &format!("/v1/profiles/{id}/apply"), &payload))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["meta"]["status"], "applying");
    assert_eq!(body["meta"]["accountIds"], json!(["acct-1"]));
}

// --- report configs ---

#[tokio::test]
async fn report_config_is_stored_with_an_id() {
    let payload = json!({
        "data": {
            "attributes": {
                "accountId": "acct-1",
                "configuration": { "frequency": "* * MON", "tz": "Asia/Jakarta" }
            }
        }
    })
    .to_string();
    let resp = app()
        .oneshot(json_request("POST", "/v1/report-configs", &payload))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["data"]["id"].is_string());
    assert_eq!(body["data"]["attributes"]["configuration"]["frequency"], "* * MON");
}
