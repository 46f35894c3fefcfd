//! In-memory mock of the Cloud Conformity REST API.
//!
//! # Design
//! Reproduces the vendor's observable behavior, not a cleaned-up version of
//! it: JSON:API `{"data": ...}` envelopes, 200 on successful writes (the
//! real service does not answer 201/204, which is why the client treats
//! those as errors), and — deliberately — the documented bug where the
//! `channel` query parameter on `/v1/settings/communication` is ignored.
//!
//! Attributes are stored as raw `serde_json::Value` because the vendor
//! schema is open-ended per resource type; the mock only ever echoes them.
//!
//! The state is seeded with two communication settings (email and slack)
//! and one profile, since the public API offers no way to create either.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// All state for one mock organisation. Entries are full JSON:API resource
/// objects (`{"type": ..., "id": ..., "attributes": ...}`).
pub struct Organisation {
    pub external_id: Uuid,
    pub accounts: HashMap<Uuid, Value>,
    pub settings: HashMap<Uuid, Value>,
    pub profiles: HashMap<Uuid, Value>,
    pub report_configs: HashMap<Uuid, Value>,
}

pub type Db = Arc<RwLock<Organisation>>;

/// Seeded profile name, stable so tests can assert against it.
pub const SEED_PROFILE_NAME: &str = "Security Baseline";

fn seed() -> Organisation {
    let mut settings = HashMap::new();
    for channel in ["email", "slack"] {
        let id = Uuid::new_v4();
        settings.insert(
            id,
            json!({
                "type": "settings",
                "id": id,
                "attributes": {
                    "type": "communication",
                    "channel": channel,
                    "enabled": true,
                }
            }),
        );
    }

    let mut profiles = HashMap::new();
    let profile_id = Uuid::new_v4();
    profiles.insert(
        profile_id,
        json!({
            "type": "profiles",
            "id": profile_id,
            "attributes": {
                "name": SEED_PROFILE_NAME,
                "description": "Baseline rule settings for all accounts",
            }
        }),
    );

    Organisation {
        external_id: Uuid::new_v4(),
        accounts: HashMap::new(),
        settings,
        profiles,
        report_configs: HashMap::new(),
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(seed()));
    Router::new()
        .route("/v1/organisation/external-id", get(get_external_id))
        .route("/v1/accounts", get(list_accounts).post(create_account))
        .route(
            "/v1/accounts/{id}",
            patch(update_account).delete(delete_account),
        )
        .route("/v1/accounts/{id}/settings/bot", patch(update_bot_settings))
        .route(
            "/v1/settings/communication",
            get(list_communication_settings),
        )
        .route("/v1/settings/{id}", delete(delete_communication_setting))
        .route("/v1/profiles", get(list_profiles))
        .route("/v1/profiles/{id}", get(get_profile))
        .route("/v1/profiles/{id}/apply", post(apply_profile))
        .route("/v1/report-configs", post(create_report_config))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn get_external_id(State(db): State<Db>) -> Json<Value> {
    let org = db.read().await;
    Json(json!({
        "data": {
            "type": "external-ids",
            "id": org.external_id,
        }
    }))
}

async fn list_accounts(State(db): State<Db>) -> Json<Value> {
    let org = db.read().await;
    let entries: Vec<Value> = org.accounts.values().cloned().collect();
    Json(json!({ "data": entries }))
}

async fn create_account(
    State(db): State<Db>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let attributes = payload["data"]["attributes"].clone();
    if !attributes.is_object() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let id = Uuid::new_v4();
    let entry = json!({
        "type": "accounts",
        "id": id,
        "attributes": attributes,
    });
    db.write().await.accounts.insert(id, entry.clone());
    Ok(Json(json!({ "data": entry })))
}

async fn update_account(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut org = db.write().await;
    let entry = org.accounts.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(updates) = payload["data"]["attributes"].as_object() {
        for (key, value) in updates {
            entry["attributes"][key.as_str()] = value.clone();
        }
    }
    Ok(Json(json!({ "data": entry.clone() })))
}

async fn delete_account(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, StatusCode> {
    let mut org = db.write().await;
    org.accounts
        .remove(&id)
        .map(|_| Json(json!({ "meta": { "status": "deleted" } })))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_bot_settings(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut org = db.write().await;
    let entry = org.accounts.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry["attributes"]["settings"] = json!({
        "bot": payload["data"]["attributes"]["settings"]["bot"],
    });
    Ok(Json(json!({ "data": entry.clone() })))
}

async fn list_communication_settings(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let org = db.read().await;
    // The real service honors accountId but silently ignores the channel
    // and includeParents parameters; the client's workaround filter depends
    // on that bug being reproduced here.
    let entries: Vec<Value> = org
        .settings
        .values()
        .filter(|entry| match params.get("accountId") {
            Some(account_id) => entry["attributes"]["accountId"] == account_id.as_str(),
            None => true,
        })
        .cloned()
        .collect();
    Json(json!({ "data": entries }))
}

async fn delete_communication_setting(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, StatusCode> {
    let mut org = db.write().await;
    org.settings
        .remove(&id)
        .map(|_| Json(json!({ "meta": { "status": "deleted" } })))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_profiles(State(db): State<Db>) -> Json<Value> {
    let org = db.read().await;
    let entries: Vec<Value> = org.profiles.values().cloned().collect();
    Json(json!({ "data": entries }))
}

async fn get_profile(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, StatusCode> {
    let org = db.read().await;
    org.profiles
        .get(&id)
        .cloned()
        .map(|entry| Json(json!({ "data": entry })))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn apply_profile(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let org = db.read().await;
    if !org.profiles.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "meta": {
            "status": "applying",
            "accountIds": payload["meta"]["accountIds"],
        }
    })))
}

async fn create_report_config(
    State(db): State<Db>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let attributes = payload["data"]["attributes"].clone();
    if !attributes.is_object() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let id = Uuid::new_v4();
    let entry = json!({
        "type": "report-configs",
        "id": id,
        "attributes": attributes,
    });
    db.write().await.report_configs.insert(id, entry.clone());
    Ok(Json(json!({ "data": entry })))
}
