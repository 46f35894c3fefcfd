//! The Cloud Conformity API client: one method per remote operation.
//!
//! # Design
//! `ConformityClient` holds only the base URL and the fixed header pair
//! (`Content-Type: application/vnd.api+json` plus `Authorization: ApiKey
//! <key>`) and carries no mutable state between calls. Each operation builds
//! an `HttpRequest`, hands it to the injected `Transport`, and runs the
//! result through `process_response`. Payload envelopes are built with
//! `serde_json::json!` to mirror the vendor's JSON:API-like schema verbatim.

use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, Transport, UreqTransport};
use crate::response::process_response;
use crate::types::{AccountUpdate, ApplyMode, BotSettings, NewAccount};

/// Default regional API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://eu-west-1-api.cloudconformity.com";

/// Synchronous client for the Cloud Conformity REST API.
///
/// Immutable after construction; safe to reuse sequentially for any number
/// of calls. Concurrent use from multiple threads is only as safe as the
/// injected transport — the client adds no locking of its own.
#[derive(Debug, Clone)]
pub struct ConformityClient<T: Transport = UreqTransport> {
    base_url: String,
    headers: Vec<(String, String)>,
    transport: T,
}

impl ConformityClient<UreqTransport> {
    /// Create a client against the default regional endpoint.
    ///
    /// `api_key` is the 64-bit strong key Cloud Conformity generates on
    /// behalf of a user; it is embedded into an `Authorization: ApiKey
    /// <key>` header.
    pub fn new(api_key: &str) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Create a client against a specific regional endpoint.
    pub fn with_endpoint(api_key: &str, api_endpoint: &str) -> Self {
        Self::with_transport(api_key, api_endpoint, UreqTransport::new())
    }
}

impl<T: Transport> ConformityClient<T> {
    /// Create a client with an explicit transport. Used by tests and by
    /// callers that need to control the HTTP layer.
    pub fn with_transport(api_key: &str, api_endpoint: &str, transport: T) -> Self {
        Self {
            base_url: api_endpoint.trim_end_matches('/').to_string(),
            headers: vec![
                (
                    "Content-Type".to_string(),
                    "application/vnd.api+json".to_string(),
                ),
                ("Authorization".to_string(), format!("ApiKey {api_key}")),
            ],
            transport,
        }
    }

    /// Build a request for `resource` appended to the configured base URL.
    fn request(&self, method: HttpMethod, resource: &str, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{resource}", self.base_url),
            headers: self.headers.clone(),
            body,
        }
    }

    fn call(&self, method: HttpMethod, resource: &str, body: Option<String>) -> Result<Value, ApiError> {
        let request = self.request(method, resource, body);
        process_response(self.transport.execute(&request)?)
    }

    /// Get the organisation's external ID.
    pub fn get_organisation_external_id(&self) -> Result<Value, ApiError> {
        self.call(HttpMethod::Get, "/v1/organisation/external-id", None)
    }

    /// Register a new AWS account with the organisation.
    ///
    /// The access block is derived from the 12-digit AWS account id:
    /// `roleArn` becomes `arn:aws:iam::{id}:role/CloudConformity`.
    pub fn create_account(&self, account: &NewAccount) -> Result<Value, ApiError> {
        let payload = json!({
            "data": {
                "type": "account",
                "attributes": {
                    "name": account.name,
                    "environment": account.environment,
                    "access": {
                        "keys": {
                            "roleArn": format!(
                                "arn:aws:iam::{}:role/CloudConformity",
                                account.aws_account_id
                            ),
                            "externalId": account.external_id,
                        }
                    },
                    "costPackage": account.cost_package,
                    "subscriptionType": account.subscription_type,
                }
            }
        });

        self.call(HttpMethod::Post, "/v1/accounts", Some(payload.to_string()))
    }

    /// Delete an existing account.
    pub fn delete_account(&self, account_id: &str) -> Result<Value, ApiError> {
        self.call(HttpMethod::Delete, &format!("/v1/accounts/{account_id}"), None)
    }

    /// Update an account's name, environment, and tags.
    pub fn update_account(&self, account_id: &str, update: &AccountUpdate) -> Result<Value, ApiError> {
        let payload = json!({
            "data": {
                "attributes": {
                    "name": update.name,
                    "environment": update.environment,
                    "tags": [update.environment, update.product_domain],
                }
            }
        });

        self.call(
            HttpMethod::Patch,
            &format!("/v1/accounts/{account_id}"),
            Some(payload.to_string()),
        )
    }

    /// Query all accounts the API key has access to.
    ///
    /// When `name` is given the decoded response is filtered client-side to
    /// entries whose `attributes.name` matches exactly; otherwise the full
    /// payload is returned unchanged.
    pub fn list_accounts(&self, name: Option<&str>) -> Result<Value, ApiError> {
        let response = self.call(HttpMethod::Get, "/v1/accounts", None)?;

        match name {
            Some(name) => Ok(filter_data(response, |entry| {
                entry["attributes"]["name"] == *name
            })),
            None => Ok(response),
        }
    }

    /// List communication settings, optionally scoped by account, channel,
    /// and the include-parents flag.
    ///
    /// The service silently ignores the `channel` query parameter, so the
    /// decoded result is additionally filtered client-side to entries whose
    /// `attributes.channel` equals the requested channel. Known quirk: the
    /// filter runs unconditionally, so calling with `channel: None` keeps
    /// only entries carrying no channel value at all — in practice an empty
    /// result set, not "all settings". Preserved for compatibility with the
    /// upstream behavior; pass the channel you want.
    pub fn list_communication_settings(
        &self,
        channel: Option<&str>,
        account_id: Option<&str>,
        include_parents: bool,
    ) -> Result<Value, ApiError> {
        let resource = format!(
            "/v1/settings/communication{}",
            communication_query(account_id, channel, include_parents)
        );
        let response = self.call(HttpMethod::Get, &resource, None)?;

        Ok(filter_data(response, |entry| {
            entry["attributes"]["channel"].as_str() == channel
        }))
    }

    /// Delete a communication setting.
    pub fn delete_communication_setting(&self, setting_id: &str) -> Result<Value, ApiError> {
        self.call(HttpMethod::Delete, &format!("/v1/settings/{setting_id}"), None)
    }

    /// List profiles associated with the organisation.
    pub fn list_profiles(&self) -> Result<Value, ApiError> {
        self.call(HttpMethod::Get, "/v1/profiles", None)
    }

    /// Get a single profile by id.
    pub fn get_profile(&self, profile_id: &str) -> Result<Value, ApiError> {
        self.call(HttpMethod::Get, &format!("/v1/profiles/{profile_id}"), None)
    }

    /// Apply a profile's rule settings to a set of accounts.
    ///
    /// Fetches the profile first to read its display name, which is embedded
    /// as `Applied from Profile: {name}` in the request notes. Two round
    /// trips per call.
    pub fn apply_profile_to_accounts(
        &self,
        profile_id: &str,
        account_ids: &[String],
        mode: ApplyMode,
    ) -> Result<Value, ApiError> {
        let profile = self.get_profile(profile_id)?;
        let profile_name = profile["data"]["attributes"]["name"].as_str().ok_or_else(|| {
            ApiError::Deserialization(
                "profile response missing data.attributes.name".to_string(),
            )
        })?;

        let payload = json!({
            "meta": {
                "accountIds": account_ids,
                "types": ["rule"],
                "mode": mode,
                "notes": format!("Applied from Profile: {profile_name}"),
            }
        });

        self.call(
            HttpMethod::Post,
            &format!("/v1/profiles/{profile_id}/apply"),
            Some(payload.to_string()),
        )
    }

    /// Create a weekly email report configuration for an account.
    ///
    /// The schedule, timezone, and failure/risk-level filter are fixed; only
    /// the recipient list and titles vary per account.
    pub fn create_report_configuration(
        &self,
        account_id: &str,
        account_name: &str,
        recipient_email_addresses: &[String],
    ) -> Result<Value, ApiError> {
        let payload = json!({
            "data": {
                "attributes": {
                    "accountId": account_id,
                    "configuration": {
                        "title": format!("[Cloud Conformity] Report for {account_name}"),
                        "scheduled": true,
                        "frequency": "* * MON",
                        "tz": "Asia/Jakarta",
                        "sendEmail": true,
                        "emails": recipient_email_addresses,
                        "filter": {
                            "statuses": ["FAILURE"],
                            "riskLevels": ["EXTREME", "VERY_HIGH", "HIGH"],
                            "suppressed": false,
                        }
                    }
                }
            }
        });

        self.call(HttpMethod::Post, "/v1/report-configs", Some(payload.to_string()))
    }

    /// Update Conformity Bot settings for an account.
    ///
    /// The settings object is sparse: each key appears only when the
    /// corresponding `BotSettings` field is set, and `BotSettings::default()`
    /// produces an empty object.
    pub fn update_account_bot_settings(
        &self,
        account_id: &str,
        settings: &BotSettings,
    ) -> Result<Value, ApiError> {
        let mut bot = Map::new();
        if settings.is_disabled {
            bot.insert("disabled".to_string(), Value::Bool(true));
        }
        if let Some(until) = settings.disabled_until {
            bot.insert("disabledUntil".to_string(), Value::from(until));
        }
        if let Some(hours) = settings.scan_interval_hours {
            bot.insert("delay".to_string(), Value::from(hours));
        }
        if !settings.disabled_regions.is_empty() {
            let regions: Map<String, Value> = settings
                .disabled_regions
                .iter()
                .map(|region| (region.clone(), Value::Bool(true)))
                .collect();
            bot.insert("disabledRegions".to_string(), Value::Object(regions));
        }

        let payload = json!({
            "data": {
                "type": "accounts",
                "attributes": {
                    "settings": {
                        "bot": bot,
                    }
                }
            }
        });

        self.call(
            HttpMethod::Patch,
            &format!("/v1/accounts/{account_id}/settings/bot"),
            Some(payload.to_string()),
        )
    }
}

/// Rebuild a `{"data": [...]}` envelope keeping only entries that satisfy
/// the predicate. A response without a `data` array yields an empty one.
fn filter_data<F>(response: Value, keep: F) -> Value
where
    F: Fn(&Value) -> bool,
{
    let entries: Vec<Value> = match response.get("data").and_then(Value::as_array) {
        Some(entries) => entries.iter().filter(|entry| keep(entry)).cloned().collect(),
        None => Vec::new(),
    };
    json!({ "data": entries })
}

/// Build the optional query string for the communication settings listing.
///
/// Present parameters are appended as `&key=value` and the leading `&` is
/// then normalized to `?`. The include-parents flag contributes
/// `includeParents=true` only when set — `false` is its absent value.
fn communication_query(
    account_id: Option<&str>,
    channel: Option<&str>,
    include_parents: bool,
) -> String {
    let mut query = String::new();
    if let Some(account_id) = account_id {
        query.push_str(&format!("&accountId={account_id}"));
    }
    if let Some(channel) = channel {
        query.push_str(&format!("&channel={channel}"));
    }
    if include_parents {
        query.push_str("&includeParents=true");
    }

    if query.is_empty() {
        query
    } else {
        query.replacen('&', "?", 1)
    }
}
