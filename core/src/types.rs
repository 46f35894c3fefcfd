//! Caller-facing input types for write operations.
//!
//! # Design
//! Operations that post JSON:API envelopes take a typed input struct; the
//! client serializes it into the vendor's `data`/`attributes` (or `meta`)
//! wrapping. Resource identifiers stay opaque `&str` parameters — the
//! service issues them and this library never inspects them.

use serde::Serialize;

/// Subscription tier for a newly registered account.
///
/// `Advanced` comes with Real-Time threat monitoring enabled, `Essentials`
/// without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    #[default]
    Advanced,
    Essentials,
}

/// Input for registering an AWS account with the organisation.
///
/// `aws_account_id` is the 12-digit AWS account number; it is only used to
/// format the `arn:aws:iam::{id}:role/CloudConformity` role ARN in the
/// request payload.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub aws_account_id: u64,
    /// Account name in Cloud Conformity, usually the AWS account alias.
    pub name: String,
    /// Environment tag: testing, staging, or production.
    pub environment: String,
    /// The organisation's external ID (see `get_organisation_external_id`).
    pub external_id: String,
    /// Enables the cost package add-on (spend analysis, forecasting).
    pub cost_package: bool,
    pub subscription_type: SubscriptionType,
}

/// Input for updating an account's name, environment, and tags.
///
/// The resulting payload tags the account with `[environment,
/// product_domain]`.
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub name: String,
    pub environment: String,
    /// Abbreviation of the product domain owning the account.
    pub product_domain: String,
}

/// How a profile's settings merge into an account's existing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyMode {
    /// Merge; on conflict the account's existing setting wins.
    FillGaps,
    /// Merge; on conflict the profile's setting wins.
    Overwrite,
    /// Clear all existing settings, then apply the profile's.
    #[default]
    Replace,
}

/// Conformity Bot settings for an account.
///
/// Every field is optional on the wire: the payload carries `disabled` only
/// when true, `disabledUntil` and `delay` only when present, and
/// `disabledRegions` only when the list is non-empty. The default value
/// therefore produces an empty settings object, which the service treats as
/// "clear overrides".
#[derive(Debug, Clone, Default)]
pub struct BotSettings {
    /// Disable the bot entirely.
    pub is_disabled: bool,
    /// Keep the bot disabled until this Unix epoch timestamp in
    /// milliseconds.
    pub disabled_until: Option<i64>,
    /// Hours of delay between bot runs.
    pub scan_interval_hours: Option<u32>,
    /// AWS regions the bot must skip. Explicitly empty by default.
    pub disabled_regions: Vec<String>,
}
