//! Synchronous client for the Cloud Conformity REST API.
//!
//! # Overview
//! One method per remote operation: each builds an `HttpRequest` with the
//! fixed `application/vnd.api+json` + `ApiKey` header set, executes it
//! through an injected `Transport`, and normalizes the response into a
//! `serde_json::Value` — or an `ApiError` when the status lands in the
//! library's error table.
//!
//! # Design
//! - `ConformityClient` holds only immutable configuration (base URL and
//!   headers); it is safe to reuse sequentially for any number of calls.
//! - HTTP traffic is plain data (`HttpRequest` / `HttpResponse`); the
//!   round-trip happens behind the `Transport` trait, with `UreqTransport`
//!   as the stock blocking implementation.
//! - The status table routes 201/202/204 into the error path on purpose —
//!   it mirrors the vendor's documented behavior, not HTTP convention.
//! - No retries, no rate limiting, no pagination; every failure is terminal
//!   for the call.

pub mod client;
pub mod error;
pub mod http;
pub mod response;
pub mod types;

pub use client::{ConformityClient, DEFAULT_ENDPOINT};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use response::process_response;
pub use types::{AccountUpdate, ApplyMode, BotSettings, NewAccount, SubscriptionType};
