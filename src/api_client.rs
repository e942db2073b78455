use anyhow::{Context, Result};
use reqwest::blocking::{Client, Request};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE as CONTENT_TYPE_HEADER};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde_json::Value;
use std::path::PathBuf;

use crate::config::Config;
use crate::response_store::ResponseStore;

/// Content type sent with every catalog query
pub const CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiSettings {
    pub api_url: String,
    pub auth_token: String,
}

impl ApiSettings {
    pub fn new(api_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            auth_token: auth_token.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api.api_url, &config.api.auth_token)
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.auth_token)
    }
}

/// What happened to a single catalog request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// HTTP 200, body written to `path`
    Saved { path: PathBuf, bytes: usize },
    /// The service answered with something other than 200
    HttpStatus(u16),
    /// No usable answer: bad URL, connection failure, broken body
    Transport(String),
}

impl FetchOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, FetchOutcome::Saved { .. })
    }
}

/// Posts catalog queries and keeps the last good response on disk
#[derive(Clone)]
pub struct ApiClient {
    settings: ApiSettings,
    store: ResponseStore,
    client: Client,
}

impl ApiClient {
    pub fn new(settings: ApiSettings, store: ResponseStore) -> reqwest::Result<Self> {
        // No timeout. A 3xx is answered like any other non-200 status,
        // never followed with a second request.
        let client = Client::builder()
            .timeout(None)
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            settings,
            store,
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Self::new(
            ApiSettings::from_config(config),
            ResponseStore::new(config.response_path()?),
        )
        .context("Failed to initialize HTTP client")?;
        Ok(client)
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    pub fn store(&self) -> &ResponseStore {
        &self.store
    }

    /// Build the POST for `query` without sending it
    pub fn build_request(&self, query: &Value) -> reqwest::Result<Request> {
        let body = query.to_string().into_bytes();

        self.client
            .post(&self.settings.api_url)
            .header(CONTENT_TYPE_HEADER, CONTENT_TYPE)
            .header(AUTHORIZATION, self.settings.bearer())
            .body(body)
            .build()
    }

    /// Send `query` and block until the service answers.
    ///
    /// The previous response file is removed first and only replaced on
    /// HTTP 200. Failed requests are logged and reported in the outcome;
    /// the error arm is only for local filesystem trouble.
    pub fn fetch(&self, query: &Value) -> Result<FetchOutcome> {
        tracing::info!(target: "api", "Getting data...");

        let sent = self
            .build_request(query)
            .and_then(|request| self.client.execute(request));

        self.store.clear()?;

        let response = match sent {
            Ok(response) => response,
            Err(e) => return Ok(transport_failure(&e)),
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(target: "api", "Failed, status code: {}", status.as_u16());
            return Ok(FetchOutcome::HttpStatus(status.as_u16()));
        }

        let body = match response.bytes() {
            Ok(body) => body,
            Err(e) => return Ok(transport_failure(&e)),
        };

        self.store.save(&body)?;
        tracing::info!(target: "api", "Success");

        Ok(FetchOutcome::Saved {
            path: self.store.path().to_path_buf(),
            bytes: body.len(),
        })
    }
}

fn error_kind(e: &reqwest::Error) -> &'static str {
    if e.is_builder() {
        "invalid request"
    } else if e.is_connect() {
        "connection failed"
    } else if e.is_timeout() {
        "timed out"
    } else if e.is_body() || e.is_decode() {
        "broken response body"
    } else {
        "request failed"
    }
}

fn transport_failure(e: &reqwest::Error) -> FetchOutcome {
    tracing::error!(target: "api", "Error occurred: {}", error_kind(e));
    tracing::error!(target: "api", "{}", e);
    FetchOutcome::Transport(e.to_string())
}
