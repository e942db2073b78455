//! Blocking client for a remote component catalog.
//!
//! [`api_client::ApiClient::fetch`] POSTs a JSON query with the configured
//! bearer token and keeps the raw body of the last HTTP 200 response at a
//! well-known path where the rest of the add-on picks it up.

pub mod api_client;
pub mod cli;
pub mod config;
pub mod response_store;
pub mod utils;

pub use api_client::{ApiClient, ApiSettings, FetchOutcome, CONTENT_TYPE};
pub use response_store::ResponseStore;
