//! # JDAC Client
//!
//! Client for JSON data access services. A [`DataAccessClient`] hands out typed
//! proxies for query, command, repository and batch services; every proxy
//! posts its inputs to `base_url/service_path/method` and decodes the JSON
//! reply. Calls are authenticated with a bearer token from a pluggable
//! [`JwtProvider`].
//!
//! ```rust,no_run
//! use jdac_client::{DataAccessClient, DataAccessService, ServiceHandle, ClientResult};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Customer {
//!     pub id: u64,
//!     pub name: String,
//! }
//!
//! pub struct CustomerQuery {
//!     handle: ServiceHandle,
//! }
//!
//! impl CustomerQuery {
//!     pub async fn by_name(&self, name: &str) -> ClientResult<Vec<Customer>> {
//!         self.handle.invoke_list("byName", &serde_json::json!({ "name": name })).await
//!     }
//! }
//!
//! impl DataAccessService for CustomerQuery {
//!     fn service_path() -> &'static str {
//!         "customers"
//!     }
//!
//!     fn from_handle(handle: ServiceHandle) -> Self {
//!         Self { handle }
//!     }
//! }
//!
//! # async fn run() -> ClientResult<()> {
//! let client = DataAccessClient::builder()
//!     .base_url("https://api.example.com")
//!     .build()?;
//! let customers = client.get_query::<CustomerQuery>().by_name("Ada").await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod handler;
pub mod properties;

pub use auth::*;
pub use client::*;
pub use error::*;
pub use handler::*;
pub use properties::*;
