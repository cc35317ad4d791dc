//! # JDAC Client Spring
//!
//! Container integration for the JDAC data access client. At startup it binds
//! the `jdac` configuration namespace, resolves the configured JWT provider,
//! builds one shared [`DataAccessClient`] and registers a lazily created
//! proxy bean for every data access service type found under the base
//! package.
//!
//! ## Features
//!
//! - **Configuration binding**: `jdac.*` from files and `JDAC__*` environment variables
//! - **Provider resolution**: `jwt-provider.class` by alias (`simple`, `basic`) or type name
//! - **Service discovery**: role markers registered at compile time, plus a declarative manifest
//! - **Dependency injection**: lazy singleton container with lookup by name or type
//!
//! ## Example
//!
//! ```rust,no_run
//! use jdac_client_spring::{
//!     data_access_service, ApplicationContext, DataAccessService, ServiceHandle,
//! };
//!
//! pub struct OrderQuery {
//!     handle: ServiceHandle,
//! }
//!
//! impl DataAccessService for OrderQuery {
//!     fn service_path() -> &'static str {
//!         "orders"
//!     }
//!
//!     fn from_handle(handle: ServiceHandle) -> Self {
//!         Self { handle }
//!     }
//! }
//!
//! data_access_service!(OrderQuery => [Query]);
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ApplicationContext::from_env()?;
//!     let orders = context.get_service::<OrderQuery>()?;
//!     Ok(())
//! }
//! ```

pub mod annotations;
pub mod catalog;
pub mod config;
pub mod container;
pub mod context;
pub mod error;
pub mod manifest;
pub mod provider;
pub mod registrar;
pub mod scanner;

pub use annotations::*;
pub use catalog::*;
pub use crate::config::*;
pub use container::*;
pub use context::*;
pub use error::*;
pub use manifest::*;
pub use provider::*;
pub use registrar::*;
pub use scanner::*;

pub use jdac_client::{
    DataAccessClient, DataAccessService, JwtProvider, Properties, ServiceHandle, ServiceRole,
};

#[doc(hidden)]
pub use inventory;
