//! Data access client facade handing out typed service proxies

use crate::{auth::JwtProvider, handler::ServiceHandler, ClientError, ClientResult};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// How a service type is fulfilled by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    Query,
    Command,
    Repository,
    Batch,
}

impl ServiceRole {
    /// Every role, in registration order
    pub const ALL: [ServiceRole; 4] = [
        ServiceRole::Query,
        ServiceRole::Command,
        ServiceRole::Repository,
        ServiceRole::Batch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceRole::Query => "query",
            ServiceRole::Command => "command",
            ServiceRole::Repository => "repository",
            ServiceRole::Batch => "batch",
        }
    }
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceRole {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(ServiceRole::Query),
            "command" => Ok(ServiceRole::Command),
            "repository" => Ok(ServiceRole::Repository),
            "batch" => Ok(ServiceRole::Batch),
            other => Err(ClientError::configuration(format!(
                "unknown service role '{}'",
                other
            ))),
        }
    }
}

/// A service type the client can hand out as a proxy.
///
/// Implementors wrap the [`ServiceHandle`] they are given and expose typed
/// methods that call [`ServiceHandle::invoke`] / [`ServiceHandle::invoke_list`].
pub trait DataAccessService: Send + Sync + 'static {
    /// Path of the service below the client base URL
    fn service_path() -> &'static str
    where
        Self: Sized,
    {
        ""
    }

    fn from_handle(handle: ServiceHandle) -> Self
    where
        Self: Sized;
}

/// Binding between one proxy and the shared service handler
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    role: ServiceRole,
    service_path: &'static str,
    handler: Arc<ServiceHandler>,
}

impl ServiceHandle {
    pub fn role(&self) -> ServiceRole {
        self.role
    }

    pub fn service_path(&self) -> &'static str {
        self.service_path
    }

    /// Full URL of a service method
    pub fn method_url(&self, method: &str) -> String {
        self.handler.service_url(&[self.service_path, method])
    }

    /// Call a service method returning a single object
    pub async fn invoke<I, O>(&self, method: &str, input: &I) -> ClientResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.handler
            .post_for_object(&self.method_url(method), input)
            .await
    }

    /// Call a service method returning a list
    pub async fn invoke_list<I, O>(&self, method: &str, input: &I) -> ClientResult<Vec<O>>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.handler
            .post_for_list(&self.method_url(method), input)
            .await
    }
}

/// Builder for configuring and creating a data access client
#[derive(Default)]
pub struct DataAccessClientBuilder {
    base_url: Option<String>,
    log_request: bool,
    jwt_provider: Option<Arc<dyn JwtProvider>>,
    timeout: Option<Duration>,
}

impl DataAccessClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn log_request(mut self, log_request: bool) -> Self {
        self.log_request = log_request;
        self
    }

    pub fn jwt_provider(mut self, jwt_provider: Option<Arc<dyn JwtProvider>>) -> Self {
        self.jwt_provider = jwt_provider;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> ClientResult<DataAccessClient> {
        let base_url = self
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ClientError::configuration("base url is required"))?;
        let base_url = Url::parse(base_url.trim()).map_err(|e| {
            ClientError::configuration(format!("invalid base url '{}': {}", base_url, e))
        })?;

        info!(
            "Creating data access client for {} (log_request: {}, jwt provider: {})",
            base_url,
            self.log_request,
            self.jwt_provider.is_some()
        );

        let handler = ServiceHandler::new(
            base_url,
            self.log_request,
            self.jwt_provider,
            self.timeout,
        )?;

        Ok(DataAccessClient {
            handler: Arc::new(handler),
        })
    }
}

/// Client facade producing typed proxies for query, command, repository and
/// batch services. Every proxy shares the client's handler.
#[derive(Debug, Clone)]
pub struct DataAccessClient {
    handler: Arc<ServiceHandler>,
}

impl DataAccessClient {
    /// Get a builder for configuring a new client
    pub fn builder() -> DataAccessClientBuilder {
        DataAccessClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        self.handler.base_url().as_str()
    }

    pub fn is_log_request(&self) -> bool {
        self.handler.log_request()
    }

    pub fn jwt_provider(&self) -> Option<&Arc<dyn JwtProvider>> {
        self.handler.jwt_provider()
    }

    pub fn get_query<T: DataAccessService>(&self) -> T {
        self.proxy(ServiceRole::Query)
    }

    pub fn get_command<T: DataAccessService>(&self) -> T {
        self.proxy(ServiceRole::Command)
    }

    pub fn get_repository<T: DataAccessService>(&self) -> T {
        self.proxy(ServiceRole::Repository)
    }

    pub fn get_batch<T: DataAccessService>(&self) -> T {
        self.proxy(ServiceRole::Batch)
    }

    fn proxy<T: DataAccessService>(&self, role: ServiceRole) -> T {
        T::from_handle(ServiceHandle {
            role,
            service_path: T::service_path(),
            handler: self.handler.clone(),
        })
    }
}
