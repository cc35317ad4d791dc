//! Pluggable JWT providers used to authenticate outbound service calls.

use crate::{ClientError, ClientResult, Properties};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Supplies bearer tokens for the data access client.
///
/// Providers are created through a no-argument constructor and then receive
/// the whole provider property bag through [`JwtProvider::set`].
#[async_trait]
pub trait JwtProvider: Send + Sync + Debug {
    /// Read provider settings (endpoint, key, secret, ...) from the bag
    fn set(&mut self, properties: &Properties) -> ClientResult<()>;

    /// Produce a bearer token
    async fn get_jwt(&self) -> ClientResult<String>;
}

/// Provider returning a fixed token taken from the `jwt` property.
#[derive(Debug, Default)]
pub struct SimpleJwtProvider {
    jwt: Option<String>,
}

impl SimpleJwtProvider {
    pub fn new(jwt: impl Into<String>) -> Self {
        Self {
            jwt: Some(jwt.into()),
        }
    }
}

#[async_trait]
impl JwtProvider for SimpleJwtProvider {
    fn set(&mut self, properties: &Properties) -> ClientResult<()> {
        let jwt = properties.require("jwt").map_err(ClientError::configuration)?;
        self.jwt = Some(jwt.to_string());
        Ok(())
    }

    async fn get_jwt(&self) -> ClientResult<String> {
        self.jwt
            .clone()
            .ok_or_else(|| ClientError::auth("SimpleJwtProvider has no jwt configured"))
    }
}

/// Provider that exchanges a service key and secret for a token.
///
/// The credentials are sent with HTTP Basic authentication to `authEndpoint`.
/// The token is cached until [`BasicJwtProvider::invalidate`] is called.
#[derive(Debug, Default)]
pub struct BasicJwtProvider {
    auth_endpoint: String,
    service_key: String,
    service_secret: String,
    http: reqwest::Client,
    cached: RwLock<Option<String>>,
}

impl BasicJwtProvider {
    /// Drop the cached token so the next call fetches a fresh one
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    async fn fetch(&self) -> ClientResult<String> {
        debug!("Requesting JWT from {}", self.auth_endpoint);

        let response = self
            .http
            .post(&self.auth_endpoint)
            .basic_auth(&self.service_key, Some(&self.service_secret))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::auth(format!(
                "token endpoint {} responded with {}: {}",
                self.auth_endpoint, status, body
            )));
        }

        extract_token(&body)
            .ok_or_else(|| ClientError::auth("token endpoint returned an empty token"))
    }
}

#[async_trait]
impl JwtProvider for BasicJwtProvider {
    fn set(&mut self, properties: &Properties) -> ClientResult<()> {
        let required = |key: &str| {
            properties
                .require(key)
                .map(str::to_string)
                .map_err(ClientError::configuration)
        };

        self.auth_endpoint = required("authEndpoint")?;
        self.service_key = required("serviceKey")?;
        self.service_secret = required("serviceSecret")?;

        // dev-time token, used until invalidated
        if let Some(jwt) = properties.get("jwt").filter(|jwt| !jwt.trim().is_empty()) {
            *self.cached.get_mut() = Some(jwt.to_string());
        }

        info!("BasicJwtProvider configured for {}", self.auth_endpoint);
        Ok(())
    }

    async fn get_jwt(&self) -> ClientResult<String> {
        if let Some(jwt) = self.cached.read().await.clone() {
            return Ok(jwt);
        }

        let mut cached = self.cached.write().await;
        if let Some(jwt) = cached.clone() {
            return Ok(jwt);
        }

        let jwt = self.fetch().await?;
        *cached = Some(jwt.clone());
        Ok(jwt)
    }
}

/// Pull the token out of a token endpoint response body.
fn extract_token(body: &str) -> Option<String> {
    let body = body.trim();
    let token = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ["jwt", "token", "access_token", "accessToken"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)?,
        Ok(Value::String(token)) => token,
        _ => body.to_string(),
    };

    (!token.is_empty()).then_some(token)
}
