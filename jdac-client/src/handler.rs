use crate::{auth::JwtProvider, ClientError, ClientResult};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Posts JSON service inputs to the data access endpoint and decodes the reply
pub struct ServiceHandler {
    http: reqwest::Client,
    base_url: Url,
    log_request: bool,
    jwt_provider: Option<Arc<dyn JwtProvider>>,
}

impl ServiceHandler {
    pub fn new(
        base_url: Url,
        log_request: bool,
        jwt_provider: Option<Arc<dyn JwtProvider>>,
        timeout: Option<Duration>,
    ) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            log_request,
            jwt_provider,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn log_request(&self) -> bool {
        self.log_request
    }

    pub fn jwt_provider(&self) -> Option<&Arc<dyn JwtProvider>> {
        self.jwt_provider.as_ref()
    }

    /// Resolve a service URL built from path segments against the base URL
    pub fn service_url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.as_str().trim_end_matches('/').to_string();
        for segment in segments {
            let segment = segment.trim_matches('/');
            if !segment.is_empty() {
                url.push('/');
                url.push_str(segment);
            }
        }
        url
    }

    /// POST `input` and decode the response as a single object.
    ///
    /// An empty response body decodes as JSON `null`.
    pub async fn post_for_object<I, O>(&self, url: &str, input: &I) -> ClientResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let body = self.post(url, input).await?;
        if body.trim().is_empty() {
            return Ok(serde_json::from_str("null")?);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// POST `input` and decode the response as a list.
    ///
    /// An empty or `null` response body yields an empty list.
    pub async fn post_for_list<I, O>(&self, url: &str, input: &I) -> ClientResult<Vec<O>>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let body = self.post(url, input).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let list: Option<Vec<O>> = serde_json::from_str(&body)?;
        Ok(list.unwrap_or_default())
    }

    async fn post<I>(&self, url: &str, input: &I) -> ClientResult<String>
    where
        I: Serialize + ?Sized,
    {
        let payload = serde_json::to_string(input)?;
        if self.log_request {
            info!("POST {} {}", url, payload);
        } else {
            debug!("POST {}", url);
        }

        let mut request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload);

        if let Some(provider) = &self.jwt_provider {
            request = request.bearer_auth(provider.get_jwt().await?);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::status(status.as_u16(), body));
        }
        Ok(body)
    }
}

impl fmt::Debug for ServiceHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandler")
            .field("base_url", &self.base_url.as_str())
            .field("log_request", &self.log_request)
            .field("jwt_provider", &self.jwt_provider)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(base: &str) -> ServiceHandler {
        ServiceHandler::new(Url::parse(base).unwrap(), false, None, None).unwrap()
    }

    #[test]
    fn test_service_url_joins_segments() {
        let handler = handler("https://api.example.com/data/");
        assert_eq!(
            handler.service_url(&["/customers/", "getById"]),
            "https://api.example.com/data/customers/getById"
        );
        assert_eq!(
            handler.service_url(&["", "/ping"]),
            "https://api.example.com/data/ping"
        );
    }
}
