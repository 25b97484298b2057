use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::common::{
    ApiErrorBody, ChildList, ConfigDocument, ConfigObject, StatisticsDocument, StatisticsObject,
};
use super::error::{ApiError, NOT_FOUND_ERROR_ID};

pub const DEFAULT_API_VERSION: &str = "5.2";

/// Connection settings for a traffic manager's REST API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub api_version: String,
    pub verify_ssl_cert: bool,
    pub timeout_seconds: u64,
}

impl ClientConfig {
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            verify_ssl_cert: true,
            timeout_seconds: 30,
        }
    }
}

/// vTM REST API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: Url,
    api_version: String,
    username: String,
    password: String,
    retry_config: RetryConfig,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            timeout_seconds: 30,
        }
    }
}

impl Client {
    /// Create a new API client with default retry behaviour
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let retry_config = RetryConfig {
            timeout_seconds: config.timeout_seconds,
            ..Default::default()
        };
        Self::with_retry(config, retry_config)
    }

    /// Create a new API client with custom retry configuration
    pub fn with_retry(config: ClientConfig, retry_config: RetryConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url));
        }

        let http_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_ssl_cert)
            .timeout(Duration::from_secs(retry_config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                api_version: config.api_version,
                username: config.username,
                password: config.password,
                retry_config,
            }),
        })
    }

    pub fn api_version(&self) -> &str {
        &self.inner.api_version
    }

    /// Configuration objects of type `T`
    pub fn config<T: ConfigObject>(&self) -> ConfigApi<'_, T> {
        ConfigApi {
            client: self,
            _marker: PhantomData,
        }
    }

    /// Statistics nodes of type `T`
    pub fn statistics<T: StatisticsObject>(&self) -> StatisticsApi<'_, T> {
        StatisticsApi {
            client: self,
            _marker: PhantomData,
        }
    }

    /// `<base>/api/tm/<version>/<path...>`; a fixed path entry may itself contain `/`
    pub fn url(&self, path: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "tm", self.inner.api_version.as_str()])
            .extend(path.iter().flat_map(|s| s.split('/')));
        Ok(url)
    }

    /// [`Client::url`] followed by `name` as a single escaped segment
    pub fn named_url(&self, path: &[&str], name: &str) -> Result<Url, ApiError> {
        if matches!(name, "" | "." | "..") {
            return Err(ApiError::InvalidName(name.to_string()));
        }
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .push(name);
        Ok(url)
    }

    /// Execute a GET request with retry logic
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self
            .execute_with_retry(
                || {
                    tracing::debug!("GET request to: {}", url);
                    self.inner
                        .http_client
                        .get(url.clone())
                        .basic_auth(&self.inner.username, Some(&self.inner.password))
                        .send()
                },
                &url,
            )
            .await?;
        self.parse_success_response(response).await
    }

    /// Execute a PUT request with retry logic; the echoed object is discarded
    pub async fn put<B: Serialize>(&self, url: Url, body: &B) -> Result<(), ApiError> {
        self.execute_with_retry(
            || {
                tracing::debug!("PUT request to: {}", url);
                self.inner
                    .http_client
                    .put(url.clone())
                    .basic_auth(&self.inner.username, Some(&self.inner.password))
                    .json(body)
                    .send()
            },
            &url,
        )
        .await
        .map(|_| ())
    }

    /// Execute a DELETE request with retry logic
    pub async fn delete(&self, url: Url) -> Result<(), ApiError> {
        self.execute_with_retry(
            || {
                tracing::debug!("DELETE request to: {}", url);
                self.inner
                    .http_client
                    .delete(url.clone())
                    .basic_auth(&self.inner.username, Some(&self.inner.password))
                    .send()
            },
            &url,
        )
        .await
        .map(|_| ())
    }

    /// Execute request with retry logic
    async fn execute_with_retry<F, Fut>(
        &self,
        request_fn: F,
        url: &Url,
    ) -> Result<reqwest::Response, ApiError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let retry = &self.inner.retry_config;
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= retry.max_retries {
            if attempt > 0 {
                let backoff = std::cmp::min(
                    retry.initial_backoff_ms * (2_u64.pow(attempt - 1)),
                    retry.max_backoff_ms,
                );
                tracing::debug!(
                    "Retrying request to {} after {}ms (attempt {})",
                    url,
                    backoff,
                    attempt
                );
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            match request_fn().await {
                Ok(response) => {
                    let status = response.status();
                    tracing::debug!("Response status: {}", status);

                    if status.is_success() {
                        return Ok(response);
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        return Err(ApiError::Auth);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || status.is_server_error()
                    {
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        return Err(self.handle_error_response(response).await);
                    }
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error = Some(ApiError::Timeout(retry.timeout_seconds));
                    } else if e.is_connect() || e.is_request() {
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        return Err(ApiError::Request(e));
                    }
                }
            }

            attempt += 1;
        }

        tracing::warn!("Giving up on {} after {} attempts", url, attempt);
        Err(last_error.unwrap_or(ApiError::ServiceUnavailable))
    }

    async fn parse_success_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        tracing::debug!("API response body: {}", text);

        serde_json::from_str::<T>(&text).map_err(|e| {
            tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
            ApiError::Parse(format!("Failed to parse response: {}", e))
        })
    }

    /// Map a 4xx response onto NotFound or a typed API error
    async fn handle_error_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let body = serde_json::from_str::<ApiErrorBody>(&text).ok();
        let not_found = status == 404
            || body
                .as_ref()
                .is_some_and(|b| b.error_id == NOT_FOUND_ERROR_ID);

        match body {
            Some(body) if not_found => ApiError::NotFound {
                message: body.error_text,
            },
            None if not_found => ApiError::NotFound { message: text },
            Some(body) => ApiError::Api {
                status,
                error_id: body.error_id,
                message: body.error_text,
            },
            None => ApiError::Api {
                status,
                error_id: String::new(),
                message: text,
            },
        }
    }
}

/// Typed access to one configuration collection
pub struct ConfigApi<'a, T> {
    client: &'a Client,
    _marker: PhantomData<T>,
}

impl<'a, T: ConfigObject> ConfigApi<'a, T> {
    /// URL of the named object, or of the singleton when `T::SINGLETON`
    pub fn object_url(&self, name: &str) -> Result<Url, ApiError> {
        if T::SINGLETON {
            self.client.url(&["config", "active", T::COLLECTION])
        } else {
            self.client.named_url(&["config", "active", T::COLLECTION], name)
        }
    }

    /// GET /api/tm/{version}/config/active/{collection}
    pub async fn list(&self) -> Result<Vec<String>, ApiError> {
        let url = self.client.url(&["config", "active", T::COLLECTION])?;
        let list: ChildList = self.client.get(url).await?;
        Ok(list.names())
    }

    /// GET /api/tm/{version}/config/active/{collection}/{name}
    pub async fn get(&self, name: &str) -> Result<T, ApiError> {
        let document: ConfigDocument<T> = self.client.get(self.object_url(name)?).await?;
        Ok(document.properties)
    }

    /// PUT /api/tm/{version}/config/active/{collection}/{name}
    pub async fn put(&self, name: &str, properties: &T) -> Result<(), ApiError> {
        let document = ConfigDocument { properties };
        self.client.put(self.object_url(name)?, &document).await
    }

    /// DELETE /api/tm/{version}/config/active/{collection}/{name}
    pub async fn delete(&self, name: &str) -> Result<(), ApiError> {
        self.client.delete(self.object_url(name)?).await
    }
}

/// Typed access to one statistics collection
pub struct StatisticsApi<'a, T> {
    client: &'a Client,
    _marker: PhantomData<T>,
}

impl<'a, T: StatisticsObject> StatisticsApi<'a, T> {
    /// GET /api/tm/{version}/status/local_tm/statistics/{collection}/{name}
    pub async fn get(&self, name: &str) -> Result<T, ApiError> {
        let url = self
            .client
            .named_url(&["status", "local_tm", "statistics", T::COLLECTION], name)?;
        let document: StatisticsDocument<T> = self.client.get(url).await?;
        Ok(document.statistics)
    }

    /// GET /api/tm/{version}/status/local_tm/statistics/{collection}
    pub async fn get_global(&self) -> Result<T, ApiError> {
        let url = self
            .client
            .url(&["status", "local_tm", "statistics", T::COLLECTION])?;
        let document: StatisticsDocument<T> = self.client.get(url).await?;
        Ok(document.statistics)
    }
}
