use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE, SET_COOKIE},
    Client, Method, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;

use crate::error::{extract_error_message, ApiError};

/// Typed access to the clinic REST backend.
///
/// Cloning is cheap; the underlying connection pool is shared. A client
/// created with [`BackendClient::with_session`] forwards the browser's
/// session cookie on every call.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    session: Option<String>,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.api_url.clone(),
            session: None,
        }
    }

    pub fn with_session(&self, cookie: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            session: Some(cookie.into()),
        }
    }

    /// Same backend, no credentials. Used by the public booking catalog.
    pub fn anonymous(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            session: None,
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(cookie) = &self.session {
            match HeaderValue::from_str(cookie) {
                Ok(value) => {
                    headers.insert(COOKIE, value);
                }
                Err(_) => warn!("Dropping session cookie with invalid header characters"),
            }
        }

        headers
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        fallback: &str,
    ) -> Result<Response, ApiError> {
        if self.base_url.is_empty() {
            return Err(ApiError::NotConfigured);
        }

        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url).headers(self.get_headers());
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|source| ApiError::Transport {
            fallback: fallback.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("json"))
            .unwrap_or(false);
        let error_text = response.text().await.unwrap_or_default();
        error!("API error ({}) on {}: {}", status, path, error_text);

        let message = if is_json {
            serde_json::from_str::<Value>(&error_text)
                .ok()
                .and_then(|body| extract_error_message(&body))
        } else {
            None
        };

        Err(ApiError::Status {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| fallback.to_string()),
        })
    }

    /// Sends a request and decodes the JSON response body.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        fallback: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, body, fallback).await?;
        response.json::<T>().await.map_err(|source| ApiError::Decode {
            fallback: fallback.to_string(),
            source,
        })
    }

    /// Sends a request whose response body, if any, is not needed.
    pub async fn request_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        fallback: &str,
    ) -> Result<(), ApiError> {
        let response = self.send(method, path, body, fallback).await?;
        let _ = response.bytes().await;
        Ok(())
    }

    /// Decodes the body when it is JSON of the expected shape, else `T::default()`.
    /// For message-only endpoints that may answer with an empty body.
    pub async fn request_lenient<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        fallback: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let response = self.send(method, path, body, fallback).await?;
        let bytes = response.bytes().await.unwrap_or_default();
        Ok(serde_json::from_slice(&bytes).unwrap_or_default())
    }

    /// Like [`BackendClient::request`], also returning the `Set-Cookie`
    /// values so the caller can relay them to the browser.
    pub async fn request_with_cookies<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        fallback: &str,
    ) -> Result<(T, Vec<String>), ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, body, fallback).await?;
        let cookies = set_cookies(&response);
        let data = response.json::<T>().await.map_err(|source| ApiError::Decode {
            fallback: fallback.to_string(),
            source,
        })?;
        Ok((data, cookies))
    }

    /// Sends a request for its `Set-Cookie` values only.
    pub async fn request_cookies(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        fallback: &str,
    ) -> Result<Vec<String>, ApiError> {
        let response = self.send(method, path, body, fallback).await?;
        Ok(set_cookies(&response))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None, fallback).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
        fallback: &str,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, Some(body), fallback).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
        fallback: &str,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, Some(body), fallback).await
    }

    pub async fn delete(&self, path: &str, fallback: &str) -> Result<(), ApiError> {
        self.request_empty(Method::DELETE, path, None, fallback).await
    }
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// Turns `Set-Cookie` values into the `Cookie` header a browser would send.
pub fn cookie_pairs(set_cookies: &[String]) -> String {
    set_cookies
        .iter()
        .filter_map(|raw| raw.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Builds a query string from the present parameters, or "" when none are.
pub fn query_string(params: &[(&str, Option<String>)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}={}", key, urlencoding::encode(v)))
        })
        .collect();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}
