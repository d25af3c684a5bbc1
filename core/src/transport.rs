//! The configured transport: one reqwest client bound to a base URL,
//! timeout and default JSON headers, plus the interceptor that turns every
//! failure into a `NormalizedError`.
//!
//! # Design
//! `execute` only fails when no response was obtained. Status checking and
//! body decoding live in the free functions `intercept` and `decode`, which
//! both `Transport::request` and the client's `parse_*` methods go through,
//! so normalization happens in one place whether or not the caller holds a
//! live transport.

use std::error::Error as StdError;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::NormalizedError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::ErrorResponse;

const JSON: &str = "application/json";

/// Shared, cloneable HTTP transport. Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base_url: String,
}

impl Transport {
    /// Build the transport for `config`.
    ///
    /// # Errors
    ///
    /// Returns a `Network` error when the underlying HTTP client cannot be
    /// constructed (TLS backend initialisation, invalid user agent).
    pub fn new(config: &Config) -> Result<Self, NormalizedError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.app.user_agent())
            .timeout(config.timeout)
            .build()
            .map_err(|e| NormalizedError::network(format!("failed to build HTTP client: {}", describe(&e))))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Absolute URL for `collection` with `id` appended as a single
    /// percent-encoded path segment, so `/`, `?` and `#` in an id stay
    /// part of the id.
    ///
    /// # Errors
    ///
    /// Returns an `Encode` error when the base URL cannot carry path
    /// segments.
    pub fn resource_url(&self, collection: &str, id: &str) -> Result<String, NormalizedError> {
        let mut url = Url::parse(&self.url(collection))
            .map_err(|e| NormalizedError::encode(format!("invalid request URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| NormalizedError::encode("base URL cannot carry path segments"))?
            .pop_if_empty()
            .push(id);
        Ok(url.into())
    }

    /// A bodyless request against `path`.
    pub fn build(&self, method: HttpMethod, path: &str) -> HttpRequest {
        bodyless(method, self.url(path))
    }

    /// A bodyless request against one resource of `collection`.
    ///
    /// # Errors
    ///
    /// See `resource_url`.
    pub fn build_resource(
        &self,
        method: HttpMethod,
        collection: &str,
        id: &str,
    ) -> Result<HttpRequest, NormalizedError> {
        Ok(bodyless(method, self.resource_url(collection, id)?))
    }

    /// A request against `path` carrying `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an `Encode` error when `body` cannot be serialized.
    pub fn build_json<B>(&self, method: HttpMethod, path: &str, body: &B) -> Result<HttpRequest, NormalizedError>
    where
        B: Serialize + ?Sized,
    {
        with_json(method, self.url(path), body)
    }

    /// A JSON request against one resource of `collection`.
    ///
    /// # Errors
    ///
    /// See `resource_url`; `Encode` when `body` cannot be serialized.
    pub fn build_resource_json<B>(
        &self,
        method: HttpMethod,
        collection: &str,
        id: &str,
        body: &B,
    ) -> Result<HttpRequest, NormalizedError>
    where
        B: Serialize + ?Sized,
    {
        with_json(method, self.resource_url(collection, id)?, body)
    }

    /// Perform one round trip.
    ///
    /// Any status, including 4xx/5xx, is returned as data.
    ///
    /// # Errors
    ///
    /// Returns a `Timeout` or `Network` error, without a status, when no
    /// complete response was obtained.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, NormalizedError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self.client.request(request.method.into(), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(normalize_transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(normalize_transport_error)?;

        tracing::debug!(method = %request.method, url = %request.url, status, "received response");
        Ok(HttpResponse { status, headers, body })
    }

    /// Execute `request` and run the interceptor over the response.
    ///
    /// # Errors
    ///
    /// Any transport failure or non-2xx status, normalized.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NormalizedError> {
        intercept(self.execute(request).await?)
    }

    /// Issue `method` against `path`, sending `body` as JSON when present,
    /// and decode a 2xx body into `T`. Use `serde_json::Value` for `T` to
    /// get the raw parsed JSON.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-2xx status or decode failure, normalized.
    pub async fn request<T, B>(&self, method: HttpMethod, path: &str, body: Option<&B>) -> Result<T, NormalizedError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = match body {
            Some(body) => self.build_json(method, path, body)?,
            None => self.build(method, path),
        };
        let response = self.send(request).await?;
        decode(&response)
    }

    /// `GET path`, decoded into `T`.
    ///
    /// # Errors
    ///
    /// See `request`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, NormalizedError> {
        self.request::<T, ()>(HttpMethod::Get, path, None).await
    }
}

fn bodyless(method: HttpMethod, url: String) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers: Vec::new(),
        body: None,
    }
}

fn with_json<B>(method: HttpMethod, url: String, body: &B) -> Result<HttpRequest, NormalizedError>
where
    B: Serialize + ?Sized,
{
    let body = serde_json::to_string(body).map_err(|e| NormalizedError::encode(e.to_string()))?;
    Ok(HttpRequest {
        method,
        url,
        headers: vec![("content-type".to_string(), JSON.to_string())],
        body: Some(body),
    })
}

/// Pass 2xx responses through; turn anything else into an `HttpStatus`
/// error carrying the status and the parsed body.
///
/// # Errors
///
/// Returns the normalized error for any non-2xx status.
pub fn intercept(response: HttpResponse) -> Result<HttpResponse, NormalizedError> {
    if response.is_success() {
        return Ok(response);
    }
    let data = serde_json::from_str::<Value>(&response.body).ok();
    let message = status_message(response.status, data.as_ref());
    tracing::debug!(status = response.status, error = %message, "request failed");
    Err(NormalizedError::http_status(response.status, data, message))
}

/// Decode a response body into `T`.
///
/// # Errors
///
/// Returns a `Decode` error, without a status, when the body is not valid
/// JSON of the expected shape.
pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, NormalizedError> {
    serde_json::from_str(&response.body)
        .map_err(|e| NormalizedError::decode(format!("invalid response body: {e}")))
}

/// `intercept` followed by `decode`.
///
/// # Errors
///
/// See `intercept` and `decode`.
pub fn expect_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, NormalizedError> {
    decode(&intercept(response)?)
}

/// Prefer the backend's own description (`message`, then `error`).
fn status_message(status: u16, data: Option<&Value>) -> String {
    data.and_then(|data| {
        data.get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                serde_json::from_value::<ErrorResponse>(data.clone())
                    .ok()
                    .map(|body| body.error)
            })
    })
    .filter(|message| !message.trim().is_empty())
    .unwrap_or_else(|| format!("Request failed with status code {status}"))
}

fn normalize_transport_error(error: reqwest::Error) -> NormalizedError {
    let message = describe(&error);
    if error.is_timeout() {
        NormalizedError::timeout(message)
    } else {
        NormalizedError::network(message)
    }
}

/// The error and its source chain on one line.
fn describe(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
