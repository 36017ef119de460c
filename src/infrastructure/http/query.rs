//! Thin request layer over [`reqwest`] used by every view.
//!
//! Each call maps a non-2xx answer to [`AppError::Api`] carrying the
//! backend's `{ errorCode, message }` payload, so callers can route errors
//! on the code alone.

use std::fmt;

use reqwest::{Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;
use url::Url;

use crate::{
    errors::{AppError, ErrorCode, ErrorRes},
    http::upload::{MultipartPayload, ProgressCallback},
    settings::AppConfig,
};

/// Identity of a read query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKeyName {
    ReadKnittingList,
    ReadKnittingInfo,
}

impl fmt::Display for QueryKeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKeyName::ReadKnittingList => f.write_str("READ_KNITTING_LIST"),
            QueryKeyName::ReadKnittingInfo => f.write_str("READ_KNITTING_INFO"),
        }
    }
}

/// A query identity combined with its parameters. Two fetches with
/// different parameters never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub name: QueryKeyName,
    pub params: String,
}

impl QueryKey {
    pub fn new<P: Serialize + ?Sized>(name: QueryKeyName, params: &P) -> Result<Self, AppError> {
        Ok(QueryKey {
            name,
            params: serde_json::to_string(params)?,
        })
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.params)
    }
}

#[derive(Debug, Clone)]
pub struct QueryClient {
    client: reqwest::Client,
    base_url: Url,
    chunk_size: usize,
}

impl QueryClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self::with_client(
            client,
            Url::parse(&config.backend_host)?,
            config.upload_chunk_size,
        ))
    }

    /// Reuses an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, mut base_url: Url, chunk_size: usize) -> Self {
        // api paths are resolved below any path prefix of the host
        if !base_url.path().ends_with('/') {
            let prefixed = format!("{}/", base_url.path());
            base_url.set_path(&prefixed);
        }
        QueryClient {
            client,
            base_url,
            chunk_size,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> Result<Url, AppError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    #[instrument(skip(self, key, params), fields(key = %key))]
    pub async fn get<T, P>(&self, key: &QueryKey, path: &str, params: &P) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let response = self
            .client
            .get(self.url(path)?)
            .query(params)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Sends a `multipart/form-data` body with POST or PUT semantics.
    #[instrument(skip(self, payload, on_progress), fields(parts = payload.part_names().len()))]
    pub async fn send_multipart<T>(
        &self,
        method: Method,
        path: &str,
        payload: MultipartPayload,
        on_progress: Option<ProgressCallback>,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let form = payload.into_form(self.chunk_size, on_progress)?;
        let response = self
            .client
            .request(method, self.url(path)?)
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `DELETE` with a JSON body.
    #[instrument(skip(self, body))]
    pub async fn delete<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .delete(self.url(path)?)
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error = serde_json::from_str::<ErrorRes>(&body).unwrap_or_else(|_| {
                ErrorRes::new(ErrorCode::Unknown(format!("HTTP_{}", status.as_u16())), body)
            });
            return Err(AppError::Api(error));
        }

        // Mutation endpoints answer with an empty body.
        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}
