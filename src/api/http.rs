//! `reqwest`-backed implementation of [`LinkApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::api::dto::{
    AliasAvailability, AliasSuggestionResponse, ErrorResponse, LinkCreate, LinkMetadata,
    LinkResponse, MetadataResponse, RedirectResponse, Reply,
};
use crate::api::link_api::LinkApi;
use crate::config::Config;
use crate::error::ApiError;

/// HTTP/JSON client for the shortening service.
///
/// All endpoints are resolved relative to the configured API base, e.g.
/// `http://localhost:8000/api` + `/alias/check`. Path segments and query values
/// are percent-encoded by [`Url`].
#[derive(Debug, Clone)]
pub struct HttpLinkApi {
    client: Client,
    base: Url,
}

impl HttpLinkApi {
    /// Creates a client for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if the URL does not parse, is not
    /// HTTP(S), or cannot carry path segments.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;

        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lnkup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self { client, base })
    }

    /// Creates a client from the loaded configuration.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.api_url, config.request_timeout())
    }

    /// Builds an endpoint URL by appending path segments to the base.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(operation, error = %e, "Request failed without a response");
            map_reqwest_error(&e)
        })?;

        debug!(operation, status = %response.status(), "Response received");
        decode(response).await
    }
}

/// Decodes a response body into the success type or an [`ApiError`].
///
/// - Non-success status: the error payload if one is present, else
///   [`ApiError::Status`]
/// - Success status: error payloads still win over the success shape
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(|e| map_reqwest_error(&e))?;

    if !status.is_success() {
        return match serde_json::from_slice::<ErrorResponse>(&body) {
            Ok(payload) => Err(payload.into()),
            Err(_) => Err(ApiError::Status {
                status: status.as_u16(),
            }),
        };
    }

    serde_json::from_slice::<Reply<T>>(&body)
        .map_err(|e| ApiError::Decode(e.to_string()))?
        .into_result()
}

fn map_reqwest_error(err: &reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

#[async_trait]
impl LinkApi for HttpLinkApi {
    async fn suggest_aliases(
        &self,
        long_url: &str,
        count: usize,
    ) -> Result<Vec<String>, ApiError> {
        let mut url = self.endpoint(&["alias", "suggest"])?;
        url.query_pairs_mut()
            .append_pair("long_url", long_url)
            .append_pair("count", &count.to_string());

        let response: AliasSuggestionResponse =
            self.send("suggest_aliases", self.client.post(url)).await?;
        Ok(response.suggested_aliases)
    }

    async fn shorten(&self, request: LinkCreate) -> Result<LinkResponse, ApiError> {
        let url = self.endpoint(&["url", "create"])?;
        self.send("shorten", self.client.post(url).json(&request))
            .await
    }

    async fn check_alias_availability(&self, alias: &str) -> Result<AliasAvailability, ApiError> {
        let mut url = self.endpoint(&["alias", "check"])?;
        url.query_pairs_mut().append_pair("alias", alias);

        self.send("check_alias_availability", self.client.get(url))
            .await
    }

    async fn get_redirect(&self, alias: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["url", alias, "redirect"])?;
        let response: RedirectResponse = self.send("get_redirect", self.client.get(url)).await?;
        Ok(response.long_url)
    }

    async fn get_metadata(&self, short_code: &str) -> Result<LinkMetadata, ApiError> {
        let url = self.endpoint(&["url", short_code, "metadata"])?;
        let response: MetadataResponse = self.send("get_metadata", self.client.get(url)).await?;
        Ok(response.into_metadata())
    }
}
