#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP client for the crime analytics gateway.
//!
//! One method per gateway endpoint. Lookup methods return typed, defaulted
//! shapes from [`crime_console_gateway_models`]; the analyze command returns
//! the raw JSON payload so the report builder can normalize it field by
//! field without a failed deserialization discarding the whole response.
//!
//! Every call is a single attempt: the selection layer treats a failed
//! lookup as an empty option list and the user retriggers submissions, so
//! there is no retry loop here.

use crime_console_gateway_models::{
    AnalyzeRequest, DistrictsResponse, ErrorResponse, PrevalentCrime, PrevalentCrimesResponse,
    QueryResponse, ReportRequest, ReportResponse, StatesResponse, YearsResponse,
};

/// Environment variable overriding the gateway base URL.
pub const API_URL_ENV: &str = "CRIME_CONSOLE_API_URL";

/// Default gateway base URL (local development server).
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Errors from gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The gateway answered with a non-success status.
    #[error("Gateway error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message, from the `{error}` body when parseable.
        message: String,
    },
}

/// Client for the crime analytics gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    client: reqwest::Client,
}

impl GatewayClient {
    /// Creates a client for the gateway at `base_url`.
    ///
    /// A trailing slash on `base_url` is stripped so path joining stays
    /// uniform.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client from [`API_URL_ENV`], falling back to
    /// [`DEFAULT_API_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&base_url)
    }

    /// Returns the configured base URL (no trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the states available for analysis.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the request fails or the response body
    /// cannot be parsed.
    pub async fn states(&self) -> Result<Vec<String>, GatewayError> {
        let response: StatesResponse = self
            .get_json(&format!("{}/states", self.base_url), &[])
            .await?;
        Ok(response.states)
    }

    /// Fetches the districts within `state`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the request fails or the response body
    /// cannot be parsed.
    pub async fn districts(&self, state: &str) -> Result<Vec<String>, GatewayError> {
        let response: DistrictsResponse = self
            .get_json(
                &format!("{}/districts", self.base_url),
                &[("state", state)],
            )
            .await?;
        Ok(response.districts)
    }

    /// Fetches the years with records for (`state`, `district`).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the request fails or the response body
    /// cannot be parsed.
    pub async fn years(&self, state: &str, district: &str) -> Result<Vec<i32>, GatewayError> {
        let response: YearsResponse = self
            .get_json(
                &format!("{}/years", self.base_url),
                &[("state", state), ("district", district)],
            )
            .await?;
        Ok(response.years)
    }

    /// Fetches the most prevalent crimes for (`state`, `district`),
    /// ordered most prevalent first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the request fails or the response body
    /// cannot be parsed.
    pub async fn prevalent_crimes(
        &self,
        state: &str,
        district: &str,
    ) -> Result<Vec<PrevalentCrime>, GatewayError> {
        let response: PrevalentCrimesResponse = self
            .get_json(
                &format!("{}/prevalent-crimes", self.base_url),
                &[("state", state), ("district", district)],
            )
            .await?;
        Ok(response
            .prevalent_crimes
            .into_iter()
            .map(PrevalentCrime::from)
            .collect())
    }

    /// Submits an analysis request, returning the raw JSON payload.
    ///
    /// The payload is handed to the report builder untyped so that missing
    /// or malformed fields degrade per field instead of failing the call.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the request fails, the gateway answers
    /// with a non-success status, or the body is not JSON.
    pub async fn analyze(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<serde_json::Value, GatewayError> {
        log::debug!(
            "Submitting analysis for {}/{} ({} year(s), {} crime(s))",
            request.state,
            request.district,
            request.years.len(),
            request.crimes.len()
        );
        let response = self
            .client
            .post(format!("{}/analyze", self.base_url))
            .json(request)
            .send()
            .await?;
        let body = Self::read_success_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Submits a crime report.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the request fails or the response body
    /// cannot be parsed.
    pub async fn report(&self, request: &ReportRequest) -> Result<ReportResponse, GatewayError> {
        let response = self
            .client
            .post(format!("{}/report", self.base_url))
            .json(request)
            .send()
            .await?;
        let body = Self::read_success_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Asks the gateway a natural-language crime question.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the request fails or the response body
    /// cannot be parsed.
    pub async fn query(&self, input: &str) -> Result<QueryResponse, GatewayError> {
        self.get_json(&format!("{}/query", self.base_url), &[("input", input)])
            .await
    }

    /// Returns the URL of a plot asset by its normalized reference.
    #[must_use]
    pub fn plot_url(&self, plot_reference: &str) -> String {
        format!("{}/static/{plot_reference}", self.base_url)
    }

    /// Issues a GET and parses the body as `T`, surfacing gateway error
    /// bodies on non-success statuses.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        let mut builder = self.client.get(url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let response = builder.send().await?;
        let body = Self::read_success_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Reads the response body, converting non-success statuses into
    /// [`GatewayError::Api`] with the gateway's own message when present.
    async fn read_success_body(response: reqwest::Response) -> Result<String, GatewayError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(api_error(status.as_u16(), &body))
        }
    }
}

/// Builds an [`GatewayError::Api`] from a non-success status and body,
/// preferring the gateway's `{error}` message over the raw body.
fn api_error(status: u16, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorResponse>(body).map_or_else(
        |_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "An error occurred.".to_string()
            } else {
                trimmed.to_string()
            }
        },
        |parsed| parsed.error,
    );
    GatewayError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = GatewayClient::new("http://127.0.0.1:5000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
        assert_eq!(
            client.plot_url("a.png"),
            "http://127.0.0.1:5000/static/a.png"
        );
    }

    #[test]
    fn api_error_prefers_gateway_message() {
        let error = api_error(400, r#"{"error": "State parameter is required"}"#);
        assert_eq!(
            error.to_string(),
            "Gateway error (400): State parameter is required"
        );
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        let error = api_error(502, "Bad Gateway");
        assert_eq!(error.to_string(), "Gateway error (502): Bad Gateway");

        let error = api_error(500, "   ");
        assert_eq!(error.to_string(), "Gateway error (500): An error occurred.");
    }
}
