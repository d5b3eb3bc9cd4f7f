#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Wire types for the crime analytics gateway HTTP contract.
//!
//! One type per request/response shape. Every list-valued response field
//! carries `#[serde(default)]`; the gateway omits keys freely (a districts
//! lookup can legitimately answer `{}`), so absence always deserializes to
//! empty rather than failing the call.

use serde::{Deserialize, Serialize};

/// Response from `GET /states`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatesResponse {
    /// States available for analysis.
    #[serde(default)]
    pub states: Vec<String>,
}

/// Response from `GET /districts?state=`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DistrictsResponse {
    /// Districts within the requested state.
    #[serde(default)]
    pub districts: Vec<String>,
}

/// Response from `GET /years?state=&district=`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YearsResponse {
    /// Years with records for the requested area.
    #[serde(default)]
    pub years: Vec<i32>,
}

/// Response from `GET /prevalent-crimes?state=&district=`.
///
/// The gateway encodes each entry as a two-element array
/// (`[["murder", 12], ...]`), which maps onto a Rust tuple.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrevalentCrimesResponse {
    /// `(crime name, occurrence count)` pairs, most prevalent first.
    #[serde(default)]
    pub prevalent_crimes: Vec<(String, u64)>,
}

/// A prevalent crime entry in display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrevalentCrime {
    /// Crime category name.
    pub crime: String,
    /// Number of recorded occurrences.
    pub count: u64,
}

impl From<(String, u64)> for PrevalentCrime {
    fn from((crime, count): (String, u64)) -> Self {
        Self { crime, count }
    }
}

impl std::fmt::Display for PrevalentCrime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} cases)", self.crime, self.count)
    }
}

/// Body for `POST /analyze`: the validated, immutable parameter bundle.
///
/// Only ever constructed from fully parsed selection state; there is no
/// partially-filled variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeRequest {
    /// Selected state.
    pub state: String,
    /// Selected district within the state.
    pub district: String,
    /// Historical years to include.
    pub years: Vec<i32>,
    /// Crime categories to analyze.
    pub crimes: Vec<String>,
    /// Prediction horizon in years.
    pub predict_years: u32,
}

/// Body for `POST /report`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    /// Free-text description of the crime.
    pub crime: String,
    /// Where it happened.
    pub location: String,
    /// Type of attack.
    pub attack_type: String,
}

/// Response from `POST /report`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportResponse {
    /// Confirmation message.
    #[serde(default)]
    pub message: String,
    /// Crime categories the gateway detected in the description.
    #[serde(default)]
    pub detected_crimes: Vec<String>,
    /// Safety recommendation text.
    #[serde(default)]
    pub recommendations: String,
}

impl ReportResponse {
    /// Sentinel recommendation text the gateway returns when it has
    /// nothing useful to say; callers suppress it rather than render it.
    pub const NO_RECOMMENDATIONS: &'static str = "No specific recommendations available.";

    /// Returns the recommendation text, or `None` when it is empty or the
    /// gateway's no-recommendations sentinel.
    #[must_use]
    pub fn recommendations(&self) -> Option<&str> {
        let text = self.recommendations.trim();
        if text.is_empty() || text == Self::NO_RECOMMENDATIONS {
            None
        } else {
            Some(text)
        }
    }
}

/// Response from `GET /query?input=`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    /// Natural-language answer.
    #[serde(default)]
    pub response: String,
    /// Crimes similar to the one asked about.
    #[serde(default)]
    pub similar_crimes: Vec<SimilarCrime>,
}

/// A similar-crime entry in a query response.
#[derive(Debug, Clone, Deserialize)]
pub struct SimilarCrime {
    /// Crime category name.
    pub crime: String,
    /// Description of the crime.
    #[serde(default)]
    pub description: String,
    /// Similarity score in `[0, 1]`, when the gateway provides one.
    #[serde(default)]
    pub similarity: Option<f64>,
}

/// Error body the gateway attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable failure description.
    pub error: String,
}
