//! Report model builder.
//!
//! Normalizes the gateway's raw analyze payload into the render-ready
//! [`AnalysisReport`]. The build is total: a missing or malformed field
//! degrades to an empty or zero default, and a malformed prediction entry
//! is skipped, so one bad field never aborts the whole report.
//!
//! Prediction entries are kept in the order the gateway sent them (it
//! orders them ascending by year); the builder does not re-sort.

use std::collections::BTreeMap;

/// Confidence interval attached to a prediction point. The gateway sends
/// either a `[low, high]` pair or a pre-formatted string such as `"±3"`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfidenceInterval {
    /// Numeric `(low, high)` bounds.
    Bounds(f64, f64),
    /// Pre-formatted display text.
    Text(String),
}

impl std::fmt::Display for ConfidenceInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bounds(low, high) => write!(f, "({low}, {high})"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

/// One predicted year for one crime.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionPoint {
    /// Predicted year.
    pub year: i32,
    /// Predicted occurrence count.
    pub predicted: f64,
    /// Confidence interval, when the gateway provided a usable one.
    pub confidence_interval: Option<ConfidenceInterval>,
}

/// The normalized result of a submitted analysis: everything the
/// presentation layer renders.
///
/// Created fresh from each successful submission and fully replaced (never
/// merged) on resubmission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    /// Historical count per crime name.
    pub historical_statistics: BTreeMap<String, u64>,
    /// Ordered prediction series per crime name.
    pub predictions_by_crime: BTreeMap<String, Vec<PredictionPoint>>,
    /// Total records the analysis covered.
    pub total_records: u64,
    /// Plot asset reference, resolvable via the gateway's `/static/`
    /// endpoint.
    pub plot_reference: String,
}

impl AnalysisReport {
    /// Builds a report from the raw analyze payload. Never fails; see the
    /// module docs for the degradation rules.
    #[must_use]
    pub fn from_payload(payload: &serde_json::Value) -> Self {
        let mut historical_statistics = BTreeMap::new();
        if let Some(stats) = payload["historical_crime_statistics"].as_object() {
            for (crime, count) in stats {
                if let Some(count) = count.as_u64() {
                    historical_statistics.insert(crime.clone(), count);
                }
            }
        }

        let mut predictions_by_crime = BTreeMap::new();
        if let Some(predictions) = payload["predictions"].as_object() {
            for (crime, entries) in predictions {
                let points: Vec<PredictionPoint> = entries
                    .as_array()
                    .map(|entries| {
                        entries.iter().filter_map(parse_prediction_point).collect()
                    })
                    .unwrap_or_default();
                predictions_by_crime.insert(crime.clone(), points);
            }
        }

        Self {
            historical_statistics,
            predictions_by_crime,
            total_records: payload["total_records"].as_u64().unwrap_or(0),
            plot_reference: payload["plot_path"]
                .as_str()
                .map(normalize_plot_reference)
                .unwrap_or_default(),
        }
    }
}

/// Parses one prediction entry, skipping entries without a usable year or
/// predicted value.
fn parse_prediction_point(entry: &serde_json::Value) -> Option<PredictionPoint> {
    let year = i32::try_from(entry["year"].as_i64()?).ok()?;
    let predicted = entry["predicted"].as_f64()?;
    Some(PredictionPoint {
        year,
        predicted,
        confidence_interval: parse_confidence_interval(&entry["confidence_interval"]),
    })
}

/// Accepts either a two-number array or a pre-formatted string.
fn parse_confidence_interval(value: &serde_json::Value) -> Option<ConfidenceInterval> {
    match value {
        serde_json::Value::String(text) => Some(ConfidenceInterval::Text(text.clone())),
        serde_json::Value::Array(bounds) if bounds.len() == 2 => Some(
            ConfidenceInterval::Bounds(bounds[0].as_f64()?, bounds[1].as_f64()?),
        ),
        _ => None,
    }
}

/// Normalizes a gateway plot path to the relative asset identifier the
/// `/static/` endpoint serves: separators unified, final component only.
fn normalize_plot_reference(path: &str) -> String {
    path.replace('\\', "/")
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_full_report() {
        let payload = serde_json::json!({
            "historical_crime_statistics": { "murder": 12 },
            "predictions": {
                "murder": [
                    { "year": 2022, "predicted": 15, "confidence_interval": "±3" }
                ]
            },
            "total_records": 12,
            "plot_path": "plots\\a.png"
        });

        let report = AnalysisReport::from_payload(&payload);
        assert_eq!(report.historical_statistics.get("murder"), Some(&12));
        assert_eq!(report.total_records, 12);
        assert_eq!(report.plot_reference, "a.png");

        let points = &report.predictions_by_crime["murder"];
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].year, 2022);
        assert!((points[0].predicted - 15.0).abs() < f64::EPSILON);
        assert_eq!(
            points[0].confidence_interval,
            Some(ConfidenceInterval::Text("±3".to_string()))
        );
    }

    #[test]
    fn preserves_prediction_order_per_crime() {
        let payload = serde_json::json!({
            "predictions": {
                "murder": [
                    { "year": 2022, "predicted": 15.0 },
                    { "year": 2023, "predicted": 14.2 },
                    { "year": 2024, "predicted": 13.9 }
                ],
                "robbery": [
                    { "year": 2022, "predicted": 48.0 },
                    { "year": 2023, "predicted": 51.5 }
                ]
            }
        });

        let report = AnalysisReport::from_payload(&payload);
        assert_eq!(report.predictions_by_crime.len(), 2);
        let years: Vec<i32> = report.predictions_by_crime["murder"]
            .iter()
            .map(|p| p.year)
            .collect();
        assert_eq!(years, [2022, 2023, 2024]);
        assert_eq!(report.predictions_by_crime["robbery"].len(), 2);
    }

    #[test]
    fn missing_fields_degrade_to_defaults() {
        let report = AnalysisReport::from_payload(&serde_json::json!({}));
        assert!(report.historical_statistics.is_empty());
        assert!(report.predictions_by_crime.is_empty());
        assert_eq!(report.total_records, 0);
        assert!(report.plot_reference.is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let payload = serde_json::json!({
            "historical_crime_statistics": { "murder": 12, "robbery": "many" },
            "predictions": {
                "murder": [
                    { "year": 2022, "predicted": 15.0 },
                    { "predicted": 9.0 },
                    { "year": "soon", "predicted": 1.0 }
                ],
                "robbery": "not-a-list"
            },
            "total_records": "twelve"
        });

        let report = AnalysisReport::from_payload(&payload);
        assert_eq!(report.historical_statistics.len(), 1);
        assert_eq!(report.predictions_by_crime["murder"].len(), 1);
        assert!(report.predictions_by_crime["robbery"].is_empty());
        assert_eq!(report.total_records, 0);
    }

    #[test]
    fn confidence_interval_accepts_bounds_pair() {
        let payload = serde_json::json!({
            "predictions": {
                "theft": [
                    { "year": 2025, "predicted": 30.5, "confidence_interval": [27.1, 33.9] },
                    { "year": 2026, "predicted": 29.0, "confidence_interval": [1, 2, 3] }
                ]
            }
        });

        let report = AnalysisReport::from_payload(&payload);
        let points = &report.predictions_by_crime["theft"];
        assert_eq!(
            points[0].confidence_interval,
            Some(ConfidenceInterval::Bounds(27.1, 33.9))
        );
        assert_eq!(points[0].confidence_interval.as_ref().unwrap().to_string(), "(27.1, 33.9)");
        assert_eq!(points[1].confidence_interval, None);
    }

    #[test]
    fn plot_reference_normalizes_separators() {
        let cases = [
            ("plots\\a.png", "a.png"),
            ("plots/nested/trend.png", "trend.png"),
            ("trend.png", "trend.png"),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_plot_reference(input), expected);
        }
    }
}
