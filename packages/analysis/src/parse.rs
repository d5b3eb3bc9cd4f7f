//! Parsing and validation of the raw analysis form input.
//!
//! The selection state keeps years, crimes, and the prediction horizon as
//! raw text until submission. Parsing is strict: a malformed numeric token
//! is rejected with a [`ValidationError`] naming the token, never silently
//! coerced, and validation failures block the submission before any
//! network call.

use crime_console_gateway_models::AnalyzeRequest;

use crate::selection::SelectionState;

/// A submission blocked before reaching the gateway. The `Display` text is
/// shown to the user unmodified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No state selected.
    #[error("Select a state before running an analysis")]
    MissingState,

    /// No district selected.
    #[error("Select a district before running an analysis")]
    MissingDistrict,

    /// Years input empty after trimming.
    #[error("Enter at least one year to analyze")]
    MissingYears,

    /// A years token did not parse as an integer.
    #[error("Invalid year: {token:?}")]
    InvalidYear {
        /// The offending token, trimmed.
        token: String,
    },

    /// Crimes input empty after trimming.
    #[error("Enter at least one crime to analyze")]
    MissingCrimes,

    /// Prediction horizon empty.
    #[error("Enter the number of years to predict")]
    MissingPredictYears,

    /// Prediction horizon did not parse as a non-negative integer.
    #[error("Invalid prediction horizon: {token:?}")]
    InvalidPredictYears {
        /// The offending input, trimmed.
        token: String,
    },
}

/// Parses comma-separated years input into an ordered year list.
///
/// Tokens are trimmed; empty tokens (doubled or trailing commas) are
/// dropped.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidYear`] for a non-numeric token and
/// [`ValidationError::MissingYears`] when no tokens remain.
pub fn parse_years(text: &str) -> Result<Vec<i32>, ValidationError> {
    let mut years = Vec::new();
    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let year = token.parse::<i32>().map_err(|_| ValidationError::InvalidYear {
            token: token.to_string(),
        })?;
        years.push(year);
    }
    if years.is_empty() {
        return Err(ValidationError::MissingYears);
    }
    Ok(years)
}

/// Parses comma-separated crimes input into an ordered name list.
///
/// # Errors
///
/// Returns [`ValidationError::MissingCrimes`] when no non-empty tokens
/// remain after trimming.
pub fn parse_crimes(text: &str) -> Result<Vec<String>, ValidationError> {
    let crimes: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();
    if crimes.is_empty() {
        return Err(ValidationError::MissingCrimes);
    }
    Ok(crimes)
}

/// Parses the prediction horizon into a non-negative year count.
///
/// # Errors
///
/// Returns [`ValidationError::MissingPredictYears`] for empty input and
/// [`ValidationError::InvalidPredictYears`] for a non-numeric one.
pub fn parse_predict_years(text: &str) -> Result<u32, ValidationError> {
    let token = text.trim();
    if token.is_empty() {
        return Err(ValidationError::MissingPredictYears);
    }
    token
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidPredictYears {
            token: token.to_string(),
        })
}

/// Builds the immutable analyze request from a fully validated selection.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered, in field order:
/// state, district, years, crimes, prediction horizon.
pub fn build_request(selection: &SelectionState) -> Result<AnalyzeRequest, ValidationError> {
    if selection.state.is_empty() {
        return Err(ValidationError::MissingState);
    }
    if selection.district.is_empty() {
        return Err(ValidationError::MissingDistrict);
    }

    Ok(AnalyzeRequest {
        state: selection.state.clone(),
        district: selection.district.clone(),
        years: parse_years(&selection.years_text)?,
        crimes: parse_crimes(&selection.crimes_text)?,
        predict_years: parse_predict_years(&selection.predict_years_text)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_years_with_uneven_spacing() {
        assert_eq!(parse_years("2019, 2020,2021").unwrap(), [2019, 2020, 2021]);
        assert_eq!(parse_years(" 2022 ").unwrap(), [2022]);
        assert_eq!(parse_years("2019,,2020,").unwrap(), [2019, 2020]);
    }

    #[test]
    fn rejects_malformed_year_token() {
        assert_eq!(
            parse_years("2019, twenty-twenty, 2021"),
            Err(ValidationError::InvalidYear {
                token: "twenty-twenty".to_string()
            })
        );
        assert_eq!(parse_years(""), Err(ValidationError::MissingYears));
        assert_eq!(parse_years(" , ,"), Err(ValidationError::MissingYears));
    }

    #[test]
    fn parses_crimes_trimmed_in_order() {
        assert_eq!(
            parse_crimes("murder, robbery").unwrap(),
            ["murder", "robbery"]
        );
        assert_eq!(parse_crimes("assault"), Ok(vec!["assault".to_string()]));
        assert_eq!(parse_crimes("  ,  "), Err(ValidationError::MissingCrimes));
    }

    #[test]
    fn parses_predict_years() {
        assert_eq!(parse_predict_years(" 5 "), Ok(5));
        assert_eq!(parse_predict_years("0"), Ok(0));
        assert_eq!(
            parse_predict_years("five"),
            Err(ValidationError::InvalidPredictYears {
                token: "five".to_string()
            })
        );
        assert_eq!(
            parse_predict_years("-1"),
            Err(ValidationError::InvalidPredictYears {
                token: "-1".to_string()
            })
        );
        assert_eq!(
            parse_predict_years("  "),
            Err(ValidationError::MissingPredictYears)
        );
    }

    #[test]
    fn builds_request_from_valid_selection() {
        let selection = SelectionState {
            state: "California".to_string(),
            district: "Los Angeles".to_string(),
            years_text: "2019, 2020,2021".to_string(),
            crimes_text: "murder, robbery".to_string(),
            predict_years_text: "5".to_string(),
        };
        let request = build_request(&selection).unwrap();
        assert_eq!(request.state, "California");
        assert_eq!(request.district, "Los Angeles");
        assert_eq!(request.years, [2019, 2020, 2021]);
        assert_eq!(request.crimes, ["murder", "robbery"]);
        assert_eq!(request.predict_years, 5);
    }

    #[test]
    fn build_request_requires_state_then_district() {
        let mut selection = SelectionState::default();
        assert_eq!(build_request(&selection), Err(ValidationError::MissingState));

        selection.state = "California".to_string();
        assert_eq!(
            build_request(&selection),
            Err(ValidationError::MissingDistrict)
        );
    }
}
