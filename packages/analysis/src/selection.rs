//! Dependent selection controller.
//!
//! Owns the cascading filter state for the analysis form and keeps the
//! server-supplied option lists consistent with it, in strict dependency
//! order `state → district → (years, prevalent crimes)`.
//!
//! The controller itself is synchronous and IO-free: mutating a selection
//! returns the [`FetchEffects`] the caller must issue, each tagged with the
//! generation it was issued under. When a lookup resolves, the caller hands
//! the result back with its tag and the controller applies it only if the
//! tag still matches; a fast response to a superseded key can never
//! overwrite a newer one, without cancelling anything in flight
//! (last-applicable-response-wins).
//!
//! [`SelectionController::run_effects`] is the async driver that issues the
//! tagged fetches against a [`GatewayClient`]. Lookup failures are logged
//! and applied as empty lists, so the frontend always has a defined
//! (possibly empty) set of options.

use crime_console_gateway::{GatewayClient, GatewayError};
use crime_console_gateway_models::PrevalentCrime;

/// The user's current filter choices, including the raw text fields that
/// are only parsed at submission time.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Selected state; empty means unselected.
    pub state: String,
    /// Selected district; empty means unselected. Only meaningful while
    /// `state` is non-empty.
    pub district: String,
    /// Raw comma-separated years input.
    pub years_text: String,
    /// Raw comma-separated crimes input.
    pub crimes_text: String,
    /// Raw prediction-horizon input.
    pub predict_years_text: String,
}

/// Generation tag identifying which key an outstanding fetch was issued
/// for. Compared against the controller's current generation on
/// resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTag(u64);

/// A districts lookup the caller must issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictsFetch {
    /// State the lookup is keyed on.
    pub state: String,
    /// Tag to hand back with the result.
    pub tag: FetchTag,
}

/// A years + prevalent-crimes lookup pair the caller must issue, keyed on
/// the current (`state`, `district`). Both lookups share one tag and may
/// run in parallel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaFetch {
    /// State the lookups are keyed on.
    pub state: String,
    /// District the lookups are keyed on (may be empty).
    pub district: String,
    /// Tag to hand back with both results.
    pub tag: FetchTag,
}

/// Fetches a selection change requires. Empty when the change only cleared
/// options locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchEffects {
    /// Districts lookup, when the new state is non-empty.
    pub districts: Option<DistrictsFetch>,
    /// Years + prevalent-crimes lookup pair, when at least one of state
    /// and district is non-empty.
    pub area: Option<AreaFetch>,
}

impl FetchEffects {
    /// Whether this change requires no network calls.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.districts.is_none() && self.area.is_none()
    }
}

/// Owns the selection state and the option lists derived from it.
#[derive(Debug, Default)]
pub struct SelectionController {
    selection: SelectionState,
    available_states: Vec<String>,
    available_districts: Vec<String>,
    available_years: Vec<i32>,
    prevalent_crimes: Vec<PrevalentCrime>,
    districts_generation: u64,
    area_generation: u64,
}

impl SelectionController {
    /// Creates a controller with everything unselected and all option
    /// lists empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// States available for selection.
    #[must_use]
    pub fn available_states(&self) -> &[String] {
        &self.available_states
    }

    /// Districts for the current state.
    #[must_use]
    pub fn available_districts(&self) -> &[String] {
        &self.available_districts
    }

    /// Years with records for the current (`state`, `district`).
    #[must_use]
    pub fn available_years(&self) -> &[i32] {
        &self.available_years
    }

    /// Prevalent crimes for the current (`state`, `district`), most
    /// prevalent first.
    #[must_use]
    pub fn prevalent_crimes(&self) -> &[PrevalentCrime] {
        &self.prevalent_crimes
    }

    /// Stores the states list fetched once at startup.
    pub fn set_available_states(&mut self, states: Vec<String>) {
        self.available_states = states;
    }

    /// Replaces the selected state.
    ///
    /// Clears the dependent district selection and every downstream option
    /// list, then returns the fetches required for the new key. Selecting
    /// the empty state clears locally with no network call.
    #[must_use]
    pub fn set_state(&mut self, new_state: &str) -> FetchEffects {
        if new_state == self.selection.state {
            return FetchEffects::default();
        }

        self.selection.state = new_state.to_string();
        self.selection.district.clear();

        self.districts_generation += 1;
        self.available_districts.clear();

        let mut effects = FetchEffects {
            area: self.invalidate_area(),
            ..Default::default()
        };
        if !self.selection.state.is_empty() {
            effects.districts = Some(DistrictsFetch {
                state: self.selection.state.clone(),
                tag: FetchTag(self.districts_generation),
            });
        }
        effects
    }

    /// Replaces the selected district, leaving the state untouched.
    #[must_use]
    pub fn set_district(&mut self, new_district: &str) -> FetchEffects {
        if new_district == self.selection.district {
            return FetchEffects::default();
        }

        self.selection.district = new_district.to_string();
        FetchEffects {
            area: self.invalidate_area(),
            ..Default::default()
        }
    }

    /// Updates the raw years input.
    pub fn set_years_text(&mut self, text: &str) {
        self.selection.years_text = text.to_string();
    }

    /// Updates the raw crimes input.
    pub fn set_crimes_text(&mut self, text: &str) {
        self.selection.crimes_text = text.to_string();
    }

    /// Updates the raw prediction-horizon input.
    pub fn set_predict_years_text(&mut self, text: &str) {
        self.selection.predict_years_text = text.to_string();
    }

    /// Bumps the area generation, clears the pair-keyed option lists, and
    /// returns the replacement fetch when the pair is worth querying.
    fn invalidate_area(&mut self) -> Option<AreaFetch> {
        self.area_generation += 1;
        self.available_years.clear();
        self.prevalent_crimes.clear();

        if self.selection.state.is_empty() && self.selection.district.is_empty() {
            None
        } else {
            Some(AreaFetch {
                state: self.selection.state.clone(),
                district: self.selection.district.clone(),
                tag: FetchTag(self.area_generation),
            })
        }
    }

    /// Applies a resolved districts lookup. Returns `false` (and leaves
    /// the list untouched) when the tag has been superseded.
    pub fn resolve_districts(&mut self, tag: FetchTag, districts: Vec<String>) -> bool {
        if tag.0 == self.districts_generation {
            self.available_districts = districts;
            true
        } else {
            log::trace!("Discarding stale districts response (tag {})", tag.0);
            false
        }
    }

    /// Applies a resolved years lookup. Returns `false` when the tag has
    /// been superseded.
    pub fn resolve_years(&mut self, tag: FetchTag, years: Vec<i32>) -> bool {
        if tag.0 == self.area_generation {
            self.available_years = years;
            true
        } else {
            log::trace!("Discarding stale years response (tag {})", tag.0);
            false
        }
    }

    /// Applies a resolved prevalent-crimes lookup. Returns `false` when
    /// the tag has been superseded.
    pub fn resolve_prevalent_crimes(&mut self, tag: FetchTag, crimes: Vec<PrevalentCrime>) -> bool {
        if tag.0 == self.area_generation {
            self.prevalent_crimes = crimes;
            true
        } else {
            log::trace!("Discarding stale prevalent-crimes response (tag {})", tag.0);
            false
        }
    }

    /// Fetches the states list from the gateway. A failure leaves the
    /// previous list in place and is logged, never propagated.
    pub async fn load_states(&mut self, client: &GatewayClient) {
        let states = lookup_or_empty("states", client.states().await);
        self.set_available_states(states);
    }

    /// Issues the fetches a selection change requires and applies whatever
    /// is still current when they resolve.
    ///
    /// The years and prevalent-crimes lookups for an [`AreaFetch`] run in
    /// parallel; they share a tag but resolve independently.
    pub async fn run_effects(&mut self, client: &GatewayClient, effects: FetchEffects) {
        if let Some(fetch) = effects.districts {
            let districts = lookup_or_empty("districts", client.districts(&fetch.state).await);
            self.resolve_districts(fetch.tag, districts);
        }

        if let Some(fetch) = effects.area {
            let (years, crimes) = tokio::join!(
                client.years(&fetch.state, &fetch.district),
                client.prevalent_crimes(&fetch.state, &fetch.district),
            );
            self.resolve_years(fetch.tag, lookup_or_empty("years", years));
            self.resolve_prevalent_crimes(fetch.tag, lookup_or_empty("prevalent crimes", crimes));
        }
    }
}

/// Substitutes an empty list for a failed lookup, logging the failure.
fn lookup_or_empty<T>(what: &str, result: Result<Vec<T>, GatewayError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        log::error!("Error fetching {what}: {e}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crimes(names: &[(&str, u64)]) -> Vec<PrevalentCrime> {
        names
            .iter()
            .map(|&(crime, count)| PrevalentCrime {
                crime: crime.to_string(),
                count,
            })
            .collect()
    }

    #[test]
    fn set_state_clears_district_and_downstream_lists() {
        let mut controller = SelectionController::new();
        let effects = controller.set_state("California");
        controller.resolve_districts(
            effects.districts.unwrap().tag,
            vec!["Los Angeles".to_string()],
        );
        let area = effects.area.unwrap();
        controller.resolve_years(area.tag, vec![2019, 2020]);
        controller.resolve_prevalent_crimes(area.tag, crimes(&[("murder", 12)]));
        let _ = controller.set_district("Los Angeles");

        let effects = controller.set_state("Texas");
        assert_eq!(controller.selection().state, "Texas");
        assert!(controller.selection().district.is_empty());
        assert!(controller.available_districts().is_empty());
        assert!(controller.available_years().is_empty());
        assert!(controller.prevalent_crimes().is_empty());
        assert_eq!(effects.districts.as_ref().unwrap().state, "Texas");
        assert_eq!(effects.area.as_ref().unwrap().state, "Texas");
        assert!(effects.area.as_ref().unwrap().district.is_empty());
    }

    #[test]
    fn stale_response_never_mutates_visible_state() {
        let mut controller = SelectionController::new();
        let first = controller.set_state("California");
        let second = controller.set_state("Texas");

        // The fast response to the superseded key arrives last.
        let applied = controller.resolve_districts(
            second.districts.unwrap().tag,
            vec!["Houston".to_string()],
        );
        assert!(applied);
        let applied = controller.resolve_districts(
            first.districts.unwrap().tag,
            vec!["Los Angeles".to_string()],
        );
        assert!(!applied);
        assert_eq!(controller.available_districts(), ["Houston".to_string()]);

        let applied = controller.resolve_years(first.area.unwrap().tag, vec![2010]);
        assert!(!applied);
        assert!(controller.available_years().is_empty());
        let applied = controller.resolve_years(second.area.unwrap().tag, vec![2021]);
        assert!(applied);
        assert_eq!(controller.available_years(), [2021]);
    }

    #[test]
    fn empty_pair_clears_locally_without_fetches() {
        let mut controller = SelectionController::new();
        let effects = controller.set_state("California");
        controller.resolve_districts(
            effects.districts.unwrap().tag,
            vec!["Los Angeles".to_string()],
        );
        let area = effects.area.unwrap();
        controller.resolve_years(area.tag, vec![2019]);
        controller.resolve_prevalent_crimes(area.tag, crimes(&[("robbery", 45)]));

        let effects = controller.set_state("");
        assert!(effects.is_empty());
        assert!(controller.available_districts().is_empty());
        assert!(controller.available_years().is_empty());
        assert!(controller.prevalent_crimes().is_empty());
    }

    #[test]
    fn district_only_selection_still_fetches_area_lists() {
        // Mirrors the pair rule: at least one of (state, district)
        // non-empty triggers the lookups.
        let mut controller = SelectionController::new();
        let effects = controller.set_district("Los Angeles");
        assert!(effects.districts.is_none());
        let area = effects.area.unwrap();
        assert!(area.state.is_empty());
        assert_eq!(area.district, "Los Angeles");
    }

    #[test]
    fn unchanged_selection_is_a_no_op() {
        let mut controller = SelectionController::new();
        let _ = controller.set_state("California");
        assert!(controller.set_state("California").is_empty());

        let _ = controller.set_district("Los Angeles");
        assert!(controller.set_district("Los Angeles").is_empty());
    }

    #[test]
    fn set_district_leaves_state_alone() {
        let mut controller = SelectionController::new();
        let _ = controller.set_state("California");
        let effects = controller.set_district("Los Angeles");
        assert_eq!(controller.selection().state, "California");
        assert_eq!(controller.selection().district, "Los Angeles");
        let area = effects.area.unwrap();
        assert_eq!(area.state, "California");
        assert_eq!(area.district, "Los Angeles");
    }
}
