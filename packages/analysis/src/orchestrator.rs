//! Request orchestrator.
//!
//! Validates, submits, and tracks the lifecycle of one analysis request at
//! a time: `Idle → Loading → {Ready, Error}`, re-entering `Loading` on the
//! next submission from either terminal phase.
//!
//! The phase machine is split from the network call so the guarantees are
//! testable without a gateway: [`RequestOrchestrator::begin_submit`]
//! validates and enters `Loading` (or refuses while one submission is
//! already in flight; the orchestrator, not the frontend, is the
//! authoritative one-in-flight guard), and
//! [`RequestOrchestrator::complete`] applies the settled result.
//! [`RequestOrchestrator::submit`] drives both against a live client.

use crime_console_gateway::{GatewayClient, GatewayError};
use crime_console_gateway_models::AnalyzeRequest;

use crate::parse;
use crate::report::AnalysisReport;
use crate::selection::SelectionState;

/// Lifecycle phase of the current submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    /// Nothing submitted yet (or reset).
    #[default]
    Idle,
    /// A request is in flight; re-submission is refused.
    Loading,
    /// The last submission produced a report.
    Ready,
    /// The last submission failed validation or the gateway call.
    Error,
}

/// Tracks the single current submission and its result.
#[derive(Debug, Default)]
pub struct RequestOrchestrator {
    phase: SubmissionPhase,
    report: Option<AnalysisReport>,
    error: Option<String>,
}

impl RequestOrchestrator {
    /// Creates an idle orchestrator with no report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// The current report, present only in [`SubmissionPhase::Ready`].
    #[must_use]
    pub const fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// The failure message, present only in [`SubmissionPhase::Error`].
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Starts a submission from the given selection.
    ///
    /// Returns the validated request to send, or `None` when:
    /// - a submission is already in flight (`Loading`): the call is a
    ///   no-op and the in-flight request is untouched, or
    /// - validation failed: the orchestrator moves to `Error` with the
    ///   validation message and no network call must be made.
    ///
    /// On success the previous report and error are cleared and the phase
    /// becomes `Loading`.
    pub fn begin_submit(&mut self, selection: &SelectionState) -> Option<AnalyzeRequest> {
        if self.phase == SubmissionPhase::Loading {
            log::debug!("Ignoring submit: a submission is already in flight");
            return None;
        }

        self.report = None;
        self.error = None;

        match parse::build_request(selection) {
            Ok(request) => {
                self.phase = SubmissionPhase::Loading;
                Some(request)
            }
            Err(e) => {
                self.phase = SubmissionPhase::Error;
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Applies the settled gateway result for the in-flight submission.
    ///
    /// Success normalizes the raw payload into a fresh report and enters
    /// `Ready`; failure enters `Error` with a user-visible message and no
    /// partial report. Either way `Loading` is exited. Ignored when no
    /// submission is in flight.
    pub fn complete(&mut self, result: Result<serde_json::Value, GatewayError>) {
        if self.phase != SubmissionPhase::Loading {
            log::debug!("Ignoring completion: no submission in flight");
            return;
        }

        match result {
            Ok(payload) => {
                self.report = Some(AnalysisReport::from_payload(&payload));
                self.phase = SubmissionPhase::Ready;
            }
            Err(e) => {
                log::error!("Analysis submission failed: {e}");
                self.error = Some(e.to_string());
                self.phase = SubmissionPhase::Error;
            }
        }
    }

    /// Validates and submits the selection, waiting for the result.
    ///
    /// A no-op while a submission is already in flight. Afterwards the
    /// phase is `Ready` or `Error`, never `Loading`.
    pub async fn submit(&mut self, client: &GatewayClient, selection: &SelectionState) {
        if let Some(request) = self.begin_submit(selection) {
            let result = client.analyze(&request).await;
            self.complete(result);
        }
    }

    /// Discards the current report and error and returns to `Idle`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
