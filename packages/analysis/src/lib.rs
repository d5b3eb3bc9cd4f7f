#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Core workflow logic for the crime analysis client.
//!
//! Three pieces, wired together by the interactive frontend:
//!
//! 1. [`selection`]: the dependent selection controller. Keeps the
//!    downstream option lists (districts, years, prevalent crimes)
//!    consistent with the upstream state/district choices, discarding
//!    stale lookup responses via generation tags.
//! 2. [`orchestrator`] (with [`parse`]): validates the user's raw input,
//!    submits at most one analysis request at a time, and tracks the
//!    `Idle → Loading → {Ready, Error}` lifecycle.
//! 3. [`report`]: normalizes the gateway's raw analyze payload into a
//!    render-ready [`report::AnalysisReport`], degrading missing or
//!    malformed fields to empty defaults instead of failing the render.

pub mod orchestrator;
pub mod parse;
pub mod report;
pub mod selection;
