//! # Alphabasket Analytics Engine
//!
//! This crate provides the tools for quantitative analysis of a simulated NAV
//! history. It acts as the "unbiased judge" of the system: every cadence is
//! scored with exactly the same math.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of snapshots, portfolios or
//!   cadences. It depends only on `core-types` and sees a run as a plain
//!   sequence of `NavPoint`s.
//! - **Stateless Calculation:** The `AnalyticsEngine` carries only the scoring
//!   parameters (risk-free rate, annualization basis). It takes a NAV history
//!   as input and produces a `PerformanceReport` as output, which makes it
//!   highly reliable and easy to test.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The main struct that contains the calculation logic.
//! - `PerformanceReport`: The standardized struct that holds the performance metrics.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::PerformanceReport;
