//! # Emissions Snapshot Loader
//!
//! This crate turns the collector's raw hourly emission files into the
//! read-only market view every simulation replays: a validated, ordered
//! snapshot table plus a synthetic per-subnet price series derived from
//! emission-rate changes.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** Apart from reading snapshot files off disk, this is a
//!   pure logic crate. It depends only on `core-types` and `configuration`.
//! - **Build Once, Read Forever:** A `SnapshotTable` is constructed once and
//!   never mutated. Simulators for different cadences can safely share one
//!   table by reference.
//!
//! ## Public API
//!
//! - `SnapshotTable`: The aligned emission and price history.
//! - `load_snapshot_dir`: Ingests a directory of collector files.
//! - `LoaderError`: The specific error types that can be returned from this crate.

pub mod error;
pub mod files;
pub mod table;

// Re-export the key components to create a clean, public-facing API.
pub use error::LoaderError;
pub use files::{load_snapshot_dir, load_snapshot_file};
pub use table::SnapshotTable;
