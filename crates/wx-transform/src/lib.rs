//! Merge engine for the weather ETL pipeline.
//!
//! Unifies canonical historical and forecast rows into the 10-field flat
//! table: a full outer join keyed by date with deterministic conflict
//! resolution. The engine is a pure function of its two inputs: no I/O, no
//! clock, no retries.

pub mod merge;

pub use merge::merge_flat;
