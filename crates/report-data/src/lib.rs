//! Data layer for the Slurm report.
//!
//! Responsible for reading the job and user CSV exports, joining them,
//! converting epoch timestamps, deriving per-job timings and computing the
//! read-only views consumed by the charts.

pub mod aggregator;
pub mod analyzer;
pub mod reader;
