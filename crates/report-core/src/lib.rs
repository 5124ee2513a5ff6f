//! Core types shared by the Slurm report crates.
//!
//! Holds the job-table model, the error type, timestamp helpers, number
//! formatting and the command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
