//! Terminal UI layer for the Slurm report.
//!
//! Provides themes, the view tabs, the top-users table, the resource /
//! monthly / daily charts and the application event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod table_view;
pub mod themes;
