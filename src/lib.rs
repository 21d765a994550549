//! Game-slot planning across grounds and days: time labels, overlap checks,
//! free-slot placement and player double-booking detection, plus the CLI and
//! web front ends that drive them.

pub mod clock;
pub mod commands;
pub mod config;
pub mod conflicts;
pub mod error;
pub mod models;
pub mod overlap;
pub mod placement;
pub mod session;
pub mod web;

pub use error::{Result, ScheduleError};
pub use session::Session;
