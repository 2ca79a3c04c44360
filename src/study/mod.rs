//! Study log and spaced-repetition review schedule
//!
//! This module provides:
//! - Study sessions, scheduled reviews and subjects
//! - Fixed-interval review scheduling by performance tier
//! - Reconciliation of pending reviews against new sessions
//! - Simple aggregates and history filtering

pub mod algorithm;
pub mod builtin;
pub mod models;
pub mod reconcile;
pub mod stats;
pub mod subjects;
pub mod tracker;

pub use models::*;
pub use tracker::StudyTracker;
