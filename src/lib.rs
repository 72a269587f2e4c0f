//! Shift Rostering Engine
//!
//! This crate assigns workers to labeled shifts across a multi-day horizon,
//! satisfying hard rules (coverage floors, one shift per day) and minimizing
//! a weighted sum of soft-rule violations: preference mismatches, uneven
//! workload, illegal run lengths, undesirable shift transitions, and
//! coverage shortfalls.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod solver;
