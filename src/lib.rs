//! Overtime Report Engine
//!
//! This crate turns a stored history of worked shifts into filtered views,
//! daily, monthly and annual summaries, bulk selections for deletion, and
//! CSV/JSON exports. Dates are classified as weekday, Saturday, Sunday or
//! public holiday against a configurable holiday calendar.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod storage;
