//! wxcache Library
//!
//! Open-Meteo geocoding and forecast lookups behind a local SQLite cache,
//! plus the text report printed by the `wxcache` binary.

pub mod cache;
pub mod cli;
pub mod data;
pub mod keys;
pub mod report;
pub mod service;
