//! Consolidates per-symbol token search results into a single
//! symbol → chain id → contract address file, and reads it back.

pub mod chain;
pub mod config;
pub mod consolidated;
pub mod consolidator;
pub mod lookup;
pub mod selection;
pub mod telemetry;
pub mod token;
