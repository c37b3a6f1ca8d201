//! In-memory transforms over normalized gas/energy series.
//!
//! This crate handles everything downstream of fetching: combining
//! per-source series into one table, date-range filtering, grouped
//! trailing moving averages, and the canonical CSV shape.

pub mod combine;
pub mod export;
pub mod smooth;
