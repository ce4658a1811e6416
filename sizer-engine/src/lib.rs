//! Sizer Engine Layer
//!
//! Pure decision logic, deterministic, no I/O.
//! Takes calculator inputs → returns rounded sizing results.

#![warn(clippy::all)]

pub mod sizing;

pub use sizing::{calculate_position_size, Precision, PositionSizeCalculator};
