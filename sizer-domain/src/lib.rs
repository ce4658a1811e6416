//! Sizer Domain Layer
//!
//! Pure domain types with zero I/O dependencies.
//! Contains the calculator records, value objects, and market data types.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod calculator;
pub mod market_data;
pub mod value_objects;

// Re-export commonly used types
pub use calculator::{parse_field_value, CalculatorInputs, CalculatorResults, InputField};
pub use market_data::{PriceBracket, SpotQuote};
pub use value_objects::{round_fixed, Coin, DomainError, Price};
