//! Value Objects for the Sizer Domain
//!
//! Immutable, validated domain primitives.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Price must be positive
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Coin is not in the supported list
    #[error("Unknown coin: {0}")]
    UnknownCoin(String),

    /// Field name does not match any calculator input
    #[error("Unknown input field: {0}")]
    UnknownField(String),
}

// =============================================================================
// Rounding
// =============================================================================

/// Round a decimal to a fixed number of places.
///
/// Midpoints round away from zero and the result always carries exactly
/// `places` digits after the point, so `10` rounded to 2 places displays as
/// `10.00`. A result of zero is always positive zero.
///
/// # Examples
/// ```
/// # use sizer_domain::round_fixed;
/// # use rust_decimal_macros::dec;
/// assert_eq!(round_fixed(dec!(11.115), 2).to_string(), "11.12");
/// assert_eq!(round_fixed(dec!(10), 2).to_string(), "10.00");
/// assert_eq!(round_fixed(dec!(-0.0001), 2).to_string(), "0.00");
/// ```
pub fn round_fixed(value: Decimal, places: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(places);
    rounded
}

// =============================================================================
// Price
// =============================================================================

/// Price represents a positive decimal spot price
///
/// # Invariants
/// - Must be > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Create a new Price with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPrice` if value <= 0
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidPrice(format!("Price must be positive, got {}", value)));
        }
        Ok(Self(value))
    }

    /// Get the underlying Decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Coin
// =============================================================================

/// Spot asset whose price can be loaded from the price feed.
///
/// Serializes as the feed identifier (e.g. `"bitcoin"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coin {
    /// Bitcoin (BTC)
    Bitcoin,
    /// Ethereum (ETH)
    Ethereum,
    /// Solana (SOL)
    Solana,
    /// BNB (BNB)
    BinanceCoin,
    /// XRP (XRP)
    Ripple,
}

impl Coin {
    /// All supported coins, in display order.
    pub const ALL: [Coin; 5] = [
        Coin::Bitcoin,
        Coin::Ethereum,
        Coin::Solana,
        Coin::BinanceCoin,
        Coin::Ripple,
    ];

    /// Identifier used by the price feed (e.g., "bitcoin")
    pub fn feed_id(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "bitcoin",
            Coin::Ethereum => "ethereum",
            Coin::Solana => "solana",
            Coin::BinanceCoin => "binancecoin",
            Coin::Ripple => "ripple",
        }
    }

    /// Ticker symbol (e.g., "BTC")
    pub fn ticker(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "BTC",
            Coin::Ethereum => "ETH",
            Coin::Solana => "SOL",
            Coin::BinanceCoin => "BNB",
            Coin::Ripple => "XRP",
        }
    }
}

impl FromStr for Coin {
    type Err = DomainError;

    /// Parse a coin from either its feed identifier or its ticker.
    ///
    /// # Examples
    /// ```
    /// # use sizer_domain::Coin;
    /// assert_eq!("bitcoin".parse::<Coin>().unwrap(), Coin::Bitcoin);
    /// assert_eq!("eth".parse::<Coin>().unwrap(), Coin::Ethereum);
    /// assert!("dogecoin".parse::<Coin>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Coin::ALL
            .into_iter()
            .find(|coin| {
                coin.feed_id().eq_ignore_ascii_case(wanted)
                    || coin.ticker().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| DomainError::UnknownCoin(s.to_string()))
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticker())
    }
}

// =============================================================================
// Tests
// =============================================================================
