//! Market Data Types
//!
//! Spot quotes from the price feed and the default stop-loss/take-profit
//! bracket derived from them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculator::CalculatorInputs;
use crate::value_objects::{round_fixed, Coin, DomainError, Price};

// =============================================================================
// SpotQuote
// =============================================================================

/// Current spot price of a coin as reported by the price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotQuote {
    /// Quoted coin
    pub coin: Coin,
    /// Spot price in the feed's quote currency
    pub price: Price,
    /// When the quote was received
    pub fetched_at: DateTime<Utc>,
}

impl SpotQuote {
    /// Create a quote stamped with the current time.
    pub fn new(coin: Coin, price: Price) -> Self {
        Self {
            coin,
            price,
            fetched_at: Utc::now(),
        }
    }

    /// Default bracket around this quote.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPrice` if the price is too large to bracket.
    pub fn bracket(&self) -> Result<PriceBracket, DomainError> {
        PriceBracket::from_spot(self.price)
    }
}

// =============================================================================
// PriceBracket
// =============================================================================

/// Entry, stop-loss and take-profit prices suggested for a spot price.
///
/// The stop-loss sits 1% below the spot price and the take-profit 2% above,
/// both rounded to 2 decimals. The entry is the spot price itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBracket {
    /// Entry price (the spot price, unrounded)
    pub entry_price: Decimal,
    /// Stop-loss price
    pub stop_loss_price: Decimal,
    /// Take-profit price
    pub take_profit_price: Decimal,
}

impl PriceBracket {
    /// Stop-loss as a fraction of the spot price.
    pub const STOP_LOSS_FACTOR: Decimal = dec!(0.99);
    /// Take-profit as a fraction of the spot price.
    pub const TAKE_PROFIT_FACTOR: Decimal = dec!(1.02);
    /// Decimal places of the derived stop-loss and take-profit.
    pub const PRICE_DECIMALS: u32 = 2;

    /// Derive the default bracket for a spot price.
    ///
    /// # Examples
    /// ```
    /// # use sizer_domain::{Price, PriceBracket};
    /// # use rust_decimal_macros::dec;
    /// let bracket = PriceBracket::from_spot(Price::new(dec!(64123.456)).unwrap()).unwrap();
    ///
    /// assert_eq!(bracket.entry_price, dec!(64123.456));
    /// assert_eq!(bracket.stop_loss_price, dec!(63482.22));   // 63482.22144
    /// assert_eq!(bracket.take_profit_price, dec!(65405.93)); // 65405.92512
    /// ```
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPrice` if a derived price overflows.
    pub fn from_spot(spot: Price) -> Result<Self, DomainError> {
        let price = spot.as_decimal();
        let scaled = |factor: Decimal| {
            price
                .checked_mul(factor)
                .map(|value| round_fixed(value, Self::PRICE_DECIMALS))
                .ok_or_else(|| DomainError::InvalidPrice(format!("Price {} is out of range", price)))
        };

        Ok(Self {
            entry_price: price,
            stop_loss_price: scaled(Self::STOP_LOSS_FACTOR)?,
            take_profit_price: scaled(Self::TAKE_PROFIT_FACTOR)?,
        })
    }

    /// Replace the three prices of `inputs`, keeping balance and risk.
    pub fn apply_to(&self, inputs: CalculatorInputs) -> CalculatorInputs {
        CalculatorInputs {
            entry_price: self.entry_price,
            stop_loss_price: self.stop_loss_price,
            take_profit_price: self.take_profit_price,
            ..inputs
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_round_price() {
        let bracket = PriceBracket::from_spot(Price::new(dec!(100)).unwrap()).unwrap();
        assert_eq!(bracket.entry_price, dec!(100));
        assert_eq!(bracket.stop_loss_price, dec!(99.00));
        assert_eq!(bracket.take_profit_price, dec!(102.00));
    }

    #[test]
    fn test_bracket_small_price_rounds_to_cents() {
        // XRP-like price
        let bracket = PriceBracket::from_spot(Price::new(dec!(0.5234)).unwrap()).unwrap();
        assert_eq!(bracket.entry_price, dec!(0.5234));
        assert_eq!(bracket.stop_loss_price, dec!(0.52)); // 0.518166
        assert_eq!(bracket.take_profit_price, dec!(0.53)); // 0.533868
    }

    #[test]
    fn test_bracket_out_of_range_price_is_rejected() {
        // 1.02x overflows the decimal range
        let huge = Price::new(dec!(79000000000000000000000000000)).unwrap();

        let err = PriceBracket::from_spot(huge).unwrap_err();
        assert!(matches!(err, DomainError::InvalidPrice(_)));

        let quote = SpotQuote::new(Coin::Bitcoin, huge);
        assert!(quote.bracket().is_err());
    }

    #[test]
    fn test_bracket_apply_keeps_balance_and_risk() {
        let inputs = CalculatorInputs::new(dec!(2500), dec!(2), dec!(1), dec!(1));
        let bracket = PriceBracket::from_spot(Price::new(dec!(3000)).unwrap()).unwrap();

        let applied = bracket.apply_to(inputs);
        assert_eq!(applied.account_balance, dec!(2500));
        assert_eq!(applied.risk_percentage, dec!(2));
        assert_eq!(applied.entry_price, dec!(3000));
        assert_eq!(applied.stop_loss_price, dec!(2970));
        assert_eq!(applied.take_profit_price, dec!(3060));
    }

    #[test]
    fn test_quote_bracket() {
        let quote = SpotQuote::new(Coin::Solana, Price::new(dec!(150)).unwrap());
        let bracket = quote.bracket().unwrap();
        assert_eq!(bracket.stop_loss_price, dec!(148.50));
        assert_eq!(bracket.take_profit_price, dec!(153.00));
    }

    #[test]
    fn test_quote_serializes_camel_case() {
        let quote = SpotQuote::new(Coin::Bitcoin, Price::new(dec!(64000)).unwrap());
        let json = serde_json::to_value(quote).unwrap();
        assert_eq!(json["coin"], "bitcoin");
        assert!(json.get("fetchedAt").is_some());
    }
}
