//! Calculator records
//!
//! The input record a trader edits and the result record derived from it.
//! Both are plain immutable values; an edit produces a new input record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::DomainError;

// =============================================================================
// CalculatorInputs
// =============================================================================

/// Inputs of the position size calculation.
///
/// No bounds are enforced here. A zero entry or stop-loss price means the
/// calculation is not possible yet, and a zero take-profit means no target
/// is set. Missing JSON fields deserialize as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorInputs {
    /// Total capital in quote currency
    #[serde(default)]
    pub account_balance: Decimal,
    /// Percent of capital to risk (1 = 1%)
    #[serde(default)]
    pub risk_percentage: Decimal,
    /// Intended entry price
    #[serde(default)]
    pub entry_price: Decimal,
    /// Exit price at a loss
    #[serde(default)]
    pub stop_loss_price: Decimal,
    /// Optional exit price at a profit (0 = not set)
    #[serde(default)]
    pub take_profit_price: Decimal,
}

impl CalculatorInputs {
    /// Create inputs without a take-profit target.
    pub fn new(
        account_balance: Decimal,
        risk_percentage: Decimal,
        entry_price: Decimal,
        stop_loss_price: Decimal,
    ) -> Self {
        Self {
            account_balance,
            risk_percentage,
            entry_price,
            stop_loss_price,
            take_profit_price: Decimal::ZERO,
        }
    }

    /// Set the take-profit target.
    pub fn with_take_profit(mut self, take_profit_price: Decimal) -> Self {
        self.take_profit_price = take_profit_price;
        self
    }

    /// Return a copy with a single field replaced.
    ///
    /// # Examples
    /// ```
    /// # use sizer_domain::{CalculatorInputs, InputField};
    /// # use rust_decimal_macros::dec;
    /// let inputs = CalculatorInputs::default();
    /// let edited = inputs.with_field(InputField::EntryPrice, dec!(100));
    ///
    /// assert_eq!(edited.entry_price, dec!(100));
    /// assert_eq!(edited.account_balance, inputs.account_balance);
    /// assert_eq!(inputs.entry_price, dec!(0));
    /// ```
    pub fn with_field(mut self, field: InputField, value: Decimal) -> Self {
        match field {
            InputField::AccountBalance => self.account_balance = value,
            InputField::RiskPercentage => self.risk_percentage = value,
            InputField::EntryPrice => self.entry_price = value,
            InputField::StopLossPrice => self.stop_loss_price = value,
            InputField::TakeProfitPrice => self.take_profit_price = value,
        }
        self
    }

    /// Read a single field.
    pub fn field(&self, field: InputField) -> Decimal {
        match field {
            InputField::AccountBalance => self.account_balance,
            InputField::RiskPercentage => self.risk_percentage,
            InputField::EntryPrice => self.entry_price,
            InputField::StopLossPrice => self.stop_loss_price,
            InputField::TakeProfitPrice => self.take_profit_price,
        }
    }
}

impl Default for CalculatorInputs {
    /// Balance 1000 at 1% risk, no prices entered yet.
    fn default() -> Self {
        Self {
            account_balance: Decimal::from(1000),
            risk_percentage: Decimal::ONE,
            entry_price: Decimal::ZERO,
            stop_loss_price: Decimal::ZERO,
            take_profit_price: Decimal::ZERO,
        }
    }
}

// =============================================================================
// CalculatorResults
// =============================================================================

/// Derived sizing metrics, each rounded to its own fixed precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorResults {
    /// Amount lost if the stop-loss is hit (2 decimals)
    pub risk_amount: Decimal,
    /// Quantity of the asset to trade (6 decimals)
    pub position_size: Decimal,
    /// Position value at the entry price (2 decimals)
    pub position_value: Decimal,
    /// Distance from entry to stop-loss in percent of entry (2 decimals)
    pub stop_loss_distance: Decimal,
    /// Amount gained if the take-profit is hit (2 decimals)
    pub reward_amount: Decimal,
    /// Reward over risk (1 decimal)
    pub risk_reward_ratio: Decimal,
}

impl CalculatorResults {
    /// The all-zero result, returned whenever no calculation is possible.
    pub fn zero() -> Self {
        Self {
            risk_amount: Decimal::ZERO,
            position_size: Decimal::ZERO,
            position_value: Decimal::ZERO,
            stop_loss_distance: Decimal::ZERO,
            reward_amount: Decimal::ZERO,
            risk_reward_ratio: Decimal::ZERO,
        }
    }

    /// True if every field is zero.
    pub fn is_zero(&self) -> bool {
        self.risk_amount.is_zero()
            && self.position_size.is_zero()
            && self.position_value.is_zero()
            && self.stop_loss_distance.is_zero()
            && self.reward_amount.is_zero()
            && self.risk_reward_ratio.is_zero()
    }
}

impl Default for CalculatorResults {
    fn default() -> Self {
        Self::zero()
    }
}

// =============================================================================
// InputField
// =============================================================================

/// Names of the editable input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    /// `accountBalance`
    AccountBalance,
    /// `riskPercentage`
    RiskPercentage,
    /// `entryPrice`
    EntryPrice,
    /// `stopLossPrice`
    StopLossPrice,
    /// `takeProfitPrice`
    TakeProfitPrice,
}

impl InputField {
    /// All fields, in form order.
    pub const ALL: [InputField; 5] = [
        InputField::AccountBalance,
        InputField::RiskPercentage,
        InputField::EntryPrice,
        InputField::StopLossPrice,
        InputField::TakeProfitPrice,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::AccountBalance => "accountBalance",
            InputField::RiskPercentage => "riskPercentage",
            InputField::EntryPrice => "entryPrice",
            InputField::StopLossPrice => "stopLossPrice",
            InputField::TakeProfitPrice => "takeProfitPrice",
        }
    }
}

impl FromStr for InputField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InputField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| DomainError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Field value parsing
// =============================================================================

/// Parse free text typed into an input field.
///
/// Leading and trailing whitespace is ignored. Plain and scientific notation
/// are accepted; anything else (including an empty field) is zero.
///
/// # Examples
/// ```
/// # use sizer_domain::parse_field_value;
/// # use rust_decimal_macros::dec;
/// assert_eq!(parse_field_value("101.5"), dec!(101.5));
/// assert_eq!(parse_field_value("1e3"), dec!(1000));
/// assert_eq!(parse_field_value(""), dec!(0));
/// assert_eq!(parse_field_value("abc"), dec!(0));
/// ```
pub fn parse_field_value(text: &str) -> Decimal {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .unwrap_or(Decimal::ZERO)
}

// =============================================================================
// Tests
// =============================================================================
