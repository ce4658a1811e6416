//! Position size calculation.
//!
//! Sizes a trade so that hitting the stop-loss loses exactly the risk amount:
//!
//! ```text
//! Risk Amount   = Balance × Risk% / 100
//! Position Size = Risk Amount / |Entry − Stop|
//! ```
//!
//! Every output field is rounded once, independently, after all
//! intermediates are computed at full precision.

use rust_decimal::Decimal;
use tracing::warn;

use sizer_domain::{round_fixed, CalculatorInputs, CalculatorResults};

// =============================================================================
// Precision
// =============================================================================

/// Decimal places of each result field.
pub struct Precision;

impl Precision {
    /// `riskAmount`
    pub const RISK_AMOUNT: u32 = 2;
    /// `positionSize`
    pub const POSITION_SIZE: u32 = 6;
    /// `positionValue`
    pub const POSITION_VALUE: u32 = 2;
    /// `stopLossDistance`
    pub const STOP_LOSS_DISTANCE: u32 = 2;
    /// `rewardAmount`
    pub const REWARD_AMOUNT: u32 = 2;
    /// `riskRewardRatio`
    pub const RISK_REWARD_RATIO: u32 = 1;
}

// =============================================================================
// PositionSizeCalculator
// =============================================================================

/// Stateless position size calculator.
///
/// # Example
///
/// ```
/// # use sizer_domain::CalculatorInputs;
/// # use sizer_engine::PositionSizeCalculator;
/// # use rust_decimal_macros::dec;
/// let inputs = CalculatorInputs::new(dec!(1000), dec!(1), dec!(100), dec!(99))
///     .with_take_profit(dec!(102));
///
/// let results = PositionSizeCalculator::new().calculate(&inputs);
/// assert_eq!(results.risk_amount, dec!(10.00));
/// assert_eq!(results.position_size, dec!(10.000000));
/// assert_eq!(results.risk_reward_ratio, dec!(2.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionSizeCalculator;

impl PositionSizeCalculator {
    /// Create a calculator.
    pub fn new() -> Self {
        Self
    }

    /// Calculate sizing results for `inputs`.
    pub fn calculate(&self, inputs: &CalculatorInputs) -> CalculatorResults {
        calculate_position_size(inputs)
    }
}

/// Calculate sizing results for `inputs`.
///
/// Never fails. Returns the all-zero result when the entry or stop-loss price
/// is zero, and also when an intermediate overflows the decimal range.
pub fn calculate_position_size(inputs: &CalculatorInputs) -> CalculatorResults {
    if inputs.entry_price.is_zero() || inputs.stop_loss_price.is_zero() {
        return CalculatorResults::zero();
    }

    derive(inputs).unwrap_or_else(|| {
        warn!(
            account_balance = %inputs.account_balance,
            risk_percentage = %inputs.risk_percentage,
            entry_price = %inputs.entry_price,
            stop_loss_price = %inputs.stop_loss_price,
            take_profit_price = %inputs.take_profit_price,
            "Position size calculation overflowed, returning zero result"
        );
        CalculatorResults::zero()
    })
}

/// Core derivation. Requires non-zero entry and stop-loss prices.
///
/// Returns `None` on arithmetic overflow.
fn derive(inputs: &CalculatorInputs) -> Option<CalculatorResults> {
    let hundred = Decimal::ONE_HUNDRED;

    let risk_amount = inputs
        .account_balance
        .checked_mul(inputs.risk_percentage.checked_div(hundred)?)?;

    let price_difference = inputs.entry_price.checked_sub(inputs.stop_loss_price)?.abs();

    let position_size = if price_difference > Decimal::ZERO {
        risk_amount.checked_div(price_difference)?
    } else {
        Decimal::ZERO
    };

    let position_value = position_size.checked_mul(inputs.entry_price)?;

    let stop_loss_distance = price_difference
        .checked_div(inputs.entry_price)?
        .checked_mul(hundred)?;

    let (reward_amount, risk_reward_ratio) = if inputs.take_profit_price > Decimal::ZERO {
        let profit_difference = inputs.take_profit_price.checked_sub(inputs.entry_price)?.abs();
        let reward_amount = profit_difference.checked_mul(position_size)?;
        let risk_reward_ratio = if risk_amount > Decimal::ZERO {
            reward_amount.checked_div(risk_amount)?
        } else {
            Decimal::ZERO
        };
        (reward_amount, risk_reward_ratio)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    Some(CalculatorResults {
        risk_amount: round_fixed(risk_amount, Precision::RISK_AMOUNT),
        position_size: round_fixed(position_size, Precision::POSITION_SIZE),
        position_value: round_fixed(position_value, Precision::POSITION_VALUE),
        stop_loss_distance: round_fixed(stop_loss_distance, Precision::STOP_LOSS_DISTANCE),
        reward_amount: round_fixed(reward_amount, Precision::REWARD_AMOUNT),
        risk_reward_ratio: round_fixed(risk_reward_ratio, Precision::RISK_REWARD_RATIO),
    })
}

// =============================================================================
// Tests
// =============================================================================
