//! Calculator session.
//!
//! Holds the input record being edited and the results derived from it.
//! Every edit replaces the whole input record and recomputes the results
//! from scratch; results are never patched.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use sizer_domain::{CalculatorInputs, CalculatorResults, DomainError, InputField, PriceBracket, SpotQuote};
use sizer_engine::PositionSizeCalculator;

/// Current inputs and the results computed from them.
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorSession {
    inputs: CalculatorInputs,
    results: CalculatorResults,
    #[serde(skip)]
    calculator: PositionSizeCalculator,
}

impl CalculatorSession {
    /// Start a session from `inputs`.
    pub fn new(inputs: CalculatorInputs) -> Self {
        let calculator = PositionSizeCalculator::new();
        Self {
            results: calculator.calculate(&inputs),
            inputs,
            calculator,
        }
    }

    /// Current inputs.
    pub fn inputs(&self) -> &CalculatorInputs {
        &self.inputs
    }

    /// Results for the current inputs.
    pub fn results(&self) -> &CalculatorResults {
        &self.results
    }

    /// Set one field and recompute.
    pub fn update_field(&mut self, field: InputField, value: Decimal) -> &CalculatorResults {
        self.update_fields([(field, value)])
    }

    /// Set several fields, then recompute once.
    pub fn update_fields<I>(&mut self, updates: I) -> &CalculatorResults
    where
        I: IntoIterator<Item = (InputField, Decimal)>,
    {
        let inputs = updates
            .into_iter()
            .fold(self.inputs, |inputs, (field, value)| inputs.with_field(field, value));
        self.replace(inputs)
    }

    /// Load the default bracket around a spot quote and recompute.
    ///
    /// The session is unchanged if the quote cannot be bracketed.
    pub fn apply_quote(&mut self, quote: &SpotQuote) -> Result<PriceBracket, DomainError> {
        let bracket = quote.bracket()?;
        debug!(
            coin = %quote.coin,
            entry = %bracket.entry_price,
            stop_loss = %bracket.stop_loss_price,
            take_profit = %bracket.take_profit_price,
            "Applying price bracket"
        );
        self.replace(bracket.apply_to(self.inputs));
        Ok(bracket)
    }

    /// Replace all inputs and recompute.
    pub fn reset(&mut self, inputs: CalculatorInputs) -> &CalculatorResults {
        self.replace(inputs)
    }

    fn replace(&mut self, inputs: CalculatorInputs) -> &CalculatorResults {
        self.inputs = inputs;
        self.results = self.calculator.calculate(&self.inputs);
        &self.results
    }
}

impl Default for CalculatorSession {
    fn default() -> Self {
        Self::new(CalculatorInputs::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
