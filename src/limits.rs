use std::fmt::Display;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AmortizationError, AmortizationResult};
use crate::types::AmortizationInput;

/// An inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Display + Copy> Bounds<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    fn check(&self, field: &'static str, value: T) -> AmortizationResult<()> {
        if self.contains(value) {
            return Ok(());
        }
        Err(AmortizationError::OutOfBounds {
            field,
            value: value.to_string(),
            min: self.min.to_string(),
            max: self.max.to_string(),
        })
    }
}

/// Ranges a simulation form accepts on top of the structural checks.
///
/// The defaults are the ones offered to advisors when creating a simulation.
/// Any field left out of a JSON document keeps its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationLimits {
    /// Financed amount in BRL.
    pub principal: Bounds<Decimal>,
    /// Nominal annual rate, as a percentage.
    pub annual_rate: Bounds<Decimal>,
    pub total_term_months: Bounds<u32>,
    pub grace_period_months: Bounds<u32>,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            principal: Bounds::new(dec!(1_000), dec!(10_000_000)),
            annual_rate: Bounds::new(dec!(0.1), dec!(20)),
            total_term_months: Bounds::new(12, 240),
            grace_period_months: Bounds::new(0, 60),
        }
    }
}

impl SimulationLimits {
    /// Loads limits from a JSON document.
    ///
    /// # Errors
    ///
    /// `Config` if the document does not parse or a range has `min > max`.
    pub fn from_json(json: &str) -> AmortizationResult<Self> {
        let limits: Self = serde_json::from_str(json)?;
        limits.ensure_ordered()?;
        Ok(limits)
    }

    fn ensure_ordered(&self) -> AmortizationResult<()> {
        let inverted = [
            ("principal", self.principal.min > self.principal.max),
            ("annual_rate", self.annual_rate.min > self.annual_rate.max),
            (
                "total_term_months",
                self.total_term_months.min > self.total_term_months.max,
            ),
            (
                "grace_period_months",
                self.grace_period_months.min > self.grace_period_months.max,
            ),
        ];
        match inverted.iter().find(|(_, bad)| *bad) {
            Some((field, _)) => Err(AmortizationError::Config(format!(
                "{field}: min is greater than max"
            ))),
            None => Ok(()),
        }
    }

    /// Rejects inputs outside the configured ranges.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` naming the first offending field.
    pub fn check(&self, input: &AmortizationInput) -> AmortizationResult<()> {
        self.principal.check("principal", input.principal)?;
        self.annual_rate.check("annual_rate", input.annual_rate)?;
        self.total_term_months
            .check("total_term_months", input.total_term_months)?;
        self.grace_period_months
            .check("grace_period_months", input.grace_period_months)?;
        Ok(())
    }
}
