use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AmortizationResult;
use crate::sac::{compute_schedule, estimate_monthly_payment};
use crate::types::{AmortizationInput, AmortizationSchedule};

/// What gets stored for a simulation: its inputs plus the previewed payment.
///
/// The full schedule is never persisted; [`SimulationRecord::schedule`]
/// recomputes it whenever a detail view needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub principal: Decimal,
    pub annual_rate: Decimal,
    pub total_term_months: u32,
    pub grace_period_months: u32,
    /// First amortizing installment, as shown when the simulation was created.
    pub monthly_payment: Decimal,
}

impl SimulationRecord {
    /// Builds the record for a new simulation.
    ///
    /// # Errors
    ///
    /// Any validation error of the input.
    pub fn new(input: &AmortizationInput) -> AmortizationResult<Self> {
        Ok(Self {
            principal: input.principal,
            annual_rate: input.annual_rate,
            total_term_months: input.total_term_months,
            grace_period_months: input.grace_period_months,
            monthly_payment: estimate_monthly_payment(input)?,
        })
    }

    pub fn input(&self) -> AmortizationInput {
        AmortizationInput {
            principal: self.principal,
            annual_rate: self.annual_rate,
            total_term_months: self.total_term_months,
            grace_period_months: self.grace_period_months,
        }
    }

    /// Recomputes the full schedule from the stored inputs.
    ///
    /// # Errors
    ///
    /// A record edited or loaded from elsewhere may no longer be valid.
    pub fn schedule(&self) -> AmortizationResult<AmortizationSchedule> {
        compute_schedule(&self.input())
    }
}
