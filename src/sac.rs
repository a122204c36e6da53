//! SAC (Sistema de Amortização Constante) with an interest-only grace period.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{AmortizationError, AmortizationResult};
use crate::types::{AmortizationInput, AmortizationInstallment, AmortizationSchedule};

/// Converts a nominal annual percentage into a monthly decimal rate.
///
/// The rate is split linearly (`annual / 12 / 100`), so 6% per year becomes
/// `0.005` per month.
pub fn monthly_rate(annual_rate: Decimal) -> Decimal {
    annual_rate / dec!(12) / dec!(100)
}

/// Constants of a simulation that do not change from one month to the next.
#[derive(Debug, Clone, Copy)]
struct SacPlan {
    monthly_rate: Decimal,
    grace_period_months: u32,
    constant_amortization: Decimal,
}

impl SacPlan {
    /// Callers must have validated `input`, so the amortization window is never empty.
    fn new(input: &AmortizationInput) -> Self {
        Self {
            monthly_rate: monthly_rate(input.annual_rate),
            grace_period_months: input.grace_period_months,
            constant_amortization: input.principal / Decimal::from(input.amortization_months()),
        }
    }

    /// Computes month `period` from the balance outstanding when it opens.
    ///
    /// Returns the installment and the balance carried into the next month.
    /// The carried balance is left unclamped; only the reported one is floored.
    fn installment(
        &self,
        period: u32,
        opening_balance: Decimal,
    ) -> AmortizationResult<(AmortizationInstallment, Decimal)> {
        let interest = opening_balance
            .checked_mul(self.monthly_rate)
            .ok_or_else(|| overflow("interest", period))?;

        if period <= self.grace_period_months {
            let installment = AmortizationInstallment {
                period_number: period,
                principal_portion: Decimal::ZERO,
                interest_portion: interest,
                total_payment: interest,
                remaining_balance: opening_balance,
            };
            return Ok((installment, opening_balance));
        }

        let closing_balance = opening_balance
            .checked_sub(self.constant_amortization)
            .ok_or_else(|| overflow("balance", period))?;
        let total_payment = self
            .constant_amortization
            .checked_add(interest)
            .ok_or_else(|| overflow("payment", period))?;
        let installment = AmortizationInstallment {
            period_number: period,
            principal_portion: self.constant_amortization,
            interest_portion: interest,
            total_payment,
            remaining_balance: closing_balance.max(Decimal::ZERO),
        };
        Ok((installment, closing_balance))
    }
}

fn overflow(what: &str, period: u32) -> AmortizationError {
    AmortizationError::Overflow(format!("{what} of period {period}"))
}

/// Calculates the month-by-month SAC schedule of a loan.
///
/// Interest is always charged on the balance at the start of the month. During
/// the grace period only interest is paid and the balance stays at the
/// principal; afterwards every month repays `principal / (term - grace)`.
///
/// # Arguments
///
/// * `input` - Principal, nominal annual rate (percentage), term and grace period.
///
/// # Errors
///
/// Returns the validation error of [`AmortizationInput::validate`] if the input
/// is structurally invalid; nothing is computed in that case. Returns
/// `Overflow` if an amount or a total does not fit in a `Decimal`.
pub fn compute_schedule(input: &AmortizationInput) -> AmortizationResult<AmortizationSchedule> {
    input.validate()?;
    let plan = SacPlan::new(input);

    let (installments, _) = (1..=input.total_term_months).try_fold(
        (Vec::with_capacity(input.total_term_months as usize), input.principal),
        |(mut installments, balance), period| {
            let (installment, carried) = plan.installment(period, balance)?;
            installments.push(installment);
            Ok::<_, AmortizationError>((installments, carried))
        },
    )?;

    AmortizationSchedule::new(input.principal, installments)
}

/// Estimates the first amortizing payment of a loan.
///
/// This is the `total_payment` of month `grace + 1`, shown while a simulation is
/// being filled in. It goes through the same per-month computation as
/// [`compute_schedule`], so the preview always matches the schedule.
///
/// # Errors
///
/// Same as [`compute_schedule`].
pub fn estimate_monthly_payment(input: &AmortizationInput) -> AmortizationResult<Decimal> {
    input.validate()?;
    let plan = SacPlan::new(input);

    // The grace window never reduces the balance.
    let (installment, _) = plan.installment(input.grace_period_months + 1, input.principal)?;
    Ok(installment.total_payment)
}
