use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AmortizationError, AmortizationResult};

/// Parameters of a SAC loan simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationInput {
    /// The financed amount.
    pub principal: Decimal,
    /// Nominal annual interest rate as a percentage (e.g., 5.0 for 5% per year).
    pub annual_rate: Decimal,
    /// Total number of monthly installments, grace period included.
    pub total_term_months: u32,
    /// Leading installments in which only interest is paid.
    pub grace_period_months: u32,
}

impl AmortizationInput {
    /// Checks the structural invariants every simulation must satisfy.
    ///
    /// Application-level bounds (minimum principal, maximum rate, ...) are not
    /// enforced here; see [`crate::limits::SimulationLimits`].
    ///
    /// # Errors
    ///
    /// * `InvalidPrincipal` if `principal <= 0`.
    /// * `InvalidRate` if `annual_rate <= 0`.
    /// * `InvalidTerm` if `total_term_months < 1`.
    /// * `InvalidGracePeriod` if `grace_period_months >= total_term_months`.
    pub fn validate(&self) -> AmortizationResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(AmortizationError::InvalidPrincipal(format!(
                "{} must be greater than zero",
                self.principal
            )));
        }
        if self.annual_rate <= Decimal::ZERO {
            return Err(AmortizationError::InvalidRate(format!(
                "{} must be greater than zero",
                self.annual_rate
            )));
        }
        if self.total_term_months < 1 {
            return Err(AmortizationError::InvalidTerm(
                "term must have at least one month".into(),
            ));
        }
        if self.grace_period_months >= self.total_term_months {
            return Err(AmortizationError::InvalidGracePeriod(format!(
                "grace of {} months leaves no amortization months in a {}-month term",
                self.grace_period_months, self.total_term_months
            )));
        }
        Ok(())
    }

    /// Number of months in which principal is actually repaid.
    pub fn amortization_months(&self) -> u32 {
        self.total_term_months.saturating_sub(self.grace_period_months)
    }
}

/// Payment details for a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmortizationInstallment {
    /// 1-based month index.
    pub period_number: u32,
    /// The portion of the payment that reduces the principal.
    pub principal_portion: Decimal,
    /// Interest charged on the balance outstanding at the start of the month.
    pub interest_portion: Decimal,
    /// `principal_portion + interest_portion`.
    pub total_payment: Decimal,
    /// The outstanding principal after this month, never negative.
    pub remaining_balance: Decimal,
}

impl AmortizationInstallment {
    /// Whether this installment falls in the interest-only window.
    pub fn is_grace(&self) -> bool {
        self.principal_portion.is_zero()
    }
}

/// Full month-by-month result of a SAC simulation.
///
/// Values are kept at full precision; round only when presenting them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmortizationSchedule {
    principal: Decimal,
    installments: Vec<AmortizationInstallment>,
    total_interest: Decimal,
    total_payable: Decimal,
}

impl AmortizationSchedule {
    pub(crate) fn new(
        principal: Decimal,
        installments: Vec<AmortizationInstallment>,
    ) -> AmortizationResult<Self> {
        let too_large = || AmortizationError::Overflow("total interest".into());
        let total_interest = installments
            .iter()
            .try_fold(Decimal::ZERO, |sum, i| sum.checked_add(i.interest_portion))
            .ok_or_else(too_large)?;
        let total_payable = principal.checked_add(total_interest).ok_or_else(too_large)?;
        Ok(Self {
            principal,
            installments,
            total_interest,
            total_payable,
        })
    }

    pub fn principal(&self) -> Decimal {
        self.principal
    }

    pub fn installments(&self) -> &[AmortizationInstallment] {
        &self.installments
    }

    /// Sum of every interest portion.
    pub fn total_interest(&self) -> Decimal {
        self.total_interest
    }

    /// Principal plus total interest.
    pub fn total_payable(&self) -> Decimal {
        self.total_payable
    }

    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    /// The first payment, which during a grace period is interest only.
    pub fn first_payment(&self) -> Option<Decimal> {
        self.installments.first().map(|i| i.total_payment)
    }

    /// The last payment, which is the lowest amortizing one.
    pub fn last_payment(&self) -> Option<Decimal> {
        self.installments.last().map(|i| i.total_payment)
    }

    /// The fixed principal portion of the amortizing months.
    pub fn constant_amortization(&self) -> Option<Decimal> {
        self.installments
            .iter()
            .find(|i| !i.is_grace())
            .map(|i| i.principal_portion)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AmortizationInstallment> {
        self.installments.iter()
    }
}

impl<'a> IntoIterator for &'a AmortizationSchedule {
    type Item = &'a AmortizationInstallment;
    type IntoIter = std::slice::Iter<'a, AmortizationInstallment>;

    fn into_iter(self) -> Self::IntoIter {
        self.installments.iter()
    }
}
