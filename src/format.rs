//! Presentation of schedules: rounding, BRL strings and due dates.
//!
//! Rounding happens here and only here. Schedules keep full precision so
//! cents never compound across months.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::types::{AmortizationInstallment, AmortizationSchedule};

/// Rounds a monetary value to cents, halves away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a value as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_money(value);
    let mut cents = rounded.abs();
    cents.rescale(2);
    let text = cents.to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}R$ {grouped},{fraction}")
}

/// Monthly due dates starting at `first`.
///
/// Each date is offset from `first` rather than from the previous one, so a
/// loan due on the 31st falls back to the month's last day and returns to the
/// 31st when the month allows it.
pub fn due_dates(first: NaiveDate, count: u32) -> Vec<NaiveDate> {
    (0..count)
        .map_while(|offset| first.checked_add_months(Months::new(offset)))
        .collect()
}

/// One installment rounded for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallmentRow {
    pub period_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub principal_portion: Decimal,
    pub interest_portion: Decimal,
    pub total_payment: Decimal,
    pub remaining_balance: Decimal,
}

impl InstallmentRow {
    pub fn from_installment(installment: &AmortizationInstallment, due_date: Option<NaiveDate>) -> Self {
        Self {
            period_number: installment.period_number,
            due_date,
            principal_portion: round_money(installment.principal_portion),
            interest_portion: round_money(installment.interest_portion),
            total_payment: round_money(installment.total_payment),
            remaining_balance: round_money(installment.remaining_balance),
        }
    }
}

/// A schedule ready to be shown: rounded totals plus one row per month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleReport {
    pub principal: Decimal,
    pub constant_amortization: Decimal,
    pub first_payment: Decimal,
    pub last_payment: Decimal,
    pub total_interest: Decimal,
    pub total_payable: Decimal,
    pub installments: Vec<InstallmentRow>,
}

impl ScheduleReport {
    pub fn new(schedule: &AmortizationSchedule, first_due_date: Option<NaiveDate>) -> Self {
        let dates = first_due_date
            .map(|first| due_dates(first, schedule.len() as u32))
            .unwrap_or_default();

        let installments = schedule
            .iter()
            .enumerate()
            .map(|(i, installment)| InstallmentRow::from_installment(installment, dates.get(i).copied()))
            .collect();

        Self {
            principal: round_money(schedule.principal()),
            constant_amortization: round_money(schedule.constant_amortization().unwrap_or_default()),
            first_payment: round_money(schedule.first_payment().unwrap_or_default()),
            last_payment: round_money(schedule.last_payment().unwrap_or_default()),
            total_interest: round_money(schedule.total_interest()),
            total_payable: round_money(schedule.total_payable()),
            installments,
        }
    }
}
