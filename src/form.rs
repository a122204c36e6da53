//! Conversion of the raw strings typed into a simulation form.
//!
//! Amounts arrive formatted for pt-BR (`R$ 1.234,56`), rates as `6,5` or
//! `6.5%`, month counts as plain integers and dates as `DD/MM/YYYY`. Nothing
//! here computes; the parsed [`AmortizationInput`] is what reaches the
//! calculator.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AmortizationError, AmortizationResult};
use crate::limits::SimulationLimits;
use crate::types::AmortizationInput;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// A simulation form as submitted, every field still a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationForm {
    pub principal: String,
    pub annual_rate: String,
    pub total_term_months: String,
    #[serde(default)]
    pub grace_period_months: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_due_date: Option<String>,
}

/// A parsed and validated simulation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationRequest {
    pub input: AmortizationInput,
    pub first_due_date: Option<NaiveDate>,
}

impl SimulationForm {
    /// Parses every field, then applies the structural checks and `limits`.
    ///
    /// Fields are parsed in form order, so the first error reported is the
    /// topmost bad field. An empty grace period is read as zero.
    pub fn parse(&self, limits: &SimulationLimits) -> AmortizationResult<SimulationRequest> {
        let principal = parse_brl_amount(&self.principal)?;
        let annual_rate = parse_percentage(&self.annual_rate)?;
        let total_term_months =
            parse_months(&self.total_term_months).map_err(AmortizationError::InvalidTerm)?;
        let grace_period_months = if self.grace_period_months.trim().is_empty() {
            0
        } else {
            parse_months(&self.grace_period_months)
                .map_err(AmortizationError::InvalidGracePeriod)?
        };

        let input = AmortizationInput {
            principal,
            annual_rate,
            total_term_months,
            grace_period_months,
        };

        let first_due_date = self
            .first_due_date
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(parse_date)
            .transpose()?;

        if let Err(e) = input.validate().and_then(|_| limits.check(&input)) {
            debug!(error = %e, ?input, "simulation form rejected");
            return Err(e);
        }

        Ok(SimulationRequest {
            input,
            first_due_date,
        })
    }
}

/// Parses a pt-BR currency string such as `R$ 1.234.567,89`.
///
/// `.` is accepted only as a thousands separator in groups of three and `,`
/// only as the decimal separator, so `100000.50` is rejected rather than
/// silently read as ten million.
pub fn parse_brl_amount(raw: &str) -> AmortizationResult<Decimal> {
    let invalid = || AmortizationError::InvalidPrincipal(format!("'{raw}' is not a BRL amount"));

    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let (integer, fraction) = match cleaned.split_once(',') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (cleaned.as_str(), None),
    };

    let mut groups = integer.split('.');
    let leading = groups.next().unwrap_or_default();
    let leading_ok = !leading.is_empty()
        && leading.trim_start_matches('-').chars().all(|c| c.is_ascii_digit())
        && leading != "-";
    let grouped = integer.contains('.');
    if !leading_ok || (grouped && leading.trim_start_matches('-').len() > 3) {
        return Err(invalid());
    }
    let mut digits = leading.to_string();
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        digits.push_str(group);
    }

    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        digits.push('.');
        digits.push_str(fraction);
    }

    Decimal::from_str(&digits).map_err(|_| invalid())
}

/// Parses a percentage such as `6`, `6,5`, `6.5` or `6,5%`.
pub fn parse_percentage(raw: &str) -> AmortizationResult<Decimal> {
    let normalized = raw.trim().trim_end_matches('%').trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(AmortizationError::InvalidRate("rate is empty".into()));
    }
    Decimal::from_str(&normalized)
        .map_err(|_| AmortizationError::InvalidRate(format!("'{raw}' is not a percentage")))
}

/// Parses a whole, non-negative number of months.
///
/// Returns the reason as a plain string so each field can wrap it in its own
/// error variant.
pub fn parse_months(raw: &str) -> Result<u32, String> {
    let trimmed = raw.trim();
    if let Ok(months) = trimmed.parse::<u32>() {
        return Ok(months);
    }
    match Decimal::from_str(&trimmed.replace(',', ".")) {
        Ok(value) if value.is_sign_negative() && !value.is_zero() => {
            Err(format!("'{raw}' is negative"))
        }
        Ok(value) if !value.fract().is_zero() => Err(format!("'{raw}' is not an integer")),
        Ok(value) => value
            .to_u32()
            .ok_or_else(|| format!("'{raw}' is too large")),
        Err(_) => Err(format!("'{raw}' is not a number of months")),
    }
}

/// Parses a `DD/MM/YYYY` date.
pub fn parse_date(raw: &str) -> AmortizationResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| AmortizationError::InvalidDate(format!("'{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn form(principal: &str, rate: &str, term: &str, grace: &str) -> SimulationForm {
        SimulationForm {
            principal: principal.into(),
            annual_rate: rate.into(),
            total_term_months: term.into(),
            grace_period_months: grace.into(),
            first_due_date: None,
        }
    }

    #[rstest]
    #[case("R$ 1.234.567,89", dec!(1234567.89))]
    #[case("R$\u{a0}100.000,00", dec!(100000))]
    #[case("100000", dec!(100000))]
    #[case("1234,5", dec!(1234.5))]
    #[case(" 999 ", dec!(999))]
    fn test_parse_brl_amount(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_brl_amount(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("100000.50")]
    #[case("1.23,00")]
    #[case("1234.567")]
    #[case("R$")]
    #[case("12,")]
    #[case("abc")]
    #[case("1,2,3")]
    fn test_parse_brl_amount_rejects(#[case] raw: &str) {
        let err = parse_brl_amount(raw).unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidPrincipal(_)), "{raw}");
    }

    #[rstest]
    #[case("6", dec!(6))]
    #[case("6,5", dec!(6.5))]
    #[case("6.5", dec!(6.5))]
    #[case("6,5 %", dec!(6.5))]
    fn test_parse_percentage(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_percentage(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_percentage_rejects_text() {
        assert!(matches!(
            parse_percentage("six").unwrap_err(),
            AmortizationError::InvalidRate(_)
        ));
        assert!(matches!(
            parse_percentage("%").unwrap_err(),
            AmortizationError::InvalidRate(_)
        ));
    }

    #[test]
    fn test_parse_months() {
        assert_eq!(parse_months(" 24 "), Ok(24));
        assert_eq!(parse_months("36,0"), Ok(36));
        assert!(parse_months("12.5").unwrap_err().contains("not an integer"));
        assert!(parse_months("-3").unwrap_err().contains("negative"));
        assert!(parse_months("").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("15/03/2025").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
        assert!(matches!(
            parse_date("2025-03-15").unwrap_err(),
            AmortizationError::InvalidDate(_)
        ));
        assert!(parse_date("31/02/2025").is_err());
    }

    #[test]
    fn test_form_parse_happy_path() {
        let mut form = form("R$ 100.000,00", "6", "24", "6");
        form.first_due_date = Some("10/01/2026".into());

        let request = form.parse(&SimulationLimits::default()).unwrap();

        assert_eq!(request.input.principal, dec!(100000));
        assert_eq!(request.input.annual_rate, dec!(6));
        assert_eq!(request.input.total_term_months, 24);
        assert_eq!(request.input.grace_period_months, 6);
        assert_eq!(request.first_due_date, NaiveDate::from_ymd_opt(2026, 1, 10));
    }

    #[test]
    fn test_form_empty_grace_is_zero() {
        let request = form("50.000", "4,5", "36", "")
            .parse(&SimulationLimits::default())
            .unwrap();
        assert_eq!(request.input.grace_period_months, 0);
    }

    #[test]
    fn test_form_fractional_term_is_invalid_term() {
        let err = form("50.000", "4,5", "36.5", "0")
            .parse(&SimulationLimits::default())
            .unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidTerm(_)));
    }

    #[test]
    fn test_form_negative_grace_is_invalid_grace() {
        let err = form("50.000", "4,5", "36", "-1")
            .parse(&SimulationLimits::default())
            .unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidGracePeriod(_)));
    }

    #[test]
    fn test_form_reports_first_bad_field_in_form_order() {
        let limits = SimulationLimits::default();

        let err = form("abc", "six", "x", "-1").parse(&limits).unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidPrincipal(_)), "{err:?}");

        let err = form("50.000", "six", "x", "-1").parse(&limits).unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidRate(_)), "{err:?}");

        let err = form("50.000", "6", "x", "-1").parse(&limits).unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidTerm(_)), "{err:?}");
    }

    #[test]
    fn test_form_structural_error_precedes_limits() {
        let err = form("50.000", "4,5", "24", "24")
            .parse(&SimulationLimits::default())
            .unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidGracePeriod(_)));
    }

    #[test]
    fn test_form_applies_limits() {
        let err = form("500", "4,5", "24", "0")
            .parse(&SimulationLimits::default())
            .unwrap_err();
        assert!(matches!(
            err,
            AmortizationError::OutOfBounds {
                field: "principal",
                ..
            }
        ));
    }

    #[test]
    fn test_form_deserializes_without_optional_fields() {
        let form: SimulationForm = serde_json::from_str(
            r#"{"principal": "R$ 80.000,00", "annual_rate": "7", "total_term_months": "60"}"#,
        )
        .unwrap();
        assert_eq!(form.grace_period_months, "");
        assert_eq!(form.first_due_date, None);
    }
}
