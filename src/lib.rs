//! `br_rural_credit` computes loan simulations for rural credit in Brazil.
//!
//! Rural credit lines are usually repaid with the **SAC (Sistema de Amortização
//! Constante)**: the principal portion of each installment is fixed, interest is
//! charged on the balance outstanding at the start of each month, and so the
//! total payment declines over time. A **grace period (carência)** lets the
//! borrower pay only interest for the first months, typically until the first
//! harvest.
//!
//! The crate provides:
//! - [`compute_schedule`] and [`estimate_monthly_payment`], the calculator itself;
//! - [`SimulationForm`], which turns the strings typed into a simulation form
//!   (`R$ 100.000,00`, `6,5`, `15/03/2026`) into a validated [`AmortizationInput`];
//! - [`SimulationLimits`], the ranges a form accepts;
//! - [`SimulationRecord`], what gets stored for a simulation;
//! - [`format`], display helpers.
//!
//! ## Usage
//!
//! ```rust
//! use br_rural_credit::{compute_schedule, estimate_monthly_payment, AmortizationInput};
//! use rust_decimal_macros::dec;
//!
//! let input = AmortizationInput {
//!     principal: dec!(100_000),
//!     annual_rate: dec!(6.0),
//!     total_term_months: 24,
//!     grace_period_months: 6,
//! };
//!
//! match compute_schedule(&input) {
//!     Ok(schedule) => {
//!         println!("Months:          {}", schedule.len());
//!         println!("Total interest:  {:.2}", schedule.total_interest());
//!         println!("Total payable:   {:.2}", schedule.total_payable());
//!     }
//!     Err(e) => eprintln!("Error computing schedule: {}", e),
//! }
//!
//! let preview = estimate_monthly_payment(&input).unwrap();
//! assert_eq!(preview.round_dp(2), dec!(6055.56));
//! ```

pub mod error;
pub mod form;
pub mod format;
pub mod limits;
pub mod record;
pub mod sac;
pub mod types;

pub use error::{AmortizationError, AmortizationResult};
pub use form::{SimulationForm, SimulationRequest};
pub use limits::{Bounds, SimulationLimits};
pub use record::SimulationRecord;
pub use sac::{compute_schedule, estimate_monthly_payment, monthly_rate};
pub use types::{AmortizationInput, AmortizationInstallment, AmortizationSchedule};
