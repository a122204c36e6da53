use anyhow::Result;
use rust_decimal::Decimal;
use tabled::builder::Builder;
use tabled::{Table, Tabled};

use br_rural_credit::SimulationRecord;
use br_rural_credit::format::{InstallmentRow, ScheduleReport, format_brl};

use crate::OutputFormat;

#[derive(Tabled)]
struct InstallmentLine {
    #[tabled(rename = "#")]
    period: u32,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Amortization")]
    principal: String,
    #[tabled(rename = "Interest")]
    interest: String,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

impl From<&InstallmentRow> for InstallmentLine {
    fn from(row: &InstallmentRow) -> Self {
        Self {
            period: row.period_number,
            due: row
                .due_date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "-".into()),
            principal: format_brl(row.principal_portion),
            interest: format_brl(row.interest_portion),
            payment: format_brl(row.total_payment),
            balance: format_brl(row.remaining_balance),
        }
    }
}

fn summary_table(fields: &[(&str, Decimal)]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (name, value) in fields {
        builder.push_record([name.to_string(), format_brl(*value)]);
    }
    builder.build()
}

/// Renders a schedule as pretty JSON or as a summary table followed by one row per month.
pub fn render_schedule(format: OutputFormat, report: &ScheduleReport) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Table => {
            let summary = summary_table(&[
                ("Principal", report.principal),
                ("Constant amortization", report.constant_amortization),
                ("First payment", report.first_payment),
                ("Last payment", report.last_payment),
                ("Total interest", report.total_interest),
                ("Total payable", report.total_payable),
            ]);
            let lines: Vec<InstallmentLine> = report.installments.iter().map(Into::into).collect();
            Ok(format!("{summary}\n\n{}", Table::new(lines)))
        }
    }
}

pub fn render_preview(format: OutputFormat, record: &SimulationRecord) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            builder.push_record(["Principal".to_string(), format_brl(record.principal)]);
            builder.push_record(["Annual rate".to_string(), format!("{}%", record.annual_rate)]);
            builder.push_record(["Term".to_string(), format!("{} months", record.total_term_months)]);
            builder.push_record([
                "Grace period".to_string(),
                format!("{} months", record.grace_period_months),
            ]);
            builder.push_record(["Monthly payment".to_string(), format_brl(record.monthly_payment)]);
            Ok(builder.build().to_string())
        }
    }
}
