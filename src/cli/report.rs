//! Builds the loan status and categorized payments reports.

use crate::cli::output::{status_badge, OutputPreferences};
use crate::cli::ui::table_renderer::{Alignment, Table, TableColumn};
use crate::currency::{
    format_currency_with, format_date_with, format_rate, CurrencyCode, FormatOptions, LocaleConfig,
};
use crate::loans::{loan_status, CategorizedPayment, Loan};

const NAME_MAX_WIDTH: usize = 32;

/// Locale, currency and output settings shared by the reports.
#[derive(Debug, Clone, Default)]
pub struct ReportStyle {
    pub locale: LocaleConfig,
    pub currency: CurrencyCode,
    pub options: FormatOptions,
    pub output: OutputPreferences,
}

impl ReportStyle {
    fn money(&self, amount: f64) -> String {
        format_currency_with(amount, &self.currency, &self.locale, &self.options)
    }
}

/// Table of categorized payment rows, in the order given.
pub fn payments_table(rows: &[CategorizedPayment], style: &ReportStyle) -> Table {
    let mut table = Table::new(vec![
        TableColumn::new("Name", Alignment::Left).with_max_width(NAME_MAX_WIDTH),
        TableColumn::new("Rate", Alignment::Right),
        TableColumn::new("Principal", Alignment::Right),
        TableColumn::new("Due", Alignment::Left),
        TableColumn::new("Paid", Alignment::Left),
        TableColumn::new("Status", Alignment::Left),
    ]);
    for row in rows {
        table.push_row(vec![
            row.name.clone(),
            format_rate(row.interest_rate),
            style.money(row.principal),
            format_date_with(&style.locale, Some(&row.due_date)),
            format_date_with(&style.locale, row.payment_date.as_deref()),
            status_badge(row.status, &style.output),
        ]);
    }
    table
}

/// One line per loan: name, due date and current status.
pub fn status_lines(loans: &[Loan], style: &ReportStyle) -> Vec<String> {
    loans
        .iter()
        .map(|loan| {
            format!(
                "{} (due {}): {}",
                loan.name,
                format_date_with(&style.locale, Some(&loan.due_date)),
                status_badge(loan_status(loan), &style.output)
            )
        })
        .collect()
}
