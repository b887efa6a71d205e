use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::loan::{Loan, Payment};
use crate::dates::{days_between, parse_iso_date};

/// Payments up to this many days after the due date still count as on time.
pub const ON_TIME_GRACE_DAYS: i64 = 5;
/// Payments later than this many days past due count as defaulted.
pub const DEFAULT_AFTER_DAYS: i64 = 30;

/// Derived standing of a payment. Never stored, always computed from dates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    #[serde(rename = "On Time")]
    OnTime,
    Late,
    Defaulted,
    Unpaid,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::OnTime => "On Time",
            PaymentStatus::Late => "Late",
            PaymentStatus::Defaulted => "Defaulted",
            PaymentStatus::Unpaid => "Unpaid",
        }
    }

    /// Classifies a signed day difference (payment minus due date).
    pub fn from_days_late(days_late: i64) -> Self {
        if days_late <= ON_TIME_GRACE_DAYS {
            PaymentStatus::OnTime
        } else if days_late <= DEFAULT_AFTER_DAYS {
            PaymentStatus::Late
        } else {
            PaymentStatus::Defaulted
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One (loan, payment) pairing annotated with its derived status.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedPayment {
    pub id: i64,
    pub name: String,
    pub interest_rate: f64,
    pub principal: f64,
    pub due_date: String,
    pub payment_date: Option<String>,
    pub status: PaymentStatus,
}

impl CategorizedPayment {
    fn for_loan(loan: &Loan, payment_date: Option<String>, status: PaymentStatus) -> Self {
        Self {
            id: loan.id,
            name: loan.name.clone(),
            interest_rate: loan.interest_rate,
            principal: loan.principal,
            due_date: loan.due_date.clone(),
            payment_date,
            status,
        }
    }
}

/// Classifies a payment date against a due date. Missing or unreadable dates
/// on either side yield [`PaymentStatus::Unpaid`].
pub fn categorize_payment(due_date: &str, payment_date: Option<&str>) -> PaymentStatus {
    let Some(paid) = payment_date.filter(|date| !date.is_empty()) else {
        return PaymentStatus::Unpaid;
    };
    let (Some(due), Some(paid)) = (parse_iso_date(due_date), parse_iso_date(paid)) else {
        tracing::debug!(due_date, payment_date = paid, "Unparsable date, treating as unpaid");
        return PaymentStatus::Unpaid;
    };
    PaymentStatus::from_days_late(days_between(due, paid))
}

/// Current standing of a loan, judged by its most recent dated payment.
pub fn loan_status(loan: &Loan) -> PaymentStatus {
    match most_recent_payment(loan) {
        Some(payment) => categorize_payment(&loan.due_date, payment.paid_on()),
        None => PaymentStatus::Unpaid,
    }
}

/// Picks the payment with the latest calendar date. Unparsable dates rank
/// below every parsable one; ties keep the first payment seen.
pub fn most_recent_payment(loan: &Loan) -> Option<&Payment> {
    let mut latest: Option<(&Payment, Option<NaiveDate>)> = None;
    for payment in loan.paid_payments() {
        let date = payment.paid_on().and_then(parse_iso_date);
        match latest {
            Some((_, best)) if date <= best => {}
            _ => latest = Some((payment, date)),
        }
    }
    latest.map(|(payment, _)| payment)
}

/// Flattens loans into one row per payment, or a single `Unpaid` row for a
/// loan with no payments. Input order is preserved.
pub fn categorize_loan_payments(loans: &[Loan]) -> Vec<CategorizedPayment> {
    let mut rows = Vec::with_capacity(loans.len());
    for loan in loans {
        if loan.payments.is_empty() {
            rows.push(CategorizedPayment::for_loan(loan, None, PaymentStatus::Unpaid));
            continue;
        }
        for payment in &loan.payments {
            let status = categorize_payment(&loan.due_date, payment.payment_date.as_deref());
            rows.push(CategorizedPayment::for_loan(
                loan,
                payment.payment_date.clone(),
                status,
            ));
        }
    }
    rows
}
