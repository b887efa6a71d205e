//! Loan records and the payment status classifier built on top of them.

pub mod loan;
pub mod status;

pub use loan::{loans_from_json, read_loans, Loan, LoanRecord, Payment};
pub use status::{
    categorize_loan_payments, categorize_payment, loan_status, most_recent_payment,
    CategorizedPayment, PaymentStatus, DEFAULT_AFTER_DAYS, ON_TIME_GRACE_DAYS,
};
