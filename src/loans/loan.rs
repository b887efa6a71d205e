use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::errors::LoanError;

/// A single recorded payment against a loan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub loan_id: i64,
    #[serde(default)]
    pub payment_date: Option<String>,
}

impl Payment {
    pub fn new(id: i64, loan_id: i64, payment_date: Option<&str>) -> Self {
        Self {
            id,
            loan_id,
            payment_date: payment_date.map(str::to_string),
        }
    }

    /// Payment date, treating an empty string the same as no date.
    pub fn paid_on(&self) -> Option<&str> {
        self.payment_date.as_deref().filter(|date| !date.is_empty())
    }
}

/// A loan with its payments, free of the absent-slot holes the API may return.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: i64,
    pub name: String,
    pub interest_rate: f64,
    pub principal: f64,
    pub due_date: String,
    #[serde(rename = "loanPayments")]
    pub payments: Vec<Payment>,
}

impl Loan {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        interest_rate: f64,
        principal: f64,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            interest_rate,
            principal,
            due_date: due_date.into(),
            payments: Vec::new(),
        }
    }

    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payments.push(payment);
        self
    }

    /// Payments that carry a payment date.
    pub fn paid_payments(&self) -> impl Iterator<Item = &Payment> {
        self.payments.iter().filter(|p| p.paid_on().is_some())
    }
}

/// Loan exactly as the GraphQL layer serializes it. `loanPayments` may be
/// null, missing, or contain null entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    pub id: i64,
    pub name: String,
    pub interest_rate: f64,
    pub principal: f64,
    pub due_date: String,
    #[serde(default)]
    pub loan_payments: Option<Vec<Option<Payment>>>,
}

impl From<LoanRecord> for Loan {
    fn from(record: LoanRecord) -> Self {
        let payments = record
            .loan_payments
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect();
        Self {
            id: record.id,
            name: record.name,
            interest_rate: record.interest_rate,
            principal: record.principal,
            due_date: record.due_date,
            payments,
        }
    }
}

impl<'de> Deserialize<'de> for Loan {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        LoanRecord::deserialize(deserializer).map(Loan::from)
    }
}

#[derive(Debug, Deserialize)]
struct LoansData {
    loans: Vec<Loan>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LoansDocument {
    Envelope { data: LoansData },
    Bare(Vec<Loan>),
}

/// Reads loans from either a bare JSON array or a `{"data": {"loans": [...]}}`
/// query response.
pub fn loans_from_json(json: &str) -> Result<Vec<Loan>, LoanError> {
    let document: LoansDocument = serde_json::from_str(json)?;
    let loans = match document {
        LoansDocument::Envelope { data } => data.loans,
        LoansDocument::Bare(loans) => loans,
    };
    tracing::debug!(count = loans.len(), "Loaded loans document");
    Ok(loans)
}

/// Reads a loans JSON document from disk.
pub fn read_loans(path: &Path) -> Result<Vec<Loan>, LoanError> {
    let data = fs::read_to_string(path)?;
    loans_from_json(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_loans(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LoanError::Io(_)));
    }

    #[test]
    fn reads_bare_array_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loans.json");
        fs::write(
            &path,
            r#"[{"id": 7, "name": "Boat", "interestRate": 2.0, "principal": 300, "dueDate": "2024-06-01"}]"#,
        )
        .unwrap();
        let loans = read_loans(&path).unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].name, "Boat");
        assert!(loans[0].payments.is_empty());
    }

    #[test]
    fn record_conversion_drops_holes() {
        let json = r#"{
            "id": 1,
            "name": "Car",
            "interestRate": 4.5,
            "principal": 12000,
            "dueDate": "2024-01-05",
            "loanPayments": [
                null,
                {"id": 10, "loanId": 1, "paymentDate": "2024-01-03"},
                null,
                {"id": 11, "loanId": 1, "paymentDate": null}
            ]
        }"#;
        let loan: Loan = serde_json::from_str(json).unwrap();
        assert_eq!(loan.payments.len(), 2);
        assert_eq!(loan.payments[0].id, 10);
        assert_eq!(loan.payments[1].paid_on(), None);
        assert_eq!(loan.paid_payments().count(), 1);
    }

    #[test]
    fn missing_or_null_payment_lists_become_empty() {
        let null_list: Loan = serde_json::from_str(
            r#"{"id":2,"name":"A","interestRate":1,"principal":1,"dueDate":"2024-01-01","loanPayments":null}"#,
        )
        .unwrap();
        assert!(null_list.payments.is_empty());

        let missing: Loan = serde_json::from_str(
            r#"{"id":3,"name":"B","interestRate":1,"principal":1,"dueDate":"2024-01-01"}"#,
        )
        .unwrap();
        assert!(missing.payments.is_empty());
    }

    #[test]
    fn documents_accept_envelope_and_bare_arrays() {
        let bare = r#"[{"id":1,"name":"A","interestRate":1,"principal":1,"dueDate":"2024-01-01"}]"#;
        assert_eq!(loans_from_json(bare).unwrap().len(), 1);

        let envelope = format!(r#"{{"data":{{"loans":{bare}}}}}"#);
        assert_eq!(loans_from_json(&envelope).unwrap().len(), 1);

        assert!(loans_from_json("{\"loans\": 5}").is_err());
    }
}
