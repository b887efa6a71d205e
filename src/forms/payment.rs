use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    parse_leading_float, parse_leading_int, FieldDescriptor, FormDescriptor, FormErrors, Validator,
};

pub const LOAN_ID: &str = "loan_id";
pub const PAYMENT_DATE: &str = "payment_date";
pub const AMOUNT: &str = "amount";

/// Raw payment form values, exactly as typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentFormInput {
    pub loan_id: String,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
}

/// Validated payment ready to submit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentFormData {
    pub loan_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

fn loan_id_validator() -> Validator {
    Validator::custom(|input| {
        if input.is_empty() {
            return Err("Please select a loan".into());
        }
        match parse_leading_int(input) {
            Some(id) if id > 0 => Ok(id.to_string()),
            _ => Err("Please select a valid loan".into()),
        }
    })
}

fn amount_validator() -> Validator {
    Validator::custom(|input| match parse_leading_float(input) {
        Some(amount) if amount >= 0.0 => Ok(amount.to_string()),
        _ => Err("Amount must be a positive number".into()),
    })
}

/// Fields of the "record payment" form.
pub fn payment_form() -> FormDescriptor {
    FormDescriptor::new(
        "payment",
        vec![
            FieldDescriptor::new(LOAN_ID, "Loan", loan_id_validator()),
            FieldDescriptor::new(
                PAYMENT_DATE,
                "Payment date",
                Validator::Date {
                    message: "Please enter a valid date",
                },
            )
            .with_optional(),
            FieldDescriptor::new(AMOUNT, "Amount", amount_validator()).with_optional(),
        ],
    )
}

impl PaymentFormInput {
    pub fn new(loan_id: impl Into<String>) -> Self {
        Self {
            loan_id: loan_id.into(),
            ..Self::default()
        }
    }

    pub fn with_payment_date(mut self, date: impl Into<String>) -> Self {
        self.payment_date = Some(date.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    fn values(&self) -> BTreeMap<&'static str, String> {
        let mut values = BTreeMap::new();
        values.insert(LOAN_ID, self.loan_id.clone());
        if let Some(date) = &self.payment_date {
            values.insert(PAYMENT_DATE, date.clone());
        }
        if let Some(amount) = &self.amount {
            values.insert(AMOUNT, amount.clone());
        }
        values
    }

    /// Validates every field and converts the input into typed form data.
    pub fn validate(&self) -> Result<PaymentFormData, FormErrors> {
        let normalized = payment_form().validate(&self.values())?;
        let field = |key: &str| normalized.get(key).filter(|value| !value.is_empty());
        Ok(PaymentFormData {
            loan_id: field(LOAN_ID)
                .and_then(|id| id.parse().ok())
                .unwrap_or_default(),
            payment_date: field(PAYMENT_DATE).cloned(),
            amount: field(AMOUNT).and_then(|amount| amount.parse().ok()),
        })
    }
}
