//! Table sort state and a stable row sort.
//!
//! Clicking a column header cycles that column through ascending, descending
//! and unsorted. Clicking another column starts it at ascending.

use std::{cmp::Ordering, fmt, str::FromStr};

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};

use crate::{errors::LoanError, loans::CategorizedPayment};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Active sort column and direction. Both unset means unsorted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortState {
    pub field: Option<String>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            direction: Some(SortDirection::Asc),
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            direction: Some(SortDirection::Desc),
        }
    }

    /// Field and direction when both are set.
    pub fn active(&self) -> Option<(&str, SortDirection)> {
        match (&self.field, self.direction) {
            (Some(field), Some(direction)) => Some((field.as_str(), direction)),
            _ => None,
        }
    }
}

/// Next sort state after the user toggles `field`.
pub fn toggle_sort(current: &SortState, field: &str) -> SortState {
    if current.field.as_deref() != Some(field) {
        return SortState::ascending(field);
    }
    match current.direction {
        None => SortState::ascending(field),
        Some(SortDirection::Asc) => SortState::descending(field),
        Some(SortDirection::Desc) => SortState::unsorted(),
    }
}

/// Value a row exposes for sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Empty,
    Text(String),
    Number(f64),
}

impl SortValue {
    fn is_empty(&self) -> bool {
        match self {
            SortValue::Empty => true,
            SortValue::Text(text) => text.is_empty(),
            SortValue::Number(_) => false,
        }
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_string())
    }
}

impl From<Option<&str>> for SortValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(SortValue::Empty, SortValue::from)
    }
}

impl From<f64> for SortValue {
    fn from(value: f64) -> Self {
        SortValue::Number(value)
    }
}

thread_local! {
    // Secondary strength tells accents apart but ignores case.
    static COLLATOR: Option<Collator> = {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        Collator::try_new(&Default::default(), options).ok()
    };
}

/// Locale-aware, case-insensitive text ordering.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    })
}

/// Orders two values for `direction`. Empty values always go last; values of
/// different kinds compare equal.
pub fn compare_values(a: &SortValue, b: &SortValue, direction: SortDirection) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    let ordering = match (a, b) {
        (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
        (SortValue::Number(a), SortValue::Number(b)) => {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        _ => Ordering::Equal,
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Returns the rows ordered by `state`, or unchanged when unsorted. The sort
/// is stable.
pub fn sort_rows<T, F>(rows: &[T], state: &SortState, accessor: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> SortValue,
{
    let Some((_, direction)) = state.active() else {
        return rows.to_vec();
    };
    let keyed: Vec<(SortValue, T)> = rows.iter().map(|row| (accessor(row), row.clone())).collect();
    merge_sort(keyed, &mut |a: &(SortValue, T), b: &(SortValue, T)| {
        compare_values(&a.0, &b.0, direction)
    })
    .into_iter()
    .map(|(_, row)| row)
    .collect()
}

// Mixed-kind rows make the comparator non-transitive, which the std sorts
// may reject, so merging is done by hand.
fn merge_sort<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare);
    let right = merge_sort(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(a), Some(b)) => compare(b, a) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged
}

/// Sortable columns of the categorized payments table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    InterestRate,
    Principal,
    DueDate,
    PaymentDate,
    Status,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Name,
        SortField::InterestRate,
        SortField::Principal,
        SortField::DueDate,
        SortField::PaymentDate,
        SortField::Status,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::InterestRate => "interestRate",
            SortField::Principal => "principal",
            SortField::DueDate => "dueDate",
            SortField::PaymentDate => "paymentDate",
            SortField::Status => "status",
        }
    }

    pub fn value(&self, row: &CategorizedPayment) -> SortValue {
        match self {
            SortField::Name => row.name.as_str().into(),
            SortField::InterestRate => row.interest_rate.into(),
            SortField::Principal => row.principal.into(),
            SortField::DueDate => row.due_date.as_str().into(),
            SortField::PaymentDate => row.payment_date.as_deref().into(),
            SortField::Status => row.status.label().into(),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortField {
    type Err = LoanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "name" => Ok(SortField::Name),
            "interestrate" | "rate" => Ok(SortField::InterestRate),
            "principal" => Ok(SortField::Principal),
            "duedate" | "due" => Ok(SortField::DueDate),
            "paymentdate" | "paid" => Ok(SortField::PaymentDate),
            "status" => Ok(SortField::Status),
            _ => Err(LoanError::UnknownSortField(value.to_string())),
        }
    }
}

/// Sorts categorized payments by the state's field.
pub fn sort_categorized(
    rows: &[CategorizedPayment],
    state: &SortState,
) -> Result<Vec<CategorizedPayment>, LoanError> {
    let Some((field, _)) = state.active() else {
        return Ok(rows.to_vec());
    };
    let field: SortField = field.parse()?;
    Ok(sort_rows(rows, state, |row| field.value(row)))
}
