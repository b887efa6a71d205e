//! Currency, number and date formatting for loan tables.
//!
//! The plain entry points ([`format_currency`], [`format_number`],
//! [`format_date`]) render en-US output. The `*_with` variants take an
//! explicit [`LocaleConfig`] for other separators and date styles.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::parse_iso_date;

/// Rendered in place of dates that are absent or unreadable.
pub const NOT_AVAILABLE: &str = "N/A";

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub date_format: DateFormatStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            date_format: DateFormatStyle::Medium,
        }
    }
}

impl LocaleConfig {
    /// Builds separators for a BCP 47 tag. Unknown languages fall back to en-US.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (decimal_separator, grouping_separator) = match language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" => (',', '.'),
            "fr" => (',', ' '),
            _ => ('.', ','),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FormatOptions {
    pub currency_display: CurrencyDisplay,
    pub negative_style: NegativeStyle,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CurrencyDisplay {
    #[default]
    Symbol,
    Code,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateFormatStyle {
    /// `2025-03-10`
    Short,
    /// `Mar 10, 2025`
    Medium,
    /// `Monday, March 10, 2025`
    Long,
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Formats an amount as en-US dollars, e.g. `$1,234.56`.
pub fn format_currency(amount: f64) -> String {
    format_currency_with(
        amount,
        &CurrencyCode::default(),
        &LocaleConfig::default(),
        &FormatOptions::default(),
    )
}

/// Formats a plain number with grouping and up to three fraction digits.
pub fn format_number(value: f64) -> String {
    format_number_with(&LocaleConfig::default(), value)
}

pub fn format_number_with(locale: &LocaleConfig, value: f64) -> String {
    format_decimal(locale, value, 0, 3)
}

/// Renders an interest rate, e.g. `5.25%`.
pub fn format_rate(rate: f64) -> String {
    format!("{}%", format_decimal(&LocaleConfig::default(), rate, 0, 2))
}

/// Formats an ISO date string as `Mar 10, 2025`; `N/A` when absent or unreadable.
pub fn format_date(date: Option<&str>) -> String {
    format_date_with(&LocaleConfig::default(), date)
}

pub fn format_date_with(locale: &LocaleConfig, date: Option<&str>) -> String {
    match date.and_then(parse_iso_date) {
        Some(parsed) => format_calendar_date(locale, parsed),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_calendar_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    let pattern = match locale.date_format {
        DateFormatStyle::Short => "%Y-%m-%d",
        DateFormatStyle::Medium => "%b %d, %Y",
        DateFormatStyle::Long => "%A, %B %d, %Y",
    };
    date.format(pattern).to_string()
}

pub fn format_currency_with(
    amount: f64,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    options: &FormatOptions,
) -> String {
    let precision = minor_units_for(code.as_str()) as usize;
    let body = format_decimal(locale, amount.abs(), precision, precision);
    let negative = amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0');
    let unsigned = match options.currency_display {
        CurrencyDisplay::Symbol => format!("{}{}", symbol_for(code.as_str()), body),
        CurrencyDisplay::Code => format!("{} {}", code.as_str(), body),
    };
    match (negative, options.negative_style) {
        (false, _) => unsigned,
        (true, NegativeStyle::Sign) => format!("-{}", unsigned),
        (true, NegativeStyle::Parentheses) => format!("({})", unsigned),
    }
}

/// Rounds `value` half away from zero to at most `max_fraction` digits,
/// keeping at least `min_fraction`, and applies the locale's separators.
///
/// Rounding works on the shortest decimal representation of the float, so
/// `10.995` rounds up even though its binary value sits just below it.
pub fn format_decimal(
    locale: &LocaleConfig,
    value: f64,
    min_fraction: usize,
    max_fraction: usize,
) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let max_fraction = max_fraction.max(min_fraction);
    let shortest = value.abs().to_string();
    let (int_raw, frac_raw) = shortest.split_once('.').unwrap_or((&shortest, ""));
    let mut int_digits: Vec<u8> = int_raw.bytes().map(|b| b - b'0').collect();
    let mut frac_digits: Vec<u8> = frac_raw.bytes().map(|b| b - b'0').collect();

    if frac_digits.len() > max_fraction {
        let round_up = frac_digits[max_fraction] >= 5;
        frac_digits.truncate(max_fraction);
        if round_up {
            carry_one(&mut int_digits, &mut frac_digits);
        }
    }
    while frac_digits.len() > min_fraction && frac_digits.last() == Some(&0) {
        frac_digits.pop();
    }
    frac_digits.resize(frac_digits.len().max(min_fraction), 0);

    let int_part: String = int_digits.iter().map(|d| char::from(b'0' + d)).collect();
    let mut body = group_digits(&int_part, locale.grouping_separator);
    if !frac_digits.is_empty() {
        body.push(locale.decimal_separator);
        body.extend(frac_digits.iter().map(|d| char::from(b'0' + d)));
    }
    let is_zero = int_digits.iter().chain(frac_digits.iter()).all(|d| *d == 0);
    if value < 0.0 && !is_zero {
        body.insert(0, '-');
    }
    body
}

fn carry_one(int_digits: &mut Vec<u8>, frac_digits: &mut [u8]) {
    for digit in frac_digits.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
    for digit in int_digits.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
    int_digits.insert(0, 1);
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().enumerate() {
        if count != 0 && (digits.len() - count) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
