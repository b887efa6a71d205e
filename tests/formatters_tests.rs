use loan_tracker::currency::{
    format_currency, format_currency_with, format_date, format_date_with, format_number,
    format_rate, CurrencyCode, CurrencyDisplay, DateFormatStyle, FormatOptions, LocaleConfig,
    NegativeStyle,
};

#[test]
fn currency_formats_whole_dollars() {
    assert_eq!(format_currency(1000.0), "$1,000.00");
    assert_eq!(format_currency(100.0), "$100.00");
    assert_eq!(format_currency(1.0), "$1.00");
}

#[test]
fn currency_keeps_two_decimals() {
    assert_eq!(format_currency(1234.56), "$1,234.56");
    assert_eq!(format_currency(99.99), "$99.99");
    assert_eq!(format_currency(0.01), "$0.01");
    assert_eq!(format_currency(0.0), "$0.00");
}

#[test]
fn currency_groups_large_amounts() {
    assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
    assert_eq!(format_currency(1_234_567.89), "$1,234,567.89");
}

#[test]
fn currency_rounds_half_away_from_zero() {
    assert_eq!(format_currency(10.999), "$11.00");
    assert_eq!(format_currency(10.995), "$11.00");
    assert_eq!(format_currency(10.994), "$10.99");
}

#[test]
fn negative_currency_styles() {
    assert_eq!(format_currency(-5.0), "-$5.00");
    let options = FormatOptions {
        currency_display: CurrencyDisplay::Code,
        negative_style: NegativeStyle::Parentheses,
    };
    let locale = LocaleConfig::from_tag("fr-FR");
    assert_eq!(
        format_currency_with(-1234.5, &CurrencyCode::new("eur"), &locale, &options),
        "(EUR 1 234,50)"
    );
}

#[test]
fn currency_uses_minor_units_of_code() {
    let locale = LocaleConfig::default();
    let options = FormatOptions::default();
    assert_eq!(
        format_currency_with(1234.5, &CurrencyCode::new("JPY"), &locale, &options),
        "¥1,235"
    );
}

#[test]
fn dates_render_medium_style() {
    assert_eq!(format_date(Some("2025-03-10")), "Mar 10, 2025");
    assert_eq!(format_date(Some("2024-12-25")), "Dec 25, 2024");
    assert_eq!(format_date(Some("2023-01-01")), "Jan 01, 2023");
}

#[test]
fn missing_or_invalid_dates_render_not_available() {
    assert_eq!(format_date(None), "N/A");
    assert_eq!(format_date(Some("")), "N/A");
    assert_eq!(format_date(Some("invalid-date")), "N/A");
    assert_eq!(format_date(Some("not-a-date")), "N/A");
}

#[test]
fn date_styles_follow_locale() {
    let mut locale = LocaleConfig::default();
    locale.date_format = DateFormatStyle::Short;
    assert_eq!(format_date_with(&locale, Some("2025-03-10T08:00:00")), "2025-03-10");
    locale.date_format = DateFormatStyle::Long;
    assert_eq!(
        format_date_with(&locale, Some("2025-03-10")),
        "Monday, March 10, 2025"
    );
}

#[test]
fn numbers_are_grouped() {
    assert_eq!(format_number(1000.0), "1,000");
    assert_eq!(format_number(1_000_000.0), "1,000,000");
    assert_eq!(format_number(123.0), "123");
}

#[test]
fn numbers_keep_meaningful_decimals() {
    assert_eq!(format_number(1234.56), "1,234.56");
    assert_eq!(format_number(99.99), "99.99");
    assert_eq!(format_number(1.23456), "1.235");
}

#[test]
fn rates_render_as_percent() {
    assert_eq!(format_rate(5.25), "5.25%");
    assert_eq!(format_rate(4.0), "4%");
}
