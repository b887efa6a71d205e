//! Terminal presentation of loan data: message styling, tables and reports.

pub mod output;
pub mod report;
pub mod ui;
