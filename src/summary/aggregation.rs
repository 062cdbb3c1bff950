//! Reading the transactions table for reporting and grouping it by month.

use std::{collections::BTreeMap, fmt::Display};

use rusqlite::{Connection, types::ValueRef};
use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, db::TRANSACTIONS_TABLE};

const DATE_COLUMN: &str = "date";
const AMOUNT_COLUMN: &str = "amount";

const ISO_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month padding:none]-[day padding:none]");
const SLASH_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]/[month padding:none]/[day padding:none]");
const US_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month padding:none]/[day padding:none]/[year]");

/// A calendar month, e.g. January 2024.
///
/// Months order chronologically and display as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    /// The calendar year.
    pub year: i32,
    /// The month number, January is 1.
    pub month: u8,
}

impl From<Date> for YearMonth {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The `date` and `amount` of a single row in the transactions table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// `None` if the row has no date.
    pub date: Option<Date>,
    /// `None` if the row has no amount.
    pub amount: Option<f64>,
}

/// The sum of the amounts for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    pub month: YearMonth,
    pub total: f64,
}

/// Read the `date` and `amount` of every row in the transactions table.
///
/// # Errors
/// Returns [Error::MissingReportColumns] if the table does not have both a
/// `date` and an `amount` column, [Error::InvalidDate] or
/// [Error::InvalidAmount] if a value cannot be converted, and
/// [Error::SqlError] if the query fails, e.g. because nothing has been
/// uploaded yet and the table does not exist.
pub fn get_report_rows(connection: &Connection) -> Result<Vec<ReportRow>, Error> {
    let mut stmt = connection.prepare(&format!("SELECT * FROM \"{TRANSACTIONS_TABLE}\""))?;

    let column_names = stmt.column_names();
    let date_index = column_names.iter().position(|name| *name == DATE_COLUMN);
    let amount_index = column_names.iter().position(|name| *name == AMOUNT_COLUMN);

    let (date_index, amount_index) = match (date_index, amount_index) {
        (Some(date_index), Some(amount_index)) => (date_index, amount_index),
        (date_index, amount_index) => {
            let mut missing = Vec::new();

            if date_index.is_none() {
                missing.push(DATE_COLUMN);
            }

            if amount_index.is_none() {
                missing.push(AMOUNT_COLUMN);
            }

            return Err(Error::MissingReportColumns(missing));
        }
    };

    let mut rows = stmt.query([])?;
    let mut report_rows = Vec::new();

    while let Some(row) = rows.next()? {
        report_rows.push(ReportRow {
            date: date_from_value(row.get_ref(date_index)?)?,
            amount: amount_from_value(row.get_ref(amount_index)?)?,
        });
    }

    tracing::debug!("Read {} rows for the monthly summary", report_rows.len());

    Ok(report_rows)
}

fn date_from_value(value: ValueRef<'_>) -> Result<Option<Date>, Error> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            parse_date(&text).map(Some)
        }
        // Dates such as 20240105 are stored as integers.
        ValueRef::Integer(number) => date_from_integer(number)
            .map(Some)
            .ok_or_else(|| Error::InvalidDate(number.to_string())),
        ValueRef::Real(number) => Err(Error::InvalidDate(number.to_string())),
        ValueRef::Blob(_) => Err(Error::InvalidDate("<binary data>".to_owned())),
    }
}

fn date_from_integer(number: i64) -> Option<Date> {
    if !(10_000..=99_991_231).contains(&number) {
        return None;
    }

    let year = i32::try_from(number / 10_000).ok()?;
    let month = u8::try_from(number / 100 % 100).ok()?;
    let day = u8::try_from(number % 100).ok()?;

    Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()
}

fn amount_from_value(value: ValueRef<'_>) -> Result<Option<f64>, Error> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(number) => Ok(Some(number as f64)),
        ValueRef::Real(number) => Ok(Some(number)),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);

            text.trim()
                .parse::<f64>()
                .ok()
                .filter(|amount| amount.is_finite())
                .map(Some)
                .ok_or_else(|| Error::InvalidAmount(text.into_owned()))
        }
        ValueRef::Blob(_) => Err(Error::InvalidAmount("<binary data>".to_owned())),
    }
}

/// Parse a date written as `YYYY-MM-DD`, `YYYY/MM/DD` or `MM/DD/YYYY`, where
/// the zero padding of the month and day is optional.
///
/// The date may be followed by a time separated by a space or `T`, the time
/// is ignored.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not in any of these formats.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();

    let date_part = text
        .split_once([' ', 'T'])
        .map_or(text, |(date_part, _time)| date_part);

    [ISO_DATE_FORMAT, SLASH_DATE_FORMAT, US_DATE_FORMAT]
        .into_iter()
        .find_map(|format| Date::parse(date_part, format).ok())
        .ok_or_else(|| Error::InvalidDate(text.to_owned()))
}

/// Sums the amounts of `rows` by calendar month.
///
/// Rows without a date are skipped. Rows without an amount count as zero.
///
/// # Returns
/// One total per month that has at least one dated row, in chronological order.
pub fn aggregate_by_month(rows: &[ReportRow]) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<YearMonth, f64> = BTreeMap::new();

    for row in rows {
        let Some(date) = row.date else {
            continue;
        };

        *totals.entry(YearMonth::from(date)).or_insert(0.0) += row.amount.unwrap_or_default();
    }

    totals
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}



#[cfg(test)]
mod aggregate_by_month_tests {
    use time::macros::date;

    use super::{MonthlyTotal, ReportRow, YearMonth, aggregate_by_month};

    fn row(date: time::Date, amount: f64) -> ReportRow {
        ReportRow {
            date: Some(date),
            amount: Some(amount),
        }
    }

    #[test]
    fn groups_by_month_in_order() {
        let rows = [
            row(date!(2024 - 02 - 01), -3.0),
            row(date!(2024 - 01 - 05), 10.0),
            row(date!(2024 - 01 - 20), 5.0),
        ];

        let totals = aggregate_by_month(&rows);

        assert_eq!(
            totals,
            vec![
                MonthlyTotal {
                    month: YearMonth {
                        year: 2024,
                        month: 1
                    },
                    total: 15.0,
                },
                MonthlyTotal {
                    month: YearMonth {
                        year: 2024,
                        month: 2
                    },
                    total: -3.0,
                },
            ]
        );
    }

    #[test]
    fn same_month_different_years_are_separate() {
        let rows = [
            row(date!(2024 - 03 - 01), 1.0),
            row(date!(2023 - 03 - 01), 2.0),
        ];

        let labels: Vec<String> = aggregate_by_month(&rows)
            .iter()
            .map(|total| total.month.to_string())
            .collect();

        assert_eq!(labels, vec!["2023-03", "2024-03"]);
    }

    #[test]
    fn skips_rows_without_date() {
        let rows = [
            ReportRow {
                date: None,
                amount: Some(100.0),
            },
            row(date!(2024 - 01 - 05), 10.0),
        ];

        let totals = aggregate_by_month(&rows);

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total, 10.0);
    }

    #[test]
    fn missing_amount_counts_as_zero() {
        let rows = [ReportRow {
            date: Some(date!(2024 - 05 - 05)),
            amount: None,
        }];

        let totals = aggregate_by_month(&rows);

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total, 0.0);
        assert_eq!(totals[0].month.to_string(), "2024-05");
    }

    #[test]
    fn empty_input() {
        assert!(aggregate_by_month(&[]).is_empty());
    }
}
