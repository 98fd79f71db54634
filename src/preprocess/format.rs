use jiff::civil::Date;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::db::caiso::renewables_report::RawRow;
use crate::error::{Error, Result};

use super::{Measure, Row};

/// `01/15/20` as printed in the reports, or `01/15/2020`
static US_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$").expect("valid regex"));

/// Coerce the text cells of cleansed rows to typed values.  Fails on the first
/// cell that can't be converted, that's a sentinel nobody handled yet.
pub fn format(rows: &[RawRow]) -> Result<Vec<Row>> {
    rows.iter()
        .enumerate()
        .map(|(i, raw)| format_row(i, raw))
        .collect()
}

fn format_row(i: usize, raw: &RawRow) -> Result<Row> {
    let date = parse_date(&raw.date).ok_or_else(|| quality(i, "DATE", &raw.date))?;
    let hour = raw
        .hour
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|h| (1..=24).contains(h))
        .ok_or_else(|| quality(i, "HOUR", &raw.hour))?;

    let mut row = Row::empty(date, hour);
    for (measure, cell) in Measure::ALL.into_iter().zip([
        &raw.renewables,
        &raw.nuclear,
        &raw.thermal,
        &raw.imports,
        &raw.hydro,
    ]) {
        let value = cell
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .ok_or_else(|| quality(i, measure.name(), cell))?;
        row.set(measure, value);
    }
    Ok(row)
}

fn quality(row: usize, column: &'static str, value: &str) -> Error {
    Error::DataQuality {
        row,
        column,
        value: value.to_string(),
    }
}

/// Parse `MM/DD/YY`, `MM/DD/YYYY` or `YYYY-MM-DD`.  Two digit years are
/// taken to be in the 2000s.
pub fn parse_date(s: &str) -> Option<Date> {
    let s = s.trim();
    if let Some(caps) = US_DATE.captures(s) {
        let month: i8 = caps[1].parse().ok()?;
        let day: i8 = caps[2].parse().ok()?;
        let mut year: i16 = caps[3].parse().ok()?;
        if caps[3].len() == 2 {
            year += 2000;
        }
        return Date::new(year, month, day).ok();
    }
    s.parse::<Date>().ok()
}
