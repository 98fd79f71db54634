use jiff::civil::DateTime;

use crate::error::{Error, Result};

use super::{EngineeredRow, Row};

/// Add the hour beginning timestamp, the nonrenewable total and the share of
/// renewables to each row.
pub fn engineer(rows: &[Row]) -> Result<Vec<EngineeredRow>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let timestamp = hour_beginning(row).ok_or_else(|| Error::DataQuality {
                row: i,
                column: "HOUR",
                value: row.hour.to_string(),
            })?;
            let nonrenewables = row.nuclear + row.thermal + row.hydro + row.imports;
            Ok(EngineeredRow {
                date: row.date,
                hour: row.hour,
                renewables: row.renewables,
                nuclear: row.nuclear,
                thermal: row.thermal,
                imports: row.imports,
                hydro: row.hydro,
                imputed: row.imputed,
                timestamp,
                nonrenewables,
                renewables_pct: renewables_pct(row.renewables, nonrenewables),
            })
        })
        .collect()
}

/// Hour ending 1 begins at 00:00, hour ending 24 at 23:00.
pub fn hour_beginning(row: &Row) -> Option<DateTime> {
    if !(1..=24).contains(&row.hour) {
        return None;
    }
    Some(row.date.at(row.hour as i8 - 1, 0, 0, 0))
}

/// Percentage of the total production coming from renewables.  NaN if there
/// is no production at all.
pub fn renewables_pct(renewables: f64, nonrenewables: f64) -> f64 {
    if renewables == 0.0 && nonrenewables == 0.0 {
        return f64::NAN;
    }
    100.0 * renewables / (renewables + nonrenewables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use std::error::Error;

    #[test]
    fn engineer_row() -> Result<(), Box<dyn Error>> {
        let row = Row {
            date: date(2020, 1, 15),
            hour: 24,
            renewables: 250.0,
            nuclear: 200.0,
            thermal: 300.0,
            imports: 150.0,
            hydro: 100.0,
            imputed: true,
        };
        let out = engineer(&[row])?;
        assert_eq!(out[0].timestamp, date(2020, 1, 15).at(23, 0, 0, 0));
        assert_eq!(out[0].nonrenewables, 750.0);
        assert_eq!(out[0].renewables_pct, 25.0);
        assert!(out[0].imputed);
        Ok(())
    }

    #[test]
    fn first_hour_starts_at_midnight() {
        let row = Row::empty(date(2020, 1, 15), 1);
        assert_eq!(hour_beginning(&row), Some(date(2020, 1, 15).at(0, 0, 0, 0)));
        assert_eq!(hour_beginning(&Row::empty(date(2020, 1, 15), 0)), None);
    }

    #[test]
    fn no_production_is_nan() {
        assert!(renewables_pct(0.0, 0.0).is_nan());
        assert_eq!(renewables_pct(0.0, 10.0), 0.0);
        assert_eq!(renewables_pct(10.0, 0.0), 100.0);
    }

    #[test]
    fn invalid_hour_is_an_error() {
        assert!(engineer(&[Row::empty(date(2020, 1, 15), 25)]).is_err());
    }
}
