use std::collections::HashSet;

use jiff::{civil::Date, ToSpan};
use log::{debug, info, warn};

use super::{Measure, Row};

#[derive(Debug, Clone, Copy, Default)]
pub struct FillOptions {
    /// Also complete the hours of the last date in the data.  Off by default,
    /// the last date is usually the partial day being published.
    pub include_last_date: bool,
}

/// Insert a zero row for every (date, hour) missing between the first and the
/// last date.  The range of dates excludes the last date unless
/// `options.include_last_date` is set.
///
/// The result is sorted by (date, hour).  If the input has the same hour more
/// than once, only the first one is kept.
pub fn fill_dates(rows: &[Row], options: FillOptions) -> Vec<Row> {
    let (Some(start), Some(end)) = (
        rows.iter().map(|r| r.date).min(),
        rows.iter().map(|r| r.date).max(),
    ) else {
        return Vec::new();
    };

    let existing: HashSet<(Date, u8)> = rows.iter().map(|r| (r.date, r.hour)).collect();
    let mut out = rows.to_vec();
    for day in start
        .series(1.day())
        .take_while(|&day| day < end || (options.include_last_date && day == end))
    {
        for hour in 1..=24 {
            if !existing.contains(&(day, hour)) {
                info!("Adding DATE: {}, HOUR: {}", day, hour);
                out.push(Row::empty(day, hour));
            }
        }
    }

    // stable, the first of two duplicates stays first
    out.sort_by_key(|r| (r.date, r.hour));
    out.dedup_by(|later, first| {
        let duplicate = later.date == first.date && later.hour == first.hour;
        if duplicate {
            warn!("Dropping duplicate DATE: {}, HOUR: {}", later.date, later.hour);
        }
        duplicate
    });
    out
}

/// Interpolate the zero values of every measurement column, see [impute].
/// A row is flagged as imputed if any of its columns was.
pub fn fill_values(rows: &[Row]) -> Vec<Row> {
    let mut out = rows.to_vec();
    for measure in Measure::ALL {
        debug!("Column {} ...", measure.name());
        let values: Vec<f64> = out.iter().map(|r| r.get(measure)).collect();
        let (filled, flags) = impute(&values);
        for (i, row) in out.iter_mut().enumerate() {
            if flags[i] {
                debug!("   Imputing column {} row {} as {} ...", measure.name(), i, filled[i]);
                row.set(measure, filled[i]);
                row.imputed = true;
            }
        }
    }
    out
}

/// Replace each run of zeros with the average of the last nonzero value before
/// the run and the first nonzero value after it.  A missing neighbor counts as
/// zero, so a leading run gets half of the next value and a trailing run half
/// of the last one.
///
/// Every zero is a gap, there is no way to tell a real zero from a missing
/// value in the reports.
///
/// Returns the filled values and which of them were imputed.
pub fn impute(values: &[f64]) -> (Vec<f64>, Vec<bool>) {
    let n = values.len();
    let mut filled = values.to_vec();
    let mut flags = vec![false; n];
    let mut last_value = 0.0;
    let mut i = 0;
    while i < n {
        if values[i] == 0.0 {
            let j = (i..n).find(|&k| values[k] != 0.0).unwrap_or(n);
            let next_value = if j < n { values[j] } else { 0.0 };
            let avg = (last_value + next_value) / 2.0;
            for k in i..j {
                filled[k] = avg;
                flags[k] = true;
            }
            i = j;
        } else {
            last_value = values[i];
            i += 1;
        }
    }
    (filled, flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn day(date: Date, hours: impl IntoIterator<Item = u8>) -> Vec<Row> {
        hours
            .into_iter()
            .map(|h| {
                let mut row = Row::empty(date, h);
                row.renewables = 100.0 + h as f64;
                row
            })
            .collect()
    }

    #[test]
    fn impute_between() {
        let (v, f) = impute(&[10.0, 0.0, 0.0, 30.0]);
        assert_eq!(v, vec![10.0, 20.0, 20.0, 30.0]);
        assert_eq!(f, vec![false, true, true, false]);
    }

    #[test]
    fn impute_leading_run() {
        let (v, f) = impute(&[0.0, 0.0, 20.0]);
        assert_eq!(v, vec![10.0, 10.0, 20.0]);
        assert_eq!(f, vec![true, true, false]);
    }

    #[test]
    fn impute_trailing_run() {
        let (v, f) = impute(&[8.0, 4.0, 0.0]);
        assert_eq!(v, vec![8.0, 4.0, 2.0]);
        assert_eq!(f, vec![false, false, true]);
    }

    #[test]
    fn impute_all_zeros() {
        let (v, f) = impute(&[0.0; 4]);
        assert_eq!(v, vec![0.0; 4]);
        assert_eq!(f, vec![true; 4]);
    }

    #[test]
    fn impute_uses_last_observed_value() {
        // the filled 15s don't become the left neighbor of the next run
        let (v, _) = impute(&[10.0, 0.0, 20.0, 0.0, 0.0, 40.0, 0.0]);
        assert_eq!(v, vec![10.0, 15.0, 20.0, 30.0, 30.0, 40.0, 20.0]);
    }

    #[test]
    fn impute_no_zero_left_unless_flanked_by_zeros() {
        let values = [0.0, 3.0, 0.0, 0.0, 7.5, 1.0, 0.0, 2.0, 0.0];
        let (v, f) = impute(&values);
        assert!(v.iter().all(|x| *x != 0.0));
        assert_eq!(f.iter().filter(|x| **x).count(), 5);
        assert!(impute(&[]).0.is_empty());
    }

    #[test]
    fn fill_dates_complete() {
        let mut rows = day(date(2020, 1, 1), (1..=24).filter(|h| *h != 3));
        rows.extend(day(date(2020, 1, 3), [1, 2]));
        let out = fill_dates(&rows, FillOptions::default());

        // Jan 1 and Jan 2 have all the hours, Jan 3 is left alone
        assert_eq!(out.len(), 48 + 2);
        for (i, row) in out.iter().take(48).enumerate() {
            let expected_date = if i < 24 { date(2020, 1, 1) } else { date(2020, 1, 2) };
            assert_eq!(row.date, expected_date);
            assert_eq!(row.hour as usize, i % 24 + 1);
        }
        assert_eq!(out[2], Row::empty(date(2020, 1, 1), 3));
        assert!(!out[2].imputed);
        assert_eq!(out[3].renewables, 104.0);
        assert_eq!(out[49].date, date(2020, 1, 3));
    }

    #[test]
    fn fill_dates_include_last_date() {
        let rows = day(date(2020, 1, 1), [5]);
        let out = fill_dates(
            &rows,
            FillOptions {
                include_last_date: true,
            },
        );
        assert_eq!(out.len(), 24);
        assert_eq!(out[4].renewables, 105.0);

        let out = fill_dates(&rows, FillOptions::default());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn fill_dates_sorts_and_drops_duplicates() {
        let mut rows = day(date(2020, 1, 2), [1]);
        rows.extend(day(date(2020, 1, 1), (1..=24).rev()));
        let mut dup = Row::empty(date(2020, 1, 1), 7);
        dup.renewables = -1.0;
        rows.push(dup);

        let out = fill_dates(&rows, FillOptions::default());
        assert_eq!(out.len(), 25);
        assert_eq!(out[0].hour, 1);
        assert_eq!(out[6].renewables, 107.0);
        assert_eq!(out[24].date, date(2020, 1, 2));
    }

    #[test]
    fn fill_dates_empty() {
        assert!(fill_dates(&[], FillOptions::default()).is_empty());
    }

    #[test]
    fn fill_values_flags_rows() {
        let mut rows = day(date(2020, 1, 1), 1..=3);
        rows[1].renewables = 0.0;
        rows[2].hydro = 6.0;
        let out = fill_values(&rows);
        assert_eq!(out[1].renewables, (101.0 + 103.0) / 2.0);
        // hydro is zero in the first two rows
        assert_eq!(out[0].hydro, 3.0);
        assert_eq!(out[1].hydro, 3.0);
        assert_eq!(out[2].hydro, 6.0);
        assert!(out[0].imputed);
        assert!(out[1].imputed);
        assert!(out[2].imputed); // nuclear, thermal, imports are zero everywhere
        assert_eq!(out[2].nuclear, 0.0);
    }
}
