use log::warn;

use crate::error::{Error, Result};

pub const HOURS_PER_DAY: usize = 24;

/// Index of the first row after the training set: `train_pct` percent of the
/// rows, rounded down to a whole number of days.
pub fn split_index(len: usize, train_pct: u8) -> usize {
    let index = len * train_pct as usize / 100;
    index - index % HOURS_PER_DAY
}

/// Split the rows into a training and a testing set.  The row at the split
/// index goes to neither set.
pub fn split<T: Clone>(rows: &[T], train_pct: u8) -> Result<(Vec<T>, Vec<T>)> {
    if train_pct > 100 {
        return Err(Error::Config(format!(
            "training percentage must be between 0 and 100, got {}",
            train_pct
        )));
    }
    if rows.len() % HOURS_PER_DAY != 0 {
        warn!(
            "{} rows is not a whole number of days, the split may cut a day",
            rows.len()
        );
    }
    let index = split_index(rows.len(), train_pct);
    let train = rows[..index].to_vec();
    let test = rows[(index + 1).min(rows.len())..].to_vec();
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn split_on_a_day_boundary() -> Result<(), Box<dyn Error>> {
        let rows: Vec<usize> = (0..240).collect();
        // 240 * 75% = 180 -> 7 days
        assert_eq!(split_index(240, 75), 168);
        let (train, test) = split(&rows, 75)?;
        assert_eq!(train, (0..168).collect::<Vec<_>>());
        assert_eq!(test, (169..240).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn split_rounds_down_to_whole_days() {
        // 240 * 80% = 192 -> 8 days
        assert_eq!(split_index(240, 80), 192);
        // 240 * 70% = 168 = 7 days
        assert_eq!(split_index(240, 70), 168);
        // 240 * 85% = 204 -> 192
        assert_eq!(split_index(240, 85), 192);
        assert_eq!(split_index(23, 99), 0);
    }

    #[test]
    fn split_extremes() -> Result<(), Box<dyn Error>> {
        let rows: Vec<usize> = (0..48).collect();
        let (train, test) = split(&rows, 0)?;
        assert!(train.is_empty());
        assert_eq!(test.len(), 47);

        let (train, test) = split(&rows, 100)?;
        assert_eq!(train.len(), 48);
        assert!(test.is_empty());

        let (train, test) = split::<usize>(&[], 50)?;
        assert!(train.is_empty() && test.is_empty());
        Ok(())
    }

    #[test]
    fn split_bad_percentage() {
        let rows: Vec<usize> = (0..48).collect();
        assert!(split(&rows, 101).is_err());
    }
}
