// One CAISO "Daily Renewables Watch" text report.
// http://content.caiso.com/green/renewrpt/files.html
//
// The first token of the report is the date, e.g. `01/15/20`.  Further down
// there is a fixed width table with one line per hour ending:
//
//     Hourly Breakdown of Total Production by Resource Type
//     Hour   RENEWABLES  NUCLEAR  THERMAL  IMPORTS  HYDRO
//     1      4512        2242     5432     7123     1890
//     ...
//     24     ...
//
// Cells are kept as text, the sheet behind the report leaks spreadsheet
// errors like `#REF!` into it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const MARKER: &str = "Hourly Breakdown of Total Production by Resource Type";
pub const HOURS_PER_REPORT: usize = 24;

/// Number of lines between the marker line and the first hour.
const TABLE_OFFSET: usize = 2;

pub const RAW_HEADER: [&str; 7] = [
    "DATE",
    "HOUR",
    "RENEWABLES",
    "NUCLEAR",
    "THERMAL",
    "IMPORTS",
    "HYDRO",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct RawRow {
    pub date: String,
    /// Hour ending label, "1" to "24".  The repeated hour is labeled "2R".
    pub hour: String,
    pub renewables: String,
    pub nuclear: String,
    pub thermal: String,
    pub imports: String,
    pub hydro: String,
}

/// Extract the date and the 24 hourly rows from the text of one report.
pub fn parse_report(text: &str) -> Result<Vec<RawRow>> {
    let lines: Vec<&str> = text.lines().collect();
    let date = lines
        .first()
        .and_then(|line| line.split_whitespace().next())
        .ok_or_else(|| Error::Parse("no date on the first line".into()))?;

    let marker = lines
        .iter()
        .position(|line| line.contains(MARKER))
        .ok_or_else(|| Error::Parse(format!("marker '{}' not found", MARKER)))?;
    let start = marker + TABLE_OFFSET;
    let end = start + HOURS_PER_REPORT;
    if lines.len() < end {
        return Err(Error::Parse(format!(
            "expected {} hourly lines after the marker, found {}",
            HOURS_PER_REPORT,
            lines.len().saturating_sub(start)
        )));
    }

    lines[start..end]
        .iter()
        .map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 6 {
                return Err(Error::Parse(format!("short table line '{}'", line.trim())));
            }
            Ok(RawRow {
                date: date.to_string(),
                hour: tokens[0].to_string(),
                renewables: tokens[1].to_string(),
                nuclear: tokens[2].to_string(),
                thermal: tokens[3].to_string(),
                imports: tokens[4].to_string(),
                hydro: tokens[5].to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::error::Error;

    /// A report in the published layout, with a zero in hour 5 and a sentinel
    /// in hour 7.
    pub(crate) fn sample_report(date: &str) -> String {
        let mut out = format!(
            "{}\t\t\tHourly Breakdown of Renewable Resources (MW)\n\
             Hour\t\tGEOTHERMAL\tBIOMASS\tBIOGAS\tSMALL HYDRO\tWIND TOTAL\tSOLAR PV\tSOLAR THERMAL\n\
             1\t\t921\t321\t191\t168\t2012\t0\t0\n\
             \n\
             \t\t\t{}\n\
             Hour\t\tRENEWABLES\tNUCLEAR\tTHERMAL\tIMPORTS\tHYDRO\n",
            date, MARKER
        );
        for hour in 1..=24 {
            let renewables = match hour {
                5 => "0".to_string(),
                7 => "#VALUE!".to_string(),
                _ => (4000 + hour * 10).to_string(),
            };
            out.push_str(&format!(
                "{}\t\t{}\t2242\t{}\t7123\t1890\n",
                hour,
                renewables,
                5000 + hour
            ));
        }
        out
    }

    #[test]
    fn parse_sample() -> Result<(), Box<dyn Error>> {
        let rows = parse_report(&sample_report("01/15/20"))?;
        assert_eq!(rows.len(), 24);
        assert!(rows.iter().all(|r| r.date == "01/15/20"));
        assert_eq!(
            rows[0],
            RawRow {
                date: "01/15/20".into(),
                hour: "1".into(),
                renewables: "4010".into(),
                nuclear: "2242".into(),
                thermal: "5001".into(),
                imports: "7123".into(),
                hydro: "1890".into(),
            }
        );
        assert_eq!(rows[6].renewables, "#VALUE!");
        assert_eq!(rows[23].hour, "24");
        Ok(())
    }

    #[test]
    fn parse_repeated_hour_label() -> Result<(), Box<dyn Error>> {
        let text = sample_report("11/03/19").replacen("\n3\t\t", "\n2R\t\t", 1);
        let rows = parse_report(&text)?;
        assert_eq!(rows[2].hour, "2R");
        Ok(())
    }

    #[test]
    fn missing_marker() {
        let text = sample_report("01/15/20").replace(MARKER, "Something else");
        let err = parse_report(&text).unwrap_err();
        assert!(matches!(err, crate::error::Error::Parse(_)));
    }

    #[test]
    fn truncated_table() {
        let text: String = sample_report("01/15/20")
            .lines()
            .take(20)
            .map(|l| format!("{}\n", l))
            .collect();
        let err = parse_report(&text).unwrap_err();
        assert!(err.to_string().contains("expected 24 hourly lines"));
    }

    #[test]
    fn empty_report() {
        assert!(parse_report("").is_err());
    }
}
