// Spreadsheet errors leaked into the published reports.  They are replaced
// with zeros here, and the zeros are interpolated later by the fill pass.

use log::debug;

use crate::db::caiso::renewables_report::RawRow;

pub const REPEATED_HOUR: &str = "2R";
pub const BROKEN_REF: &str = "#REF!";
pub const BROKEN_NAME: &str = "#NAME?";
pub const BROKEN_VALUE: &str = "#VALUE!";

const ZERO: &str = "0";

pub fn cleanse(rows: &[RawRow]) -> Vec<RawRow> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let out = cleanse_row(row);
            if &out != row {
                debug!("  cleansed row {}: {:?}", i, out);
            }
            out
        })
        .collect()
}

/// The rules are applied in order, on the already substituted values.
pub fn cleanse_row(row: &RawRow) -> RawRow {
    let mut out = row.clone();
    if out.hour == REPEATED_HOUR {
        out.hour = "24".to_string();
    }

    if out.renewables == BROKEN_REF {
        out.renewables = ZERO.to_string();
        out.nuclear = ZERO.to_string();
    }

    if out.renewables == BROKEN_NAME {
        for cell in [
            &mut out.renewables,
            &mut out.nuclear,
            &mut out.thermal,
            &mut out.imports,
            &mut out.hydro,
        ] {
            *cell = ZERO.to_string();
        }
    }

    // nuclear is not part of this rule
    for cell in [
        &mut out.renewables,
        &mut out.thermal,
        &mut out.imports,
        &mut out.hydro,
    ] {
        if *cell == BROKEN_VALUE {
            *cell = ZERO.to_string();
        }
    }
    out
}
