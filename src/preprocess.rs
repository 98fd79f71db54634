//! Turn the scraped text table into a clean hourly dataset.
//!
//! Each stage takes a table and returns a new one:
//!
//! raw rows -> [cleanse] -> [format] -> [fill::fill_dates] -> [fill::fill_values]
//! -> [engineer] -> [split]

pub mod cleanse;
pub mod engineer;
pub mod fill;
pub mod format;
pub mod split;

use jiff::civil::{Date, DateTime};
use log::info;
use serde::{Deserialize, Serialize};

use crate::db::caiso::lib_caiso::{
    deserialize_empty_as_nan, deserialize_flag, deserialize_timestamp, serialize_flag,
    serialize_nan_as_empty, serialize_timestamp,
};
use crate::db::caiso::renewables_report::RawRow;
use crate::error::Result;

pub use fill::FillOptions;

/// The measurement columns, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    Renewables,
    Nuclear,
    Thermal,
    Imports,
    Hydro,
}

impl Measure {
    pub const ALL: [Measure; 5] = [
        Measure::Renewables,
        Measure::Nuclear,
        Measure::Thermal,
        Measure::Imports,
        Measure::Hydro,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Measure::Renewables => "RENEWABLES",
            Measure::Nuclear => "NUCLEAR",
            Measure::Thermal => "THERMAL",
            Measure::Imports => "IMPORTS",
            Measure::Hydro => "HYDRO",
        }
    }
}

/// One hour of production, in MW.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub date: Date,
    /// Hour ending, 1 to 24
    pub hour: u8,
    pub renewables: f64,
    pub nuclear: f64,
    pub thermal: f64,
    pub imports: f64,
    pub hydro: f64,
    /// Set when at least one measurement was interpolated.
    pub imputed: bool,
}

impl Row {
    /// A placeholder for an hour missing from the reports.
    pub fn empty(date: Date, hour: u8) -> Row {
        Row {
            date,
            hour,
            renewables: 0.0,
            nuclear: 0.0,
            thermal: 0.0,
            imports: 0.0,
            hydro: 0.0,
            imputed: false,
        }
    }

    pub fn get(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Renewables => self.renewables,
            Measure::Nuclear => self.nuclear,
            Measure::Thermal => self.thermal,
            Measure::Imports => self.imports,
            Measure::Hydro => self.hydro,
        }
    }

    pub fn set(&mut self, measure: Measure, value: f64) {
        match measure {
            Measure::Renewables => self.renewables = value,
            Measure::Nuclear => self.nuclear = value,
            Measure::Thermal => self.thermal = value,
            Measure::Imports => self.imports = value,
            Measure::Hydro => self.hydro = value,
        }
    }
}

/// Row of the preprocessed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct EngineeredRow {
    pub date: Date,
    pub hour: u8,
    pub renewables: f64,
    pub nuclear: f64,
    pub thermal: f64,
    pub imports: f64,
    pub hydro: f64,
    #[serde(serialize_with = "serialize_flag", deserialize_with = "deserialize_flag")]
    pub imputed: bool,
    /// Hour beginning
    #[serde(
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub timestamp: DateTime,
    pub nonrenewables: f64,
    /// NaN when there is no production at all
    #[serde(
        serialize_with = "serialize_nan_as_empty",
        deserialize_with = "deserialize_empty_as_nan"
    )]
    pub renewables_pct: f64,
}

pub const PREPROCESSED_HEADER: [&str; 11] = [
    "DATE",
    "HOUR",
    "RENEWABLES",
    "NUCLEAR",
    "THERMAL",
    "IMPORTS",
    "HYDRO",
    "IMPUTED",
    "TIMESTAMP",
    "NONRENEWABLES",
    "RENEWABLES_PCT",
];

/// Run all the stages from the scraped rows to the engineered table.
pub fn run(raw: &[RawRow], options: FillOptions) -> Result<Vec<EngineeredRow>> {
    info!("Cleansing {} rows ...", raw.len());
    let cleansed = cleanse::cleanse(raw);
    info!("Formatting ...");
    let formatted = format::format(&cleansed)?;
    info!("Filling missing dates ...");
    let complete = fill::fill_dates(&formatted, options);
    info!("Filling missing values ...");
    let filled = fill::fill_values(&complete);
    info!("Feature engineering ...");
    engineer::engineer(&filled)
}
