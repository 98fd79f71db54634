use std::{fs, path::Path};

use log::{error, info};
use reqwest::blocking::Client;

use crate::db::caiso::lib_caiso::{extract_links, get_text, http_client};
use crate::db::caiso::renewables_report::{parse_report, RawRow, RAW_HEADER};
use crate::elec::iso::CAISO;
use crate::error::Result;
use crate::preprocess::{self, split::split, EngineeredRow, FillOptions, PREPROCESSED_HEADER};
use crate::utils::plot::write_history_plot;

/// The CAISO Daily Renewables Watch reports, assembled into one hourly table
/// and preprocessed for model training.  All files live under `base_dir`:
///  - data/data.csv, the scraped table as text
///  - data/preprocessed_data.csv
///  - data/train_data.csv, data/test_data.csv
///  - images/history.html
#[derive(Clone)]
pub struct CaisoRenewablesArchive {
    pub base_dir: String,
    /// Root of the site with the reports, e.g. http://content.caiso.com
    pub base_url: String,
    /// How many times to retry a failed download
    pub retries: u32,
}

impl CaisoRenewablesArchive {
    pub fn new(base_dir: &str) -> Self {
        CaisoRenewablesArchive {
            base_dir: base_dir.to_string(),
            base_url: CAISO.base_url.to_string(),
            retries: 0,
        }
    }

    pub fn data_path(&self) -> String {
        self.base_dir.to_owned() + "/data/data.csv"
    }

    pub fn preprocessed_path(&self) -> String {
        self.base_dir.to_owned() + "/data/preprocessed_data.csv"
    }

    pub fn train_path(&self) -> String {
        self.base_dir.to_owned() + "/data/train_data.csv"
    }

    pub fn test_path(&self) -> String {
        self.base_dir.to_owned() + "/data/test_data.csv"
    }

    pub fn plot_path(&self) -> String {
        self.base_dir.to_owned() + "/images/history.html"
    }

    /// Get the index page and return the reports listed on it, one by one.
    pub fn fetch_reports(&self) -> Result<ReportFetcher> {
        let client = http_client()?;
        let index_url = CAISO.index_url(&self.base_url);
        let html = get_text(&client, &index_url, self.retries)?;
        let links = extract_links(&html, &index_url, CAISO.report_suffix)?;
        info!("Found {} {} reports on {}", links.len(), CAISO.name, index_url);
        Ok(ReportFetcher {
            client,
            links: links.into_iter(),
            retries: self.retries,
        })
    }

    /// Download and parse all the reports.
    pub fn scrape(&self) -> Result<Vec<RawRow>> {
        assemble(self.fetch_reports()?)
    }

    /// Make sure the scraped table exists, downloading it unless `cache` is on
    /// and the file is already there.  Return the path of the file.
    pub fn wrangle(&self, cache: bool) -> Result<String> {
        info!("Wrangling data in {} ...", self.base_dir);
        let path = self.data_path();
        if cache && Path::new(&path).is_file() {
            info!("Found cached data in {}", path);
            return Ok(path);
        }
        let rows = self.scrape()?;
        write_raw(&path, &rows)?;
        info!(
            "Saved {} rows x {} columns in file {}",
            rows.len(),
            RAW_HEADER.len(),
            path
        );
        Ok(path)
    }

    /// Make the preprocessed table from the scraped one, unless `cache` is on
    /// and the file already exists.  The plot is redone with the table.
    pub fn preprocess(&self, cache: bool, options: FillOptions, plot: bool) -> Result<String> {
        info!("Preprocessing data ...");
        let path = self.preprocessed_path();
        if cache && Path::new(&path).is_file() {
            info!("Found cached preprocessed data in {}", path);
            return Ok(path);
        }
        let raw = read_raw(&self.data_path())?;
        let rows = preprocess::run(&raw, options)?;
        write_table(&path, &rows)?;
        info!(
            "Saved preprocessed data: {} rows x {} columns in file {}",
            rows.len(),
            PREPROCESSED_HEADER.len(),
            path
        );
        if plot {
            write_history_plot(&rows, &self.plot_path())?;
        }
        Ok(path)
    }

    /// Split the preprocessed table into a training and a testing file.
    /// Return the paths of the two files.
    pub fn split(&self, train_pct: u8) -> Result<(String, String)> {
        info!(
            "Splitting data, training: {}%, testing {}%",
            train_pct,
            100u8.saturating_sub(train_pct)
        );
        let rows = read_table(&self.preprocessed_path())?;
        let (train, test) = split(&rows, train_pct)?;
        let (train_path, test_path) = (self.train_path(), self.test_path());
        write_table(&train_path, &train)?;
        write_table(&test_path, &test)?;
        info!(
            "Saved {} training rows in {} and {} testing rows in {}",
            train.len(),
            train_path,
            test.len(),
            test_path
        );
        Ok((train_path, test_path))
    }
}

/// Lazy sequence of (url, text) for the reports, in the order of the index
/// page.  Nothing is downloaded until the iterator is advanced.
pub struct ReportFetcher {
    client: Client,
    links: std::vec::IntoIter<String>,
    retries: u32,
}

impl Iterator for ReportFetcher {
    type Item = Result<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let url = self.links.next()?;
        info!("Wrangling {} ...", url);
        Some(get_text(&self.client, &url, self.retries).map(|text| (url, text)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.links.size_hint()
    }
}

/// Concatenate the rows of the reports, in order.  A download error stops
/// everything, a malformed report is logged and skipped.
pub fn assemble<I>(reports: I) -> Result<Vec<RawRow>>
where
    I: IntoIterator<Item = Result<(String, String)>>,
{
    let mut rows = Vec::new();
    for report in reports {
        let (url, text) = report?;
        match parse_report(&text) {
            Ok(report_rows) => rows.extend(report_rows),
            Err(e) => error!("Rejecting report {}: {}", url, e),
        }
    }
    Ok(rows)
}

fn create_parent_dir(path: &str) -> Result<()> {
    if let Some(dir) = Path::new(path).parent() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

pub fn write_raw(path: &str, rows: &[RawRow]) -> Result<()> {
    create_parent_dir(path)?;
    let mut wtr = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        wtr.write_record(RAW_HEADER)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_raw(path: &str) -> Result<Vec<RawRow>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let rows = rdr.deserialize().collect::<std::result::Result<Vec<RawRow>, _>>()?;
    Ok(rows)
}

/// Write a preprocessed table, used for the train and test files too.
pub fn write_table(path: &str, rows: &[EngineeredRow]) -> Result<()> {
    create_parent_dir(path)?;
    let mut wtr = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        wtr.write_record(PREPROCESSED_HEADER)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_table(path: &str) -> Result<Vec<EngineeredRow>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let rows = rdr
        .deserialize()
        .collect::<std::result::Result<Vec<EngineeredRow>, _>>()?;
    Ok(rows)
}
