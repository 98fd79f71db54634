use std::{env, error::Error, path::Path};

use clap::Parser;
use log::info;
use renewrpt::{
    db::caiso::renewables_archive::CaisoRenewablesArchive, elec::iso::CAISO,
    preprocess::FillOptions,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Environment name, e.g., test, prod.  Loads .env/{env}.env
    #[arg(short, long)]
    env: Option<String>,

    /// Working directory, the files go in its data/ and images/ folders
    #[arg(long, default_value = ".")]
    wd: String,

    /// Redo every step even if its output file exists
    #[arg(long)]
    no_cache: bool,

    /// Percentage of the rows used for training
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
    train_pct: u8,

    /// Also complete the missing hours of the last date
    #[arg(long)]
    fill_last_day: bool,

    /// Retries for each failed download
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Don't make the history plot
    #[arg(long)]
    no_plot: bool,

    /// Root of the site with the reports.  Defaults to $RENEWRPT_BASE_URL,
    /// then to the CAISO site.
    #[arg(long)]
    base_url: Option<String>,
}

/// Scrape, preprocess and split the CAISO renewables data.
/// Rerun it if it fails, the finished steps are cached.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Some(env) = &args.env {
        dotenvy::from_path(Path::new(format!(".env/{}.env", env).as_str()))?;
    }

    let base_url = args
        .base_url
        .clone()
        .or_else(|| env::var("RENEWRPT_BASE_URL").ok())
        .unwrap_or_else(|| CAISO.base_url.to_string());
    let archive = CaisoRenewablesArchive {
        base_dir: args.wd.clone(),
        base_url,
        retries: args.retries,
    };

    let cache = !args.no_cache;
    let data_path = archive.wrangle(cache)?;
    info!("Scraped data is in {}", data_path);

    let options = FillOptions {
        include_last_date: args.fill_last_day,
    };
    let preprocessed_path = archive.preprocess(cache, options, !args.no_plot)?;
    info!("Preprocessed data is in {}", preprocessed_path);

    let (train_path, test_path) = archive.split(args.train_pct)?;
    info!("Training data: {}, testing data: {}", train_path, test_path);

    Ok(())
}
