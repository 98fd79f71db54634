use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    /// Fetching a page or a report failed.  Aborts the scrape.
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than 200 OK.
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// A report is missing the hourly table or the table is truncated.
    #[error("malformed report: {0}")]
    Parse(String),

    /// A cell survived cleansing but can't be coerced to its column type.
    #[error("row {row}, column {column}: can't convert '{value}'")]
    DataQuality {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub fn network(url: &str, source: reqwest::Error) -> Self {
        Error::Network {
            url: url.to_string(),
            source,
        }
    }
}
