use std::{fmt, thread, time::Duration};

use jiff::civil::DateTime;
use log::{debug, warn};
use reqwest::{
    blocking::Client,
    header::{UPGRADE_INSECURE_REQUESTS, USER_AGENT},
    StatusCode, Url,
};
use scraper::{Html, Selector};
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serializer,
};

use crate::error::{Error, Result};

const BROWSER: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const RETRY_PAUSE: Duration = Duration::from_secs(2);

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| Error::network("<client>", e))
}

/// Get the body of a page as text.  A failed request or a non 200 status is
/// retried `retries` times, with a short pause in between, before giving up.
pub fn get_text(client: &Client, url: &str, retries: u32) -> Result<String> {
    let mut attempt = 0;
    loop {
        match try_get_text(client, url) {
            Ok(body) => return Ok(body),
            Err(e) if attempt < retries => {
                attempt += 1;
                warn!("{}, retrying ({}/{})", e, attempt, retries);
                thread::sleep(RETRY_PAUSE * attempt);
            }
            Err(e) => return Err(e),
        }
    }
}

fn try_get_text(client: &Client, url: &str) -> Result<String> {
    debug!("GET {}", url);
    let response = client
        .get(url)
        .header(USER_AGENT, BROWSER)
        .header(UPGRADE_INSECURE_REQUESTS, "1")
        .send()
        .map_err(|e| Error::network(url, e))?;
    if response.status() != StatusCode::OK {
        return Err(Error::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    response.text().map_err(|e| Error::network(url, e))
}

/// Return the links of all the anchors in the page whose `href` ends with
/// `suffix`, in the order they appear.  Relative links are resolved against
/// `base_url`.
pub fn extract_links(html: &str, base_url: &str, suffix: &str) -> Result<Vec<String>> {
    let base = Url::parse(base_url)
        .map_err(|e| Error::Config(format!("invalid base url {}: {}", base_url, e)))?;
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]")
        .map_err(|e| Error::Parse(format!("invalid selector: {:?}", e)))?;

    let mut links = Vec::new();
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.ends_with(suffix) {
            continue;
        }
        match base.join(href) {
            Ok(url) => links.push(url.to_string()),
            Err(e) => warn!("Skipping link {}: {}", href, e),
        }
    }
    Ok(links)
}

pub fn serialize_timestamp<S>(dt: &DateTime, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.strftime(TIMESTAMP_FORMAT).to_string())
}

pub fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime, D::Error>
where
    D: Deserializer<'de>,
{
    struct DateTimeVisitor;

    impl Visitor<'_> for DateTimeVisitor {
        type Value = DateTime;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a timestamp like 2020-01-31 23:00:00")
        }

        fn visit_str<E>(self, v: &str) -> std::result::Result<DateTime, E>
        where
            E: de::Error,
        {
            DateTime::strptime(TIMESTAMP_FORMAT, v).map_err(E::custom)
        }
    }

    deserializer.deserialize_str(DateTimeVisitor)
}

/// Flags are written as 0/1.
pub fn serialize_flag<S>(flag: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*flag))
}

pub fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u8::deserialize(deserializer)?;
    Ok(value != 0)
}

/// NaN is written as an empty cell.
pub fn serialize_nan_as_empty<S>(x: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if x.is_nan() {
        serializer.serialize_str("")
    } else {
        serializer.serialize_f64(*x)
    }
}

pub fn deserialize_empty_as_nan<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>().map_err(de::Error::custom)
}
