use once_cell::sync::Lazy;

pub static CAISO: Lazy<Iso> = Lazy::new(|| Iso {
    name: "CAISO",
    base_url: "http://content.caiso.com",
    report_index: "/green/renewrpt/files.html",
    report_suffix: ".txt",
});

/// Where an ISO publishes its daily production reports.
pub struct Iso {
    pub name: &'static str,
    pub base_url: &'static str,
    pub report_index: &'static str,
    pub report_suffix: &'static str,
}

impl Iso {
    /// Url of the page listing all the reports, rooted at `base_url`.
    /// The site root can be overridden, e.g. to point at a mirror.
    pub fn index_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.report_index)
    }
}
