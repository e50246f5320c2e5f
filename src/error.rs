use thiserror::Error;

/// Failure taxonomy for the scraping core.
///
/// `Markup` is fatal for the listing scraper. In the detail scraper the
/// structured-payload locator reports a miss as `Ok(None)` instead, so the
/// DOM fallback is ordinary control flow rather than error recovery.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("unexpected markup: {0}")]
    Markup(String),
    #[error("unknown timezone abbreviation {0:?}")]
    Timezone(String),
    #[error("unparseable date/time {text:?}: {message}")]
    DateParse { text: String, message: String },
}
