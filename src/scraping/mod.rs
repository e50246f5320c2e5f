pub mod base;
pub mod meetup_event;
pub mod meetup_homepage;
mod timezones;

use tracing::warn;

use crate::error::ScrapeError;
use crate::models::Event;

pub use meetup_event::MeetupEventScraper;
pub use meetup_homepage::MeetupHomepageScraper;

/// Scrape the URL and return a typed result.
pub trait Scraper {
    type Output;

    fn scrape(&self, url: &str) -> Result<Self::Output, ScrapeError>;
}

/// Runs the full pipeline for one group home page: a listing scrape, then
/// one detail scrape per surviving URL, sequentially. Detail failures are
/// isolated per URL; the call fails only when the listing itself fails or
/// no detail page could be scraped at all. Callers that want to fan the
/// detail fetches out in parallel use the two scrapers directly.
pub fn scrape_events(homepage_url: &str) -> Result<Vec<Event>, ScrapeError> {
    let homepage_scraper = MeetupHomepageScraper::new();
    let event_scraper = MeetupEventScraper;

    let urls = homepage_scraper.scrape(homepage_url)?;

    let mut events = Vec::new();
    let mut first_failure = None;
    for url in &urls {
        match event_scraper.scrape(url) {
            Ok(event) => events.push(event),
            Err(err) => {
                warn!(%url, error = %err, "event detail scrape failed");
                first_failure.get_or_insert(err);
            }
        }
    }

    if events.is_empty() {
        if let Some(err) = first_failure {
            return Err(err);
        }
    }

    Ok(events)
}
