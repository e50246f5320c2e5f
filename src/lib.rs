pub mod error;
pub mod models;
pub mod scraping;
pub mod sink;

pub use error::ScrapeError;
pub use models::Event;
pub use scraping::{scrape_events, MeetupEventScraper, MeetupHomepageScraper, Scraper};
pub use sink::EventSink;
