use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use tracing::debug;

use super::{base, Scraper};
use crate::error::ScrapeError;
use crate::models::Event;

const DETAILS_LABEL: &str = "Details";

static NEXT_DATA_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#__NEXT_DATA__").expect("next data selector"));
static NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("heading selector"));
static DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#event-details").expect("event details selector"));
static TIME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time").expect("time selector"));
static LOCATION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[data-testid="location-info"]"#).expect("location selector"));

/// Scrapes one Event from a Meetup event detail page.
///
/// Detail pages carry the event twice: a JSON payload injected for
/// client-side hydration, and the rendered markup. The payload is
/// preferred because it survives markup churn; the DOM path takes over
/// whenever the payload is missing or its shape has drifted.
pub struct MeetupEventScraper;

impl Scraper for MeetupEventScraper {
    type Output = Event;

    fn scrape(&self, url: &str) -> Result<Event, ScrapeError> {
        let html = base::fetch_html(url)?;
        self.parse_document(&html)
    }
}

impl MeetupEventScraper {
    pub(crate) fn parse_document(&self, html: &str) -> Result<Event, ScrapeError> {
        let document = Html::parse_document(html);

        if let Some(event) = self.hydrated_event(&document)? {
            return Ok(event);
        }
        debug!("no usable hydration payload; extracting from markup");

        Ok(Event {
            name: self.parse_name(&document)?,
            description: self.parse_description(&document)?,
            date_time: self.parse_date_time(&document)?,
            location: self.parse_location(&document)?,
        })
    }

    /// Extracts the event from the hydration payload. `Ok(None)` means the
    /// payload is absent or holds no event entry; that is the signal to
    /// fall back to the markup, not an error. Once an entry is found, a
    /// missing field is a real failure and propagates.
    fn hydrated_event(&self, document: &Html) -> Result<Option<Event>, ScrapeError> {
        let state = match apollo_state(document) {
            Some(state) => state,
            None => return Ok(None),
        };
        let entry = state
            .iter()
            .find(|(key, _)| key.split(':').next() == Some("Event"))
            .and_then(|(_, value)| value.as_object());
        let event = match entry {
            Some(event) if !event.is_empty() => event,
            _ => return Ok(None),
        };

        let name = required_str(event, "title")?;
        if name.is_empty() {
            return Err(ScrapeError::Markup("event entry has an empty title".to_string()));
        }
        let description = required_str(event, "description")?;
        let date_time = base::parse_iso_datetime(required_str(event, "dateTime")?)?;

        let venue_ref = event
            .get("venue")
            .and_then(|venue| venue.get("__ref"))
            .and_then(Value::as_str)
            .ok_or_else(|| ScrapeError::Markup("event entry has no venue reference".to_string()))?;
        let venue = state
            .get(venue_ref)
            .and_then(Value::as_object)
            .ok_or_else(|| ScrapeError::Markup(format!("venue entry {venue_ref} missing")))?;
        let location = format!(
            "{}, {}, {}",
            required_str(venue, "address")?,
            required_str(venue, "city")?,
            required_str(venue, "state")?,
        );

        Ok(Some(Event {
            name: name.to_string(),
            description: description.to_string(),
            date_time,
            location,
        }))
    }

    fn parse_name(&self, document: &Html) -> Result<String, ScrapeError> {
        let heading = document
            .select(&NAME_SELECTOR)
            .next()
            .map(base::inner_text)
            .ok_or_else(|| ScrapeError::Markup("no h1 heading".to_string()))?;
        if heading.is_empty() {
            return Err(ScrapeError::Markup("empty h1 heading".to_string()));
        }
        Ok(heading)
    }

    fn parse_description(&self, document: &Html) -> Result<String, ScrapeError> {
        let text = document
            .select(&DESCRIPTION_SELECTOR)
            .next()
            .map(|element| element.text().collect::<String>())
            .ok_or_else(|| ScrapeError::Markup("no element with id event-details".to_string()))?;

        let mut description = text.trim_start();
        if let Some(rest) = description.strip_prefix(DETAILS_LABEL) {
            description = rest.trim_start();
        }
        Ok(description.to_string())
    }

    fn parse_date_time(&self, document: &Html) -> Result<DateTime<FixedOffset>, ScrapeError> {
        let attr = document
            .select(&TIME_SELECTOR)
            .next()
            .and_then(|element| element.value().attr("datetime"))
            .ok_or_else(|| {
                ScrapeError::Markup("no time element with a datetime attribute".to_string())
            })?;
        base::parse_iso_datetime(attr)
    }

    fn parse_location(&self, document: &Html) -> Result<String, ScrapeError> {
        let text = document
            .select(&LOCATION_SELECTOR)
            .next()
            .map(|element| element.text().collect::<String>())
            .ok_or_else(|| ScrapeError::Markup("no location-info element".to_string()))?;

        let joined = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        Ok(joined.replace(" · ", ", "))
    }
}

fn apollo_state(document: &Html) -> Option<Map<String, Value>> {
    let raw = document
        .select(&NEXT_DATA_SELECTOR)
        .next()?
        .text()
        .collect::<String>();
    let next_data: Value = serde_json::from_str(&raw).ok()?;
    next_data
        .get("props")?
        .get("pageProps")?
        .get("__APOLLO_STATE__")?
        .as_object()
        .cloned()
}

fn required_str<'a>(entry: &'a Map<String, Value>, field: &str) -> Result<&'a str, ScrapeError> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ScrapeError::Markup(format!("entry has no {field} field")))
}
