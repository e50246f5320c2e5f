use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::{base, timezones, Scraper};
use crate::error::ScrapeError;

const UPCOMING_SECTION_ID: &str = "upcoming-section";
const CARD_TIME_FORMAT: &str = "%a, %b %d, %Y, %I:%M %p";

static CARD_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^event-card-").expect("card id regex"));
static TIME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time").expect("card time selector"));

/// Scrapes the upcoming-event URLs from a Meetup group's home page.
///
/// Only cards whose start instant is strictly in the future survive; the
/// cutoff and the timezone-abbreviation snapshot are both pinned to the
/// construction instant.
pub struct MeetupHomepageScraper {
    now: DateTime<Utc>,
    timezones_by_abbreviation: HashMap<String, Tz>,
}

impl MeetupHomepageScraper {
    pub fn new() -> Self {
        Self::at_instant(Utc::now())
    }

    fn at_instant(now: DateTime<Utc>) -> Self {
        Self {
            now,
            timezones_by_abbreviation: timezones::timezones_by_abbreviation(now),
        }
    }

    pub(crate) fn parse_document(&self, html: &str) -> Result<Vec<String>, ScrapeError> {
        let document = Html::parse_document(html);

        let mut urls = Vec::new();
        let mut saw_upcoming_section = false;
        for node in document.root_element().descendants() {
            let card = match ElementRef::wrap(node) {
                Some(element) => element,
                None => continue,
            };
            let id = card.value().attr("id").unwrap_or_default();
            if !saw_upcoming_section {
                saw_upcoming_section = id == UPCOMING_SECTION_ID;
                continue;
            }
            if !CARD_ID_RE.is_match(id) {
                continue;
            }

            // A bad card (unknown abbreviation, unparseable label) is
            // skipped rather than aborting the whole listing scrape.
            match self.card_start(&card) {
                Ok(start) if start > self.now => {
                    let href = card.value().attr("href").ok_or_else(|| {
                        ScrapeError::Markup(format!("card {id} has no href"))
                    })?;
                    urls.push(href.to_string());
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(card = id, error = %err, "skipping listing card");
                }
            }
        }

        if !saw_upcoming_section {
            return Err(ScrapeError::Markup(format!(
                "no element with id {UPCOMING_SECTION_ID}"
            )));
        }

        Ok(urls)
    }

    /// Resolves a card's time label, e.g. `Wed, Aug 13, 2025, 6:00 PM PDT`,
    /// into an instant in the zone named by its trailing abbreviation.
    fn card_start(&self, card: &ElementRef<'_>) -> Result<DateTime<Tz>, ScrapeError> {
        let label = card
            .select(&TIME_SELECTOR)
            .next()
            .map(base::inner_text)
            .ok_or_else(|| ScrapeError::Markup("card has no time element".to_string()))?;

        let (time_text, abbreviation) =
            label
                .rsplit_once(' ')
                .ok_or_else(|| ScrapeError::DateParse {
                    text: label.clone(),
                    message: "no trailing timezone abbreviation".to_string(),
                })?;

        let tz = self
            .timezones_by_abbreviation
            .get(abbreviation)
            .copied()
            .ok_or_else(|| ScrapeError::Timezone(abbreviation.to_string()))?;

        let naive = NaiveDateTime::parse_from_str(time_text, CARD_TIME_FORMAT).map_err(|err| {
            ScrapeError::DateParse {
                text: time_text.to_string(),
                message: err.to_string(),
            }
        })?;

        base::localize(naive, tz).ok_or_else(|| ScrapeError::DateParse {
            text: time_text.to_string(),
            message: format!("no valid local time in {}", tz.name()),
        })
    }
}

impl Default for MeetupHomepageScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl Scraper for MeetupHomepageScraper {
    type Output = Vec<String>;

    fn scrape(&self, url: &str) -> Result<Vec<String>, ScrapeError> {
        let html = base::fetch_html(url)?;
        self.parse_document(&html)
    }
}
