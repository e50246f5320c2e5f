use std::time::Duration;

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use scraper::ElementRef;

use crate::error::ScrapeError;

pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn inner_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

pub fn fetch_html(url: &str) -> Result<String, ScrapeError> {
    static CLIENT: Lazy<Client> = Lazy::new(|| {
        Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent("MeetupScrape/0.1 (+https://github.com/mike/meetup-scrape)")
            .build()
            .expect("http client")
    });

    let response = CLIENT
        .get(url)
        .send()
        .map_err(|err| fetch_error(url, &err))?;
    let response = response
        .error_for_status()
        .map_err(|err| fetch_error(url, &err))?;
    response.text().map_err(|err| fetch_error(url, &err))
}

fn fetch_error(url: &str, err: &reqwest::Error) -> ScrapeError {
    ScrapeError::Fetch {
        url: url.to_string(),
        message: err.to_string(),
    }
}

/// ISO-8601 instants as Meetup emits them: RFC 3339, or minute precision
/// with no seconds field.
pub fn parse_iso_datetime(text: &str) -> Result<DateTime<FixedOffset>, ScrapeError> {
    let cleaned = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(cleaned) {
        return Ok(parsed);
    }
    for format in ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"] {
        if let Ok(parsed) = DateTime::parse_from_str(cleaned, format) {
            return Ok(parsed);
        }
    }
    Err(ScrapeError::DateParse {
        text: cleaned.to_string(),
        message: "not an ISO-8601 instant".to_string(),
    })
}

pub fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Spokane \n  Rust\tMonthly "), "Spokane Rust Monthly");
    }

    #[test]
    fn parses_rfc3339_with_seconds() {
        let parsed = parse_iso_datetime("2025-01-17T18:00:00-08:00").expect("parse");
        assert_eq!(parsed.to_rfc3339(), "2025-01-17T18:00:00-08:00");
    }

    #[test]
    fn parses_minute_precision_offsets() {
        let parsed = parse_iso_datetime("2025-01-17T18:00-08:00").expect("parse");
        assert_eq!(parsed.to_rfc3339(), "2025-01-17T18:00:00-08:00");
    }

    #[test]
    fn rejects_non_iso_text() {
        let err = parse_iso_datetime("next Friday at six").unwrap_err();
        assert!(matches!(err, ScrapeError::DateParse { .. }));
    }

    #[test]
    fn localize_skips_nonexistent_local_times() {
        // 2:30 AM on the US spring-forward day does not exist.
        let gap = NaiveDateTime::parse_from_str("2025-03-09 02:30", "%Y-%m-%d %H:%M")
            .expect("naive datetime");
        assert!(localize(gap, chrono_tz::America::Los_Angeles).is_none());
    }
}
