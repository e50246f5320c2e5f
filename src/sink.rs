use anyhow::Result;

use crate::models::Event;

/// Storage collaborator for scraped events. Implementors own identity and
/// upsert semantics; the scraping core never assigns identifiers.
pub trait EventSink {
    fn upsert(&mut self, event: &Event) -> Result<()>;
}

/// In-memory sink, mostly useful for tests and dry runs.
impl EventSink for Vec<Event> {
    fn upsert(&mut self, event: &Event) -> Result<()> {
        self.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn vec_sink_collects_events() {
        let event = Event {
            name: "Spokane Rust".to_string(),
            description: "Monthly meetup.".to_string(),
            date_time: DateTime::parse_from_rfc3339("2025-06-03T18:00:00-07:00")
                .expect("valid instant"),
            location: "123 Main St, Spokane, WA".to_string(),
        };

        let mut sink: Vec<Event> = Vec::new();
        sink.upsert(&event).expect("upsert");
        assert_eq!(sink, vec![event]);
    }
}
