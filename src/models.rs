use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One upcoming event, normalized from either extraction path.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Event {
    pub name: String,
    pub description: String,
    pub date_time: DateTime<FixedOffset>, // start instant, always offset-aware
    pub location: String, // single line, source lines joined with ", "
}
