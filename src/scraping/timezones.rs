use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::{OffsetName, Tz, TZ_VARIANTS};

/// Abbreviation-to-zone snapshot taken at `now`, built by asking every
/// known zone for its abbreviation at that instant. Abbreviation meaning
/// shifts across daylight-saving transitions, so the map is only valid
/// near its construction instant.
///
/// Zones whose "abbreviation" is a bare offset such as `+07` are left out;
/// listing cards never label times that way.
pub(crate) fn timezones_by_abbreviation(now: DateTime<Utc>) -> HashMap<String, Tz> {
    let naive_now = now.naive_utc();
    let mut map = HashMap::new();
    for tz in TZ_VARIANTS {
        let offset = tz.offset_from_utc_datetime(&naive_now);
        let abbreviation = offset.abbreviation();
        if abbreviation.is_empty() || !abbreviation.chars().all(|ch| ch.is_ascii_alphabetic()) {
            continue;
        }
        map.insert(abbreviation.to_string(), tz);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Offset;

    #[test]
    fn winter_snapshot_resolves_pst() {
        let january = Utc
            .with_ymd_and_hms(2025, 1, 15, 0, 0, 0)
            .single()
            .expect("valid instant");
        let map = timezones_by_abbreviation(january);

        let tz = map.get("PST").copied().expect("PST present in winter");
        let offset = tz.offset_from_utc_datetime(&january.naive_utc()).fix();
        assert_eq!(offset.local_minus_utc(), -8 * 3600);
        assert!(!map.contains_key("PDT"));
    }

    #[test]
    fn summer_snapshot_resolves_pdt() {
        let july = Utc
            .with_ymd_and_hms(2025, 7, 15, 0, 0, 0)
            .single()
            .expect("valid instant");
        let map = timezones_by_abbreviation(july);

        let tz = map.get("PDT").copied().expect("PDT present in summer");
        let offset = tz.offset_from_utc_datetime(&july.naive_utc()).fix();
        assert_eq!(offset.local_minus_utc(), -7 * 3600);
    }

    #[test]
    fn bare_offset_labels_are_excluded() {
        let now = Utc
            .with_ymd_and_hms(2025, 1, 15, 0, 0, 0)
            .single()
            .expect("valid instant");
        let map = timezones_by_abbreviation(now);
        assert!(map
            .keys()
            .all(|abbr| abbr.chars().all(|ch| ch.is_ascii_alphabetic())));
    }
}
