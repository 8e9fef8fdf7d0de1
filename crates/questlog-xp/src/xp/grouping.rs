use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::domain::Event;

/// Buckets events by calendar day, keeping ingestion order inside each day.
///
/// Only days with at least one event get a key.
pub fn group_by_day(events: &[Event]) -> BTreeMap<NaiveDate, Vec<&Event>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&Event>> = BTreeMap::new();
    for event in events {
        by_day.entry(event.date()).or_default().push(event);
    }
    by_day
}
