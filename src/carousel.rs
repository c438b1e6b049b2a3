//! Event picker: which crusade to feature, and wrap-around stepping between them.

use crate::types::Event;
use chrono::NaiveDate;

/// Parse an event date like `"January 2, 2026"` or
/// `"January 5, 2026 @ 7:00 PM"`. Anything after `@` is ignored.
pub fn parse_event_date(s: &str) -> Option<NaiveDate> {
    let date = s.split('@').next().unwrap_or(s).trim();
    NaiveDate::parse_from_str(date, "%B %d, %Y").ok()
}

/// The event running on `today`, else the first one that starts later, else
/// the first in the catalog.
///
/// Events whose dates don't parse are skipped by the first two rules.
pub fn current_or_next(events: &[Event], today: NaiveDate) -> Option<&str> {
    let dated = || {
        events.iter().filter_map(|event| {
            let start = parse_event_date(&event.start_date)?;
            let end = parse_event_date(&event.end_date).unwrap_or(start);
            Some((event, start, end))
        })
    };

    if let Some((event, _, _)) = dated().find(|(_, start, end)| *start <= today && today <= *end) {
        return Some(&event.id);
    }
    if let Some((event, _, _)) = dated().find(|(_, start, _)| *start > today) {
        return Some(&event.id);
    }
    events.first().map(|e| e.id.as_str())
}

/// Position in a ring of events. `next` after the last goes back to the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    /// Start on the event with `id`, or the first one if it isn't there.
    pub fn starting_at(events: &[Event], id: &str) -> Self {
        let mut carousel = Self::new(events.len());
        carousel.select(events, id);
        carousel
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn previous(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    /// Jump to a position; ignored when out of range.
    pub fn go_to(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }

    /// Move to the event with `id`. Returns false if there is none.
    pub fn select(&mut self, events: &[Event], id: &str) -> bool {
        match events.iter().position(|e| e.id == id) {
            Some(index) => {
                self.go_to(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::event;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog() -> Vec<Event> {
        vec![
            event("jan", "January 2, 2026", "January 4, 2026"),
            event("mar", "March 6, 2026 @ 7:00 PM", "March 7, 2026"),
            event("tbd", "sometime", "later"),
        ]
    }

    #[test]
    fn parse_plain_and_timed_dates() {
        assert_eq!(parse_event_date("January 2, 2026"), Some(date(2026, 1, 2)));
        assert_eq!(
            parse_event_date("January 5, 2026 @ 7:00 PM"),
            Some(date(2026, 1, 5))
        );
        assert_eq!(parse_event_date("December 31, 2025"), Some(date(2025, 12, 31)));
        assert_eq!(parse_event_date("soon"), None);
    }

    #[test]
    fn running_event_wins() {
        let events = catalog();
        assert_eq!(current_or_next(&events, date(2026, 1, 3)), Some("jan"));
        // End day is inclusive
        assert_eq!(current_or_next(&events, date(2026, 3, 7)), Some("mar"));
    }

    #[test]
    fn next_upcoming_when_none_running() {
        let events = catalog();
        assert_eq!(current_or_next(&events, date(2025, 12, 1)), Some("jan"));
        assert_eq!(current_or_next(&events, date(2026, 2, 1)), Some("mar"));
    }

    #[test]
    fn first_event_when_all_past() {
        let events = catalog();
        assert_eq!(current_or_next(&events, date(2027, 1, 1)), Some("jan"));
        assert_eq!(current_or_next(&[], date(2027, 1, 1)), None);
    }

    #[test]
    fn carousel_wraps_both_ways() {
        let mut carousel = Carousel::new(3);
        carousel.previous();
        assert_eq!(carousel.index(), 2);
        carousel.next();
        assert_eq!(carousel.index(), 0);
        carousel.next();
        carousel.next();
        carousel.next();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn carousel_select_and_go_to() {
        let events = catalog();
        let mut carousel = Carousel::starting_at(&events, "mar");
        assert_eq!(carousel.index(), 1);
        assert!(!carousel.select(&events, "nope"));
        assert_eq!(carousel.index(), 1);
        carousel.go_to(7);
        assert_eq!(carousel.index(), 1);
        carousel.go_to(2);
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn empty_carousel_is_inert() {
        let mut carousel = Carousel::new(0);
        carousel.next();
        carousel.previous();
        assert!(carousel.is_empty());
        assert_eq!(carousel.index(), 0);
    }
}
