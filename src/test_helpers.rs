//! Shared test utilities for the crusade-gallery test suite.
//!
//! Builds galleries over the stock catalog and an in-memory store, plus small
//! event and link fixtures.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let mut gallery = open_default();
//! gallery.add_images(FIRST_EVENT, DaySlot::Day1, numbered_urls(3)).unwrap();
//!
//! let stored = stored_snapshot(&gallery);
//! assert_eq!(stored[FIRST_EVENT][&DaySlot::Day1].len(), 4);
//! ```

use crate::config::default_events;
use crate::gallery::{Gallery, GalleryOptions};
use crate::store::{KeyValueStore, MemoryStore, Snapshot};
use crate::types::{DaySlot, Event};

/// Stock three-day event; opens with one image per day.
pub const FIRST_EVENT: &str = "agfi-2026";
/// Stock two-day event; opens with empty days.
pub const SECOND_EVENT: &str = "agfi-2026-kumasi";
/// Storage key used by every test gallery.
pub const TEST_KEY: &str = "test:images";

// =========================================================================
// Galleries
// =========================================================================

/// Stock catalog over an empty in-memory store.
pub fn open_default() -> Gallery<MemoryStore> {
    open_with_store(MemoryStore::new())
}

/// Stock catalog over a prepared store. Snapshots live under [`TEST_KEY`].
pub fn open_with_store(store: MemoryStore) -> Gallery<MemoryStore> {
    let options = GalleryOptions {
        page_size: 12,
        storage_key: TEST_KEY.to_string(),
    };
    Gallery::open(default_events(), store, options).unwrap()
}

/// What the gallery last wrote to its store, parsed back.
pub fn stored_snapshot(gallery: &Gallery<MemoryStore>) -> Snapshot {
    let raw = gallery
        .store()
        .get(TEST_KEY)
        .unwrap()
        .unwrap_or_else(|| panic!("nothing stored under '{TEST_KEY}'"));
    serde_json::from_str(&raw).unwrap()
}

// =========================================================================
// Fixtures
// =========================================================================

/// `img-0`, `img-1`, ... Plain strings pass through link normalization as is.
pub fn numbered_urls(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("img-{i}")).collect()
}

/// A two-day event with the given dates and no images.
pub fn event(id: &str, start_date: &str, end_date: &str) -> Event {
    Event {
        id: id.to_string(),
        name: format!("Event {id}"),
        location: "Accra, Ghana".to_string(),
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
        day_count: 2,
        images: Default::default(),
    }
}

/// An event running `day_count` days, every slot present and empty.
pub fn test_event(id: &str, day_count: u8) -> Event {
    let mut event = Event {
        day_count,
        ..event(id, "January 2, 2026", "January 4, 2026")
    };
    for &day in DaySlot::up_to(day_count) {
        event.images.insert(day, Vec::new());
    }
    event
}
