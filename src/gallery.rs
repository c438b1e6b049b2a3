//! Gallery state: per-event, per-day image lists plus the viewer's cursor.
//!
//! [`Gallery`] is the single owner of everything that changes at runtime:
//!
//! - the image map (event → day → ordered links), mirrored to a
//!   [`KeyValueStore`] as one whole snapshot after every admin edit;
//! - the [`Selection`]: which event and day are shown, which page of the day
//!   grid, and which image (if any) is open full-size.
//!
//! Admin edits (`add_images`, `remove_image`) take an explicit event and day
//! and don't move the cursor, except to keep it in range. Viewer operations
//! (`select_*`, `*_preview`, `go_to_page`) only move the cursor.
//!
//! Out-of-range requests are rejected with an error and leave state untouched;
//! the preview arrows are the exception and silently stop at either end.

use crate::carousel;
use crate::link;
use crate::store::{self, KeyValueStore, Snapshot, StoreError, StoredSnapshot};
use crate::types::{DaySlot, Event};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Thumbnails per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("no events configured")]
    EmptyCatalog,
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
    #[error("event '{event}' has no {day} (it runs {day_count} days)")]
    DayNotInEvent {
        event: String,
        day: DaySlot,
        day_count: u8,
    },
    #[error("no image links to add")]
    NoLinks,
    #[error("index {index} is out of range for {day} ({len} images)")]
    IndexOutOfRange {
        day: DaySlot,
        index: usize,
        len: usize,
    },
    #[error("page {page} is out of range (1-{total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },
    #[error("preview {index} is out of range ({len} images)")]
    PreviewOutOfRange { index: usize, len: usize },
    #[error("snapshot not saved: {0}")]
    Store(#[from] StoreError),
}

/// Where the viewer is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub event_id: String,
    pub day: DaySlot,
    /// 1-based.
    pub page: usize,
    /// Position in the current day's list.
    pub preview: Option<usize>,
}

impl Selection {
    fn start(event_id: &str) -> Self {
        Self {
            event_id: event_id.to_string(),
            day: DaySlot::first(),
            page: 1,
            preview: None,
        }
    }
}

/// Knobs for [`Gallery::open`].
#[derive(Debug, Clone)]
pub struct GalleryOptions {
    pub page_size: usize,
    /// Key the snapshot lives under.
    pub storage_key: String,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            storage_key: "crusade-gallery:images".to_string(),
        }
    }
}

/// Called with the new day after [`Gallery::select_day`], so a view can
/// scroll the grid into place.
pub type DaySelectedHook = Box<dyn FnMut(DaySlot)>;

pub struct Gallery<S: KeyValueStore> {
    /// Catalog order; image lists live in `images`, not here.
    events: Vec<Event>,
    images: Snapshot,
    selection: Selection,
    page_size: usize,
    storage_key: String,
    store: S,
    on_day_selected: Option<DaySelectedHook>,
}

impl<S: KeyValueStore> Gallery<S> {
    /// Build the gallery from a catalog and whatever snapshot `store` holds.
    ///
    /// Without a usable snapshot the catalog's own lists are the dataset.
    /// With one, each event named in the snapshot takes the snapshot's lists;
    /// entries for events not in the catalog are kept so the next write
    /// doesn't drop them.
    pub fn open(
        events: Vec<Event>,
        store: S,
        options: GalleryOptions,
    ) -> Result<Self, GalleryError> {
        let Some(first) = events.first() else {
            return Err(GalleryError::EmptyCatalog);
        };
        let selection = Selection::start(&first.id);

        let mut images: Snapshot = events
            .iter()
            .map(|event| (event.id.clone(), event.images.clone()))
            .collect();

        match store::load_snapshot(&store, &options.storage_key) {
            Some(StoredSnapshot::Events(stored)) => {
                tracing::debug!(events = stored.len(), "applying stored snapshot");
                images.extend(stored);
            }
            // `{}` parses as either shape; it carries nothing to apply
            Some(StoredSnapshot::Legacy(days)) if !days.is_empty() => {
                tracing::debug!(event = %first.id, "applying single-event snapshot");
                images.insert(first.id.clone(), days);
            }
            Some(StoredSnapshot::Legacy(_)) | None => {}
        }

        let mut events = events;
        for event in &mut events {
            event.images = images.remove(&event.id).unwrap_or_default();
            event.fill_day_slots();
            images.insert(event.id.clone(), std::mem::take(&mut event.images));
        }

        Ok(Self {
            events,
            images,
            selection,
            page_size: options.page_size.max(1),
            storage_key: options.storage_key,
            store,
            on_day_selected: None,
        })
    }

    /// Register the scroll-into-view collaborator.
    pub fn on_day_selected(&mut self, hook: impl FnMut(DaySlot) + 'static) {
        self.on_day_selected = Some(Box::new(hook));
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Events in catalog order. Their `images` maps are empty; use
    /// [`Gallery::day_images`] or [`Gallery::events_with_images`].
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == event_id)
    }

    /// Catalog events with their current image lists filled in.
    pub fn events_with_images(&self) -> Vec<Event> {
        self.events
            .iter()
            .map(|event| Event {
                images: self.images.get(&event.id).cloned().unwrap_or_default(),
                ..event.clone()
            })
            .collect()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The full image map as it is persisted.
    pub fn snapshot(&self) -> &Snapshot {
        &self.images
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Links for one day. Empty for unknown events or days.
    pub fn day_images(&self, event_id: &str, day: DaySlot) -> &[String] {
        self.images
            .get(event_id)
            .and_then(|days| days.get(&day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Links for the selected event and day.
    pub fn current_images(&self) -> &[String] {
        self.day_images(&self.selection.event_id, self.selection.day)
    }

    /// Image count per visible day of an event.
    pub fn image_counts(&self, event_id: &str) -> BTreeMap<DaySlot, usize> {
        let Some(event) = self.event(event_id) else {
            return BTreeMap::new();
        };
        event
            .days()
            .iter()
            .map(|&day| (day, self.day_images(event_id, day).len()))
            .collect()
    }

    /// Links of an event's visible days, in day order. Slots past
    /// `day_count` are left out.
    pub fn visible_images(&self, event_id: &str) -> Vec<String> {
        let Some(event) = self.event(event_id) else {
            return Vec::new();
        };
        event
            .days()
            .iter()
            .flat_map(|&day| self.day_images(event_id, day).iter().cloned())
            .collect()
    }

    /// Total images across an event's visible days.
    pub fn total_images(&self, event_id: &str) -> usize {
        self.image_counts(event_id).values().sum()
    }

    /// First image of the first visible day that has one.
    pub fn cover_image(&self, event_id: &str) -> Option<&str> {
        let event = self.event(event_id)?;
        event
            .days()
            .iter()
            .find_map(|&day| self.day_images(event_id, day).first())
            .map(String::as_str)
    }

    /// Pages needed for `len` images. Zero for an empty day.
    pub fn pages_for(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Pages in the selected day.
    pub fn total_pages(&self) -> usize {
        self.pages_for(self.current_images().len())
    }

    /// One page of a day's links. Out-of-range pages are empty.
    pub fn page_slice(&self, event_id: &str, day: DaySlot, page: usize) -> &[String] {
        let images = self.day_images(event_id, day);
        if page == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(self.page_size).min(images.len());
        let end = start.saturating_add(self.page_size).min(images.len());
        &images[start..end]
    }

    /// The page of the selected day the viewer is on.
    pub fn current_page_slice(&self) -> &[String] {
        self.page_slice(
            &self.selection.event_id,
            self.selection.day,
            self.selection.page,
        )
    }

    /// Link of the open preview.
    pub fn preview_url(&self) -> Option<&str> {
        let index = self.selection.preview?;
        self.current_images().get(index).map(String::as_str)
    }

    // =========================================================================
    // Admin edits
    // =========================================================================

    /// Normalize and append links to one day.
    ///
    /// Blank entries are dropped and duplicates within this call collapse to
    /// their first occurrence. Links already on the day are not compared.
    /// Returns how many links were appended; an empty result is rejected with
    /// [`GalleryError::NoLinks`] and nothing is written.
    pub fn add_images<I, U>(
        &mut self,
        event_id: &str,
        day: DaySlot,
        urls: I,
    ) -> Result<usize, GalleryError>
    where
        I: IntoIterator<Item = U>,
        U: AsRef<str>,
    {
        self.check_day(event_id, day)?;

        let mut seen = HashSet::new();
        let fresh: Vec<String> = urls
            .into_iter()
            .filter_map(|url| {
                let url = url.as_ref().trim();
                (!url.is_empty()).then(|| link::normalize(url))
            })
            .filter(|url| seen.insert(url.clone()))
            .collect();
        if fresh.is_empty() {
            return Err(GalleryError::NoLinks);
        }

        let added = fresh.len();
        self.images
            .entry(event_id.to_string())
            .or_default()
            .entry(day)
            .or_default()
            .extend(fresh);
        tracing::info!(event = event_id, %day, added, "images added");

        self.persist()?;
        Ok(added)
    }

    /// Remove the link at `index`, shifting later links down. Returns it.
    pub fn remove_image(
        &mut self,
        event_id: &str,
        day: DaySlot,
        index: usize,
    ) -> Result<String, GalleryError> {
        self.check_day(event_id, day)?;
        let len = self.day_images(event_id, day).len();
        if index >= len {
            return Err(GalleryError::IndexOutOfRange { day, index, len });
        }

        let list = self
            .images
            .get_mut(event_id)
            .and_then(|days| days.get_mut(&day))
            .ok_or_else(|| GalleryError::UnknownEvent(event_id.to_string()))?;
        let removed = list.remove(index);
        tracing::info!(event = event_id, %day, index, "image removed");

        if self.selection.event_id == event_id && self.selection.day == day {
            // Keep the preview on the same image when an earlier one goes
            if let Some(preview) = self.selection.preview
                && index < preview
            {
                self.selection.preview = Some(preview - 1);
            }
            self.clamp_cursor();
        }
        self.persist()?;
        Ok(removed)
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    /// Show another event, starting on its first day.
    pub fn select_event(&mut self, event_id: &str) -> Result<(), GalleryError> {
        if self.event(event_id).is_none() {
            return Err(GalleryError::UnknownEvent(event_id.to_string()));
        }
        self.selection = Selection::start(event_id);
        Ok(())
    }

    /// Select the event running on `today`, else the next upcoming one, else
    /// the first. Returns the chosen id.
    pub fn select_current_event(&mut self, today: NaiveDate) -> Result<String, GalleryError> {
        let id = carousel::current_or_next(&self.events, today)
            .ok_or(GalleryError::EmptyCatalog)?
            .to_string();
        if id != self.selection.event_id {
            self.select_event(&id)?;
        }
        Ok(id)
    }

    /// Switch day within the current event: back to page 1, preview closed.
    pub fn select_day(&mut self, day: DaySlot) -> Result<(), GalleryError> {
        let event_id = self.selection.event_id.clone();
        self.check_day(&event_id, day)?;
        self.selection.day = day;
        self.selection.page = 1;
        self.selection.preview = None;
        if let Some(hook) = self.on_day_selected.as_mut() {
            hook(day);
        }
        Ok(())
    }

    /// Jump to a page. Pages outside `1..=total_pages` are rejected.
    pub fn go_to_page(&mut self, page: usize) -> Result<(), GalleryError> {
        let total_pages = self.total_pages();
        if page == 0 || page > total_pages {
            return Err(GalleryError::PageOutOfRange { page, total_pages });
        }
        self.selection.page = page;
        Ok(())
    }

    /// Open the full-size view of the image at `index` in the current day.
    pub fn open_preview(&mut self, index: usize) -> Result<(), GalleryError> {
        let len = self.current_images().len();
        if index >= len {
            return Err(GalleryError::PreviewOutOfRange { index, len });
        }
        self.selection.preview = Some(index);
        Ok(())
    }

    pub fn close_preview(&mut self) {
        self.selection.preview = None;
    }

    /// Step to the next image. Stays put on the last one.
    pub fn next_preview(&mut self) {
        let len = self.current_images().len();
        if let Some(index) = self.selection.preview
            && index + 1 < len
        {
            self.selection.preview = Some(index + 1);
        }
    }

    /// Step to the previous image. Stays put on the first one.
    pub fn previous_preview(&mut self) {
        if let Some(index) = self.selection.preview
            && index > 0
        {
            self.selection.preview = Some(index - 1);
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_day(&self, event_id: &str, day: DaySlot) -> Result<(), GalleryError> {
        let event = self
            .event(event_id)
            .ok_or_else(|| GalleryError::UnknownEvent(event_id.to_string()))?;
        if !event.has_day(day) {
            return Err(GalleryError::DayNotInEvent {
                event: event_id.to_string(),
                day,
                day_count: event.day_count,
            });
        }
        Ok(())
    }

    /// Pull page and preview back inside the current day after it shrank.
    fn clamp_cursor(&mut self) {
        let len = self.current_images().len();
        let last_page = self.pages_for(len).max(1);
        if self.selection.page > last_page {
            self.selection.page = last_page;
        }
        if self.selection.preview.is_some_and(|i| i >= len) {
            self.selection.preview = None;
        }
    }

    fn persist(&mut self) -> Result<(), GalleryError> {
        store::save_snapshot(&mut self.store, &self.storage_key, &self.images)?;
        Ok(())
    }
}
