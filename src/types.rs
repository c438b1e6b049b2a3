//! Shared types used by the controller, the renderer and the export.
//!
//! These types are serialized both to the config file (TOML, snake_case) and
//! to the snapshot (JSON), so field names are part of the on-disk contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Smallest number of days an event may run.
pub const MIN_DAYS: u8 = 2;
/// Largest number of days an event may run.
pub const MAX_DAYS: u8 = 4;

/// One of the fixed sub-collections of an event's images.
///
/// Serialized as `"day1"` .. `"day4"`, which is also the key format of the
/// snapshot and the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaySlot {
    Day1,
    Day2,
    Day3,
    Day4,
}

impl DaySlot {
    const ALL: [DaySlot; 4] = [DaySlot::Day1, DaySlot::Day2, DaySlot::Day3, DaySlot::Day4];

    pub fn all() -> &'static [DaySlot] {
        &Self::ALL
    }

    /// The slot every event starts on.
    pub fn first() -> Self {
        DaySlot::Day1
    }

    /// Slots `day1..=day{day_count}`. Counts above [`MAX_DAYS`] are capped.
    pub fn up_to(day_count: u8) -> &'static [DaySlot] {
        let n = usize::from(day_count.min(MAX_DAYS));
        &Self::ALL[..n]
    }

    /// 1-based day number.
    pub fn number(self) -> u8 {
        match self {
            DaySlot::Day1 => 1,
            DaySlot::Day2 => 2,
            DaySlot::Day3 => 3,
            DaySlot::Day4 => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    /// Tab label, e.g. "Day 2".
    pub fn label(self) -> String {
        format!("Day {}", self.number())
    }

    /// Short caption shown under the tab label.
    pub fn description(self) -> &'static str {
        match self {
            DaySlot::Day1 => "Opening",
            DaySlot::Day2 => "Growth",
            DaySlot::Day3 => "Impact",
            DaySlot::Day4 => "Finale",
        }
    }

    /// Storage key, e.g. `"day2"`.
    pub fn key(self) -> &'static str {
        match self {
            DaySlot::Day1 => "day1",
            DaySlot::Day2 => "day2",
            DaySlot::Day3 => "day3",
            DaySlot::Day4 => "day4",
        }
    }
}

impl fmt::Display for DaySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid day '{0}': expected day1..day4 or 1..4")]
pub struct ParseDayError(String);

impl FromStr for DaySlot {
    type Err = ParseDayError;

    /// Accepts `day2`, `Day2` or a bare `2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        let digits = trimmed.strip_prefix("day").unwrap_or(&trimmed);
        digits
            .parse::<u8>()
            .ok()
            .and_then(DaySlot::from_number)
            .ok_or_else(|| ParseDayError(s.to_string()))
    }
}

/// Ordered image links per day slot.
pub type DayImages = BTreeMap<DaySlot, Vec<String>>;

/// One crusade: display metadata plus its per-day image lists.
///
/// Date fields are free-form display strings and are reproduced verbatim by
/// the renderer and the export. [`crate::carousel::parse_event_date`] reads
/// them when a real date is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub day_count: u8,
    #[serde(default)]
    pub images: DayImages,
}

impl Event {
    /// Slots visible in navigation for this event.
    pub fn days(&self) -> &'static [DaySlot] {
        DaySlot::up_to(self.day_count)
    }

    pub fn has_day(&self, day: DaySlot) -> bool {
        day.number() <= self.day_count
    }

    /// Insert empty lists for any visible slot missing from `images`.
    ///
    /// Extra slots beyond `day_count` are left alone.
    pub fn fill_day_slots(&mut self) {
        for &day in self.days() {
            self.images.entry(day).or_default();
        }
    }
}
