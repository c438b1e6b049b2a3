//! CLI output formatting for every command.
//!
//! Output is **event-centric**: an event's identity is its positional index
//! and name, a day's is its label and theme, and an image's is its 1-based
//! position in the day. The position shown by `list` is the one `remove`
//! takes.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Events
//! 001 AGFI Crusade 2026 (3 photos)
//!     Accra, Ghana, January 2, 2026 to January 4, 2026
//!     Day 1 Opening: 1
//!     Day 2 Growth: 1
//!     Day 3 Impact: 1
//! ```
//!
//! ## List a day
//!
//! ```text
//! AGFI Crusade 2026 / Day 1 Opening (page 2 of 3)
//!     013 https://lh3.googleusercontent.com/d/abc
//!     014 https://onedrive.live.com/download?resid=...
//! ```
//!
//! ## Check
//!
//! ```text
//! Checked 4 links: 3 ok, 1 failed
//!     https://1drv.ms/u/s!x: OneDrive short link; paste the full share URL
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::gallery::Gallery;
use crate::generate::GenerateSummary;
use crate::preload::PreloadReport;
use crate::store::KeyValueStore;
use crate::types::{DaySlot, Event};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn photos(n: usize) -> String {
    if n == 1 {
        "1 photo".to_string()
    } else {
        format!("{n} photos")
    }
}

/// `Day 2 Growth`
fn day_title(day: DaySlot) -> String {
    format!("{} {}", day.label(), day.description())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// normalize
// ============================================================================

/// One line per input, plus an indented result line when normalization
/// changed it.
pub fn format_normalized(results: &[(String, String)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (input, output) in results {
        if input.trim() == output {
            lines.push(format!("{} (unchanged)", output));
        } else {
            lines.push(input.trim().to_string());
            lines.push(format!("{}\u{2192} {}", indent(1), output));
        }
    }
    lines
}

pub fn print_normalized(results: &[(String, String)]) {
    print_lines(format_normalized(results));
}

// ============================================================================
// list
// ============================================================================

/// Every event with its per-day counts.
pub fn format_event_listing<S: KeyValueStore>(gallery: &Gallery<S>) -> Vec<String> {
    let mut lines = vec!["Events".to_string()];
    for (i, event) in gallery.events().iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            event.name,
            photos(gallery.total_images(&event.id))
        ));
        lines.push(format!(
            "{}{}, {} to {}",
            indent(1),
            event.location,
            event.start_date,
            event.end_date
        ));
        for (day, count) in gallery.image_counts(&event.id) {
            lines.push(format!("{}{}: {}", indent(1), day_title(day), count));
        }
    }
    lines
}

pub fn print_event_listing<S: KeyValueStore>(gallery: &Gallery<S>) {
    print_lines(format_event_listing(gallery));
}

/// The selected page of the selected day.
pub fn format_day_listing<S: KeyValueStore>(gallery: &Gallery<S>) -> Vec<String> {
    let selection = gallery.selection();
    let name = gallery
        .event(&selection.event_id)
        .map_or(selection.event_id.as_str(), |e| e.name.as_str());
    let header = format!("{} / {}", name, day_title(selection.day));

    let total_pages = gallery.total_pages();
    if total_pages == 0 {
        return vec![format!("{} (no photos)", header)];
    }

    let mut lines = vec![format!(
        "{} (page {} of {})",
        header, selection.page, total_pages
    )];
    let first = (selection.page - 1) * gallery.page_size() + 1;
    for (i, url) in gallery.current_page_slice().iter().enumerate() {
        lines.push(format!("{}{} {}", indent(1), format_index(first + i), url));
    }
    lines
}

pub fn print_day_listing<S: KeyValueStore>(gallery: &Gallery<S>) {
    print_lines(format_day_listing(gallery));
}

// ============================================================================
// add / remove
// ============================================================================

pub fn format_add_result(event: &Event, day: DaySlot, added: usize, total: usize) -> Vec<String> {
    vec![format!(
        "Added {} to {} / {} ({} total)",
        photos(added),
        event.name,
        day.label(),
        total
    )]
}

pub fn print_add_result(event: &Event, day: DaySlot, added: usize, total: usize) {
    print_lines(format_add_result(event, day, added, total));
}

pub fn format_remove_result(
    event: &Event,
    day: DaySlot,
    position: usize,
    removed: &str,
    remaining: usize,
) -> Vec<String> {
    vec![
        format!(
            "Removed {} {} from {} / {} ({} left)",
            format_index(position),
            removed,
            event.name,
            day.label(),
            remaining
        ),
    ]
}

pub fn print_remove_result(
    event: &Event,
    day: DaySlot,
    position: usize,
    removed: &str,
    remaining: usize,
) {
    print_lines(format_remove_result(event, day, position, removed, remaining));
}

// ============================================================================
// check
// ============================================================================

pub fn format_check_report(report: &PreloadReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Checked {} links: {} ok, {} failed",
        report.total(),
        report.loaded,
        report.failed.len()
    )];
    for failure in &report.failed {
        lines.push(format!("{}{}", indent(1), failure));
    }
    lines
}

pub fn print_check_report(report: &PreloadReport) {
    print_lines(format_check_report(report));
}

// ============================================================================
// generate / export
// ============================================================================

pub fn format_generate_summary(summary: &GenerateSummary, output_dir: &Path) -> Vec<String> {
    vec![
        format!("Home \u{2192} {}", output_dir.join("index.html").display()),
        format!(
            "Generated {} events, {} day pages, {}",
            summary.events,
            summary.day_pages,
            photos(summary.images)
        ),
    ]
}

pub fn print_generate_summary(summary: &GenerateSummary, output_dir: &Path) {
    print_lines(format_generate_summary(summary, output_dir));
}

pub fn format_export_result(events: usize, out: &Path) -> Vec<String> {
    vec![format!("Exported {} events \u{2192} {}", events, out.display())]
}

pub fn print_export_result(events: usize, out: &Path) {
    print_lines(format_export_result(events, out));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preload::ProbeError;
    use crate::test_helpers::*;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(120), "120");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn photos_pluralizes() {
        assert_eq!(photos(0), "0 photos");
        assert_eq!(photos(1), "1 photo");
        assert_eq!(photos(12), "12 photos");
    }

    // =========================================================================
    // normalize
    // =========================================================================

    #[test]
    fn normalized_shows_changes_only_once() {
        let lines = format_normalized(&[
            (
                "https://drive.google.com/file/d/X/view".to_string(),
                "https://lh3.googleusercontent.com/d/X".to_string(),
            ),
            (
                " https://cdn.test/a.jpg ".to_string(),
                "https://cdn.test/a.jpg".to_string(),
            ),
        ]);
        assert_eq!(
            lines,
            vec![
                "https://drive.google.com/file/d/X/view",
                "    \u{2192} https://lh3.googleusercontent.com/d/X",
                "https://cdn.test/a.jpg (unchanged)",
            ]
        );
    }

    // =========================================================================
    // list
    // =========================================================================

    #[test]
    fn event_listing_shows_counts_per_day() {
        let gallery = open_default();
        let lines = format_event_listing(&gallery);
        assert_eq!(lines[0], "Events");
        assert_eq!(lines[1], "001 AGFI Crusade 2026 (3 photos)");
        assert_eq!(lines[3], "    Day 1 Opening: 1");
        assert_eq!(lines[5], "    Day 3 Impact: 1");
        assert_eq!(lines[6], "002 Kumasi Revival (0 photos)");
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn day_listing_numbers_across_pages() {
        let mut gallery = open_default();
        gallery
            .add_images(FIRST_EVENT, DaySlot::Day1, numbered_urls(13))
            .unwrap();
        gallery.go_to_page(2).unwrap();
        let lines = format_day_listing(&gallery);
        assert_eq!(lines[0], "AGFI Crusade 2026 / Day 1 Opening (page 2 of 2)");
        assert_eq!(lines[1], "    013 img-11");
        assert_eq!(lines[2], "    014 img-12");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn day_listing_for_empty_day() {
        let mut gallery = open_default();
        gallery.select_event(SECOND_EVENT).unwrap();
        assert_eq!(
            format_day_listing(&gallery),
            vec!["Kumasi Revival / Day 1 Opening (no photos)"]
        );
    }

    // =========================================================================
    // add / remove / check
    // =========================================================================

    #[test]
    fn add_and_remove_results() {
        let event = test_event("ev", 2);
        assert_eq!(
            format_add_result(&event, DaySlot::Day2, 1, 5),
            vec!["Added 1 photo to Event ev / Day 2 (5 total)"]
        );
        assert_eq!(
            format_remove_result(&event, DaySlot::Day1, 3, "img-2", 0),
            vec!["Removed 003 img-2 from Event ev / Day 1 (0 left)"]
        );
    }

    #[test]
    fn check_report_lists_failures() {
        let report = PreloadReport {
            loaded: 2,
            failed: vec![ProbeError::new("https://1drv.ms/x", "short link")],
        };
        assert_eq!(
            format_check_report(&report),
            vec![
                "Checked 3 links: 2 ok, 1 failed",
                "    https://1drv.ms/x: short link"
            ]
        );
    }

    #[test]
    fn generate_summary_line() {
        let summary = GenerateSummary {
            events: 2,
            day_pages: 5,
            images: 3,
        };
        let lines = format_generate_summary(&summary, Path::new("dist"));
        assert_eq!(lines[1], "Generated 2 events, 5 day pages, 3 photos");
    }
}
