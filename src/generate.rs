//! HTML site generation.
//!
//! Renders the current gallery state as a static site. Nothing is fetched or
//! copied: every `<img>` points at the hosted link, rewritten by
//! [`link::display_url`] so share links load and Google-hosted images come
//! back resized.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                   # One card per event
//! ├── agfi-2026/
//! │   ├── day1/
//! │   │   ├── index.html           # Page 1 of the day grid
//! │   │   ├── page-2.html          # Further pages
//! │   │   └── ...
//! │   ├── day2/
//! │   └── day3/
//! └── agfi-2026-kumasi/
//!     └── ...
//! ```
//!
//! Only the days an event runs get a directory, even if the snapshot holds
//! extra slots. Links between pages are relative, so `dist/` can be served
//! from any path.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolation is escaped, which matters here: URLs and event fields
//! come straight from admin input.

use crate::carousel::Carousel;
use crate::config::SiteConfig;
use crate::gallery::Gallery;
use crate::link::{self, OptimizeOptions};
use crate::store::KeyValueStore;
use crate::types::{DaySlot, Event};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS: &str = include_str!("../static/style.css");

/// What a generate run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub events: usize,
    /// Grid pages written across all days.
    pub day_pages: usize,
    /// Images placed across all grids.
    pub images: usize,
}

/// File name of a grid page. Page 1 is the day's `index.html`.
pub fn page_filename(page: usize) -> String {
    if page <= 1 {
        "index.html".to_string()
    } else {
        format!("page-{page}.html")
    }
}

/// Everything a day page needs besides the images themselves.
struct DayPageContext<'a> {
    event: &'a Event,
    day: DaySlot,
    page: usize,
    total_pages: usize,
    counts: &'a BTreeMap<DaySlot, usize>,
    prev_event: Option<&'a Event>,
    next_event: Option<&'a Event>,
}

pub fn generate<S: KeyValueStore>(
    gallery: &Gallery<S>,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<GenerateSummary, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let events = gallery.events();
    let display = config.display.options();
    let mut summary = GenerateSummary::default();

    let index_html = render_index(gallery, config);
    fs::write(output_dir.join("index.html"), index_html.into_string())?;

    for (position, event) in events.iter().enumerate() {
        let counts = gallery.image_counts(&event.id);
        let (prev_event, next_event) = neighbours(events, position);

        for &day in event.days() {
            let day_dir = output_dir.join(&event.id).join(day.key());
            fs::create_dir_all(&day_dir)?;

            let total_pages = gallery.pages_for(counts[&day]);
            // An empty day still gets its index page
            for page in 1..=total_pages.max(1) {
                let images = gallery.page_slice(&event.id, day, page);
                let ctx = DayPageContext {
                    event,
                    day,
                    page,
                    total_pages,
                    counts: &counts,
                    prev_event,
                    next_event,
                };
                let first_number = (page - 1) * gallery.page_size() + 1;
                let html = render_day_page(&ctx, images, first_number, display, &config.social);
                fs::write(day_dir.join(page_filename(page)), html.into_string())?;
                summary.day_pages += 1;
                summary.images += images.len();
            }
        }
        summary.events += 1;
        tracing::debug!(event = %event.id, "event pages written");
    }

    tracing::info!(
        output = %output_dir.display(),
        events = summary.events,
        pages = summary.day_pages,
        "site generated"
    );
    Ok(summary)
}

/// Previous and next events around `position`, wrapping like the carousel.
/// Both are `None` when there is only one event.
fn neighbours(events: &[Event], position: usize) -> (Option<&Event>, Option<&Event>) {
    if events.len() < 2 {
        return (None, None);
    }
    let mut carousel = Carousel::starting_at(events, &events[position].id);
    carousel.previous();
    let prev = &events[carousel.index()];
    carousel.next();
    carousel.next();
    let next = &events[carousel.index()];
    (Some(prev), Some(next))
}

fn day_href(event: &Event, day: DaySlot, from_root: bool) -> String {
    if from_root {
        format!("{}/{}/index.html", event.id, day.key())
    } else {
        format!("../../{}/{}/index.html", event.id, day.key())
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with breadcrumb and event navigation
fn site_header(breadcrumb: Markup, nav: Markup) -> Markup {
    html! {
        header.site-header {
            nav.breadcrumb {
                (breadcrumb)
            }
            nav.event-nav {
                (nav)
            }
        }
    }
}

/// Renders the footer social links, if any are configured
fn social_footer(social: &BTreeMap<String, String>) -> Markup {
    html! {
        @if !social.is_empty() {
            footer.social-links {
                @for (label, url) in social {
                    a href=(url) target="_blank" rel="noreferrer noopener" aria-label=(label) {
                        (label)
                    }
                }
            }
        }
    }
}

/// Renders the day tabs for an event, with image counts
fn day_tabs(event: &Event, current: DaySlot, counts: &BTreeMap<DaySlot, usize>) -> Markup {
    html! {
        nav.day-tabs {
            @for &day in event.days() {
                @let count = counts.get(&day).copied().unwrap_or(0);
                a.day-tab.current[day == current] href={ "../" (day.key()) "/index.html" } {
                    span.label { (day.label()) }
                    @if count > 0 {
                        span.count { (count) }
                    }
                    span.description { (day.description()) }
                }
            }
        }
    }
}

/// Renders numbered page links; nothing for a single page
fn pagination(page: usize, total_pages: usize) -> Markup {
    html! {
        @if total_pages > 1 {
            nav.pagination {
                @if page > 1 {
                    a.prev href=(page_filename(page - 1)) { "‹ Previous" }
                }
                @for n in 1..=total_pages {
                    @if n == page {
                        span.current { (n) }
                    } @else {
                        a href=(page_filename(n)) { (n) }
                    }
                }
                @if page < total_pages {
                    a.next href=(page_filename(page + 1)) { "Next ›" }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the index page with one card per event
fn render_index<S: KeyValueStore>(gallery: &Gallery<S>, config: &SiteConfig) -> Markup {
    let thumbs = config.thumbnails.options();

    let breadcrumb = html! {
        a href="index.html" { "Crusades" }
    };

    let content = html! {
        (site_header(breadcrumb, html! {}))
        main.index-page {
            div.event-grid {
                @for event in gallery.events() {
                    a.event-card href=(day_href(event, DaySlot::first(), true)) {
                        @if let Some(cover) = gallery.cover_image(&event.id) {
                            img src=(link::display_url(cover, thumbs)) alt=(event.name) loading="lazy";
                        }
                        div.event-info {
                            h2 { (event.name) }
                            p.location { (event.location) }
                            p.dates { (event.start_date) " - " (event.end_date) }
                            p.photo-count { (gallery.total_images(&event.id)) " Photos" }
                        }
                    }
                }
            }
        }
        (social_footer(&config.social))
    };

    base_document("Crusades", content)
}

/// Renders one page of a day's photo grid
fn render_day_page(
    ctx: &DayPageContext<'_>,
    images: &[String],
    first_number: usize,
    display: OptimizeOptions,
    social: &BTreeMap<String, String>,
) -> Markup {
    let event = ctx.event;
    let title = if ctx.total_pages > 1 {
        format!(
            "{} - {} (page {} of {})",
            event.name,
            ctx.day.label(),
            ctx.page,
            ctx.total_pages
        )
    } else {
        format!("{} - {}", event.name, ctx.day.label())
    };

    let breadcrumb = html! {
        a href="../../index.html" { "Crusades" }
        " › "
        (event.name)
    };

    let nav = html! {
        @if let Some(prev) = ctx.prev_event {
            a.prev-event href=(day_href(prev, DaySlot::first(), false)) { "‹ " (prev.name) }
        }
        @if let Some(next) = ctx.next_event {
            a.next-event href=(day_href(next, DaySlot::first(), false)) { (next.name) " ›" }
        }
    };

    let content = html! {
        (site_header(breadcrumb, nav))
        header.event-header {
            h1 { (event.name) }
            p.location { (event.location) }
            p.dates { (event.start_date) " - " (event.end_date) }
        }
        (day_tabs(event, ctx.day, ctx.counts))
        main.day-page {
            @if images.is_empty() {
                p.empty-day { "No photos for " (ctx.day.label()) " yet." }
            } @else {
                section.photo-grid {
                    @for (offset, url) in images.iter().enumerate() {
                        @let number = first_number + offset;
                        figure {
                            a href=(link::normalize(url)) target="_blank" rel="noopener" {
                                img src=(link::display_url(url, display))
                                    alt={ (ctx.day.label()) " photo " (number) }
                                    loading="lazy" decoding="async";
                            }
                        }
                    }
                }
            }
            (pagination(ctx.page, ctx.total_pages))
        }
        (social_footer(social))
    };

    base_document(&title, content)
}

// ============================================================================
// Tests
// ============================================================================
