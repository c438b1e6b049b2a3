//! # Crusade Gallery
//!
//! Photo gallery tooling for multi-day crusade events. Each event runs two to
//! four days; each day holds an ordered list of image links pasted from Google
//! Drive or OneDrive. Admins curate the lists, viewers browse them day by day.
//!
//! # Data Flow
//!
//! ```text
//! config (catalog)  ─┐
//!                    ├─►  Gallery  ─►  generate  ─►  dist/        (static HTML)
//! store (snapshot)  ─┘       │
//!                            ├──────►  export    ─►  images.ts    (data module)
//!                            └──────►  preload   ─►  check report
//! ```
//!
//! The catalog in `crusade-gallery.toml` is the built-in dataset. Every admin
//! edit rewrites one JSON snapshot in a key-value store; on the next start the
//! snapshot overrides the catalog's lists. Exporting the snapshot as a data
//! module and committing it is how curated lists become the new built-ins.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`link`] | Share-link normalization (Google Drive, OneDrive) and size hints |
//! | [`gallery`] | Image lists per event and day, viewer cursor, admin edits |
//! | [`store`] | Key-value persistence of the whole-gallery snapshot |
//! | [`export`] | Renders the curated dataset as a TypeScript data module |
//! | [`preload`] | Bounded, chunked batch probing of image links |
//! | [`carousel`] | Date-based featured event and wrap-around event stepping |
//! | [`picker`] | Validation of OneDrive file-picker results |
//! | [`generate`] | Static HTML rendering with Maud |
//! | [`config`] | `crusade-gallery.toml` loading, merging and validation |
//! | [`types`] | `Event` and `DaySlot`, shared by every module |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Whole-Snapshot Writes
//!
//! The store holds a single value: every event's image lists. Each edit
//! rewrites all of it. The dataset is small (a few events, tens of links per
//! day) and a single value can never be half-updated across events.
//!
//! ## Links Are Stored Normalized
//!
//! Share links are turned into directly loadable URLs when they are added, not
//! when they are shown. Size hints (`w`, `q`) are applied only at render time,
//! so the stored links stay clean for export.
//!
//! ## Lenient Reads, Strict Edits
//!
//! A corrupt snapshot is logged and ignored; the catalog takes over. Edits and
//! cursor moves that are out of range are rejected with an error and change
//! nothing.

pub mod carousel;
pub mod config;
pub mod export;
pub mod gallery;
pub mod generate;
pub mod link;
pub mod output;
pub mod picker;
pub mod preload;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
