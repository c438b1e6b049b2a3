use clap::{Parser, Subcommand};
use crusade_gallery::config::{self, SiteConfig};
use crusade_gallery::gallery::{Gallery, GalleryOptions};
use crusade_gallery::link::{self, OptimizeOptions};
use crusade_gallery::preload::{self, LinkProbe};
use crusade_gallery::store::FileStore;
use crusade_gallery::types::DaySlot;
use crusade_gallery::{export, generate, output, picker};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "crusade-gallery")]
#[command(about = "Curate and publish photo galleries for multi-day crusade events")]
#[command(long_about = "\
Curate and publish photo galleries for multi-day crusade events

Events and their built-in image lists come from the config file. Edits made
with 'add' and 'remove' are saved as one snapshot in the store file and
override the built-in lists from then on.

Accepted links:
  Google Drive   https://drive.google.com/file/d/<id>/view
                 https://drive.google.com/uc?export=download&id=<id>
  OneDrive       https://onedrive.live.com/?cid=<cid>&id=<id>
                 https://onedrive.live.com/redir?resid=<resid>&authkey=<key>
  Anything else  stored as given

Set RUST_LOG=debug for per-link detail.

Run 'crusade-gallery gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Snapshot store file (overrides storage.path)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Which event and day an edit applies to.
#[derive(clap::Args, Clone)]
struct DayArgs {
    /// Event id
    #[arg(long)]
    event: String,

    /// Day: day1-day4, or just the number
    #[arg(long)]
    day: DaySlot,
}

#[derive(Subcommand)]
enum Command {
    /// Print the directly loadable form of share links
    Normalize {
        urls: Vec<String>,
        /// Also append width and quality hints
        #[arg(long)]
        optimize: bool,
        /// Width hint (defaults to display.width)
        #[arg(long)]
        width: Option<u32>,
        /// Quality hint (defaults to display.quality)
        #[arg(long)]
        quality: Option<u32>,
    },
    /// List events, or one page of a day's images
    List {
        /// Event id; with --day alone, the current or next event by date
        #[arg(long)]
        event: Option<String>,
        #[arg(long)]
        day: Option<DaySlot>,
        /// 1-based page
        #[arg(long)]
        page: Option<usize>,
    },
    /// Append image links to a day
    Add {
        #[command(flatten)]
        target: DayArgs,
        urls: Vec<String>,
        /// JSON saved from the OneDrive file picker
        #[arg(long = "picker")]
        picker_file: Option<PathBuf>,
    },
    /// Remove one image from a day
    Remove {
        #[command(flatten)]
        target: DayArgs,
        /// Position as shown by 'list' (1-based)
        position: usize,
    },
    /// Write the curated lists as a TypeScript data module
    Export {
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Probe the links of each event's days and report the ones that won't load
    Check {
        /// Limit to one event
        #[arg(long)]
        event: Option<String>,
    },
    /// Render the gallery as static HTML
    Generate {
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Normalize {
            urls,
            optimize,
            width,
            quality,
        } => {
            let config = config::load_config(&cli.config)?;
            let options = OptimizeOptions {
                width: width.unwrap_or(config.display.width),
                quality: quality.unwrap_or(config.display.quality),
            };
            let results: Vec<(String, String)> = urls
                .into_iter()
                .map(|url| {
                    let normalized = if optimize {
                        link::display_url(&url, options)
                    } else {
                        link::normalize(&url)
                    };
                    (url, normalized)
                })
                .collect();
            output::print_normalized(&results);
        }
        Command::List { event, day, page } => {
            let config = config::load_config(&cli.config)?;
            let mut gallery = open_gallery(&config, cli.store)?;
            if event.is_none() && day.is_none() {
                output::print_event_listing(&gallery);
                return Ok(());
            }
            match event {
                Some(id) => gallery.select_event(&id)?,
                None => {
                    let today = chrono::Local::now().date_naive();
                    gallery.select_current_event(today)?;
                }
            }
            if let Some(day) = day {
                gallery.select_day(day)?;
            }
            if let Some(page) = page {
                gallery.go_to_page(page)?;
            }
            output::print_day_listing(&gallery);
        }
        Command::Add {
            target,
            mut urls,
            picker_file,
        } => {
            if let Some(path) = picker_file {
                let json = std::fs::read_to_string(&path)?;
                let files = picker::parse_picker_response(&json)?;
                tracing::debug!(files = files.len(), "picker selection loaded");
                urls.extend(files.into_iter().map(|file| file.url));
            }
            let config = config::load_config(&cli.config)?;
            let mut gallery = open_gallery(&config, cli.store)?;
            let added = gallery.add_images(&target.event, target.day, &urls)?;
            let total = gallery.day_images(&target.event, target.day).len();
            if let Some(event) = gallery.event(&target.event) {
                output::print_add_result(event, target.day, added, total);
            }
        }
        Command::Remove { target, position } => {
            let index = position
                .checked_sub(1)
                .ok_or("positions start at 1, as shown by 'list'")?;
            let config = config::load_config(&cli.config)?;
            let mut gallery = open_gallery(&config, cli.store)?;
            let removed = gallery.remove_image(&target.event, target.day, index)?;
            let remaining = gallery.day_images(&target.event, target.day).len();
            if let Some(event) = gallery.event(&target.event) {
                output::print_remove_result(event, target.day, position, &removed, remaining);
            }
        }
        Command::Export { out } => {
            let config = config::load_config(&cli.config)?;
            let gallery = open_gallery(&config, cli.store)?;
            let events = gallery.events_with_images();
            let module = export::render_data_module(&events);
            match out {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, module)?;
                    output::print_export_result(events.len(), &path);
                }
                None => print!("{}", module),
            }
        }
        Command::Check { event } => {
            let config = config::load_config(&cli.config)?;
            let gallery = open_gallery(&config, cli.store)?;
            let ids: Vec<String> = match event {
                Some(id) => {
                    if gallery.event(&id).is_none() {
                        return Err(format!("unknown event '{id}'").into());
                    }
                    vec![id]
                }
                None => gallery.events().iter().map(|e| e.id.clone()).collect(),
            };
            let urls: Vec<String> = ids
                .iter()
                .flat_map(|id| gallery.visible_images(id))
                .collect();
            let report = preload::preload_images(&urls, config.preload.limit, &LinkProbe);
            output::print_check_report(&report);
        }
        Command::Generate { output: dir } => {
            let config = config::load_config(&cli.config)?;
            let gallery = open_gallery(&config, cli.store)?;
            let summary = generate::generate(&gallery, &config, &dir)?;
            output::print_generate_summary(&summary, &dir);
        }
    }

    Ok(())
}

/// Open the gallery over the store file, `--store` winning over the config.
fn open_gallery(
    config: &SiteConfig,
    store_override: Option<PathBuf>,
) -> Result<Gallery<FileStore>, Box<dyn std::error::Error>> {
    let path = store_override.unwrap_or_else(|| PathBuf::from(&config.storage.path));
    let options = GalleryOptions {
        page_size: config.gallery.page_size,
        storage_key: config.storage.key.clone(),
    };
    let gallery = Gallery::open(config.events.clone(), FileStore::new(path), options)?;
    Ok(gallery)
}
