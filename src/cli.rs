use clap::Parser;
use std::path::PathBuf;

use crate::files::ScanOptions;

pub const HELP_KEYS: &str = "\
Gallery:
  Click         : Open image in lightbox
  Up / Down     : Scroll
  PgUp / PgDn   : Scroll a page
  Wheel         : Scroll
  Esc / q       : Quit

Lightbox:
  Right / Left  : Next / previous image (wraps)
  Home / End    : First / last image
  Esc           : Close
  Click outside : Close
";

#[derive(Parser, Debug)]
#[command(name = "gallery-lightbox", about = "Image gallery with a lightbox viewer", after_help = HELP_KEYS)]
pub struct Cli {
    /// Files or directories to show
    #[arg(required_unless_present = "file_list")]
    pub paths: Vec<PathBuf>,

    /// Load file list from a text file (one path per line)
    #[arg(short = 'L', long, value_name = "FILE")]
    pub file_list: Option<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Follow symbolic links (default: false)
    #[arg(long)]
    pub follow_links: bool,

    /// Memory budget for full-size images (e.g. 512MB, 2GB). Default: 10% of RAM.
    /// Thumbnails are kept for the whole session and are not counted.
    #[arg(short, long)]
    pub memory: Option<String>,

    /// Thumbnail columns in the gallery
    #[arg(long, default_value = "4", value_parser = clap::value_parser!(u32).range(1..=32))]
    pub columns: u32,

    /// Longest thumbnail edge in pixels
    #[arg(long, default_value = "200", value_parser = clap::value_parser!(u32).range(16..=1024))]
    pub thumb_size: u32,

    /// Open the lightbox at this position on start (clamped to the gallery)
    #[arg(long, value_name = "INDEX", allow_negative_numbers = true)]
    pub open: Option<i64>,

    /// Don't draw next/previous buttons on the lightbox
    #[arg(long)]
    pub no_nav_buttons: bool,
}

impl Cli {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            paths: self.paths.clone(),
            file_list: self.file_list.clone(),
            recursive: self.recursive,
            follow_links: self.follow_links,
        }
    }

    pub fn memory_budget(&self) -> u64 {
        match &self.memory {
            Some(s) => parse_memory_budget(s),
            None => default_memory_budget(),
        }
    }
}

pub fn parse_memory_budget(s: &str) -> u64 {
    const MB: f64 = 1024.0 * 1024.0;
    let s = s.trim().to_uppercase();
    let (num, unit, fallback) = if let Some(num) = s.strip_suffix("GB") {
        (num, MB * 1024.0, 1.0)
    } else if let Some(num) = s.strip_suffix("MB") {
        (num, MB, 512.0)
    } else {
        (s.as_str(), MB, 512.0)
    };
    let value = num.trim().parse::<f64>().unwrap_or(fallback);
    (value * unit) as u64
}

pub fn default_memory_budget() -> u64 {
    let mut sys = sysinfo::System::new();
    sys.refresh_memory();
    sys.total_memory() / 10
}
