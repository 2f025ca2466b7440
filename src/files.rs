use rayon::prelude::*;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::GalleryError;
use crate::lightbox::{GalleryImage, ImageCollection};

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tga", "tiff", "tif", "webp", "ico", "pnm", "pbm",
    "pgm", "ppm", "pam", "qoi",
];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Where to look for selectable images.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub paths: Vec<PathBuf>,
    pub file_list: Option<PathBuf>,
    pub recursive: bool,
    pub follow_links: bool,
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Collect image paths: file-list entries first, then explicit paths.
/// Each directory's images are sorted; order across sources is preserved.
pub fn collect_images(opts: &ScanOptions) -> Result<Vec<PathBuf>, GalleryError> {
    let start_time = Instant::now();
    let mut found = Vec::new();

    if let Some(list_path) = &opts.file_list {
        let file = fs::File::open(list_path).map_err(|source| GalleryError::FileList {
            path: list_path.clone(),
            source,
        })?;
        read_file_list(BufReader::new(file), opts.follow_links, &mut found).map_err(
            |source| GalleryError::FileList {
                path: list_path.clone(),
                source,
            },
        )?;
    }

    for path in &opts.paths {
        if !should_process(path, opts.follow_links) {
            continue;
        }
        if path.is_dir() {
            scan_dir(path, opts.recursive, opts.follow_links, &mut found);
        } else if path.is_file() && is_image_file(path) {
            found.push(path.clone());
        } else {
            log::warn!("Skipping {}: not an image file or directory", path.display());
        }
    }

    log::info!(
        "Scan complete in {:.2}s. Found {} images.",
        start_time.elapsed().as_secs_f64(),
        found.len()
    );
    Ok(found)
}

fn should_process(p: &Path, follow_links: bool) -> bool {
    if follow_links {
        return true;
    }
    match fs::symlink_metadata(p) {
        Ok(meta) => !meta.file_type().is_symlink(),
        Err(_) => true,
    }
}

/// One path per line. Tabs and double spaces separate columns; a column that
/// isn't a file is retried split on any whitespace.
fn read_file_list(reader: impl BufRead, follow_links: bool, out: &mut Vec<PathBuf>) -> io::Result<()> {
    let accept = |p: PathBuf, out: &mut Vec<PathBuf>| {
        if should_process(&p, follow_links) && p.is_file() && is_image_file(&p) {
            out.push(p);
        }
    };

    for line in reader.lines() {
        let line = line?;
        for column in line.split('\t').flat_map(|c| c.split("  ")) {
            let trimmed = column.trim();
            if trimmed.is_empty() {
                continue;
            }
            let p = PathBuf::from(trimmed);
            if p.is_file() {
                accept(p, out);
            } else {
                for sub in trimmed.split_whitespace() {
                    accept(PathBuf::from(sub), out);
                }
            }
        }
    }
    Ok(())
}

fn scan_dir(dir: &Path, recursive: bool, follow_links: bool, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read {}: {}", dir.display(), e);
            return;
        }
    };

    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let Ok(ft) = entry.file_type() else { continue };
        if ft.is_symlink() && !follow_links {
            continue;
        }
        let p = entry.path();
        if p.is_file() && is_image_file(&p) {
            files.push(p);
        } else if recursive && p.is_dir() {
            subdirs.push(p);
        }
    }

    files.sort();
    if !files.is_empty() {
        log::debug!("Scanning {:?}... ({} images)", dir, files.len());
    }
    out.extend(files);

    if recursive {
        subdirs.sort();
        for sub in subdirs {
            scan_dir(&sub, true, follow_links, out);
        }
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Accessible text for an image: EXIF description if present, else the
/// file stem with separators turned into spaces.
pub fn label_for(path: &Path) -> String {
    exif_description(path).unwrap_or_else(|| label_from_name(path))
}

pub fn label_from_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.replace(['_', '-'], " "))
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    if stem.is_empty() {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    } else {
        stem
    }
}

fn exif_description(path: &Path) -> Option<String> {
    let file = fs::File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let data = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(data) => data,
        Err(e) => {
            log::trace!("No EXIF in {}: {}", path.display(), e);
            return None;
        }
    };
    let field = data.get_field(exif::Tag::ImageDescription, exif::In::PRIMARY)?;
    match &field.value {
        exif::Value::Ascii(parts) => parts
            .iter()
            .map(|raw| String::from_utf8_lossy(raw).trim().to_string())
            .find(|s| !s.is_empty()),
        _ => None,
    }
}

/// Build the session's collection, deriving labels in parallel.
pub fn build_collection(paths: Vec<PathBuf>) -> ImageCollection {
    let images: Vec<GalleryImage> = paths
        .into_par_iter()
        .map(|p| {
            let label = label_for(&p);
            GalleryImage::new(p, label)
        })
        .collect();
    ImageCollection::new(images)
}
