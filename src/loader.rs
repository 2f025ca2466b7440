use image::GenericImageView;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use winit::event_loop::EventLoopProxy;

use crate::error::DecodeError;
use crate::lightbox::ImageCollection;

// ---------------------------------------------------------------------------
// Decoded image data (CPU side, RGBA8)
// ---------------------------------------------------------------------------

pub struct DecodedImage {
    pub rgba_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    pub fn mem_size(&self) -> u64 {
        self.rgba_bytes.len() as u64
    }
}

pub fn decode_image(path: &Path, target_size: Option<u32>) -> Result<DecodedImage, DecodeError> {
    let bytes = fs::read(path).map_err(|e| DecodeError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let img = image::load_from_memory(&bytes).map_err(|e| DecodeError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let img = match target_size {
        Some(edge) => img.thumbnail(edge, edge),
        None => img,
    };
    let (width, height) = img.dimensions();
    Ok(DecodedImage {
        rgba_bytes: img.to_rgba8().into_raw(),
        width,
        height,
    })
}

// ---------------------------------------------------------------------------
// Cache state (shared between UI and worker threads via Mutex + Condvar)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkType {
    Full,
    Thumbnail,
}

pub struct CacheState {
    /// Index the lightbox is showing, `None` while it is closed.
    pub focus: Option<usize>,
    /// Grid tiles currently on screen; thumbnails spread out from here.
    pub visible: Range<usize>,

    pub images: HashMap<usize, Arc<DecodedImage>>,
    pub thumbnails: HashMap<usize, Arc<DecodedImage>>,

    pub in_progress: HashSet<(usize, WorkType)>,
    pub errors: HashMap<usize, DecodeError>,
    pub thumbnail_errors: HashSet<usize>,

    pub used_bytes: u64,
    pub budget: u64,
    pub file_count: usize,
    pub thumb_size: u32,

    /// Neighbours that were decoded but didn't fit the budget.
    pub saturated: HashSet<usize>,
    pub shutdown: bool,
}

pub type SharedState = Arc<(Mutex<CacheState>, Condvar)>;

/// Lock the cache, recovering the data if a worker panicked mid-update.
pub fn lock(shared: &SharedState) -> MutexGuard<'_, CacheState> {
    shared.0.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CacheState {
    pub fn new(budget: u64, file_count: usize, thumb_size: u32) -> Self {
        Self {
            focus: None,
            visible: 0..0,
            images: HashMap::new(),
            thumbnails: HashMap::new(),
            in_progress: HashSet::new(),
            errors: HashMap::new(),
            thumbnail_errors: HashSet::new(),
            used_bytes: 0,
            budget,
            file_count,
            thumb_size,
            saturated: HashSet::new(),
            shutdown: false,
        }
    }

    pub fn set_focus(&mut self, focus: Option<usize>) {
        if focus != self.focus {
            self.focus = focus;
            self.saturated.clear();
        }
    }

    pub fn set_visible(&mut self, visible: Range<usize>) {
        self.visible = visible;
    }

    pub fn get(&self, idx: usize) -> Option<Arc<DecodedImage>> {
        self.images.get(&idx).cloned()
    }

    pub fn get_thumbnail(&self, idx: usize) -> Option<Arc<DecodedImage>> {
        self.thumbnails.get(&idx).cloned()
    }

    /// Distance along the lightbox's wrap-around order.
    pub fn cyclic_distance(&self, a: usize, b: usize) -> usize {
        if self.file_count == 0 {
            return 0;
        }
        let d = a.abs_diff(b) % self.file_count;
        d.min(self.file_count - d)
    }

    pub fn is_available(&self, idx: usize, wtype: WorkType) -> bool {
        if idx >= self.file_count || self.in_progress.contains(&(idx, wtype)) {
            return false;
        }
        match wtype {
            WorkType::Full => {
                !self.images.contains_key(&idx)
                    && !self.errors.contains_key(&idx)
                    && !self.saturated.contains(&idx)
            }
            WorkType::Thumbnail => {
                !self.thumbnails.contains_key(&idx) && !self.thumbnail_errors.contains(&idx)
            }
        }
    }

    /// Next job: the focused image, its neighbours (next before previous,
    /// wrapping), then missing thumbnails starting with the visible tiles.
    pub fn find_work(&self) -> Option<(usize, WorkType)> {
        if let Some(focus) = self.focus.filter(|&f| f < self.file_count) {
            if self.is_available(focus, WorkType::Full) {
                return Some((focus, WorkType::Full));
            }
            let n = self.file_count;
            for idx in [(focus + 1) % n, (focus + n - 1) % n] {
                if idx != focus && self.is_available(idx, WorkType::Full) && self.fits_another() {
                    return Some((idx, WorkType::Full));
                }
            }
        }

        self.next_thumbnail().map(|idx| (idx, WorkType::Thumbnail))
    }

    /// Visible tiles in order, then outward one tile at a time: below the
    /// screen before above it.
    fn next_thumbnail(&self) -> Option<usize> {
        let n = self.file_count;
        let start = self.visible.start.min(n);
        let end = self.visible.end.clamp(start, n);
        let wanted = |idx: usize| self.is_available(idx, WorkType::Thumbnail);

        if let Some(idx) = (start..end).find(|&idx| wanted(idx)) {
            return Some(idx);
        }
        for i in 0..n {
            let below = end + i;
            if below < n && wanted(below) {
                return Some(below);
            }
            if let Some(above) = start.checked_sub(i + 1) {
                if wanted(above) {
                    return Some(above);
                }
            }
        }
        None
    }

    fn fits_another(&self) -> bool {
        let avg = if self.images.is_empty() {
            8 * 1024 * 1024
        } else {
            self.used_bytes / self.images.len() as u64
        };
        self.used_bytes + avg <= self.budget
    }

    pub fn insert(&mut self, idx: usize, decoded: DecodedImage, wtype: WorkType) {
        match wtype {
            WorkType::Full => {
                let focused = self.focus == Some(idx);
                if !focused && self.used_bytes + decoded.mem_size() > self.budget {
                    self.saturated.insert(idx);
                    return;
                }
                if let Some(old) = self.images.remove(&idx) {
                    self.used_bytes -= old.mem_size();
                }
                self.used_bytes += decoded.mem_size();
                self.images.insert(idx, Arc::new(decoded));
                self.evict_distant();
            }
            WorkType::Thumbnail => {
                self.thumbnails.insert(idx, Arc::new(decoded));
            }
        }
    }

    fn evict_distant(&mut self) {
        let anchor = self.focus;
        while self.used_bytes > self.budget && self.images.len() > 1 {
            let farthest = self
                .images
                .keys()
                .filter(|&&idx| Some(idx) != anchor)
                .max_by_key(|&&idx| anchor.map_or(idx, |f| self.cyclic_distance(idx, f)))
                .copied();

            match farthest.and_then(|idx| self.images.remove(&idx)) {
                Some(img) => self.used_bytes -= img.mem_size(),
                None => break,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// User event for waking the UI from worker threads
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum UserEvent {
    ImageReady(usize),
    ThumbnailReady(usize),
}

// ---------------------------------------------------------------------------
// Background decode workers
// ---------------------------------------------------------------------------

pub fn spawn_decode_workers(
    shared: SharedState,
    collection: ImageCollection,
    proxy: EventLoopProxy<UserEvent>,
    num_threads: usize,
) {
    for _ in 0..num_threads {
        let shared = Arc::clone(&shared);
        let collection = collection.clone();
        let proxy = proxy.clone();
        thread::spawn(move || {
            while let Some((idx, wtype)) = wait_for_work(&shared) {
                let Some(image) = collection.get(idx) else {
                    lock(&shared).in_progress.remove(&(idx, wtype));
                    continue;
                };

                let target = match wtype {
                    WorkType::Full => None,
                    WorkType::Thumbnail => Some(lock(&shared).thumb_size),
                };
                let result = decode_image(image.source(), target);

                {
                    let mut state = lock(&shared);
                    state.in_progress.remove(&(idx, wtype));
                    match (result, wtype) {
                        (Ok(decoded), _) => state.insert(idx, decoded, wtype),
                        (Err(e), WorkType::Full) => {
                            log::warn!("Could not load: {}", e);
                            state.errors.insert(idx, e);
                        }
                        (Err(e), WorkType::Thumbnail) => {
                            log::debug!("No thumbnail: {}", e);
                            state.thumbnail_errors.insert(idx);
                        }
                    }
                    shared.1.notify_all();
                }

                let event = match wtype {
                    WorkType::Full => UserEvent::ImageReady(idx),
                    WorkType::Thumbnail => UserEvent::ThumbnailReady(idx),
                };
                if proxy.send_event(event).is_err() {
                    break;
                }
            }
        });
    }
}

fn wait_for_work(shared: &SharedState) -> Option<(usize, WorkType)> {
    let (_, cvar) = &**shared;
    let mut state = lock(shared);
    loop {
        if state.shutdown {
            return None;
        }
        if let Some(job) = state.find_work() {
            state.in_progress.insert(job);
            return Some(job);
        }
        state = cvar.wait(state).unwrap_or_else(PoisonError::into_inner);
    }
}
