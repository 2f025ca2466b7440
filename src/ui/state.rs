use std::time::{Duration, Instant};
use winit::keyboard::{Key, NamedKey};

use crate::cli::HELP_KEYS;
use crate::lightbox::{
    Controls, GalleryImage, ImageCollection, Input, LightboxController, LightboxKey,
    ModalSurface,
};
use crate::loader::{lock, SharedState};
use crate::ui::layout::{fit_scale, GridLayout, ModalLayout, Rect, HEADER_H, MARGIN};
use crate::ui::render::{text_width, Canvas, ACCENT, BG, ERROR, MUTED, TILE_BG, WHITE};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const SCROLL_STEP: f32 = 60.0;
const OPEN_FADE: Duration = Duration::from_millis(180);
const BACKDROP_ALPHA: f32 = 215.0;

// ---------------------------------------------------------------------------
// Host document: the surface the lightbox controller drives
// ---------------------------------------------------------------------------

pub struct HostDocument {
    pub modal_visible: bool,
    pub scroll_locked: bool,
    pub displayed: Option<usize>,
    pub caption: String,
    pub opened_at: Option<Instant>,
    shared: SharedState,
}

impl HostDocument {
    pub fn new(shared: SharedState) -> Self {
        Self {
            modal_visible: false,
            scroll_locked: false,
            displayed: None,
            caption: String::new(),
            opened_at: None,
            shared,
        }
    }

    /// 0.0 right after opening, 1.0 once the fade is done.
    pub fn fade_progress(&self, now: Instant) -> f32 {
        match self.opened_at {
            Some(t) => (now.duration_since(t).as_secs_f32() / OPEN_FADE.as_secs_f32()).min(1.0),
            None => 1.0,
        }
    }

    fn set_focus(&self, focus: Option<usize>) {
        let mut cache = lock(&self.shared);
        cache.set_focus(focus);
        self.shared.1.notify_all();
    }
}

impl ModalSurface for HostDocument {
    fn show_image(&mut self, index: usize, image: &GalleryImage) {
        self.displayed = Some(index);
        self.caption = image.label.clone();
        self.set_focus(Some(index));
    }

    fn set_modal_visible(&mut self, visible: bool) {
        self.modal_visible = visible;
        if !visible {
            self.opened_at = None;
            self.set_focus(None);
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn play_open_transition(&mut self) {
        self.opened_at = Some(Instant::now());
    }
}

// ---------------------------------------------------------------------------
// Page state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCommand {
    Nothing,
    Redraw,
    Quit,
}

pub struct PageState {
    pub lightbox: LightboxController<HostDocument>,
    pub shared: SharedState,
    pub columns: u32,
    pub scroll: f32,
    pub viewport: (u32, u32),
    pub mouse_pos: (f64, f64),
    pub show_help: bool,
}

/// Translate a winit key into the lightbox's key vocabulary.
pub fn lightbox_key(key: &Key) -> LightboxKey {
    match key {
        Key::Named(NamedKey::Escape) => LightboxKey::Escape,
        Key::Named(NamedKey::ArrowRight) => LightboxKey::ArrowRight,
        Key::Named(NamedKey::ArrowLeft) => LightboxKey::ArrowLeft,
        Key::Named(NamedKey::Home) => LightboxKey::Home,
        Key::Named(NamedKey::End) => LightboxKey::End,
        _ => LightboxKey::Other,
    }
}

impl PageState {
    pub fn new(collection: ImageCollection, shared: SharedState, columns: u32, controls: Controls) -> Self {
        let document = HostDocument::new(shared.clone());
        let page = Self {
            lightbox: LightboxController::new(collection, document, controls),
            shared,
            columns,
            scroll: 0.0,
            viewport: (1280, 720),
            mouse_pos: (0.0, 0.0),
            show_help: false,
        };
        page.publish_visible();
        page
    }

    pub fn document(&self) -> &HostDocument {
        self.lightbox.surface()
    }

    pub fn collection(&self) -> &ImageCollection {
        self.lightbox.collection()
    }

    pub fn grid(&self) -> GridLayout {
        let (w, h) = self.viewport;
        GridLayout::new(w as f32, h as f32, self.columns, self.collection().len())
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
        self.scroll = self.grid().clamp_scroll(self.scroll);
        self.publish_visible();
    }

    /// Tell the decode workers which tiles are on screen.
    fn publish_visible(&self) {
        let visible = self.grid().visible(self.scroll);
        let mut cache = lock(&self.shared);
        cache.set_visible(visible);
        self.shared.1.notify_all();
    }

    /// The open fade still needs frames.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.document().modal_visible && self.document().fade_progress(now) < 1.0
    }

    fn scroll_by(&mut self, dy: f32) -> PageCommand {
        if self.document().scroll_locked {
            return PageCommand::Nothing;
        }
        let next = self.grid().clamp_scroll(self.scroll + dy);
        if next == self.scroll {
            return PageCommand::Nothing;
        }
        self.scroll = next;
        self.publish_visible();
        PageCommand::Redraw
    }

    /// The help overlay takes Escape, then the lightbox gets the key; the
    /// page only sees what both decline.
    pub fn handle_key(&mut self, key: &Key) -> PageCommand {
        if self.show_help && matches!(key, Key::Named(NamedKey::Escape)) {
            self.show_help = false;
            return PageCommand::Redraw;
        }
        if self.lightbox.handle(Input::Key(lightbox_key(key))) {
            return PageCommand::Redraw;
        }

        let page_h = self.viewport.1 as f32 - HEADER_H;
        match key {
            Key::Named(NamedKey::Escape) => PageCommand::Quit,
            Key::Named(NamedKey::ArrowDown) => self.scroll_by(SCROLL_STEP),
            Key::Named(NamedKey::ArrowUp) => self.scroll_by(-SCROLL_STEP),
            Key::Named(NamedKey::PageDown) => self.scroll_by(page_h),
            Key::Named(NamedKey::PageUp) => self.scroll_by(-page_h),
            Key::Named(NamedKey::Home) => self.scroll_by(f32::NEG_INFINITY),
            Key::Named(NamedKey::End) => self.scroll_by(f32::INFINITY),
            Key::Character(s) => match s.as_str() {
                "q" | "Q" => PageCommand::Quit,
                "?" => {
                    self.show_help = !self.show_help;
                    PageCommand::Redraw
                }
                _ => PageCommand::Nothing,
            },
            _ => PageCommand::Nothing,
        }
    }

    pub fn handle_click(&mut self, x: f32, y: f32) -> PageCommand {
        if self.show_help {
            self.show_help = false;
            return PageCommand::Redraw;
        }
        let target = if self.lightbox.is_open() {
            let (w, h) = self.viewport;
            ModalLayout::new(w as f32, h as f32, self.displayed_dims())
                .hit(x, y, self.lightbox.controls())
        } else {
            self.grid().hit(x, y, self.scroll)
        };
        if self.lightbox.handle(Input::Click(target)) {
            PageCommand::Redraw
        } else {
            PageCommand::Nothing
        }
    }

    pub fn handle_wheel(&mut self, lines: f32) -> PageCommand {
        self.scroll_by(-lines * SCROLL_STEP)
    }

    fn displayed_dims(&self) -> Option<(u32, u32)> {
        let idx = self.document().displayed?;
        let cache = lock(&self.shared);
        cache
            .get(idx)
            .or_else(|| cache.get_thumbnail(idx))
            .map(|img| (img.width, img.height))
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn render(&self, canvas: &mut Canvas<'_>, now: Instant) {
        canvas.clear(BG);
        if self.collection().is_empty() {
            let full = Rect::new(0.0, 0.0, canvas.width() as f32, canvas.height() as f32);
            canvas.draw_text_centered("No images found", full, 3, MUTED);
        } else {
            self.render_grid(canvas);
        }
        self.render_header(canvas);

        if self.document().modal_visible {
            self.render_modal(canvas, now);
        }
        if self.show_help {
            render_help(canvas);
        }
    }

    fn render_header(&self, canvas: &mut Canvas<'_>) {
        let w = canvas.width() as f32;
        canvas.fill_rect(Rect::new(0.0, 0.0, w, HEADER_H), (20, 20, 20, 255));
        canvas.fill_rect(Rect::new(0.0, HEADER_H - 2.0, w, 2.0), ACCENT);
        let text_y = ((HEADER_H - 14.0) / 2.0) as i32;
        let x = canvas.draw_text("Gallery", MARGIN as i32, text_y, 2, WHITE);
        let count = format!("  {} images", self.collection().len());
        canvas.draw_text(&count, x, text_y, 2, MUTED);
        let hint = "? for keys";
        let hint_x = w as i32 - text_width(hint, 2) as i32 - MARGIN as i32;
        canvas.draw_text(hint, hint_x, text_y, 2, MUTED);
    }

    fn render_grid(&self, canvas: &mut Canvas<'_>) {
        let grid = self.grid();
        let cache = lock(&self.shared);
        for idx in grid.visible(self.scroll) {
            let area = grid.tile_image(idx, self.scroll);
            canvas.fill_rect(area, TILE_BG);
            if let Some(thumb) = cache.get_thumbnail(idx) {
                let fit = fit_within(thumb.width, thumb.height, area);
                canvas.blit(&thumb, fit, HEADER_H);
            } else if cache.thumbnail_errors.contains(&idx) {
                canvas.draw_text_centered("?", area, 4, ERROR);
            }
            let tile = grid.tile(idx, self.scroll);
            let caption = Rect::new(tile.x, area.bottom(), tile.w, tile.h - area.h);
            if caption.y >= HEADER_H {
                canvas.draw_text_centered(&self.collection()[idx].label, caption, 1, MUTED);
            }
        }
    }

    fn render_modal(&self, canvas: &mut Canvas<'_>, now: Instant) {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        let fade = self.document().fade_progress(now);
        let alpha = (BACKDROP_ALPHA * fade) as u8;
        canvas.fill_rect(Rect::new(0.0, 0.0, w, h), (0, 0, 0, alpha));

        let Some(idx) = self.document().displayed else { return };
        let (full, thumb, error) = {
            let cache = lock(&self.shared);
            (cache.get(idx), cache.get_thumbnail(idx), cache.errors.get(&idx).cloned())
        };

        let shown = full.as_ref().or(thumb.as_ref());
        let layout = ModalLayout::new(w, h, shown.map(|img| (img.width, img.height)));
        match (shown, &error) {
            (_, Some(err)) if full.is_none() => {
                canvas.draw_text_centered(&format!("Could not load: {}", err), layout.image, 2, ERROR);
            }
            (Some(img), _) => {
                canvas.blit(img, layout.image, 0.0);
                if full.is_none() {
                    canvas.draw_text_centered("Loading...", layout.image, 2, WHITE);
                }
            }
            (None, _) => canvas.draw_text_centered("Loading...", layout.image, 2, WHITE),
        }

        let caption = format!("{}  ({}/{})", self.document().caption, idx + 1, self.collection().len());
        let caption_rect = Rect::new(0.0, layout.caption.y, w, layout.caption.h);
        canvas.draw_text_centered(&caption, caption_rect, 2, WHITE);

        let controls = self.lightbox.controls();
        if controls.close {
            draw_button(canvas, layout.close, "X");
        }
        if controls.previous {
            draw_button(canvas, layout.previous, "<");
        }
        if controls.next {
            draw_button(canvas, layout.next, ">");
        }
    }
}

fn draw_button(canvas: &mut Canvas<'_>, rect: Rect, label: &str) {
    canvas.fill_rect(rect, (255, 255, 255, 40));
    canvas.stroke_rect(rect, 2.0, (255, 255, 255, 160));
    canvas.draw_text_centered(label, rect, 3, WHITE);
}

fn render_help(canvas: &mut Canvas<'_>) {
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    canvas.fill_rect(Rect::new(0.0, 0.0, w, h), (0, 0, 0, 200));
    let mut y = 20;
    for line in HELP_KEYS.lines() {
        canvas.draw_text(line, 20, y, 2, WHITE);
        y += 24;
    }
}

/// Largest rect with the image's aspect ratio centred in `area`.
fn fit_within(img_w: u32, img_h: u32, area: Rect) -> Rect {
    if img_w == 0 || img_h == 0 {
        return area;
    }
    let scale = fit_scale(img_w as f32, img_h as f32, area.w, area.h);
    let (dw, dh) = (img_w as f32 * scale, img_h as f32 * scale);
    Rect::new(area.x + (area.w - dw) / 2.0, area.y + (area.h - dh) / 2.0, dw, dh)
}
