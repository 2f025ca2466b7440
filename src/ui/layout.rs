use crate::lightbox::{Controls, PointerTarget};

// ---------------------------------------------------------------------------
// Geometry for the gallery page and the modal, plus hit testing.
// All coordinates are physical pixels with the origin at the top left.
// ---------------------------------------------------------------------------

pub const HEADER_H: f32 = 48.0;
pub const MARGIN: f32 = 16.0;
pub const GAP: f32 = 12.0;
pub const CAPTION_H: f32 = 22.0;

pub const CLOSE_SIZE: f32 = 40.0;
pub const NAV_W: f32 = 48.0;
pub const NAV_H: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.w && py < self.y + self.h
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Thumbnail grid below a fixed header, scrolled vertically.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    pub win_w: f32,
    pub win_h: f32,
    pub columns: u32,
    pub count: usize,
}

impl GridLayout {
    pub fn new(win_w: f32, win_h: f32, columns: u32, count: usize) -> Self {
        Self {
            win_w,
            win_h,
            columns: columns.max(1),
            count,
        }
    }

    pub fn cell_w(&self) -> f32 {
        let cols = self.columns as f32;
        ((self.win_w - 2.0 * MARGIN - (cols - 1.0) * GAP) / cols).max(1.0)
    }

    /// Square image area plus a caption strip.
    pub fn cell_h(&self) -> f32 {
        self.cell_w() + CAPTION_H
    }

    pub fn rows(&self) -> usize {
        self.count.div_ceil(self.columns as usize)
    }

    pub fn content_height(&self) -> f32 {
        let rows = self.rows() as f32;
        if rows == 0.0 {
            return HEADER_H;
        }
        HEADER_H + 2.0 * MARGIN + rows * (self.cell_h() + GAP) - GAP
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_height() - self.win_h).max(0.0)
    }

    pub fn clamp_scroll(&self, scroll: f32) -> f32 {
        scroll.clamp(0.0, self.max_scroll())
    }

    /// Tile rect in window coordinates for the given scroll offset.
    pub fn tile(&self, index: usize, scroll: f32) -> Rect {
        let cols = self.columns as usize;
        let (row, col) = (index / cols, index % cols);
        Rect::new(
            MARGIN + col as f32 * (self.cell_w() + GAP),
            HEADER_H + MARGIN + row as f32 * (self.cell_h() + GAP) - scroll,
            self.cell_w(),
            self.cell_h(),
        )
    }

    /// Image area of a tile, without the caption.
    pub fn tile_image(&self, index: usize, scroll: f32) -> Rect {
        let t = self.tile(index, scroll);
        Rect::new(t.x, t.y, t.w, t.w)
    }

    /// Indices whose tiles intersect the window.
    pub fn visible(&self, scroll: f32) -> std::ops::Range<usize> {
        if self.count == 0 {
            return 0..0;
        }
        let pitch = self.cell_h() + GAP;
        let cols = self.columns as usize;
        let top = ((scroll - MARGIN) / pitch).floor().max(0.0) as usize;
        let bottom = ((scroll + self.win_h - HEADER_H) / pitch).ceil().max(0.0) as usize + 1;
        (top * cols).min(self.count)..(bottom * cols).min(self.count)
    }

    pub fn hit(&self, px: f32, py: f32, scroll: f32) -> PointerTarget {
        if py < HEADER_H {
            return PointerTarget::Page;
        }
        self.visible(scroll)
            .find(|&i| self.tile(i, scroll).contains(px, py))
            .map_or(PointerTarget::Page, PointerTarget::Thumbnail)
    }
}

/// Modal overlay: centred image with a caption, close button top right,
/// previous/next buttons on the left/right edges.
#[derive(Debug, Clone, Copy)]
pub struct ModalLayout {
    pub image: Rect,
    pub caption: Rect,
    pub close: Rect,
    pub previous: Rect,
    pub next: Rect,
    pub scale: f32,
}

impl ModalLayout {
    pub fn new(win_w: f32, win_h: f32, image_dims: Option<(u32, u32)>) -> Self {
        let box_w = (win_w - 2.0 * (NAV_W + 2.0 * MARGIN)).max(1.0);
        let box_h = (win_h - 4.0 * MARGIN - CAPTION_H - CLOSE_SIZE).max(1.0);

        let (draw_w, draw_h, scale) = match image_dims {
            Some((w, h)) if w > 0 && h > 0 => {
                let scale = fit_scale(w as f32, h as f32, box_w, box_h).min(1.0);
                (w as f32 * scale, h as f32 * scale, scale)
            }
            _ => (box_w, box_h, 1.0),
        };

        let total_h = draw_h + CAPTION_H;
        let x0 = (win_w - draw_w) / 2.0;
        let y0 = ((win_h - total_h) / 2.0).max(CLOSE_SIZE + MARGIN);
        let nav_y = (win_h - NAV_H) / 2.0;

        Self {
            image: Rect::new(x0, y0, draw_w, draw_h),
            caption: Rect::new(x0, y0 + draw_h, draw_w, CAPTION_H),
            close: Rect::new(win_w - CLOSE_SIZE - MARGIN, MARGIN, CLOSE_SIZE, CLOSE_SIZE),
            previous: Rect::new(MARGIN, nav_y, NAV_W, NAV_H),
            next: Rect::new(win_w - NAV_W - MARGIN, nav_y, NAV_W, NAV_H),
            scale,
        }
    }

    /// Controls first, then content, then the backdrop.
    pub fn hit(&self, px: f32, py: f32, controls: Controls) -> PointerTarget {
        if controls.close && self.close.contains(px, py) {
            PointerTarget::CloseControl
        } else if controls.previous && self.previous.contains(px, py) {
            PointerTarget::PreviousControl
        } else if controls.next && self.next.contains(px, py) {
            PointerTarget::NextControl
        } else if self.image.contains(px, py) || self.caption.contains(px, py) {
            PointerTarget::Content
        } else {
            PointerTarget::Backdrop
        }
    }
}

pub fn fit_scale(img_w: f32, img_h: f32, win_w: f32, win_h: f32) -> f32 {
    (win_w / img_w).min(win_h / img_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_cells_fill_width() {
        let g = GridLayout::new(800.0, 600.0, 4, 10);
        let last_col = g.tile(3, 0.0);
        assert!((last_col.x + last_col.w - (800.0 - MARGIN)).abs() < 0.01);
        assert_eq!(g.rows(), 3);
    }

    #[test]
    fn grid_hit_follows_scroll() {
        let g = GridLayout::new(800.0, 600.0, 4, 10);
        let t5 = g.tile(5, 0.0);
        let (cx, cy) = (t5.x + t5.w / 2.0, t5.y + t5.h / 2.0);
        assert_eq!(g.hit(cx, cy, 0.0), PointerTarget::Thumbnail(5));

        let scroll = g.cell_h() + GAP;
        assert_eq!(g.hit(cx, cy, scroll), PointerTarget::Thumbnail(9));
        assert_eq!(g.hit(cx, 10.0, 0.0), PointerTarget::Page);
        // Gap between columns.
        assert_eq!(g.hit(t5.x - GAP / 2.0, cy, 0.0), PointerTarget::Page);
    }

    #[test]
    fn scroll_is_clamped() {
        let g = GridLayout::new(800.0, 600.0, 4, 40);
        assert_eq!(g.clamp_scroll(-50.0), 0.0);
        assert_eq!(g.clamp_scroll(1e9), g.max_scroll());
        let short = GridLayout::new(800.0, 600.0, 4, 2);
        assert_eq!(short.max_scroll(), 0.0);
    }

    #[test]
    fn visible_range_covers_window() {
        let g = GridLayout::new(800.0, 600.0, 4, 100);
        let scroll = 1000.0;
        let range = g.visible(scroll);
        for i in 0..100 {
            let t = g.tile(i, scroll);
            let on_screen = t.bottom() > HEADER_H && t.y < 600.0;
            if on_screen {
                assert!(range.contains(&i), "tile {i} on screen but not in {range:?}");
            }
        }
        assert!(GridLayout::new(800.0, 600.0, 4, 0).visible(0.0).is_empty());
    }

    #[test]
    fn modal_controls_win_over_content() {
        let m = ModalLayout::new(1280.0, 720.0, None);
        let c = &m.close;
        assert_eq!(m.hit(c.x + 1.0, c.y + 1.0, Controls::ALL), PointerTarget::CloseControl);
        let n = &m.next;
        assert_eq!(m.hit(n.x + 2.0, n.y + 2.0, Controls::ALL), PointerTarget::NextControl);
        let p = &m.previous;
        assert_eq!(m.hit(p.x + 2.0, p.y + 2.0, Controls::ALL), PointerTarget::PreviousControl);
        let i = &m.image;
        assert_eq!(m.hit(i.x + 5.0, i.y + 5.0, Controls::ALL), PointerTarget::Content);
        assert_eq!(m.hit(2.0, 700.0, Controls::ALL), PointerTarget::Backdrop);
    }

    #[test]
    fn missing_buttons_become_backdrop() {
        let m = ModalLayout::new(1280.0, 720.0, Some((100, 100)));
        let n = &m.next;
        assert_eq!(m.hit(n.x + 2.0, n.y + 2.0, Controls::NONE), PointerTarget::Backdrop);
    }

    #[test]
    fn small_images_are_not_upscaled() {
        let m = ModalLayout::new(1280.0, 720.0, Some((100, 50)));
        assert_eq!(m.scale, 1.0);
        assert_eq!((m.image.w, m.image.h), (100.0, 50.0));
        assert_eq!(m.caption.y, m.image.bottom());

        let big = ModalLayout::new(1280.0, 720.0, Some((4000, 1000)));
        assert!(big.scale < 1.0);
        assert!(big.image.x >= NAV_W + MARGIN);
    }
}
