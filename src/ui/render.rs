use crate::loader::DecodedImage;
use crate::ui::layout::Rect;

pub type Rgba = (u8, u8, u8, u8);

pub const BG: Rgba = (31, 31, 31, 255);
pub const WHITE: Rgba = (255, 255, 255, 255);
pub const MUTED: Rgba = (170, 170, 170, 255);
pub const ACCENT: Rgba = (124, 58, 237, 255);
pub const TILE_BG: Rgba = (48, 48, 48, 255);
pub const ERROR: Rgba = (255, 80, 80, 255);

pub const GLYPH_ADVANCE: u32 = 6;
pub const GLYPH_HEIGHT: u32 = 7;

// 5x7 bitmap font for ASCII 32..127, one byte per column, LSB = top row.
static FONT_5X7: [[u8; 5]; 96] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], [0x00, 0x00, 0x5F, 0x00, 0x00], [0x00, 0x07, 0x00, 0x07, 0x00], [0x14, 0x7F, 0x14, 0x7F, 0x14], //  !"#
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], [0x23, 0x13, 0x08, 0x64, 0x62], [0x36, 0x49, 0x55, 0x22, 0x50], [0x00, 0x05, 0x03, 0x00, 0x00], // $%&'
    [0x00, 0x1C, 0x22, 0x41, 0x00], [0x00, 0x41, 0x22, 0x1C, 0x00], [0x14, 0x08, 0x3E, 0x08, 0x14], [0x08, 0x08, 0x3E, 0x08, 0x08], // ()*+
    [0x00, 0x50, 0x30, 0x00, 0x00], [0x08, 0x08, 0x08, 0x08, 0x08], [0x00, 0x60, 0x60, 0x00, 0x00], [0x20, 0x10, 0x08, 0x04, 0x02], // ,-./
    [0x3E, 0x51, 0x49, 0x45, 0x3E], [0x00, 0x42, 0x7F, 0x40, 0x00], [0x42, 0x61, 0x51, 0x49, 0x46], [0x21, 0x41, 0x45, 0x4B, 0x31], // 0123
    [0x18, 0x14, 0x12, 0x7F, 0x10], [0x27, 0x45, 0x45, 0x45, 0x39], [0x3C, 0x4A, 0x49, 0x49, 0x30], [0x01, 0x71, 0x09, 0x05, 0x03], // 4567
    [0x36, 0x49, 0x49, 0x49, 0x36], [0x06, 0x49, 0x49, 0x29, 0x1E], [0x00, 0x36, 0x36, 0x00, 0x00], [0x00, 0x56, 0x36, 0x00, 0x00], // 89:;
    [0x08, 0x14, 0x22, 0x41, 0x00], [0x14, 0x14, 0x14, 0x14, 0x14], [0x00, 0x41, 0x22, 0x14, 0x08], [0x02, 0x01, 0x51, 0x09, 0x06], // <=>?
    [0x3E, 0x41, 0x5D, 0x55, 0x1E], [0x7E, 0x11, 0x11, 0x11, 0x7E], [0x7F, 0x49, 0x49, 0x49, 0x36], [0x3E, 0x41, 0x41, 0x41, 0x22], // @ABC
    [0x7F, 0x41, 0x41, 0x22, 0x1C], [0x7F, 0x49, 0x49, 0x49, 0x41], [0x7F, 0x09, 0x09, 0x09, 0x01], [0x3E, 0x41, 0x49, 0x49, 0x7A], // DEFG
    [0x7F, 0x08, 0x08, 0x08, 0x7F], [0x00, 0x41, 0x7F, 0x41, 0x00], [0x20, 0x40, 0x41, 0x3F, 0x01], [0x7F, 0x08, 0x14, 0x22, 0x41], // HIJK
    [0x7F, 0x40, 0x40, 0x40, 0x40], [0x7F, 0x02, 0x0C, 0x02, 0x7F], [0x7F, 0x04, 0x08, 0x10, 0x7F], [0x3E, 0x41, 0x41, 0x41, 0x3E], // LMNO
    [0x7F, 0x09, 0x09, 0x09, 0x06], [0x3E, 0x41, 0x51, 0x21, 0x5E], [0x7F, 0x09, 0x19, 0x29, 0x46], [0x46, 0x49, 0x49, 0x49, 0x31], // PQRS
    [0x01, 0x01, 0x7F, 0x01, 0x01], [0x3F, 0x40, 0x40, 0x40, 0x3F], [0x1F, 0x20, 0x40, 0x20, 0x1F], [0x3F, 0x40, 0x38, 0x40, 0x3F], // TUVW
    [0x63, 0x14, 0x08, 0x14, 0x63], [0x07, 0x08, 0x70, 0x08, 0x07], [0x61, 0x51, 0x49, 0x45, 0x43], [0x00, 0x7F, 0x41, 0x41, 0x00], // XYZ[
    [0x02, 0x04, 0x08, 0x10, 0x20], [0x00, 0x41, 0x41, 0x7F, 0x00], [0x04, 0x02, 0x01, 0x02, 0x04], [0x40, 0x40, 0x40, 0x40, 0x40], // \\]^_
    [0x00, 0x01, 0x02, 0x04, 0x00], [0x20, 0x54, 0x54, 0x54, 0x78], [0x7F, 0x48, 0x44, 0x44, 0x38], [0x38, 0x44, 0x44, 0x44, 0x20], // `abc
    [0x38, 0x44, 0x44, 0x48, 0x7F], [0x38, 0x54, 0x54, 0x54, 0x18], [0x08, 0x7E, 0x09, 0x01, 0x02], [0x0C, 0x52, 0x52, 0x52, 0x3E], // defg
    [0x7F, 0x08, 0x04, 0x04, 0x78], [0x00, 0x44, 0x7D, 0x40, 0x00], [0x20, 0x40, 0x44, 0x3D, 0x00], [0x7F, 0x10, 0x28, 0x44, 0x00], // hijk
    [0x00, 0x41, 0x7F, 0x40, 0x00], [0x7C, 0x04, 0x18, 0x04, 0x78], [0x7C, 0x08, 0x04, 0x04, 0x78], [0x38, 0x44, 0x44, 0x44, 0x38], // lmno
    [0x7C, 0x14, 0x14, 0x14, 0x08], [0x08, 0x14, 0x14, 0x18, 0x7C], [0x7C, 0x08, 0x04, 0x04, 0x08], [0x48, 0x54, 0x54, 0x54, 0x20], // pqrs
    [0x04, 0x3F, 0x44, 0x40, 0x20], [0x3C, 0x40, 0x40, 0x20, 0x7C], [0x1C, 0x20, 0x40, 0x20, 0x1C], [0x3C, 0x40, 0x30, 0x40, 0x3C], // tuvw
    [0x44, 0x28, 0x10, 0x28, 0x44], [0x0C, 0x50, 0x50, 0x50, 0x3C], [0x44, 0x64, 0x54, 0x4C, 0x44], [0x00, 0x08, 0x36, 0x41, 0x00], // xyz{
    [0x00, 0x00, 0x7F, 0x00, 0x00], [0x00, 0x41, 0x36, 0x08, 0x00], [0x10, 0x08, 0x08, 0x10, 0x08], [0x00, 0x00, 0x00, 0x00, 0x00], // |}~ 
];

/// Pack RGB into softbuffer u32 format: 0x00RRGGBB.
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

fn blend(dst: u32, (r, g, b, a): Rgba) -> u32 {
    let a = a as u32;
    if a == 255 {
        return rgb(r, g, b);
    }
    let inv = 255 - a;
    let mix = |src: u8, shift: u32| ((src as u32 * a + ((dst >> shift) & 0xFF) * inv) / 255) as u8;
    rgb(mix(r, 16), mix(g, 8), mix(b, 0))
}

pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_ADVANCE * scale
}

/// Cut `text` to at most `max_w` pixels, ending in ".." if shortened.
pub fn ellipsize(text: &str, max_w: u32, scale: u32) -> String {
    let fits = (max_w / (GLYPH_ADVANCE * scale).max(1)) as usize;
    if text.chars().count() <= fits {
        return text.to_string();
    }
    let keep = fits.saturating_sub(2);
    let mut out: String = text.chars().take(keep).collect();
    if fits >= 2 {
        out.push_str("..");
    }
    out
}

/// A softbuffer frame plus its dimensions.
pub struct Canvas<'a> {
    buf: &'a mut [u32],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(buf: &'a mut [u32], width: u32, height: u32) -> Self {
        Self { buf, width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, (r, g, b, _): Rgba) {
        self.buf.fill(rgb(r, g, b));
    }

    fn put(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let off = (y as u32 * self.width + x as u32) as usize;
        if let Some(px) = self.buf.get_mut(off) {
            *px = blend(*px, color);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let x0 = rect.x.max(0.0) as i32;
        let y0 = rect.y.max(0.0) as i32;
        let x1 = (rect.x + rect.w).min(self.width as f32) as i32;
        let y1 = (rect.y + rect.h).min(self.height as f32) as i32;
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(x, y, color);
            }
        }
    }

    pub fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Rgba) {
        let t = thickness;
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, t), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - t, rect.w, t), color);
        self.fill_rect(Rect::new(rect.x, rect.y + t, t, rect.h - 2.0 * t), color);
        self.fill_rect(Rect::new(rect.x + rect.w - t, rect.y + t, t, rect.h - 2.0 * t), color);
    }

    fn draw_char(&mut self, ch: char, px: i32, py: i32, scale: u32, color: Rgba) {
        let idx = (ch as u32).wrapping_sub(32) as usize;
        let Some(glyph) = FONT_5X7.get(idx) else { return };
        for (col, bits) in glyph.iter().enumerate() {
            for row in 0..GLYPH_HEIGHT {
                if *bits & (1u8 << row) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let x = px + (col as u32 * scale + sx) as i32;
                        let y = py + (row * scale + sy) as i32;
                        self.put(x, y, color);
                    }
                }
            }
        }
    }

    /// Draw a string. Returns the x position after the last character.
    pub fn draw_text(&mut self, text: &str, px: i32, py: i32, scale: u32, color: Rgba) -> i32 {
        let mut x = px;
        for ch in text.chars() {
            self.draw_char(ch, x, py, scale, color);
            x += (GLYPH_ADVANCE * scale) as i32;
        }
        x
    }

    /// Draw `text` centred horizontally in `rect`, vertically centred too.
    pub fn draw_text_centered(&mut self, text: &str, rect: Rect, scale: u32, color: Rgba) {
        let shown = ellipsize(text, rect.w.max(0.0) as u32, scale);
        let w = text_width(&shown, scale) as f32;
        let h = (GLYPH_HEIGHT * scale) as f32;
        let x = rect.x + (rect.w - w) / 2.0;
        let y = rect.y + (rect.h - h) / 2.0;
        self.draw_text(&shown, x as i32, y as i32, scale, color);
    }

    /// Nearest-neighbour blit of `img` stretched to `dst`, clipped to the
    /// canvas and to `clip_top` (rows above it are left untouched).
    pub fn blit(&mut self, img: &DecodedImage, dst: Rect, clip_top: f32) {
        if img.width == 0 || img.height == 0 || dst.w <= 0.0 || dst.h <= 0.0 {
            return;
        }
        let sx_ratio = img.width as f32 / dst.w;
        let sy_ratio = img.height as f32 / dst.h;

        let dx_start = dst.x.max(0.0) as u32;
        let dy_start = dst.y.max(clip_top).max(0.0) as u32;
        let dx_end = ((dst.x + dst.w).ceil().max(0.0) as u32).min(self.width);
        let dy_end = ((dst.y + dst.h).ceil().max(0.0) as u32).min(self.height);

        for dy in dy_start..dy_end {
            let sy = ((dy as f32 - dst.y) * sy_ratio) as u32;
            if sy >= img.height {
                continue;
            }
            for dx in dx_start..dx_end {
                let sx = ((dx as f32 - dst.x) * sx_ratio) as u32;
                if sx >= img.width {
                    continue;
                }
                let si = (sy as usize * img.width as usize + sx as usize) * 4;
                let Some(p) = img.rgba_bytes.get(si..si + 4) else { continue };
                if p[3] > 0 {
                    self.put(dx as i32, dy as i32, (p[0], p[1], p[2], p[3]));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> DecodedImage {
        DecodedImage {
            rgba_bytes: px.repeat((w * h) as usize),
            width: w,
            height: h,
        }
    }

    #[test]
    fn half_alpha_blends_toward_source() {
        let out = blend(rgb(0, 0, 0), (255, 255, 255, 128));
        assert_eq!(out, rgb(128, 128, 128));
        assert_eq!(blend(rgb(1, 2, 3), (9, 9, 9, 255)), rgb(9, 9, 9));
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut buf = vec![0u32; 4 * 4];
        let mut c = Canvas::new(&mut buf, 4, 4);
        c.fill_rect(Rect::new(-2.0, 2.0, 10.0, 10.0), WHITE);
        assert_eq!(buf[0], 0);
        assert!(buf[8..].iter().all(|&p| p == rgb(255, 255, 255)));
    }

    #[test]
    fn blit_stretches_and_respects_clip_top() {
        let img = solid(1, 1, [10, 20, 30, 255]);
        let mut buf = vec![0u32; 4 * 4];
        let mut c = Canvas::new(&mut buf, 4, 4);
        c.blit(&img, Rect::new(0.0, 0.0, 4.0, 4.0), 2.0);
        assert!(buf[..8].iter().all(|&p| p == 0));
        assert!(buf[8..].iter().all(|&p| p == rgb(10, 20, 30)));
    }

    #[test]
    fn ellipsize_marks_truncation() {
        assert_eq!(ellipsize("short", 600, 1), "short");
        assert_eq!(ellipsize("abcdefghij", 36, 1), "abcd..");
        assert_eq!(text_width("abc", 2), 36);
    }
}
