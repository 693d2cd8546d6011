use dashfb_framebuffer::{Canvas, Rgb};
use noto_sans_mono_bitmap::{get_raster, get_raster_width, FontWeight, RasterHeight};

const FONT_WEIGHT: FontWeight = FontWeight::Regular;
const FONT_HEIGHT: RasterHeight = RasterHeight::Size24;
const MARGIN: u32 = 8;

pub fn text_width(text: &str) -> u32 {
    text.chars().count() as u32 * get_raster_width(FONT_WEIGHT, FONT_HEIGHT) as u32
}

pub fn draw_text<C: Canvas>(canvas: &mut C, x: u32, y: u32, text: &str, color: Rgb, background: Rgb) {
    let mut x = x;
    for c in text.chars() {
        let glyph = get_raster(c, FONT_WEIGHT, FONT_HEIGHT)
            .or_else(|| get_raster('?', FONT_WEIGHT, FONT_HEIGHT));
        if let Some(glyph) = glyph {
            canvas.write_monochrome_pixels(x, y, glyph.raster(), color, background);
            x += glyph.width() as u32;
        }
    }
}

/// Filled box with `text` centred inside it.
pub fn draw_box_text<C: Canvas>(
    canvas: &mut C,
    (x, y, w, h): (u32, u32, u32, u32),
    box_color: Rgb,
    text: &str,
    text_color: Rgb,
) {
    canvas.fill_rect(x, y, w, h, box_color);
    let tx = x + w.saturating_sub(text_width(text)) / 2;
    let ty = y + h.saturating_sub(FONT_HEIGHT.val() as u32) / 2;
    draw_text(canvas, tx, ty, text, text_color, box_color);
}

/// Static status screen: a title bar and a row of labelled tiles.
pub struct Dashboard {
    tiles: Vec<(&'static str, Rgb)>,
}

impl Dashboard {
    pub fn new() -> Self {
        Dashboard {
            tiles: vec![
                ("RPM", Rgb::GREEN),
                ("SPEED", Rgb::TERPS_GOLD),
                ("COOLANT", Rgb::ORANGE),
                ("BATTERY", Rgb::TERPS_RED),
            ],
        }
    }

    pub fn render<C: Canvas>(&self, canvas: &mut C, frame: u64) {
        let (width, height) = (canvas.width(), canvas.height());
        canvas.clear(Rgb::DARK_GRAY);

        let title_h = (FONT_HEIGHT.val() as u32 + 2 * MARGIN).min(height);
        draw_box_text(canvas, (0, 0, width, title_h), Rgb::PRUSSIAN_BLUE, "DASHFB", Rgb::WHITE);

        let count = self.tiles.len() as u32;
        let tile_w = width.saturating_sub(MARGIN * (count + 1)) / count;
        let tile_h = height.saturating_sub(title_h + 3 * MARGIN + FONT_HEIGHT.val() as u32);
        for (i, (label, color)) in self.tiles.iter().enumerate() {
            let x = MARGIN + i as u32 * (tile_w + MARGIN);
            draw_box_text(canvas, (x, title_h + MARGIN, tile_w, tile_h), *color, label, Rgb::BLACK);
        }

        let status = format!("FRAME {}", frame);
        let y = height.saturating_sub(FONT_HEIGHT.val() as u32 + MARGIN);
        draw_text(canvas, MARGIN, y, &status, Rgb::LIGHT_GRAY, Rgb::DARK_GRAY);
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashfb_framebuffer::RasterImage;

    #[test]
    fn box_text_keeps_box_colour_around_label() {
        let mut raster = RasterImage::new(200, 60, Rgb::BLACK);
        draw_box_text(&mut raster, (10, 10, 180, 40), Rgb::GREEN, "HI", Rgb::BLACK);
        assert_eq!(raster.pixel(11, 11), Rgb::GREEN);
        assert_eq!(raster.pixel(189, 49), Rgb::GREEN);
        assert_eq!(raster.pixel(5, 5), Rgb::BLACK);
        let ink = (10..50)
            .flat_map(|y| (10..190).map(move |x| (x, y)))
            .filter(|&(x, y)| raster.pixel(x, y) != Rgb::GREEN)
            .count();
        assert!(ink > 0);
    }

    #[test]
    fn renders_on_small_and_large_rasters() {
        let dashboard = Dashboard::new();
        for (w, h) in [(800, 480), (64, 32), (1, 1)] {
            let mut raster = RasterImage::new(w, h, Rgb::BLACK);
            dashboard.render(&mut raster, 7);
            assert_ne!(raster.pixel(0, h - 1), Rgb::BLACK);
        }
    }
}
