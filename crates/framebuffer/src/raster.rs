use crate::info::FbInfo;
use crate::rgb::Rgb;
use crate::Canvas;
use std::borrow::Cow;

/// Row-major 8-bit RGB image produced by a renderer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, fill: Rgb) -> RasterImage {
        RasterImage {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// Returns `None` when `pixels` does not hold exactly `width * height` entries.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb>) -> Option<RasterImage> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(RasterImage { width, height, pixels })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels[idx] = color;
    }

    pub fn row(&self, y: u32) -> &[Rgb] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        // chunks_exact panics on 0
        self.pixels.chunks_exact(self.width.max(1) as usize)
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Nearest-neighbour resample to `width` x `height`.
    pub fn resize(&self, width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        if self.width == 0 || self.height == 0 {
            pixels.resize(width as usize * height as usize, Rgb::BLACK);
            return RasterImage { width, height, pixels };
        }
        let xs: Vec<u32> = (0..width)
            .map(|x| nearest(x, width, self.width))
            .collect();
        for y in 0..height {
            let row = self.row(nearest(y, height, self.height));
            pixels.extend(xs.iter().map(|&sx| row[sx as usize]));
        }
        RasterImage { width, height, pixels }
    }

    /// Borrows `self` when it already matches the display, resamples otherwise.
    pub fn fit_to(&self, info: &FbInfo) -> Cow<'_, RasterImage> {
        if self.width == info.width && self.height == info.height {
            Cow::Borrowed(self)
        } else {
            log::debug!(
                "resizing raster {}x{} -> {}x{}",
                self.width,
                self.height,
                info.width,
                info.height
            );
            Cow::Owned(self.resize(info.width, info.height))
        }
    }
}

/// Source index whose pixel centre is closest to the centre of `dst` in the target grid.
#[inline]
fn nearest(dst: u32, dst_len: u32, src_len: u32) -> u32 {
    let src = ((2 * dst as u64 + 1) * src_len as u64) / (2 * dst_len as u64);
    (src as u32).min(src_len - 1)
}

impl Canvas for RasterImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn write_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        if x < self.width && y < self.height {
            self.set_pixel(x, y, color);
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        if x >= x_end {
            return;
        }
        for row in y..y_end {
            let start = row as usize * self.width as usize;
            self.pixels[start + x as usize..start + x_end as usize].fill(color);
        }
    }

    fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> RasterImage {
        let pixels = vec![Rgb::RED, Rgb::GREEN, Rgb::YELLOW, Rgb::WHITE];
        RasterImage::from_pixels(2, 2, pixels).unwrap()
    }

    #[test]
    fn from_pixels_checks_length() {
        assert!(RasterImage::from_pixels(3, 2, vec![Rgb::BLACK; 5]).is_none());
        assert!(RasterImage::from_pixels(3, 2, vec![Rgb::BLACK; 6]).is_some());
    }

    #[test]
    fn upscale_repeats_pixels() {
        let big = checker().resize(4, 4);
        assert_eq!(big.row(0), &[Rgb::RED, Rgb::RED, Rgb::GREEN, Rgb::GREEN]);
        assert_eq!(big.row(1), &[Rgb::RED, Rgb::RED, Rgb::GREEN, Rgb::GREEN]);
        assert_eq!(big.row(3), &[Rgb::YELLOW, Rgb::YELLOW, Rgb::WHITE, Rgb::WHITE]);
    }

    #[test]
    fn downscale_samples_nearest() {
        let mut src = RasterImage::new(4, 1, Rgb::BLACK);
        for x in 0..4 {
            src.set_pixel(x, 0, Rgb::new(x as u8, 0, 0));
        }
        let small = src.resize(2, 1);
        assert_eq!(small.row(0), &[Rgb::new(1, 0, 0), Rgb::new(3, 0, 0)]);
    }

    #[test]
    fn fit_to_borrows_matching_raster() {
        let info = FbInfo {
            width: 2,
            height: 2,
            bits_per_pixel: 16,
            stride: 4,
            red: Default::default(),
            green: Default::default(),
            blue: Default::default(),
            alpha: Default::default(),
        };
        let raster = checker();
        assert!(matches!(raster.fit_to(&info), Cow::Borrowed(_)));
        let info = FbInfo { width: 3, ..info };
        let fitted = raster.fit_to(&info);
        assert_eq!((fitted.width(), fitted.height()), (3, 2));
    }

    #[test]
    fn canvas_drawing_clips() {
        let mut raster = RasterImage::new(4, 3, Rgb::BLACK);
        raster.fill_rect(2, 1, 10, 10, Rgb::RED);
        raster.write_pixel(9, 9, Rgb::WHITE);
        assert_eq!(raster.row(0), &[Rgb::BLACK; 4]);
        assert_eq!(raster.row(2), &[Rgb::BLACK, Rgb::BLACK, Rgb::RED, Rgb::RED]);
        raster.clear(Rgb::GREEN);
        assert!(raster.pixels().iter().all(|p| *p == Rgb::GREEN));
    }

    #[test]
    fn monochrome_glyph_is_blended() {
        let mut raster = RasterImage::new(3, 2, Rgb::BLACK);
        let glyph: [&[u8]; 2] = [&[0, 255], &[255, 0]];
        raster.write_monochrome_pixels(1, 0, &glyph, Rgb::WHITE, Rgb::BLACK);
        assert_eq!(raster.row(0), &[Rgb::BLACK, Rgb::BLACK, Rgb::WHITE]);
        assert_eq!(raster.row(1), &[Rgb::BLACK, Rgb::WHITE, Rgb::BLACK]);
    }

    #[test]
    fn monochrome_glyph_near_the_edge_of_coordinates_is_clipped() {
        let mut raster = RasterImage::new(3, 2, Rgb::BLACK);
        let glyph: [&[u8]; 2] = [&[255, 255], &[255, 255]];
        raster.write_monochrome_pixels(u32::MAX - 1, u32::MAX, &glyph, Rgb::WHITE, Rgb::BLACK);
        assert!(raster.pixels().iter().all(|p| *p == Rgb::BLACK));
    }
}
