mod encode;
mod error;
mod info;
mod raster;
mod rgb;

pub use encode::{encode, encode_into, EncodedFrame, PixelLayout};
pub use error::{DeviceError, Error, FormatError, Result};
pub use info::{Bitfield, Channel, FbInfo};
pub use raster::RasterImage;
pub use rgb::Rgb;

/// Discovers the geometry of a display device.
pub trait GeometryProbe {
    fn probe(&self) -> core::result::Result<FbInfo, DeviceError>;
}

impl<P: GeometryProbe + ?Sized> GeometryProbe for Box<P> {
    fn probe(&self) -> core::result::Result<FbInfo, DeviceError> {
        (**self).probe()
    }
}

/// Transfers encoded frames into device memory, starting at byte offset 0.
pub trait FrameBufferWrite: Send {
    /// Fails with [`DeviceError::SizeMismatch`] without touching the device when `frame` is not
    /// exactly `info.frame_len()` bytes, or when `info` no longer matches the opened device.
    fn write(&mut self, frame: &[u8], info: &FbInfo) -> core::result::Result<(), DeviceError>;
}

/// Drawing surface for renderers. Coordinates outside the surface are clipped.
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn write_pixel(&mut self, x: u32, y: u32, color: Rgb);

    fn write_monochrome_pixels(
        &mut self,
        x_pos: u32,
        y_pos: u32,
        pixels: &[&[u8]],
        color: Rgb,
        background: Rgb,
    ) {
        for (y, row) in pixels.iter().enumerate() {
            for (x, byte) in row.iter().enumerate() {
                let rgb = Rgb::from_monochrome(*byte, color, background);
                self.write_pixel(x_pos.saturating_add(x as u32), y_pos.saturating_add(y as u32), rgb);
            }
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
        for py in y..y.saturating_add(height) {
            for px in x..x.saturating_add(width) {
                self.write_pixel(px, py, color);
            }
        }
    }

    fn clear(&mut self, color: Rgb);
}
