use crate::error::{FormatError, Result};
use crate::info::{Bitfield, Channel, FbInfo};
use crate::raster::RasterImage;
use crate::rgb::Rgb;
use bit_field::BitField;

/// Rejects the first channel whose bits overlap a channel listed before it.
fn check_disjoint(info: &FbInfo) -> core::result::Result<(), FormatError> {
    let mut seen: u64 = 0;
    for channel in Channel::ALL {
        let field = info.channel(channel);
        if field.is_empty() {
            continue;
        }
        let mask = ((1u64 << field.length) - 1) << field.offset;
        if seen & mask != 0 {
            return Err(FormatError::UnsupportedBitfield(channel, field.offset, field.length));
        }
        seen |= mask;
    }
    Ok(())
}

/// Pixel shapes the encoder knows how to produce.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum PixelLayout {
    /// 5/6/5 bits of red/green/blue at arbitrary offsets in a 16-bit word.
    Rgb565 { red: u32, green: u32, blue: u32 },
    /// 8 bits per colour channel in a 32-bit word, with an optional always-opaque alpha field.
    Rgb888 {
        red: u32,
        green: u32,
        blue: u32,
        alpha: Option<Bitfield>,
    },
}

impl PixelLayout {
    pub fn detect(info: &FbInfo) -> core::result::Result<PixelLayout, FormatError> {
        if info.bits_per_pixel != 16 && info.bits_per_pixel != 32 {
            return Err(FormatError::UnsupportedDepth(info.bits_per_pixel));
        }
        info.validate()?;

        let expect = |channel: Channel, length: u32| {
            let field = info.channel(channel);
            if field.length == length {
                Ok(field.offset)
            } else {
                Err(FormatError::UnsupportedBitfield(channel, field.offset, field.length))
            }
        };

        if info.bits_per_pixel == 16 {
            let red = expect(Channel::Red, 5)?;
            let green = expect(Channel::Green, 6)?;
            let blue = expect(Channel::Blue, 5)?;
            if !info.alpha.is_empty() {
                return Err(FormatError::UnsupportedBitfield(
                    Channel::Alpha,
                    info.alpha.offset,
                    info.alpha.length,
                ));
            }
            check_disjoint(info)?;
            Ok(PixelLayout::Rgb565 { red, green, blue })
        } else {
            let red = expect(Channel::Red, 8)?;
            let green = expect(Channel::Green, 8)?;
            let blue = expect(Channel::Blue, 8)?;
            check_disjoint(info)?;
            let alpha = if info.alpha.is_empty() { None } else { Some(info.alpha) };
            Ok(PixelLayout::Rgb888 { red, green, blue, alpha })
        }
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelLayout::Rgb565 { .. } => 2,
            PixelLayout::Rgb888 { .. } => 4,
        }
    }

    #[inline]
    pub fn pack(&self, color: Rgb) -> u32 {
        match *self {
            PixelLayout::Rgb565 { red, green, blue } => {
                ((color.r as u32 >> 3) << red)
                    | ((color.g as u32 >> 2) << green)
                    | ((color.b as u32 >> 3) << blue)
            }
            PixelLayout::Rgb888 { red, green, blue, alpha } => {
                let mut word =
                    ((color.r as u32) << red) | ((color.g as u32) << green) | ((color.b as u32) << blue);
                if let Some(alpha) = alpha {
                    word.set_bits(alpha.offset as usize..alpha.end() as usize, u32::MAX >> (32 - alpha.length));
                }
                word
            }
        }
    }

    /// Reads a device word back into 8-bit channels. Quantised channels keep their value in the
    /// high bits, so 5- and 6-bit fields come back at most 7 and 3 below the encoded value.
    pub fn unpack(&self, word: u32) -> Rgb {
        let field = |offset: u32, length: u32| -> u8 {
            let value = word.get_bits(offset as usize..(offset + length) as usize);
            (value << (8 - length)) as u8
        };
        match *self {
            PixelLayout::Rgb565 { red, green, blue } => {
                Rgb::new(field(red, 5), field(green, 6), field(blue, 5))
            }
            PixelLayout::Rgb888 { red, green, blue, .. } => {
                Rgb::new(field(red, 8), field(green, 8), field(blue, 8))
            }
        }
    }

    /// Encodes one raster row into the start of `out`; bytes past `row.len() * bpp` stay as they were.
    #[inline]
    fn encode_row(&self, row: &[Rgb], out: &mut [u8]) {
        match self {
            PixelLayout::Rgb565 { .. } => {
                for (px, dst) in row.iter().zip(out.chunks_exact_mut(2)) {
                    dst.copy_from_slice(&(self.pack(*px) as u16).to_le_bytes());
                }
            }
            PixelLayout::Rgb888 { .. } => {
                for (px, dst) in row.iter().zip(out.chunks_exact_mut(4)) {
                    dst.copy_from_slice(&self.pack(*px).to_le_bytes());
                }
            }
        }
    }
}

/// A frame in the device's native byte layout, exactly `stride * height` bytes long.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EncodedFrame {
    bytes: Vec<u8>,
}

impl EncodedFrame {
    pub fn zeroed(info: &FbInfo) -> EncodedFrame {
        EncodedFrame {
            bytes: vec![0; info.frame_len()],
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for EncodedFrame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

fn check_dimensions(raster: &RasterImage, info: &FbInfo) -> core::result::Result<(), FormatError> {
    if raster.width() != info.width || raster.height() != info.height {
        return Err(FormatError::DimensionMismatch {
            expected: (info.width, info.height),
            actual: (raster.width(), raster.height()),
        });
    }
    Ok(())
}

pub fn encode(raster: &RasterImage, info: &FbInfo) -> Result<EncodedFrame> {
    let layout = PixelLayout::detect(info)?;
    check_dimensions(raster, info)?;
    let mut frame = EncodedFrame::zeroed(info);
    encode_rows(&layout, raster, info, &mut frame.bytes);
    Ok(frame)
}

/// Re-encodes into an existing frame, reallocating only when the frame length is wrong.
pub fn encode_into(raster: &RasterImage, info: &FbInfo, frame: &mut EncodedFrame) -> Result<()> {
    let layout = PixelLayout::detect(info)?;
    check_dimensions(raster, info)?;
    if frame.bytes.len() != info.frame_len() {
        frame.bytes.clear();
        frame.bytes.resize(info.frame_len(), 0);
    }
    encode_rows(&layout, raster, info, &mut frame.bytes);
    Ok(())
}

fn encode_rows(layout: &PixelLayout, raster: &RasterImage, info: &FbInfo, out: &mut [u8]) {
    let row_bytes = info.width as usize * layout.bytes_per_pixel();
    for (src, dst) in raster.rows().zip(out.chunks_exact_mut(info.stride as usize)) {
        layout.encode_row(src, &mut dst[..row_bytes]);
    }
    log::trace!("encoded {}x{} frame ({} bytes)", info.width, info.height, out.len());
}
