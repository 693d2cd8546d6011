use crate::error::FormatError;
use std::fmt::{self, Display};

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha];
}

impl Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
            Channel::Alpha => "alpha",
        })
    }
}

/// Location of one channel inside a pixel's bit pattern.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Default)]
pub struct Bitfield {
    pub offset: u32,
    pub length: u32,
}

impl Bitfield {
    pub const NONE: Bitfield = Bitfield::new(0, 0);

    #[inline]
    pub const fn new(offset: u32, length: u32) -> Bitfield {
        Bitfield { offset, length }
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.offset.saturating_add(self.length)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Display geometry as reported by a probe. Fixed for the lifetime of a session.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct FbInfo {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    /// Bytes per row, including any alignment padding.
    pub stride: u32,
    pub red: Bitfield,
    pub green: Bitfield,
    pub blue: Bitfield,
    pub alpha: Bitfield,
}

impl FbInfo {
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel as usize / 8
    }

    /// Length of the pixel data in one row, without padding.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Length in bytes of a full encoded frame.
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.stride as usize * self.height as usize
    }

    pub fn channel(&self, channel: Channel) -> Bitfield {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
            Channel::Alpha => self.alpha,
        }
    }

    /// Checks the size invariants and that every channel fits inside one pixel.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.width == 0 || self.height == 0 || (self.stride as usize) < self.row_bytes() {
            return Err(FormatError::InvalidGeometry {
                width: self.width,
                height: self.height,
                stride: self.stride,
            });
        }
        for channel in Channel::ALL {
            let field = self.channel(channel);
            if field.end() > self.bits_per_pixel {
                return Err(FormatError::UnsupportedBitfield(
                    channel,
                    field.offset,
                    field.length,
                ));
            }
        }
        Ok(())
    }
}

impl Display for FbInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{} bpp={} stride={} r={}/{} g={}/{} b={}/{} a={}/{}",
            self.width,
            self.height,
            self.bits_per_pixel,
            self.stride,
            self.red.offset,
            self.red.length,
            self.green.offset,
            self.green.length,
            self.blue.offset,
            self.blue.length,
            self.alpha.offset,
            self.alpha.length,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb565(width: u32, height: u32, stride: u32) -> FbInfo {
        FbInfo {
            width,
            height,
            bits_per_pixel: 16,
            stride,
            red: Bitfield::new(11, 5),
            green: Bitfield::new(5, 6),
            blue: Bitfield::new(0, 5),
            alpha: Bitfield::NONE,
        }
    }

    #[test]
    fn frame_len_includes_padding() {
        let info = rgb565(10, 4, 32);
        assert_eq!(info.row_bytes(), 20);
        assert_eq!(info.frame_len(), 128);
    }

    #[test]
    fn short_stride_is_invalid() {
        assert_eq!(
            rgb565(10, 4, 19).validate(),
            Err(FormatError::InvalidGeometry { width: 10, height: 4, stride: 19 })
        );
        assert!(rgb565(0, 4, 20).validate().is_err());
        assert!(rgb565(10, 4, 20).validate().is_ok());
    }

    #[test]
    fn field_past_pixel_end_is_rejected() {
        let mut info = rgb565(10, 4, 20);
        info.red = Bitfield::new(12, 5);
        assert_eq!(
            info.validate(),
            Err(FormatError::UnsupportedBitfield(Channel::Red, 12, 5))
        );
    }
}
