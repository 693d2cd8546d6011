use dashfb_framebuffer::{Bitfield, DeviceError, FbInfo, GeometryProbe};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_ATTRIBUTE_DIR: &str = "/sys/class/graphics/fb0";

const VIRTUAL_SIZE: &str = "virtual_size";
const BITS_PER_PIXEL: &str = "bits_per_pixel";
const STRIDE: &str = "stride";

/// Attribute files carry no channel layout, so RGB565 is assumed.
pub const ASSUMED_RED: Bitfield = Bitfield::new(11, 5);
pub const ASSUMED_GREEN: Bitfield = Bitfield::new(5, 6);
pub const ASSUMED_BLUE: Bitfield = Bitfield::new(0, 5);

/// Attribute-file probe over a sysfs graphics class directory.
///
/// Geometry comes from `virtual_size` and `bits_per_pixel`, with an optional `stride`. Channel
/// bitfields cannot be discovered this way; every probe reports [`ASSUMED_RED`],
/// [`ASSUMED_GREEN`] and [`ASSUMED_BLUE`] with no alpha.
pub struct SysfsProbe {
    dir: PathBuf,
}

impl SysfsProbe {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        SysfsProbe {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn read(&self, name: &'static str) -> Result<Option<String>, DeviceError> {
        match fs::read_to_string(self.dir.join(name)) {
            Ok(text) => Ok(Some(text.trim().to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DeviceError::from_open(e)),
        }
    }

    fn require(&self, name: &'static str) -> Result<String, DeviceError> {
        self.read(name)?.ok_or_else(|| {
            log::debug!("{}: missing attribute {}", self.dir.display(), name);
            DeviceError::NotFound
        })
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<u32, DeviceError> {
    value.trim().parse().map_err(|_| DeviceError::InvalidAttribute {
        name,
        value: value.to_string(),
    })
}

pub fn parse_virtual_size(value: &str) -> Result<(u32, u32), DeviceError> {
    let invalid = || DeviceError::InvalidAttribute {
        name: VIRTUAL_SIZE,
        value: value.to_string(),
    };
    let (w, h) = value.split_once(',').ok_or_else(invalid)?;
    let w = w.trim().parse().map_err(|_| invalid())?;
    let h = h.trim().parse().map_err(|_| invalid())?;
    Ok((w, h))
}

impl GeometryProbe for SysfsProbe {
    fn probe(&self) -> Result<FbInfo, DeviceError> {
        let (width, height) = parse_virtual_size(&self.require(VIRTUAL_SIZE)?)?;
        let bits_per_pixel = parse_number(BITS_PER_PIXEL, &self.require(BITS_PER_PIXEL)?)?;
        let stride = match self.read(STRIDE)? {
            Some(stride) => parse_number(STRIDE, &stride)?,
            None => width.checked_mul(bits_per_pixel / 8).ok_or_else(|| {
                DeviceError::InvalidAttribute {
                    name: VIRTUAL_SIZE,
                    value: format!("{},{}", width, height),
                }
            })?,
        };
        let info = FbInfo {
            width,
            height,
            bits_per_pixel,
            stride,
            red: ASSUMED_RED,
            green: ASSUMED_GREEN,
            blue: ASSUMED_BLUE,
            alpha: Bitfield::NONE,
        };
        log::debug!("{}: {} (assumed RGB565 layout)", self.dir.display(), info);
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TempDir;

    #[test]
    fn reads_attributes_with_stride() {
        let dir = TempDir::new("sysfs-stride");
        dir.write("virtual_size", b"800,480\n");
        dir.write("bits_per_pixel", b"16\n");
        dir.write("stride", b"1664\n");
        let info = SysfsProbe::new(dir.path()).probe().unwrap();
        assert_eq!((info.width, info.height, info.bits_per_pixel, info.stride), (800, 480, 16, 1664));
        assert_eq!(info.red, Bitfield::new(11, 5));
        assert_eq!(info.green, Bitfield::new(5, 6));
        assert_eq!(info.blue, Bitfield::new(0, 5));
        assert!(info.alpha.is_empty());
    }

    #[test]
    fn derives_missing_stride() {
        let dir = TempDir::new("sysfs-derive");
        dir.write("virtual_size", b"640,480");
        dir.write("bits_per_pixel", b"32");
        let info = SysfsProbe::new(dir.path()).probe().unwrap();
        assert_eq!(info.stride, 2560);
    }

    #[test]
    fn oversized_width_is_reported() {
        let dir = TempDir::new("sysfs-overflow");
        dir.write("virtual_size", b"2000000000,1");
        dir.write("bits_per_pixel", b"32");
        assert!(matches!(
            SysfsProbe::new(dir.path()).probe(),
            Err(DeviceError::InvalidAttribute { name: "virtual_size", .. })
        ));
    }

    #[test]
    fn missing_attributes_are_not_found() {
        let dir = TempDir::new("sysfs-missing");
        dir.write("virtual_size", b"640,480");
        assert!(matches!(SysfsProbe::new(dir.path()).probe(), Err(DeviceError::NotFound)));
        assert!(matches!(
            SysfsProbe::new(dir.path().join("nope")).probe(),
            Err(DeviceError::NotFound)
        ));
    }

    #[test]
    fn malformed_attributes_are_reported() {
        assert!(matches!(
            parse_virtual_size("640x480"),
            Err(DeviceError::InvalidAttribute { name: "virtual_size", .. })
        ));
        assert_eq!(parse_virtual_size(" 1024 , 600 ").unwrap(), (1024, 600));

        let dir = TempDir::new("sysfs-bad-bpp");
        dir.write("virtual_size", b"640,480");
        dir.write("bits_per_pixel", b"sixteen");
        assert!(matches!(
            SysfsProbe::new(dir.path()).probe(),
            Err(DeviceError::InvalidAttribute { name: "bits_per_pixel", .. })
        ));
    }
}
