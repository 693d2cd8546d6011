use dashfb_framebuffer::{Bitfield, DeviceError, FbInfo, GeometryProbe};
use std::fs::{File, OpenOptions};
use std::io;
use std::mem;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

const FBIOGET_VSCREENINFO: u32 = 0x4600;
const FBIOGET_FSCREENINFO: u32 = 0x4602;

/// `struct fb_var_screeninfo` is 40 u32 fields on every architecture.
pub const VAR_SCREENINFO_LEN: usize = 160;
/// `struct fb_fix_screeninfo` is 80 bytes where `unsigned long` is 64-bit and 68 where it is 32-bit.
pub const FIX_SCREENINFO_LEN: usize = 80;
const MIN_FIX_SCREENINFO_LEN: usize = 64;

const XRES: usize = 0;
const YRES: usize = 4;
const BITS_PER_PIXEL: usize = 24;
const RED: usize = 48;
const GREEN: usize = 60;
const BLUE: usize = 72;
const TRANSP: usize = 84;

/// `line_length` follows `id[16]`, `smem_start`, four u32 and three u16 fields.
const LINE_LENGTH: usize = line_length_offset(mem::size_of::<libc::c_ulong>());

const fn line_length_offset(ulong: usize) -> usize {
    let end = 16 + ulong + 4 * 4 + 2 * 3;
    (end + 3) & !3
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct VarScreenInfo {
    pub xres: u32,
    pub yres: u32,
    pub bits_per_pixel: u32,
    pub red: Bitfield,
    pub green: Bitfield,
    pub blue: Bitfield,
    pub transp: Bitfield,
}

#[inline]
fn read_u32(buf: &[u8], at: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(word)
}

/// Reads the `(offset, length, msb_right)` triple at `at`; `msb_right` is ignored.
#[inline]
fn read_bitfield(buf: &[u8], at: usize) -> Bitfield {
    Bitfield::new(read_u32(buf, at), read_u32(buf, at + 4))
}

pub fn parse_var_screeninfo(buf: &[u8]) -> Result<VarScreenInfo, DeviceError> {
    if buf.len() < VAR_SCREENINFO_LEN {
        return Err(DeviceError::NotFound);
    }
    Ok(VarScreenInfo {
        xres: read_u32(buf, XRES),
        yres: read_u32(buf, YRES),
        bits_per_pixel: read_u32(buf, BITS_PER_PIXEL),
        red: read_bitfield(buf, RED),
        green: read_bitfield(buf, GREEN),
        blue: read_bitfield(buf, BLUE),
        transp: read_bitfield(buf, TRANSP),
    })
}

/// Returns `line_length`, the row stride in bytes.
pub fn parse_fix_screeninfo(buf: &[u8]) -> Result<u32, DeviceError> {
    if buf.len() < MIN_FIX_SCREENINFO_LEN.max(LINE_LENGTH + 4) {
        return Err(DeviceError::NotFound);
    }
    Ok(read_u32(buf, LINE_LENGTH))
}

/// Fails when `line_length` is zero and `xres * bpp/8` does not fit in a u32.
pub fn geometry(var: &VarScreenInfo, line_length: u32) -> Result<FbInfo, DeviceError> {
    let stride = if line_length == 0 {
        var.xres
            .checked_mul(var.bits_per_pixel / 8)
            .ok_or_else(|| DeviceError::InvalidAttribute {
                name: "xres",
                value: var.xres.to_string(),
            })?
    } else {
        line_length
    };
    Ok(FbInfo {
        width: var.xres,
        height: var.yres,
        bits_per_pixel: var.bits_per_pixel,
        stride,
        red: var.red,
        green: var.green,
        blue: var.blue,
        alpha: var.transp,
    })
}

/// Queries an already opened framebuffer device.
pub fn query(file: &File) -> Result<FbInfo, DeviceError> {
    let fd = file.as_raw_fd();
    let mut var = [0u8; VAR_SCREENINFO_LEN];
    let mut fix = [0u8; FIX_SCREENINFO_LEN];
    unsafe {
        if libc::ioctl(fd, FBIOGET_VSCREENINFO as _, var.as_mut_ptr()) < 0 {
            log::debug!("FBIOGET_VSCREENINFO failed: {}", io::Error::last_os_error());
            return Err(DeviceError::NotFound);
        }
        if libc::ioctl(fd, FBIOGET_FSCREENINFO as _, fix.as_mut_ptr()) < 0 {
            log::debug!("FBIOGET_FSCREENINFO failed: {}", io::Error::last_os_error());
            return Err(DeviceError::NotFound);
        }
    }
    let var = parse_var_screeninfo(&var)?;
    let line_length = parse_fix_screeninfo(&fix)?;
    geometry(&var, line_length)
}

/// Structured probe: asks the fbdev driver for its variable and fixed screen info.
pub struct IoctlProbe {
    path: PathBuf,
}

impl IoctlProbe {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        IoctlProbe {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl GeometryProbe for IoctlProbe {
    fn probe(&self) -> Result<FbInfo, DeviceError> {
        let file = OpenOptions::new()
            .read(true)
            .open(&self.path)
            .map_err(DeviceError::from_open)?;
        let info = query(&file)?;
        log::debug!("{}: {}", self.path.display(), info);
        Ok(info)
    }
}
