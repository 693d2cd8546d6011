use crate::info::Channel;
use std::fmt::{self, Display};
use std::io;

#[derive(Debug)]
pub enum DeviceError {
    NotFound,
    PermissionDenied,
    SizeMismatch { expected: usize, actual: usize },
    InvalidAttribute { name: &'static str, value: String },
    Io(io::Error),
}

impl DeviceError {
    /// Classifies an error raised while opening or querying the device.
    pub fn from_open(err: io::Error) -> DeviceError {
        match err.kind() {
            io::ErrorKind::PermissionDenied => DeviceError::PermissionDenied,
            _ => DeviceError::NotFound,
        }
    }
}

impl From<io::Error> for DeviceError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => DeviceError::NotFound,
            io::ErrorKind::PermissionDenied => DeviceError::PermissionDenied,
            _ => DeviceError::Io(err),
        }
    }
}

impl Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeviceError::NotFound => f.write_str("framebuffer device not found"),
            DeviceError::PermissionDenied => f.write_str("permission denied on framebuffer device"),
            DeviceError::SizeMismatch { expected, actual } => write!(
                f,
                "frame is {} bytes but the device expects {} (re-probe the geometry)",
                actual, expected
            ),
            DeviceError::InvalidAttribute { name, value } => {
                write!(f, "attribute {} has unexpected value {:?}", name, value)
            }
            DeviceError::Io(e) => write!(f, "framebuffer i/o error: {}", e),
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum FormatError {
    UnsupportedDepth(u32),
    UnsupportedBitfield(Channel, u32, u32),
    InvalidGeometry { width: u32, height: u32, stride: u32 },
    DimensionMismatch { expected: (u32, u32), actual: (u32, u32) },
}

impl Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormatError::UnsupportedDepth(bpp) => {
                write!(f, "unsupported framebuffer depth {} bpp (need 16 or 32)", bpp)
            }
            FormatError::UnsupportedBitfield(channel, offset, length) => write!(
                f,
                "unsupported {} bitfield: offset {} length {}",
                channel, offset, length
            ),
            FormatError::InvalidGeometry { width, height, stride } => write!(
                f,
                "invalid geometry {}x{} with stride {}",
                width, height, stride
            ),
            FormatError::DimensionMismatch { expected, actual } => write!(
                f,
                "raster is {}x{} but the display is {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
        }
    }
}

impl std::error::Error for FormatError {}

#[derive(Debug)]
pub enum Error {
    Device(DeviceError),
    Format(FormatError),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Device(e) => Display::fmt(e, f),
            Error::Format(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Device(e) => Some(e),
            Error::Format(e) => Some(e),
        }
    }
}

impl From<DeviceError> for Error {
    fn from(err: DeviceError) -> Self {
        Error::Device(err)
    }
}

impl From<FormatError> for Error {
    fn from(err: FormatError) -> Self {
        Error::Format(err)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
