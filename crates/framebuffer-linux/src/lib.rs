mod cursor;
#[cfg(target_os = "linux")]
mod ioctl;
mod session;
mod sysfs;
mod writer;

#[cfg(test)]
mod testutil;

pub use cursor::{CursorGuard, CURSOR_BLINK};
#[cfg(target_os = "linux")]
pub use ioctl::{
    geometry, parse_fix_screeninfo, parse_var_screeninfo, query, IoctlProbe, VarScreenInfo,
    FIX_SCREENINFO_LEN, VAR_SCREENINFO_LEN,
};
pub use session::{
    geometry_probe, DeviceConfig, ProbeStrategy, ProbedDevice, ReadyDevice, SharedDevice,
    DEFAULT_DEVICE,
};
pub use sysfs::{
    parse_virtual_size, SysfsProbe, ASSUMED_BLUE, ASSUMED_GREEN, ASSUMED_RED,
    DEFAULT_ATTRIBUTE_DIR,
};
pub use writer::{open_writer, MmapWriter, StreamWriter, WriteStrategy};
