use dashfb_framebuffer::{DeviceError, FbInfo, FrameBufferWrite};
use memmap2::{MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Eq, PartialEq, Clone, Copy, Default)]
pub enum WriteStrategy {
    /// Map device memory once and copy every frame into the mapping.
    #[default]
    Mmap,
    /// Open, write and close the device on every frame.
    Stream,
}

pub fn open_writer<P: AsRef<Path>>(
    path: P,
    info: &FbInfo,
    strategy: WriteStrategy,
) -> Result<Box<dyn FrameBufferWrite>, DeviceError> {
    let writer: Box<dyn FrameBufferWrite> = match strategy {
        WriteStrategy::Mmap => Box::new(MmapWriter::open(path, info)?),
        WriteStrategy::Stream => Box::new(StreamWriter::open(path, info)?),
    };
    Ok(writer)
}

fn check_len(frame: &[u8], info: &FbInfo, opened_len: usize) -> Result<(), DeviceError> {
    if frame.len() != info.frame_len() {
        return Err(DeviceError::SizeMismatch {
            expected: info.frame_len(),
            actual: frame.len(),
        });
    }
    if info.frame_len() != opened_len {
        return Err(DeviceError::SizeMismatch {
            expected: opened_len,
            actual: frame.len(),
        });
    }
    Ok(())
}

fn open_rw(path: &Path) -> Result<File, DeviceError> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(DeviceError::from)
}

pub struct MmapWriter {
    map: MmapMut,
    _file: File,
}

impl MmapWriter {
    pub fn open<P: AsRef<Path>>(path: P, info: &FbInfo) -> Result<Self, DeviceError> {
        let file = open_rw(path.as_ref())?;
        let map = unsafe { MmapOptions::new().len(info.frame_len()).map_mut(&file) }
            .map_err(DeviceError::Io)?;
        log::debug!("mapped {} bytes of {}", map.len(), path.as_ref().display());
        Ok(MmapWriter { map, _file: file })
    }
}

impl FrameBufferWrite for MmapWriter {
    fn write(&mut self, frame: &[u8], info: &FbInfo) -> Result<(), DeviceError> {
        check_len(frame, info, self.map.len())?;
        self.map.copy_from_slice(frame);
        Ok(())
    }
}

pub struct StreamWriter {
    path: PathBuf,
    len: usize,
}

impl StreamWriter {
    /// Opens the device once so a missing or unwritable device is reported up front.
    pub fn open<P: AsRef<Path>>(path: P, info: &FbInfo) -> Result<Self, DeviceError> {
        let path = path.as_ref().to_path_buf();
        drop(open_rw(&path)?);
        Ok(StreamWriter {
            path,
            len: info.frame_len(),
        })
    }
}

impl FrameBufferWrite for StreamWriter {
    fn write(&mut self, frame: &[u8], info: &FbInfo) -> Result<(), DeviceError> {
        check_len(frame, info, self.len)?;
        let mut file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(DeviceError::from)?;
        file.write_all(frame)?;
        Ok(())
    }
}
