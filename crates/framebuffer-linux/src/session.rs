use crate::sysfs::{SysfsProbe, DEFAULT_ATTRIBUTE_DIR};
use crate::writer::{open_writer, WriteStrategy};
use dashfb_framebuffer::{
    encode, encode_into, DeviceError, EncodedFrame, FbInfo, FrameBufferWrite, GeometryProbe,
    RasterImage, Result,
};
use spin::{Mutex, MutexGuard};
use std::path::PathBuf;

pub const DEFAULT_DEVICE: &str = "/dev/fb0";

#[derive(Debug, Eq, PartialEq, Clone, Copy, Default)]
pub enum ProbeStrategy {
    /// Structured where the platform has the fbdev ioctls, attribute files elsewhere.
    #[default]
    Auto,
    Structured,
    Attributes,
}

impl ProbeStrategy {
    pub fn resolve(self) -> ProbeStrategy {
        match self {
            ProbeStrategy::Auto if cfg!(target_os = "linux") => ProbeStrategy::Structured,
            ProbeStrategy::Auto => ProbeStrategy::Attributes,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DeviceConfig {
    pub device: PathBuf,
    pub attributes: PathBuf,
    pub probe: ProbeStrategy,
    pub write: WriteStrategy,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            device: PathBuf::from(DEFAULT_DEVICE),
            attributes: PathBuf::from(DEFAULT_ATTRIBUTE_DIR),
            probe: ProbeStrategy::Auto,
            write: WriteStrategy::Mmap,
        }
    }
}

/// Builds the probe for `config`. The structured probe only exists on Linux builds.
pub fn geometry_probe(config: &DeviceConfig) -> Box<dyn GeometryProbe + Send> {
    match config.probe.resolve() {
        #[cfg(target_os = "linux")]
        ProbeStrategy::Structured => Box::new(crate::ioctl::IoctlProbe::new(&config.device)),
        _ => Box::new(SysfsProbe::new(&config.attributes)),
    }
}

/// A device whose geometry is known but whose memory is not acquired yet.
pub struct ProbedDevice {
    config: DeviceConfig,
    probe: Box<dyn GeometryProbe + Send>,
    info: FbInfo,
}

impl ProbedDevice {
    pub fn probe(config: DeviceConfig) -> core::result::Result<ProbedDevice, DeviceError> {
        let probe = geometry_probe(&config);
        Self::with_probe(config, probe)
    }

    pub fn with_probe(
        config: DeviceConfig,
        probe: Box<dyn GeometryProbe + Send>,
    ) -> core::result::Result<ProbedDevice, DeviceError> {
        let info = probe.probe()?;
        log::info!("{}: {}", config.device.display(), info);
        Ok(ProbedDevice { config, probe, info })
    }

    #[inline]
    pub fn info(&self) -> &FbInfo {
        &self.info
    }

    /// Resizes `raster` to the display if needed and encodes it.
    pub fn encode(&self, raster: &RasterImage) -> Result<EncodedFrame> {
        encode(&raster.fit_to(&self.info), &self.info)
    }

    pub fn open(self) -> core::result::Result<ReadyDevice, DeviceError> {
        let writer = open_writer(&self.config.device, &self.info, self.config.write)?;
        log::debug!("{} opened ({:?})", self.config.device.display(), self.config.write);
        Ok(ReadyDevice {
            frame: EncodedFrame::zeroed(&self.info),
            config: self.config,
            probe: self.probe,
            info: self.info,
            writer,
        })
    }
}

/// A device with its memory acquired. Dropping it (or [`ReadyDevice::close`]) releases the handle.
pub struct ReadyDevice {
    config: DeviceConfig,
    probe: Box<dyn GeometryProbe + Send>,
    info: FbInfo,
    writer: Box<dyn FrameBufferWrite>,
    frame: EncodedFrame,
}

impl ReadyDevice {
    #[inline]
    pub fn info(&self) -> &FbInfo {
        &self.info
    }

    /// Resize-to-fit, encode into the reusable frame and write it.
    pub fn blit(&mut self, raster: &RasterImage) -> Result<()> {
        encode_into(&raster.fit_to(&self.info), &self.info, &mut self.frame)?;
        self.writer.write(self.frame.as_bytes(), &self.info)?;
        Ok(())
    }

    pub fn write(&mut self, frame: &[u8]) -> core::result::Result<(), DeviceError> {
        self.writer.write(frame, &self.info)
    }

    /// Probes again and reopens the device if the geometry changed. Returns whether it did.
    /// On error the previous geometry and handle are kept.
    pub fn reprobe(&mut self) -> core::result::Result<bool, DeviceError> {
        let info = self.probe.probe()?;
        if info == self.info {
            return Ok(false);
        }
        log::info!("{}: geometry changed to {}", self.config.device.display(), info);
        self.writer = open_writer(&self.config.device, &info, self.config.write)?;
        self.info = info;
        self.frame = EncodedFrame::zeroed(&info);
        Ok(true)
    }

    pub fn close(self) {
        log::debug!("{} closed", self.config.device.display());
    }
}

/// Serialises blits from several producers; a reprobe and the write that follows it happen
/// under one lock.
pub struct SharedDevice {
    inner: Mutex<ReadyDevice>,
}

impl SharedDevice {
    pub fn new(device: ReadyDevice) -> Self {
        SharedDevice {
            inner: Mutex::new(device),
        }
    }

    pub fn info(&self) -> FbInfo {
        *self.inner.lock().info()
    }

    pub fn blit(&self, raster: &RasterImage) -> Result<()> {
        self.inner.lock().blit(raster)
    }

    pub fn reprobe_and_blit(&self, raster: &RasterImage) -> Result<()> {
        let mut device = self.inner.lock();
        device.reprobe()?;
        device.blit(raster)
    }

    pub fn lock(&self) -> MutexGuard<'_, ReadyDevice> {
        self.inner.lock()
    }

    pub fn into_inner(self) -> ReadyDevice {
        self.inner.into_inner()
    }
}
