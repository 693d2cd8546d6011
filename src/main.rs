mod config;
mod dashboard;

use anyhow::{Context, Result};
use config::Config;
use dashboard::Dashboard;
use dashfb_framebuffer::{RasterImage, Rgb};
use dashfb_framebuffer_linux::{CursorGuard, ProbedDevice, ReadyDevice};
use dashfb_logging::Logger;
use log::{info, warn};
use std::io;
use std::thread;
use std::time::Instant;

/// Frames between geometry checks.
const REPROBE_EVERY: u64 = 30;

/// Re-probes the device and reallocates `raster` when the display geometry changed.
/// A failed probe keeps the current geometry.
fn refresh_geometry(ready: &mut ReadyDevice, raster: &mut RasterImage) -> bool {
    match ready.reprobe() {
        Ok(true) => {
            let info = ready.info();
            *raster = RasterImage::new(info.width, info.height, Rgb::BLACK);
            true
        }
        Ok(false) => false,
        Err(e) => {
            warn!("re-probe failed, keeping {}: {}", ready.info(), e);
            false
        }
    }
}

fn main() -> Result<()> {
    let config = Config::from_env()?;
    Logger::new(io::stderr())
        .set_max_level(config.log_level)
        .init()
        .context("failed to install logger")?;
    dashfb_logging::install_panic_hook();

    let device = config.device.device.clone();
    let mut ready = ProbedDevice::probe(config.device.clone())
        .with_context(|| format!("failed to probe {}", device.display()))?
        .open()
        .with_context(|| format!("failed to open {}", device.display()))?;
    let _cursor = CursorGuard::hide();

    let dashboard = Dashboard::new();
    let mut raster = RasterImage::new(ready.info().width, ready.info().height, Rgb::BLACK);
    let interval = config.frame_interval();
    let mut frame: u64 = 0;

    loop {
        let started = Instant::now();
        if frame != 0 && frame % REPROBE_EVERY == 0 {
            refresh_geometry(&mut ready, &mut raster);
        }
        dashboard.render(&mut raster, frame);
        ready.blit(&raster).context("failed to blit frame")?;

        frame += 1;
        if config.frames != 0 && frame >= config.frames {
            break;
        }
        let Some(interval) = interval else { break };
        if let Some(rest) = interval.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    info!("drew {} frames", frame);
    ready.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashfb_framebuffer::{Bitfield, DeviceError, FbInfo, GeometryProbe};
    use dashfb_framebuffer_linux::{DeviceConfig, ProbeStrategy, WriteStrategy};
    use std::fs;
    use std::sync::{Arc, Mutex};

    struct SwappableProbe(Arc<Mutex<Option<FbInfo>>>);

    impl GeometryProbe for SwappableProbe {
        fn probe(&self) -> core::result::Result<FbInfo, DeviceError> {
            self.0.lock().unwrap().ok_or(DeviceError::NotFound)
        }
    }

    fn rgb565(width: u32, height: u32) -> FbInfo {
        FbInfo {
            width,
            height,
            bits_per_pixel: 16,
            stride: width * 2,
            red: Bitfield::new(11, 5),
            green: Bitfield::new(5, 6),
            blue: Bitfield::new(0, 5),
            alpha: Bitfield::NONE,
        }
    }

    #[test]
    fn geometry_change_rebuilds_raster() {
        let device = std::env::temp_dir().join(format!("dashfb-main-{}", std::process::id()));
        fs::write(&device, vec![0u8; 64]).unwrap();
        let shared = Arc::new(Mutex::new(Some(rgb565(4, 2))));
        let config = DeviceConfig {
            device: device.clone(),
            attributes: device.clone(),
            probe: ProbeStrategy::Attributes,
            write: WriteStrategy::Stream,
        };
        let mut ready = ProbedDevice::with_probe(config, Box::new(SwappableProbe(shared.clone())))
            .unwrap()
            .open()
            .unwrap();
        let mut raster = RasterImage::new(4, 2, Rgb::BLACK);

        assert!(!refresh_geometry(&mut ready, &mut raster));
        assert_eq!((raster.width(), raster.height()), (4, 2));

        *shared.lock().unwrap() = Some(rgb565(8, 4));
        assert!(refresh_geometry(&mut ready, &mut raster));
        assert_eq!((raster.width(), raster.height()), (8, 4));
        Dashboard::new().render(&mut raster, 1);
        ready.blit(&raster).unwrap();
        assert_eq!(fs::read(&device).unwrap().len(), 64);

        *shared.lock().unwrap() = None;
        assert!(!refresh_geometry(&mut ready, &mut raster));
        assert_eq!(ready.info().width, 8);

        drop(ready);
        fs::remove_file(&device).unwrap();
    }
}
