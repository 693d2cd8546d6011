use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub const CURSOR_BLINK: &str = "/sys/class/graphics/fbcon/cursor_blink";

const HIDE: &[u8] = b"\x1b[?25l";
const SHOW: &[u8] = b"\x1b[?25h";

/// Hides the console cursor while alive and shows it again on drop.
///
/// Best effort: every failure is logged and ignored, blits never depend on it.
pub struct CursorGuard {
    blink: Option<PathBuf>,
}

impl CursorGuard {
    pub fn hide() -> CursorGuard {
        Self::with_blink_attribute(Some(PathBuf::from(CURSOR_BLINK)))
    }

    pub fn with_blink_attribute(blink: Option<PathBuf>) -> CursorGuard {
        let guard = CursorGuard { blink };
        guard.set(false);
        guard
    }

    fn set(&self, visible: bool) {
        let mut out = io::stdout();
        if let Err(e) = out.write_all(if visible { SHOW } else { HIDE }).and_then(|_| out.flush()) {
            log::debug!("cursor escape failed: {}", e);
        }
        if let Some(blink) = &self.blink {
            if let Err(e) = fs::write(blink, if visible { "1" } else { "0" }) {
                log::debug!("{}: {}", blink.display(), e);
            }
        }
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.set(true);
    }
}
