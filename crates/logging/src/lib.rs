use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;
use std::io::Write;
use std::panic;

pub struct Logger<T> {
    level: LevelFilter,
    writer: Mutex<T>,
}

impl<T: Write + Send + 'static> Logger<T> {
    pub fn new(target: T) -> Logger<T> {
        Logger {
            level: LevelFilter::Info,
            writer: Mutex::new(target),
        }
    }

    pub fn set_max_level(mut self, level: LevelFilter) -> Logger<T> {
        self.level = level;
        self
    }

    pub fn init(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.level);
        log::set_boxed_logger(Box::new(self))
    }
}

/// Routes panic messages through the installed logger before the default hook runs.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        log::error!("PANIC! {}", info);
        previous(info);
    }));
}

impl<T: Write + Send> Log for Logger<T> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let target = if !record.target().is_empty() {
            record.target()
        } else {
            record.module_path().unwrap_or_default()
        };

        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "[{}] {} {}", record.level(), target, record.args());
    }

    fn flush(&self) {
        let _ = self.writer.lock().flush();
    }
}
