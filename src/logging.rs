//! Browser console backend for the `log` facade.
//!
//! The engine logs through `log` macros only. In the browser, [`init`]
//! routes those records to `console.*` so graph build summaries and
//! recoverable anomalies show up in devtools. Native hosts install whatever
//! logger they like, or none.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Logger writing records to the browser console.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&message),
            Level::Warn => console::warn_1(&message),
            Level::Info => console::info_1(&message),
            Level::Debug => console::debug_1(&message),
            Level::Trace => console::log_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger at `level`.
///
/// Safe to call more than once: later calls only adjust the level.
pub fn init(level: LevelFilter) {
    // `set_logger` only fails if a logger was already set. Ignore that case so
    // repeated module initialisation does not panic.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Parses a level name (`"warn"`, `"debug"`, ...), falling back to `Warn`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Warn)
}
