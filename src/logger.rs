use std::io::Write;
use std::time::Instant;

use anstyle::{AnsiColor, Reset, Style};
use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

struct TermlaunchLogger {
    file: Option<Mutex<std::fs::File>>,
    stderr_filter: LevelFilter,
    filter: LevelFilter,
    start: Instant,
}

impl Log for TermlaunchLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if record.level() <= self.stderr_filter {
            let style = level_style(record.level());
            eprintln!("{style}{:<5}{Reset} {}", record.level(), record.args());
        }

        if let Some(ref file) = self.file {
            let elapsed = self.start.elapsed().as_secs_f64();
            let _ = writeln!(
                file.lock(),
                "[{elapsed:.3}s] [{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Some(ref file) = self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Parse a `RUST_LOG`-style level, falling back to `default`.
#[must_use]
pub fn parse_filter(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    value.and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// Initialize the global logger. Must be called once before any logging.
///
/// # Panics
///
/// Panics if called more than once.
pub fn init(log_file: Option<std::fs::File>) {
    let filter = parse_filter(std::env::var("RUST_LOG").ok().as_deref(), LevelFilter::Warn);
    // Everything goes to the file, only `filter` reaches stderr
    let max = if log_file.is_some() {
        LevelFilter::Debug.max(filter)
    } else {
        filter
    };

    let logger = TermlaunchLogger {
        file: log_file.map(Mutex::new),
        stderr_filter: filter,
        filter: max,
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger)).expect("logger already initialized");
    log::set_max_level(max);
}

/// Colour used for a level tag on stderr.
#[must_use]
pub fn level_style(level: Level) -> Style {
    let color = match level {
        Level::Error => AnsiColor::Red,
        Level::Warn => AnsiColor::Yellow,
        Level::Info => AnsiColor::Blue,
        Level::Debug | Level::Trace => AnsiColor::BrightBlack,
    };
    Style::new().fg_color(Some(anstyle::Color::Ansi(color)))
}
