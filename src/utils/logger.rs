use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

/// Logger target for per-request access lines; routed to `access.log` only.
pub const ACCESS_TARGET: &str = "restaurant_directory::access";

const ROLL_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const ENCODER_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";

/// Initializes the logging system from a log4rs YAML config file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or a logger is already set.
pub fn init_path(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log4rs::init_file(path, log4rs::config::Deserializers::default())?;
    Ok(())
}

/// Configure logging globally for the process.
/// - dir: base directory for `app.log` / `access.log`; if None, current directory.
/// - level: error|warn|info|debug|trace
/// - retention: number of rolled files to keep (default 7)
///
/// # Errors
/// Returns an error if the directory or appenders cannot be created, or a logger is already set.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let base = dir
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    std::fs::create_dir_all(&base)?;
    let keep = u32::try_from(retention.unwrap_or(7)).unwrap_or(u32::MAX);
    let lvl = parse_level(level.unwrap_or("info"));

    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S%.3f)} [{l}] {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .appender(Appender::builder().build("app", Box::new(rolling_appender(&base, "app", keep)?)))
        .appender(
            Appender::builder().build("access", Box::new(rolling_appender(&base, "access", keep)?)),
        )
        .logger(Logger::builder().appender("access").additive(false).build(ACCESS_TARGET, lvl))
        .build(Root::builder().appender("console").appender("app").build(lvl))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn rolling_appender(
    base: &Path,
    stem: &str,
    keep: u32,
) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join(format!("{stem}.{{}}.log")).display()), keep)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE_BYTES)), Box::new(roller));
    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENCODER_PATTERN)))
        .build(base.join(format!("{stem}.log")), Box::new(policy))?;
    Ok(appender)
}

/// Maps a level name to a filter; unknown names fall back to `Info`.
#[must_use]
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}
