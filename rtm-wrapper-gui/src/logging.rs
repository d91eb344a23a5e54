use log::LevelFilter;
use std::io::Write;

/// Parses a level name (case-insensitive) or a number on the 10..=50 scale
/// where 10 is debug and 50 is critical.
pub fn parse_log_level(raw: &str) -> Result<LevelFilter, String> {
    let raw = raw.trim();
    if let Ok(number) = raw.parse::<i64>() {
        return Ok(match number {
            i64::MIN..=0 => LevelFilter::Trace,
            1..=10 => LevelFilter::Debug,
            11..=20 => LevelFilter::Info,
            21..=30 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        });
    }
    match raw.to_ascii_uppercase().as_str() {
        "TRACE" | "NOTSET" => Ok(LevelFilter::Trace),
        "DEBUG" => Ok(LevelFilter::Debug),
        "INFO" => Ok(LevelFilter::Info),
        "WARN" | "WARNING" => Ok(LevelFilter::Warn),
        "ERROR" | "CRITICAL" | "FATAL" => Ok(LevelFilter::Error),
        "OFF" => Ok(LevelFilter::Off),
        _ => Err(format!("unknown log level '{raw}'")),
    }
}

/// Installs the global logger. `RUST_LOG` directives, when set, refine the
/// level given on the command line.
pub fn init_logging(level: LevelFilter) {
    let mut builder = env_logger::builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format(|buf, record| {
        let thread = std::thread::current();
        writeln!(
            buf,
            "[{}] {} ({}) {}: {}",
            buf.timestamp_millis(),
            record.level(),
            thread.name().unwrap_or("unnamed"),
            record.target(),
            record.args()
        )
    });
    if let Err(err) = builder.try_init() {
        eprintln!("logger already installed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_are_case_insensitive() {
        assert_eq!(parse_log_level("debug"), Ok(LevelFilter::Debug));
        assert_eq!(parse_log_level("Info"), Ok(LevelFilter::Info));
        assert_eq!(parse_log_level("WARNING"), Ok(LevelFilter::Warn));
        assert_eq!(parse_log_level("warn"), Ok(LevelFilter::Warn));
        assert_eq!(parse_log_level("critical"), Ok(LevelFilter::Error));
    }

    #[test]
    fn numeric_levels_follow_the_ten_step_scale() {
        assert_eq!(parse_log_level("10"), Ok(LevelFilter::Debug));
        assert_eq!(parse_log_level("20"), Ok(LevelFilter::Info));
        assert_eq!(parse_log_level("30"), Ok(LevelFilter::Warn));
        assert_eq!(parse_log_level("40"), Ok(LevelFilter::Error));
        assert_eq!(parse_log_level("50"), Ok(LevelFilter::Error));
        assert_eq!(parse_log_level("15"), Ok(LevelFilter::Info));
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(parse_log_level("loud").is_err());
    }
}
