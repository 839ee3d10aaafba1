//! Logging initialisation for the spantree CLI.
//!
//! Every rank of the local cluster runs on its own thread and they all
//! share stderr, so events are tagged with thread ids to keep per-rank
//! output apart. Span close events are enabled so the CLI's instrumented
//! spans double as coarse solve timings. The `log` facade is bridged so
//! dependencies using either API emit structured events.

use std::{env, io, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

const LOG_FORMAT_ENV: &str = "SPANTREE_LOG_FORMAT";

/// The format installed by the first [`init_logging`] call; later calls
/// are no-ops that report it.
static INSTALLED: OnceLock<LogFormat> = OnceLock::new();

/// Output format for diagnostic events.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Compact single-line output for interactive runs.
    #[default]
    Human,
    /// One JSON object per event, with the enclosing span attached.
    Json,
}

impl LogFormat {
    /// Resolves the format from `SPANTREE_LOG_FORMAT`, defaulting to
    /// [`LogFormat::Human`] when the variable is absent.
    fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source,
            }),
        }
    }
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(LoggingError::UnsupportedFormat {
                provided: raw.trim().to_owned(),
            }),
        }
    }
}

/// Errors raised while initialising structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Environment variable contained invalid UTF-8 data.
    #[error("environment variable `{name}` is not valid UTF-8: {source}")]
    InvalidUnicode {
        /// Name of the offending environment variable.
        name: &'static str,
        /// Underlying read failure.
        #[source]
        source: env::VarError,
    },
    /// The requested log format is not recognised.
    #[error("`{provided}` is not a log format; use `human` or `json`")]
    UnsupportedFormat {
        /// Raw value supplied by the user.
        provided: String,
    },
    /// Failed to install the global tracing subscriber.
    #[error("could not install the tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Installs global structured logging and returns the active format.
///
/// Diagnostics go to `stderr` so edge lists and mazes on `stdout` remain
/// parseable; the log level is controlled via `RUST_LOG`. The first call
/// decides the format for the process; subsequent calls keep it and
/// return it unchanged.
///
/// # Errors
/// Returns [`LoggingError`] if `SPANTREE_LOG_FORMAT` holds invalid
/// Unicode or an unknown format. A subscriber installed by someone else
/// (e.g. a test harness) is tolerated, not an error.
pub fn init_logging() -> Result<LogFormat, LoggingError> {
    let format = LogFormat::from_env()?;
    if let Some(active) = INSTALLED.get() {
        return Ok(*active);
    }

    if let Err(LoggingError::InstallFailed { source }) = install_subscriber(format) {
        eprintln!("structured logging already configured elsewhere: {source}");
    }
    Ok(*INSTALLED.get_or_init(|| format))
}

fn install_subscriber(format: LogFormat) -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Rank threads interleave on stderr; thread ids keep them apart.
    // Close events carry the busy/idle timings of the instrumented spans.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(io::stderr);

    let fmt_layer = match format {
        LogFormat::Human => fmt_layer.boxed(),
        LogFormat::Json => fmt_layer
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
    };

    // Installing the log bridge is best-effort; if another logger already
    // owns the global slot we keep the existing configuration.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("human", LogFormat::Human)]
    #[case("HUMAN", LogFormat::Human)]
    #[case(" json ", LogFormat::Json)]
    #[case("Json", LogFormat::Json)]
    fn formats_parse_case_insensitively(#[case] raw: &str, #[case] expected: LogFormat) {
        let format: LogFormat = raw.parse().expect("format must parse");
        assert_eq!(format, expected);
    }

    #[test]
    fn unknown_formats_are_rejected_verbatim() {
        let err = " xml ".parse::<LogFormat>().expect_err("xml is not supported");
        match err {
            LoggingError::UnsupportedFormat { provided } => assert_eq!(provided, "xml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn absent_variable_means_human_output() {
        assert_eq!(LogFormat::default(), LogFormat::Human);
    }

    #[test]
    fn init_logging_reports_one_stable_format() {
        let first = init_logging().expect("logging must initialise");
        let second = init_logging().expect("subsequent calls must be no-ops");
        assert_eq!(first, second);
    }
}
