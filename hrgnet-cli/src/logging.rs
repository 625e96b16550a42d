//! Logging initialisation for the hrgnet CLI.
//!
//! Installs a global `tracing` subscriber writing to stderr, optionally as
//! JSON, and bridges the `log` facade.

use std::{env, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

const LOG_FORMAT_ENV: &str = "HRGNET_LOG_FORMAT";
const DEFAULT_DIRECTIVE: &str = "info";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Output encoding of the diagnostic stream.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per line, including the current span list.
    Json,
}

impl LogFormat {
    /// Parses a format name, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    /// Returns [`LoggingError::UnsupportedFormat`] for anything other than
    /// `human` or `json`.
    pub fn parse(raw: &str) -> Result<Self, LoggingError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }

    fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => Self::parse(&raw),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source,
            }),
        }
    }
}

/// Errors raised while initialising structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Environment variable contained invalid UTF-8 data.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Name of the offending environment variable.
        name: &'static str,
        /// Underlying lookup failure.
        #[source]
        source: env::VarError,
    },
    /// Unsupported value in `HRGNET_LOG_FORMAT`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Raw value supplied by the user.
        provided: String,
    },
    /// Failed to install the global tracing subscriber.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Install global structured logging unless it is already configured.
///
/// `HRGNET_LOG_FORMAT=json` switches to JSON output. Filtering follows
/// `RUST_LOG` and falls back to `info`. Diagnostics go to stderr so that
/// stdout stays machine-readable.
///
/// # Errors
/// Returns [`LoggingError`] if the format variable is not valid Unicode or
/// names an unsupported format.
pub fn init_logging() -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }

    match install_subscriber(LogFormat::from_env()?) {
        Ok(()) => {}
        Err(LoggingError::InstallFailed { source }) => report_existing_subscriber(&source),
        Err(err) => return Err(err),
    }
    let _ = INITIALISED.set(());
    Ok(())
}

fn install_subscriber(format: LogFormat) -> Result<(), LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let fmt_layer = match format {
        LogFormat::Json => fmt_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
        LogFormat::Human => fmt_layer.boxed(),
    };

    // Another logger may already own the `log` slot; keep it if so.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

#[expect(
    clippy::print_stderr,
    reason = "The global subscriber belongs to someone else, so tracing may be silent"
)]
fn report_existing_subscriber(source: &tracing_subscriber::util::TryInitError) {
    eprintln!("structured logging already configured elsewhere: {source}");
}
