//! Logging infrastructure for the presence-config library.
//!
//! Repair, reset and migration notices are user-facing: they go through a
//! small stderr [`Logger`] whose level the host application controls.
//! Internal tracing uses the `log` facade instead.

use std::env;
use std::fmt;

use crate::messages::LogMessage;

/// Environment variable consulted by [`init_logger`].
pub const LOG_MODE_ENV: &str = "PRESENCE_CONFIG_LOG_MODE";

/// Logging level for controlling output verbosity.
///
/// Log levels are ordered from least verbose (Quiet) to most verbose (Verbose).
///
/// # Examples
///
/// ```
/// use presence_config::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Suppress all non-essential output.
    Quiet,
    /// Errors and warnings.
    Normal,
    /// Errors, warnings, info, and debug messages.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl LogLevel {
    /// Parses a log level from a string.
    ///
    /// Recognizes: "quiet", "normal", "verbose" (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use presence_config::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("loud").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }
}

/// Severity attached to a catalogue message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something was wrong with the document and has been repaired.
    Error,
    /// A recoverable problem outside the document itself.
    Warn,
    /// Progress or an expected migration.
    Info,
    /// Detail for diagnosing the engine.
    Debug,
}

impl Severity {
    /// Line prefix written before the message.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    /// Lowest level at which lines of this severity are printed.
    #[must_use]
    pub const fn threshold(self) -> LogLevel {
        match self {
            Self::Error | Self::Warn => LogLevel::Normal,
            Self::Info | Self::Debug => LogLevel::Verbose,
        }
    }
}

/// Writes repair and migration notices to stderr.
///
/// Errors and warnings print at [`LogLevel::Normal`]; info and debug lines
/// need [`LogLevel::Verbose`]. Nothing prints at [`LogLevel::Quiet`].
///
/// # Examples
///
/// ```
/// use presence_config::{Logger, LogLevel};
///
/// let logger = Logger::new(LogLevel::Normal);
/// logger.error("shown");
/// logger.info("hidden below Verbose");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// A logger printing at `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// The configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// True if lines of `severity` are printed.
    #[must_use]
    pub fn enabled(&self, severity: Severity) -> bool {
        self.level >= severity.threshold()
    }

    fn write(&self, severity: Severity, message: &str) {
        if self.enabled(severity) {
            eprintln!("{}: {message}", severity.prefix());
        }
    }

    /// Prints an error line.
    pub fn error(&self, message: &str) {
        self.write(Severity::Error, message);
    }

    /// Prints a warning line.
    pub fn warn(&self, message: &str) {
        self.write(Severity::Warn, message);
    }

    /// Prints an informational line.
    pub fn info(&self, message: &str) {
        self.write(Severity::Info, message);
    }

    /// Prints a debug line.
    pub fn debug(&self, message: &str) {
        self.write(Severity::Debug, message);
    }

    /// Prints a catalogue message at the severity it carries. The
    /// translation key goes to the `log` facade as well.
    ///
    /// # Examples
    ///
    /// ```
    /// use presence_config::{Logger, LogLevel};
    /// use presence_config::messages::LogMessage;
    ///
    /// let logger = Logger::new(LogLevel::Quiet);
    /// logger.emit(&LogMessage::PropertyReset { path: "a.b".into() });
    /// ```
    pub fn emit(&self, message: &LogMessage) {
        let text = message.to_string();
        self.write(message.severity(), &text);
        log::debug!("[{}] {text}", message.key());
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

/// Resolves the logger level from flags, then [`LOG_MODE_ENV`], then
/// [`LogLevel::Normal`]. `verbose` wins over `quiet`; an unparsable
/// environment value is ignored.
///
/// # Examples
///
/// ```
/// use presence_config::{init_logger, LogLevel};
///
/// assert_eq!(init_logger(true, false).level(), LogLevel::Verbose);
/// ```
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    let level = if verbose {
        LogLevel::Verbose
    } else if quiet {
        LogLevel::Quiet
    } else {
        env::var(LOG_MODE_ENV)
            .ok()
            .and_then(|mode| LogLevel::parse(&mode).ok())
            .unwrap_or(LogLevel::Normal)
    };
    Logger::new(level)
}
