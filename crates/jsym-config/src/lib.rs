//! Configuration and logging setup for jsym.
//!
//! Settings are read from TOML:
//!
//! ```toml
//! [ancestors]
//! include_object = true
//! max_depth = 64
//! on_unresolved = "error"
//!
//! [logging]
//! level = "info"
//! json = false
//! stderr = true
//! buffer_lines = 2000
//! ```

use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, Once, OnceLock};

use jsym_members::AncestorConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsymConfig {
    /// Ancestor enumeration settings.
    #[serde(default)]
    pub ancestors: AncestorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl JsymConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all jsym crates.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Mirror logs to stderr (in addition to the in-memory buffer).
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Number of log lines kept in memory.
    #[serde(default = "LoggingConfig::default_buffer_lines")]
    pub buffer_lines: usize,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    fn default_buffer_lines() -> usize {
        2_000
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// Create the effective `EnvFilter`.
    ///
    /// `level` may be either a simple level (`info`, `debug`, ...) or a full
    /// `tracing_subscriber::EnvFilter` directive string. If `RUST_LOG` is set, it is merged into
    /// the resulting filter.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            buffer_lines: Self::default_buffer_lines(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

/// Strip user-provided values from a `toml`/`serde` diagnostic.
///
/// Quoted strings become `"<redacted>"`; the backticked key of an `unknown field`/`unknown
/// variant` error becomes `` `<redacted>` ``. Schema names in the `expected ...` tail are kept.
fn sanitize_toml_error_message(message: &str) -> String {
    static QUOTED_STRING_RE: OnceLock<regex::Regex> = OnceLock::new();
    static SINGLE_QUOTED_STRING_RE: OnceLock<regex::Regex> = OnceLock::new();

    // Escaped quotes (`\"`) must not end the match early.
    let re = QUOTED_STRING_RE.get_or_init(|| {
        regex::Regex::new(r#""(?:\\.|[^"\\])*""#).expect("quoted-string regex should compile")
    });
    let mut out = re.replace_all(message, r#""<redacted>""#).into_owned();

    let re_single = SINGLE_QUOTED_STRING_RE.get_or_init(|| {
        regex::Regex::new(r#"'(?:\\.|[^'\\])*'"#)
            .expect("single-quoted-string regex should compile")
    });
    out = re_single.replace_all(&out, "'<redacted>'").into_owned();

    let start = ["unknown field `", "unknown variant `"]
        .iter()
        .filter_map(|pattern| out.find(pattern).map(|pos| pos + pattern.len()))
        .min();
    if let Some(start) = start {
        if let Some(end_rel) = out[start..].find('`') {
            out.replace_range(start..start + end_rel, "<redacted>");
        }
    }

    out
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // `Display` includes a snippet of the raw input; keep only the message.
        ConfigError::Toml(sanitize_toml_error_message(err.message()))
    }
}

/// Ring buffer of formatted log lines.
#[derive(Debug)]
pub struct LogBuffer {
    capacity: usize,
    inner: Mutex<VecDeque<String>>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(VecDeque::with_capacity(capacity.min(8_192))),
        }
    }

    pub fn push_line(&self, line: String) {
        let mut inner = self.inner.lock().expect("LogBuffer mutex poisoned");
        if inner.len() == self.capacity {
            inner.pop_front();
        }
        inner.push_back(line);
    }

    pub fn last_lines(&self, n: usize) -> Vec<String> {
        let inner = self.inner.lock().expect("LogBuffer mutex poisoned");
        inner.iter().rev().take(n).cloned().rev().collect()
    }

    /// A `tracing_subscriber` writer that appends each formatted event to this buffer.
    pub fn make_writer(self: &Arc<Self>) -> impl for<'a> MakeWriter<'a> + Send + Sync + 'static {
        LogBufferMakeWriter {
            buffer: Arc::clone(self),
        }
    }
}

struct LogBufferMakeWriter {
    buffer: Arc<LogBuffer>,
}

impl<'a> MakeWriter<'a> for LogBufferMakeWriter {
    type Writer = LogBufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogBufferWriter {
            buffer: self.buffer.clone(),
            bytes: Vec::new(),
        }
    }
}

struct LogBufferWriter {
    buffer: Arc<LogBuffer>,
    bytes: Vec<u8>,
}

impl Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogBufferWriter {
    fn drop(&mut self) {
        if self.bytes.is_empty() {
            return;
        }

        let text = String::from_utf8_lossy(&self.bytes);
        for line in text.split_terminator('\n') {
            let line = line.trim_end_matches('\r');
            if !line.is_empty() {
                self.buffer.push_line(line.to_owned());
            }
        }
    }
}

static TRACING_INIT: Once = Once::new();
static GLOBAL_LOG_BUFFER: OnceLock<Arc<LogBuffer>> = OnceLock::new();

pub fn global_log_buffer() -> Arc<LogBuffer> {
    GLOBAL_LOG_BUFFER
        .get_or_init(|| Arc::new(LogBuffer::new(LoggingConfig::default_buffer_lines())))
        .clone()
}

/// Initializes structured `tracing` logging.
///
/// This function is safe to call multiple times; only the first call installs a
/// global subscriber. Subsequent calls return the global in-memory log buffer.
pub fn init_tracing(config: &LoggingConfig) -> Arc<LogBuffer> {
    let buffer = GLOBAL_LOG_BUFFER
        .get_or_init(|| Arc::new(LogBuffer::new(config.buffer_lines)))
        .clone();

    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let mut make_writer = BoxMakeWriter::new(LogBufferMakeWriter {
            buffer: buffer.clone(),
        });
        if config.stderr {
            // `TestWriter` goes through `eprint!`, which `cargo test` captures.
            if cfg!(debug_assertions) {
                make_writer = BoxMakeWriter::new(
                    make_writer.and(tracing_subscriber::fmt::writer::TestWriter::with_stderr),
                );
            } else {
                make_writer = BoxMakeWriter::new(make_writer.and(std::io::stderr));
            }
        }

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!(
                target: "jsym.config",
                level = %config.level,
                json = config.json,
                "tracing initialized"
            );
        }
    });

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(logging: &LoggingConfig, emit: impl FnOnce()) -> String {
        let buffer = Arc::new(LogBuffer::new(64));
        let subscriber = tracing_subscriber::registry()
            .with(logging.config_env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(LogBufferMakeWriter {
                        buffer: buffer.clone(),
                    })
                    .with_ansi(false),
            );
        tracing::subscriber::with_default(subscriber, emit);
        buffer.last_lines(64).join("\n")
    }

    #[test]
    fn logging_level_parses_simple_levels() {
        let logging = LoggingConfig {
            level: "DEBUG".to_owned(),
            ..Default::default()
        };

        let text = capture(&logging, || {
            tracing::trace!("hidden trace");
            tracing::debug!("shown debug");
        });
        assert!(!text.contains("hidden trace"), "{text}");
        assert!(text.contains("shown debug"), "{text}");
    }

    #[test]
    fn logging_level_accepts_warning_synonym() {
        assert_eq!(LoggingConfig::normalize_level_directives(" Warning "), "warn");
        assert_eq!(LoggingConfig::normalize_level_directives(""), "info");
    }

    #[test]
    fn logging_level_parses_env_filter_directives() {
        let logging = LoggingConfig {
            level: "warn,jsym_members=trace".to_owned(),
            ..Default::default()
        };

        let text = capture(&logging, || {
            tracing::info!(target: "other_target", "hidden info");
            tracing::warn!(target: "other_target", "shown warn");
            tracing::trace!(target: "jsym_members", "shown trace");
        });
        assert!(!text.contains("hidden info"), "{text}");
        assert!(text.contains("shown warn"), "{text}");
        assert!(text.contains("shown trace"), "{text}");
    }

    #[test]
    fn invalid_directives_fall_back_to_info() {
        let logging = LoggingConfig {
            level: "jsym_members=loud".to_owned(),
            ..Default::default()
        };

        let text = capture(&logging, || {
            tracing::debug!("hidden debug");
            tracing::info!("shown info");
        });
        assert!(!text.contains("hidden debug"), "{text}");
        assert!(text.contains("shown info"), "{text}");
    }

    #[test]
    fn log_buffer_keeps_the_most_recent_lines() {
        let buffer = LogBuffer::new(2);
        buffer.push_line("one".to_owned());
        buffer.push_line("two".to_owned());
        buffer.push_line("three".to_owned());

        assert_eq!(buffer.last_lines(10), vec!["two", "three"]);
        assert_eq!(buffer.last_lines(1), vec!["three"]);
    }

    #[test]
    fn toml_errors_redact_quoted_values() {
        let message = r#"invalid type: string "hunter2 \"quoted\"", expected a boolean"#;
        let sanitized = sanitize_toml_error_message(message);
        assert!(!sanitized.contains("hunter2"), "{sanitized}");
        assert!(sanitized.contains("expected a boolean"), "{sanitized}");
    }

    #[test]
    fn toml_errors_redact_unknown_field_names() {
        let message = "unknown field `secret_key`, expected one of `include_object`, `max_depth`";
        let sanitized = sanitize_toml_error_message(message);
        assert!(!sanitized.contains("secret_key"), "{sanitized}");
        assert!(sanitized.contains("unknown field `<redacted>`"), "{sanitized}");
        assert!(sanitized.contains("`max_depth`"), "{sanitized}");
    }
}
