//! File logging for the `folio` binary.
//!
//! The TUI draws on the alternate screen and keeps the tty in raw mode, so
//! nothing may be written to stdout or stderr while it runs. Events go to
//! `<dir>/folio.log.<YYYY-MM-DD>` instead, one file per day. The first
//! [`init_logging`] call installs the subscriber; later calls return the
//! same path.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Env var consulted when no log directory is configured.
pub const LOG_DIR_ENV: &str = "FOLIO_LOG_DIR";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Encoding of each log line; `log.format` in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// File stem and fallback directory name.
    pub app_name: &'static str,
    /// `log.dir` from the config file; `~/` is expanded.
    pub log_dir: Option<PathBuf>,
    /// Mirror events to stderr. Only for runs without the TUI.
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "folio",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::Text,
            default_filter: "info".to_string(),
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn sink_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(ansi).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    }
}

/// Install the global subscriber and return today's log file.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = resolve_log_dir(
        config.app_name,
        config.log_dir.as_deref(),
        std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
    );
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let path = log_file_path(&dir, config.app_name, Local::now().date_naive());

    let (writer, guard) =
        tracing_appender::non_blocking(rolling::daily(&dir, format!("{}.log", config.app_name)));
    let _ = LOG_GUARD.set(guard);

    let mut layers = vec![sink_layer(config.format, writer, false)];
    if config.emit_stderr {
        layers.push(sink_layer(config.format, std::io::stderr, true));
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("installing tracing subscriber")?;

    let _ = LOG_PATH.set(path.clone());
    Ok(path)
}

/// The name `tracing_appender`'s daily roller gives the file for `date`.
fn log_file_path(dir: &Path, app_name: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{app_name}.log.{}", date.format("%Y-%m-%d")))
}

/// Configured dir, then the env override, then the platform data dir.
fn resolve_log_dir(app_name: &str, configured: Option<&Path>, env: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = configured.map(Path::to_path_buf).or(env) {
        return expand_home(&dir);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(app_name)
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_dir_beats_env() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_log_dir("folio", Some(dir.path()), Some("/elsewhere".into()));
        assert_eq!(resolved, dir.path());
        assert_eq!(
            resolve_log_dir("folio", None, Some("/var/log/folio".into())),
            PathBuf::from("/var/log/folio")
        );
    }

    #[test]
    fn fallback_dir_is_named_after_the_app() {
        assert!(resolve_log_dir("folio", None, None).ends_with("folio"));
    }

    #[test]
    fn tilde_expands_and_relative_paths_do_not() {
        assert_eq!(expand_home(Path::new("logs/x")), PathBuf::from("logs/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/logs")), home.join("logs"));
        }
    }

    #[test]
    fn file_name_matches_the_daily_roller() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            log_file_path(Path::new("/tmp/l"), "folio", date),
            PathBuf::from("/tmp/l/folio.log.2024-03-09")
        );
    }

    #[test]
    fn format_reads_lowercase_names() {
        let f: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(f, LogFormat::Json);
    }
}
