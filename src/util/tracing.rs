//! Tracing helpers
// (c) 2024 Ross Younger

use std::{fs::File, path::Path, sync::Arc};

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

const STANDARD_ENV_VAR: &str = "RUST_LOG";
const LOG_FILE_DETAIL_ENV_VAR: &str = "RUST_LOG_FILE_DETAIL";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// How much the tool says about its own work
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Errors, and what was written where
    #[default]
    Normal,
    /// Everything, down to each directive as it is applied
    Debug,
}

impl Verbosity {
    /// From the `--quiet` and `--debug` flags. `--debug` wins if both are set.
    #[must_use]
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        match (quiet, debug) {
            (_, true) => Self::Debug,
            (true, false) => Self::Quiet,
            (false, false) => Self::Normal,
        }
    }

    fn level(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "info",
            Self::Debug => "trace",
        }
    }
}

#[derive(Debug)]
struct FilterResult {
    filter: EnvFilter,
    /// Whether the filter came from the environment, in which case targets are worth showing
    used_env: bool,
}

/// Uses the given environment variable if set; if not, logs only our own events at `verbosity`.
/// A set but invalid variable is an error.
fn filter_for(verbosity: Verbosity, key: &str) -> anyhow::Result<FilterResult> {
    if std::env::var_os(key).is_none() {
        return Ok(FilterResult {
            filter: EnvFilter::new(format!("sshdconf={}", verbosity.level())),
            used_env: false,
        });
    }
    let filter = EnvFilter::try_from_env(key)
        .with_context(|| format!("{key} (set in environment) was invalid"))?;
    Ok(FilterResult {
        filter,
        used_env: true,
    })
}

fn console_layer(filter: FilterResult) -> BoxedLayer {
    fmt::layer()
        .compact()
        .with_target(filter.used_env)
        .with_writer(std::io::stderr)
        .with_filter(filter.filter)
        .boxed()
}

/// The log file gets `RUST_LOG_FILE_DETAIL` if set, otherwise the same filter as the console
fn file_layer(path: &Path, verbosity: Verbosity) -> anyhow::Result<BoxedLayer> {
    let filter = if std::env::var_os(LOG_FILE_DETAIL_ENV_VAR).is_some() {
        filter_for(verbosity, LOG_FILE_DETAIL_ENV_VAR)?
    } else {
        filter_for(verbosity, STANDARD_ENV_VAR)?
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    Ok(fmt::layer()
        .compact()
        .with_target(filter.used_env)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .with_filter(filter.filter)
        .boxed())
}

/// Set up rust tracing, to stderr and optionally to a file.
///
/// By default we log only our events (sshdconf), at the level `verbosity` implies.
/// This can be overridden by setting `RUST_LOG`.
///
/// **CAUTION:** If this function fails, tracing won't be set up; callers must take extra care to report the error.
pub fn setup(verbosity: Verbosity, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut layers = vec![console_layer(filter_for(verbosity, STANDARD_ENV_VAR)?)];
    if let Some(path) = log_file {
        layers.push(file_layer(path, verbosity)?);
    }
    tracing_subscriber::registry().with(layers).init();
    Ok(())
}
