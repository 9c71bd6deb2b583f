mod metrics;

pub use metrics::{Counter, MetricsSnapshot, RelayMetrics};

use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use relay_settings::LoggingSettings;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Layer, Registry};

/// Configuration for the telemetry subsystem.
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    /// Default log level. Overridden by RUST_LOG env var.
    pub log_level: Level,
    /// Per-module level overrides (e.g. "relay_engine" => DEBUG).
    pub module_levels: Vec<(String, Level)>,
    /// JSON lines instead of compact text.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            module_levels: Vec::new(),
            json: false,
        }
    }
}

impl From<&LoggingSettings> for TelemetryConfig {
    /// Unknown level names fall back to INFO.
    fn from(settings: &LoggingSettings) -> Self {
        let parse = |s: &str| Level::from_str(s).unwrap_or(Level::INFO);
        Self {
            log_level: parse(&settings.level),
            module_levels: settings
                .modules
                .iter()
                .map(|(module, level)| (module.clone(), parse(level)))
                .collect(),
            json: settings.json,
        }
    }
}

impl TelemetryConfig {
    /// `EnvFilter` directive string, e.g. `info,relay_engine=debug`.
    pub fn filter_directives(&self) -> String {
        directives(&self.log_level.to_string().to_lowercase(), &self.module_levels)
    }
}

fn directives(base: &str, module_levels: &[(String, Level)]) -> String {
    let mut filter = base.to_string();
    for (module, level) in module_levels {
        filter.push_str(&format!(",{}={}", module, level.to_string().to_lowercase()));
    }
    filter
}

/// Filter the subscriber is started with: a valid `RUST_LOG` as given, else
/// the configured level plus its module overrides.
#[derive(Debug, PartialEq)]
struct InstalledFilter {
    base: String,
    module_levels: Vec<(String, Level)>,
}

impl InstalledFilter {
    fn resolve(rust_log: Option<&str>, config: &TelemetryConfig) -> Self {
        match rust_log
            .map(str::trim)
            .filter(|d| !d.is_empty() && EnvFilter::try_new(d).is_ok())
        {
            Some(d) => Self {
                base: d.to_string(),
                module_levels: Vec::new(),
            },
            None => Self {
                base: config.log_level.to_string().to_lowercase(),
                module_levels: config.module_levels.clone(),
            },
        }
    }

    fn directives(&self) -> String {
        directives(&self.base, &self.module_levels)
    }
}

/// Guard that logs the final metrics snapshot on drop.
pub struct TelemetryGuard {
    metrics: Arc<RelayMetrics>,
    base_directives: String,
    module_levels: RwLock<Vec<(String, Level)>>,
    filter: reload::Handle<EnvFilter, Registry>,
}

impl TelemetryGuard {
    pub fn metrics(&self) -> Arc<RelayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Change the log level for a specific module at runtime. The change is
    /// layered over the directives installed at start-up.
    pub fn set_module_level(&self, module: &str, level: Level) {
        let filter = {
            let mut levels = self.module_levels.write();
            if let Some(entry) = levels.iter_mut().find(|(m, _)| m == module) {
                entry.1 = level;
            } else {
                levels.push((module.to_string(), level));
            }
            directives(&self.base_directives, &levels)
        };
        if let Err(e) = self.filter.modify(|f| *f = EnvFilter::new(&filter)) {
            tracing::warn!(error = %e, "log filter not reloaded");
        }
    }

    /// Current per-module log level overrides.
    pub fn module_levels(&self) -> Vec<(String, Level)> {
        self.module_levels.read().clone()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        let snapshot = self.metrics.snapshot();
        tracing::info!(
            forwarded = snapshot.forwarded,
            suppressed = snapshot.suppressed_total(),
            applied = snapshot.applied,
            discarded_stale = snapshot.discarded_stale,
            rejected = snapshot.rejected,
            build_failures = snapshot.build_failures,
            "relay metrics at shutdown"
        );
    }
}

/// Initialize the telemetry subsystem. Call once at startup.
///
/// Logs go to stderr; stdout stays free for display output.
pub fn init_telemetry(config: TelemetryConfig) -> TelemetryGuard {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let installed = InstalledFilter::resolve(rust_log.as_deref(), &config);
    let env_filter = EnvFilter::new(installed.directives());

    let fmt_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let (env_filter, filter) = reload::Layer::new(env_filter);

    // A second init (tests, embedding) keeps the first subscriber.
    if let Err(e) = tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .try_init()
    {
        eprintln!("relay-telemetry: subscriber already installed: {e}");
    }

    TelemetryGuard {
        metrics: Arc::new(RelayMetrics::new()),
        base_directives: installed.base,
        module_levels: RwLock::new(installed.module_levels),
        filter,
    }
}
