//! Subscriber wiring for console and file logging

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use super::config::{self, LogFormat};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps the non-blocking writers flushing until dropped
#[derive(Debug)]
pub struct TelemetryGuard {
    _log_guards: Vec<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// Crates named in `crates_to_filter` log at the configured level, everything
/// else at `WARN`, unless a `filtering_directive` is configured.
pub fn setup(
    config: &config::Log,
    service_name: &str,
    crates_to_filter: impl AsRef<[&'static str]>,
) -> TelemetryGuard {
    let mut guards = Vec::new();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.console.enabled {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);

        let filter = get_envfilter(
            config.console.filtering_directive.as_ref(),
            config.console.level,
            crates_to_filter.as_ref(),
        );
        let layer = match config.console.log_format {
            LogFormat::Default => tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
        };
        layers.push(layer);
    }

    if let Some(file) = config.file.as_ref().filter(|file| file.enabled) {
        let appender = tracing_appender::rolling::daily(&file.path, &file.file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);

        let filter = get_envfilter(
            file.filtering_directive.as_ref(),
            file.level,
            crates_to_filter.as_ref(),
        );
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
        );
    }

    // A subscriber may already be installed, e.g. by an integration test.
    if tracing_subscriber::registry().with(layers).try_init().is_ok() {
        tracing::info!(service = service_name, "logger initialized");
    }

    TelemetryGuard {
        _log_guards: guards,
    }
}

fn get_envfilter(
    filtering_directive: Option<&String>,
    filter_log_level: config::Level,
    crates_to_filter: &[&'static str],
) -> EnvFilter {
    let default_directive = LevelFilter::WARN.into();
    let directive = filtering_directive.cloned().unwrap_or_else(|| {
        crates_to_filter
            .iter()
            .map(|crate_name| {
                format!(
                    "{}={}",
                    crate_name.replace('-', "_"),
                    filter_log_level.into_level()
                )
            })
            .collect::<Vec<_>>()
            .join(",")
    });

    EnvFilter::builder()
        .with_default_directive(default_directive)
        .parse_lossy(directive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crates_are_filtered_at_the_configured_level() {
        let filter = get_envfilter(
            None,
            config::Level(tracing::Level::DEBUG),
            &["server", "connector-integration"],
        );
        let rendered = filter.to_string().to_lowercase();
        assert!(rendered.contains("server=debug"));
        assert!(rendered.contains("connector_integration=debug"));
    }

    #[test]
    fn explicit_directive_wins() {
        let directive = "tower_http=trace".to_string();
        let filter = get_envfilter(
            Some(&directive),
            config::Level(tracing::Level::DEBUG),
            &["server"],
        );
        let rendered = filter.to_string().to_lowercase();
        assert!(rendered.contains("tower_http=trace"));
        assert!(!rendered.contains("server=debug"));
    }
}
