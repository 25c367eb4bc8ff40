use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use tracing_appender::{
    non_blocking,
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Layer, filter::Directive, fmt, prelude::*};

const QUIET_TARGETS: [&str; 6] = ["hyper", "opentelemetry", "tonic", "h2", "reqwest", "sqlx"];

fn otel_filter() -> EnvFilter {
    QUIET_TARGETS
        .iter()
        .filter_map(|target| format!("{target}=off").parse::<Directive>().ok())
        .fold(EnvFilter::new("info"), |filter, directive| {
            filter.add_directive(directive)
        })
}

fn file_writer(log_dir: &str, component: &str) -> (NonBlocking, WorkerGuard) {
    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, log_dir, format!("{component}.log"));
    non_blocking(file_appender)
}

/// Installs the global subscriber. The returned guard flushes the file
/// writer and must be held for the lifetime of the process.
pub fn init_logger(
    sdk_logger_provider: SdkLoggerProvider,
    component: &str,
    is_dev: bool,
    enable_file: bool,
) -> Option<WorkerGuard> {
    let (file_layer, guard) = if enable_file {
        let log_dir = if is_dev { "./logs" } else { "/var/log/app" };
        let (file_writer, guard) = file_writer(log_dir, component);

        let layer = fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .json()
            .with_filter(EnvFilter::new("info"));

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let default_console = if is_dev { "debug" } else { "info" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_console));

    let console_layer = fmt::layer()
        .pretty()
        .with_thread_names(true)
        .with_ansi(is_dev)
        .with_filter(console_filter);

    let otel_layer =
        OpenTelemetryTracingBridge::new(&sdk_logger_provider).with_filter(otel_filter());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(otel_layer)
        .init();

    guard
}
