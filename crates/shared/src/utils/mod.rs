mod logs;
mod metadata;
mod metrics;
mod otel;
mod parse_datetime;
mod shutdown;
mod validation;

pub use self::logs::init_logger;
pub use self::metadata::MetadataInjector;
pub use self::metrics::{
    Method, Metrics, SagaIncident, SagaMetrics, Status, SystemMetrics, run_metrics_collector,
};
pub use self::otel::{OperationTracer, Telemetry, TracingContext};
pub use self::parse_datetime::{format_naive_utc, parse_datetime, parse_rfc3339_utc};
pub use self::shutdown::shutdown_signal;
pub use self::validation::{field_error, into_result, require_non_empty, validation_messages};
