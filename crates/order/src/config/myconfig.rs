use anyhow::Result;
use shared::config::env;
use std::{net::SocketAddr, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub db_max_connection: u32,
    pub db_min_connection: u32,
    pub grpc_port: u16,
    pub metric_port: u16,
    pub payment_grpc_addr: String,
    pub reconcile_interval: Duration,
    pub reconcile_grace: Duration,
    pub otel_endpoint: String,
    pub dev_mode: bool,
    pub enable_file_log: bool,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url = env::required("DATABASE_URL")?;
        let run_migrations = env::flag("RUN_MIGRATIONS")?;
        let db_max_connection = env::parsed_or("DB_MAX_CONNECTION", 10u32)?;
        let db_min_connection = env::parsed_or("DB_MIN_CONNECTION", 1u32)?;

        let grpc_port = env::required_parsed::<u16>("ORDER_GRPC_PORT")?;
        let metric_port = env::required_parsed::<u16>("ORDER_METRIC_PORT")?;
        let payment_grpc_addr = env::required("GRPC_PAYMENT_ADDR")?;

        let reconcile_interval =
            Duration::from_secs(env::parsed_or("RECONCILE_INTERVAL_SECS", 60u64)?);
        let reconcile_grace = Duration::from_secs(env::parsed_or("RECONCILE_GRACE_SECS", 300u64)?);

        let otel_endpoint = env::parsed_or(
            "OTEL_EXPORTER_OTLP_ENDPOINT",
            "http://otel-collector:4317".to_string(),
        )?;

        Ok(Self {
            database_url,
            run_migrations,
            db_max_connection,
            db_min_connection,
            grpc_port,
            metric_port,
            payment_grpc_addr,
            reconcile_interval,
            reconcile_grace,
            otel_endpoint,
            dev_mode: env::optional_flag("DEV_MODE"),
            enable_file_log: env::optional_flag("ENABLE_FILE_LOG"),
        })
    }

    pub fn grpc_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.grpc_port))
    }

    pub fn metrics_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.metric_port))
    }
}
