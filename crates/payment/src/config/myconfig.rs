use crate::config::MpesaConfig;
use anyhow::{Context, Result};
use shared::config::env;
use std::{net::SocketAddr, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub db_max_connection: u32,
    pub db_min_connection: u32,
    pub grpc_port: u16,
    pub http_port: u16,
    pub order_grpc_addr: String,
    pub order_rpc_timeout: Duration,
    pub otel_endpoint: String,
    pub dev_mode: bool,
    pub enable_file_log: bool,
    pub mpesa: MpesaConfig,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url = env::required("DATABASE_URL")?;
        let run_migrations = env::flag("RUN_MIGRATIONS")?;
        let db_max_connection = env::parsed_or("DB_MAX_CONNECTION", 10u32)?;
        let db_min_connection = env::parsed_or("DB_MIN_CONNECTION", 1u32)?;

        let grpc_port = env::required_parsed::<u16>("PAYMENT_GRPC_PORT")?;
        let http_port = env::required_parsed::<u16>("PAYMENT_HTTP_PORT")?;

        let order_grpc_addr = env::required("GRPC_ORDER_ADDR")?;
        let order_rpc_timeout =
            Duration::from_secs(env::parsed_or("ORDER_RPC_TIMEOUT_SECS", 10u64)?);

        let otel_endpoint = env::parsed_or(
            "OTEL_EXPORTER_OTLP_ENDPOINT",
            "http://otel-collector:4317".to_string(),
        )?;

        let mpesa = MpesaConfig::init().context("Failed to load M-Pesa configuration")?;

        Ok(Self {
            database_url,
            run_migrations,
            db_max_connection,
            db_min_connection,
            grpc_port,
            http_port,
            order_grpc_addr,
            order_rpc_timeout,
            otel_endpoint,
            dev_mode: env::optional_flag("DEV_MODE"),
            enable_file_log: env::optional_flag("ENABLE_FILE_LOG"),
            mpesa,
        })
    }

    pub fn grpc_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.grpc_port))
    }

    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.http_port))
    }
}
