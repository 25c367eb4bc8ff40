use anyhow::{Context, Result};
use axum::{Router, routing::get};
use genproto::payment::payment_service_server::PaymentServiceServer;
use payment::{
    config::Config,
    handler::{PaymentGrpcServiceImpl, callback_router},
    metrics::metrics_handler,
    state::AppState,
};
use shared::{
    config::{ConnectionManager, ConnectionPool},
    domain::verify_enum_mappings,
    utils::{Telemetry, init_logger, shutdown_signal},
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    verify_enum_mappings().context("Wire and storage enums diverged")?;

    let telemetry = Telemetry::init("payment-service", &config.otel_endpoint)
        .context("Failed to initialize telemetry")?;

    let _log_guard = init_logger(
        telemetry.logger_provider(),
        "payment-service",
        config.dev_mode,
        config.enable_file_log,
    );

    info!("Starting payment service initialization...");

    let db_pool = ConnectionManager::new_pool(
        &config.database_url,
        config.db_min_connection,
        config.db_max_connection,
    )
    .await
    .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("Failed to run database migrations")?;
    }

    let state = Arc::new(
        AppState::new(db_pool, &config)
            .await
            .context("Failed to create AppState")?,
    );

    let payment_service_impl = PaymentGrpcServiceImpl::new(
        state.di_container.payment_command.clone(),
        state.di_container.payment_query.clone(),
    );

    let (shutdown_tx, _) = broadcast::channel(1);

    let grpc_addr = config.grpc_addr();
    let grpc_shutdown_rx = shutdown_tx.subscribe();
    let grpc_handle = tokio::spawn(async move {
        loop {
            match start_grpc_server(
                payment_service_impl.clone(),
                grpc_addr,
                grpc_shutdown_rx.resubscribe(),
            )
            .await
            {
                Ok(()) => {
                    info!("gRPC server stopped gracefully");
                    break;
                }
                Err(e) => {
                    error!("❌ gRPC server failed: {e}. Restarting in 5s...");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    });

    let http_addr = config.http_addr();
    let http_state = state.clone();
    let http_shutdown_rx = shutdown_tx.subscribe();
    let http_handle = tokio::spawn(async move {
        loop {
            info!("🔧 Starting HTTP server on {http_addr}");
            match start_http_server(
                http_state.clone(),
                http_addr,
                http_shutdown_rx.resubscribe(),
            )
            .await
            {
                Ok(()) => {
                    info!("HTTP server stopped gracefully");
                    break;
                }
                Err(e) => {
                    error!("❌ HTTP server failed: {e}. Retrying in 3s...");
                    tokio::time::sleep(Duration::from_secs(3)).await;
                }
            }
        }
    });

    let signal_shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("🛑 Shutdown signal received.");
        if let Err(e) = signal_shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal: {e}");
        }
    });

    let mut shutdown_rx = shutdown_tx.subscribe();
    let _ = shutdown_rx.recv().await;

    info!("🛑 Shutting down all servers...");

    let shutdown_result = tokio::time::timeout(Duration::from_secs(30), async {
        let _ = tokio::join!(grpc_handle, http_handle);
    })
    .await;

    match shutdown_result {
        Ok(()) => info!("✅ All servers shutdown gracefully"),
        Err(_) => warn!("⚠️  Shutdown timeout reached, forcing exit"),
    }

    if let Err(e) = telemetry.shutdown() {
        error!("Failed to shutdown telemetry: {e}");
    }

    info!("✅ Payment Service shutdown complete.");

    Ok(())
}

async fn start_grpc_server(
    payment_service: PaymentGrpcServiceImpl,
    addr: SocketAddr,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    info!("Starting gRPC server on {addr}");

    let shutdown_future = async move {
        let _ = shutdown_rx.recv().await;
        info!("gRPC server received shutdown signal");
    };

    tonic::transport::Server::builder()
        .add_service(PaymentServiceServer::new(payment_service))
        .serve_with_shutdown(addr, shutdown_future)
        .await
        .context("gRPC server failed to start or serve")
}

async fn start_http_server(
    state: Arc<AppState>,
    addr: SocketAddr,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_check))
        .with_state(state.clone())
        .merge(callback_router(state.di_container.callback.clone()))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {addr}"))?;

    let shutdown_future = async move {
        let _ = shutdown_rx.recv().await;
        info!("HTTP server received shutdown signal");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_future)
        .await
        .context("HTTP server failed to start or serve")
}

async fn health_check() -> &'static str {
    "OK"
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
