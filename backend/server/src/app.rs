use std::{future::Future, sync::Arc};

use axum::{extract::Request, http};
use common_utils::consts;
use connector_integration::connectors::WalletOne;
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::oneshot,
};
use tower_http::{request_id::MakeRequestUuid, trace as tower_trace};

use crate::{configs, error::ConfigurationError, logger, metrics, utils};

/// # Panics
///
/// Will panic if signal handling fails
pub async fn server_builder(config: configs::Config) -> Result<(), ConfigurationError> {
    let server_config = config.server.clone();

    // Signal handler
    let (tx, rx) = oneshot::channel();

    #[allow(clippy::expect_used)]
    tokio::spawn(async move {
        let mut sig_int =
            signal(SignalKind::interrupt()).expect("Failed to initialize SIGINT signal handler");
        let mut sig_term =
            signal(SignalKind::terminate()).expect("Failed to initialize SIGTERM signal handler");
        let mut sig_quit =
            signal(SignalKind::quit()).expect("Failed to initialize QUIT signal handler");
        let mut sig_hup =
            signal(SignalKind::hangup()).expect("Failed to initialize SIGHUP signal handler");

        tokio::select! {
            _ = sig_int.recv() => {
                logger::info!("Received SIGINT");
            }
            _ = sig_term.recv() => {
                logger::info!("Received SIGTERM");
            }
            _ = sig_quit.recv() => {
                logger::info!("Received QUIT");
            }
            _ = sig_hup.recv() => {
                logger::info!("Received SIGHUP");
            }
        }
        // The receiver only goes away once the server has already stopped.
        let _ = tx.send(());
    });

    let shutdown_signal = async {
        let _ = rx.await;
        logger::info!("Shutdown signal received");
    };

    let service = Service::new(&config)?;
    let listener = server_config.tcp_listener().await?;

    logger::info!(
        host = %server_config.host,
        port = %server_config.port,
        merchant_id = config.walletone.merchant_id,
        "starting walletone connector service"
    );

    service.http_server(listener, shutdown_signal).await
}

pub struct Service {
    pub walletone: Arc<WalletOne>,
}

impl Service {
    pub fn new(config: &configs::Config) -> Result<Self, ConfigurationError> {
        let walletone = WalletOne::new(&config.walletone).map_err(|report| {
            logger::error!(error = ?report, "invalid walletone settings");
            ConfigurationError::ConnectorError(report.current_context().to_string())
        })?;

        Ok(Self {
            walletone: Arc::new(
                walletone.with_event_handler(Arc::new(metrics::NotificationMetrics)),
            ),
        })
    }

    /// Router with the tracing and request id layers applied
    pub fn router(&self) -> axum::Router {
        let logging_layer = tower_trace::TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| utils::record_fields_from_header(request))
            .on_request(tower_trace::DefaultOnRequest::new().level(tracing::Level::INFO))
            .on_response(
                tower_trace::DefaultOnResponse::new()
                    .level(tracing::Level::INFO)
                    .latency_unit(tower_http::LatencyUnit::Micros),
            )
            .on_failure(
                tower_trace::DefaultOnFailure::new()
                    .latency_unit(tower_http::LatencyUnit::Micros)
                    .level(tracing::Level::ERROR),
            );

        let request_id_layer = tower_http::request_id::SetRequestIdLayer::new(
            http::HeaderName::from_static(consts::X_REQUEST_ID),
            MakeRequestUuid,
        );

        let propagate_request_id_layer = tower_http::request_id::PropagateRequestIdLayer::new(
            http::HeaderName::from_static(consts::X_REQUEST_ID),
        );

        let app_state = crate::http::AppState::new(Arc::clone(&self.walletone));
        crate::http::create_router(app_state)
            .layer(logging_layer)
            .layer(propagate_request_id_layer)
            .layer(request_id_layer)
    }

    pub async fn http_server(
        self,
        listener: tokio::net::TcpListener,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ConfigurationError> {
        let router = self.router();

        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

pub async fn metrics_server_builder(config: configs::Config) -> Result<(), ConfigurationError> {
    let listener = config.metrics.tcp_listener().await?;

    let router = axum::Router::new().route(
        "/metrics",
        axum::routing::get(|| async {
            let output = metrics::metrics_handler().await;
            match output {
                Ok(metrics) => Ok(metrics),
                Err(error) => {
                    tracing::error!(?error, "Error fetching metrics");

                    Err((
                        http::StatusCode::INTERNAL_SERVER_ERROR,
                        "Error fetching metrics".to_string(),
                    ))
                }
            }
        }),
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async {
            let output = tokio::signal::ctrl_c().await;
            tracing::error!(?output, "shutting down");
        })
        .await?;

    Ok(())
}
