use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredPublisher};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fundability::analytics::AnalyticsStore;
use fundability::config::AppConfig;
use fundability::error::AppError;
use fundability::telemetry;
use fundability::FundabilityService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let analytics = Arc::new(AnalyticsStore::with_capacity(config.analytics.capacity));
    let publisher = ConfiguredPublisher::from_config(&config.webhooks)?;
    let webhook_targets = publisher.target_count();
    let service = FundabilityService::new(analytics, Arc::new(publisher))
        .with_internal_error_details(config.environment.exposes_internal_errors());

    let app = with_service_routes(Arc::new(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        analytics_capacity = config.analytics.capacity,
        webhook_targets,
        "fundability service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
