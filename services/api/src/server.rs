use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::{info, warn};

use qualiotrack::catalog::IndicatorCatalog;
use qualiotrack::config::AppConfig;
use qualiotrack::error::AppError;
use qualiotrack::telemetry;
use qualiotrack::workflows::conformity::{ComplianceExporter, ConformityAggregator};
use qualiotrack::workflows::evidence::{AutoProofGenerator, EvidenceService};
use qualiotrack::workflows::monitoring::{
    FeedBootstrapConfig, HttpFeedFetcher, KeywordIndex, MonitoringService,
};
use qualiotrack::workflows::SiteId;

use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryEvidenceRepository, InMemoryFeedRepository, InMemoryItemRepository,
    InMemoryValidationRepository,
};
use crate::routes::{application_routes, CoreServices};

/// Site the in-memory deployment registers its feeds under.
const DEFAULT_SITE: &str = "default";

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(feeds_config) = args.feeds_config.take() {
        config.monitoring.feeds_config_path = Some(feeds_config);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(IndicatorCatalog::standard());
    let feeds = Arc::new(InMemoryFeedRepository::default());
    let items = Arc::new(InMemoryItemRepository::default());
    let validations = Arc::new(InMemoryValidationRepository::default());
    let evidence = Arc::new(InMemoryEvidenceRepository::default());

    // reqwest's blocking client must be built off the async workers.
    let feed_timeout = config.monitoring.feed_timeout;
    let fetcher = tokio::task::spawn_blocking(move || HttpFeedFetcher::new(feed_timeout))
        .await
        .map_err(|err| {
            AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))
        })??;
    let monitoring = Arc::new(MonitoringService::new(
        Box::new(fetcher),
        feeds,
        items.clone(),
        validations.clone(),
        catalog.clone(),
        KeywordIndex::standard(),
    ));

    let bootstrap = match &config.monitoring.feeds_config_path {
        Some(path) => FeedBootstrapConfig::from_path(path)?,
        None => FeedBootstrapConfig::builtin(),
    };
    let site = SiteId(DEFAULT_SITE.to_string());
    match monitoring.bootstrap_feeds(&site, &bootstrap) {
        Ok(added) => info!(added, "feed registry ready"),
        Err(err) => warn!(%err, "feed bootstrap failed, continuing with an empty registry"),
    }

    let core = Arc::new(CoreServices {
        evidence: EvidenceService::new(evidence.clone()),
        generator: AutoProofGenerator::new(catalog.clone(), evidence.clone()),
        aggregator: ConformityAggregator::new(
            catalog.clone(),
            evidence.clone(),
            validations.clone(),
        ),
        exporter: ComplianceExporter::new(catalog, evidence, validations, items),
    });

    let app = application_routes(monitoring, core)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "compliance evidence service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
