//! ABCD assessment pipeline binary.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use abcd_models::BrandCriteria;
use abcd_pipeline::{
    report, AnnotationGateway, AssessmentConfig, BrandCollector, FeatureJudge, PipelineError,
    StoreAnnotationGateway, TrimCache, VideoAssessor,
};
use abcd_storage::{BlobStore, S3BlobStore};

fn csv_env(name: &str) -> Vec<String> {
    std::env::var(name)
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn criteria_from_env() -> anyhow::Result<BrandCriteria> {
    let brand_name = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ABCD_BRAND_NAME").ok())
        .ok_or_else(|| anyhow::anyhow!("brand name required (argument or ABCD_BRAND_NAME)"))?;

    Ok(BrandCriteria {
        brand_name,
        brand_variations: csv_env("ABCD_BRAND_VARIATIONS"),
        branded_products: csv_env("ABCD_BRANDED_PRODUCTS"),
        branded_products_categories: csv_env("ABCD_BRANDED_PRODUCTS_CATEGORIES"),
        branded_call_to_actions: csv_env("ABCD_BRANDED_CALL_TO_ACTIONS"),
    })
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("abcd=info".parse().unwrap())
        .add_directive("aws_config=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting abcd-pipeline");

    let config = Arc::new(AssessmentConfig::from_env());
    info!("Assessment config: {:?}", config);

    let criteria = match criteria_from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid brand criteria: {}", e);
            std::process::exit(1);
        }
    };

    let store: Arc<dyn BlobStore> = match S3BlobStore::from_env() {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to create store client: {}", e);
            std::process::exit(1);
        }
    };

    let judge = if config.use_llms {
        match FeatureJudge::from_env(Duration::from_secs(90)) {
            Ok(j) => Some(Arc::new(j)),
            Err(e) => {
                error!("LLM-backed detection enabled but judge unavailable: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    let annotations: Arc<dyn AnnotationGateway> =
        Arc::new(StoreAnnotationGateway::new(Arc::clone(&store)));
    let trim_cache = Arc::new(TrimCache::new(
        Arc::clone(&store),
        config.trim_start_secs,
        config.trim_end_secs,
    ));
    let assessor = Arc::new(VideoAssessor::new(Arc::clone(&config), judge));

    let collector = BrandCollector::new(
        Arc::clone(&store),
        annotations,
        trim_cache,
        assessor,
        Arc::clone(&config),
    );

    let assessment = match collector.collect(&criteria).await {
        Ok(a) => a,
        Err(PipelineError::NoVideosFound { folder }) => {
            error!("There are no videos to assess under {}", folder);
            std::process::exit(1);
        }
        Err(PipelineError::AllVideosSkipped { skipped }) => {
            error!(
                "All {} discovered videos were skipped; nothing to report",
                skipped
            );
            std::process::exit(1);
        }
        Err(e) => {
            error!("Assessment failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", report::render_digest(&assessment));

    match report::upload_report(&store, &assessment, &config).await {
        Ok(urls) => {
            info!("Assessment report (JSON): {}", urls.json_url);
            info!("Assessment report (CSV): {}", urls.csv_url);
        }
        Err(e) => {
            error!("Failed to upload report: {}", e);
            std::process::exit(1);
        }
    }
}
