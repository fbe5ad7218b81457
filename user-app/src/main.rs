//! # User Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter
//! - Create the user service
//! - Start the public HTTP listener and the RPC listener over shared state

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use platform_repo::build_repo;
use user_hex::{
    UserService,
    inbound::{AppState, HttpServer, RpcServer},
};

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("user-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Span export only when a collector is configured
    let otel = match std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Some(_) => Some(init_tracer()?),
        None => None,
    };
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,user_app=debug,user_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!(
        "Starting user server on port {} (rpc {})",
        config.port,
        config.rpc_port
    );

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    // One service instance behind both listeners
    let state = Arc::new(AppState {
        service: UserService::new(repo),
    });

    let http = HttpServer::from_state(state.clone());
    let rpc = RpcServer::from_state(state);

    let http_addr = format!("0.0.0.0:{}", config.port);
    let rpc_addr = format!("0.0.0.0:{}", config.rpc_port);

    tokio::try_join!(http.run(&http_addr), rpc.run(&rpc_addr))?;

    // Ensure traces are flushed before exit
    if let Some((_, provider)) = otel {
        let _ = provider.shutdown();
    }
    Ok(())
}
