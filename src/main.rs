use std::net::SocketAddr;
use tonic::transport::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::{AuthInterceptor, TriageGrpcService, pb::triage_server::TriageServer};
use api_rest::{AppState, app};
use api_shared::ApiKey;
use triage_core::{TriageConfig, TriageService};

/// Main entry point for the triage application
///
/// Starts both gRPC and REST servers concurrently over one `TriageService`:
/// - gRPC server on port 50051 (configurable via TRIAGE_GRPC_ADDR)
/// - REST server on port 3000 (configurable via TRIAGE_REST_ADDR)
///
/// The gRPC server requires authentication via x-api-key header.
/// The REST server is open and serves Swagger UI.
///
/// # Environment Variables
/// - `TRIAGE_GRPC_ADDR`: gRPC server address (default: "0.0.0.0:50051")
/// - `TRIAGE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `TRIAGE_HISTORY_FILE`: JSON history of recorded emergencies (default: none)
/// - `TRIAGE_HISTORY_LIMIT`: number of recent emergencies compared (default: 120)
/// - `TRIAGE_HISTORY_TIMEOUT_MS`: deadline for the history read (default: 750)
/// - `API_KEY`: API key for gRPC authentication
///
/// # Returns
/// * `Ok(())` - If servers start and run successfully
/// * `Err(anyhow::Error)` - If configuration, server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(api_shared::logging::env_filter(&["triage_run=info"])?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let grpc_addr: SocketAddr = std::env::var("TRIAGE_GRPC_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:50051".into())
        .parse()?;
    let rest_addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let api_key =
        ApiKey::from_env().ok_or_else(|| anyhow::anyhow!("API_KEY must be set for the gRPC API"))?;

    let cfg = TriageConfig::from_env()?;
    let service = TriageService::new(&cfg, cfg.open_history());
    let deadline = cfg.history_timeout();

    tracing::info!("++ Starting triage gRPC on {}", grpc_addr);
    tracing::info!("++ Starting triage REST on {}", rest_addr);

    let rest_app = app(AppState::new(service.clone(), deadline));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    let rest_server = tokio::spawn(async move { axum::serve(listener, rest_app).await });

    let grpc_server = Server::builder()
        .add_service(TriageServer::with_interceptor(
            TriageGrpcService::new(service, deadline),
            AuthInterceptor::new(api_key),
        ))
        .serve(grpc_addr);

    // Run both
    let (rest_result, grpc_result) = tokio::join!(rest_server, grpc_server);
    rest_result??;
    grpc_result?;

    Ok(())
}
