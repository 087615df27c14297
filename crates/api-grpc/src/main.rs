use std::net::SocketAddr;
use tonic::transport::Server;
use tonic_reflection::server::Builder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::{pb::triage_server::TriageServer, AuthInterceptor, TriageGrpcService};
use api_shared::{ApiKey, FILE_DESCRIPTOR_SET};
use triage_core::{TriageConfig, TriageService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(api_shared::logging::env_filter(&["api_grpc=info"])?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("TRIAGE_GRPC_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:50051".into())
        .parse()?;

    let api_key =
        ApiKey::from_env().ok_or_else(|| anyhow::anyhow!("API_KEY must be set for the gRPC API"))?;

    let cfg = TriageConfig::from_env()?;
    let svc = TriageGrpcService::new(
        TriageService::new(&cfg, cfg.open_history()),
        cfg.history_timeout(),
    );

    tracing::info!("-- Starting triage gRPC on {}", addr);

    let mut server_builder = Server::builder().add_service(TriageServer::with_interceptor(
        svc,
        AuthInterceptor::new(api_key),
    ));

    if std::env::var("TRIAGE_ENABLE_REFLECTION").unwrap_or_else(|_| "false".to_string()) == "true"
    {
        let reflection_service = Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;
        server_builder = server_builder.add_service(reflection_service);
        tracing::info!("gRPC server reflection enabled");
    } else {
        tracing::info!("gRPC server reflection disabled");
    }

    server_builder.serve(addr).await?;

    Ok(())
}
