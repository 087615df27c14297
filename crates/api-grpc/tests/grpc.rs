use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};
use tonic::{Code, Request};

use api_grpc::pb::{
    triage_client::TriageClient, triage_server::TriageServer, SuggestPriorityReq, VitalSigns,
};
use api_grpc::{AuthInterceptor, TriageGrpcService};
use api_shared::ApiKey;
use triage_core::{EmptyHistory, TriageConfig, TriageService};

const KEY: &str = "integration-key";

async fn connect() -> TriageClient<Channel> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let svc = TriageGrpcService::new(
        TriageService::new(&TriageConfig::default(), Arc::new(EmptyHistory)),
        Duration::from_secs(1),
    );
    let interceptor = AuthInterceptor::new(ApiKey::new(KEY).unwrap());

    tokio::spawn(async move {
        Server::builder()
            .add_service(TriageServer::with_interceptor(svc, interceptor))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    TriageClient::connect(format!("http://{}", addr)).await.unwrap()
}

fn authorised<T>(message: T) -> Request<T> {
    let mut req = Request::new(message);
    req.metadata_mut().insert("x-api-key", KEY.parse().unwrap());
    req
}

fn intake(motive: &str, blood_pressure: &str) -> SuggestPriorityReq {
    SuggestPriorityReq {
        motivo_accesso: motive.into(),
        codice_fiscale: Some("RSSMRA46M15H501X".into()),
        vital_signs: Some(VitalSigns {
            blood_pressure: blood_pressure.into(),
            ..Default::default()
        }),
    }
}

#[tokio::test]
async fn calls_without_key_are_rejected() {
    let mut client = connect().await;
    let status = client
        .health(Request::new(()))
        .await
        .expect_err("unauthenticated");
    assert_eq!(status.code(), Code::Unauthenticated);
}

#[tokio::test]
async fn health_with_key() {
    let mut client = connect().await;
    let res = client.health(authorised(())).await.unwrap().into_inner();
    assert!(res.ok);
}

#[tokio::test]
async fn suggest_priority_round_trip() {
    let mut client = connect().await;
    let res = client
        .suggest_priority(authorised(intake("ictus sospetto", "85/50")))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(res.code.as_deref(), Some("rosso"));
    assert_eq!(res.rule_based.unwrap().code, "rosso");
    assert_eq!(res.history_based.unwrap().matches, 0);
}

#[tokio::test]
async fn estimate_rejects_blank_motive() {
    let mut client = connect().await;
    let status = client
        .estimate_priority(authorised(intake("   ", "")))
        .await
        .expect_err("invalid motive");
    assert_eq!(status.code(), Code::InvalidArgument);
}
