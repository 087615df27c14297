//! # API Shared
//!
//! Shared utilities and definitions for the triage APIs.
//!
//! Contains:
//! - Protobuf-generated types (`pb` module)
//! - REST request/response bodies with lenient vital-sign decoding (`rest` module)
//! - Shared services like `HealthService`
//! - Authentication utilities (usable by both gRPC and REST)
//! - The deadline-bounded suggestion used by every API surface (`suggest`)
//! - The default log filter of every binary (`logging`)
//!
//! Used by `api-grpc` and `api-rest` for common functionality.

// Re-export the generated protobuf module. The generated code will be placed
// into OUT_DIR at build time by the build script.
pub mod pb {
    tonic::include_proto!("triage.v1");
}

pub mod auth;
pub mod health;
pub mod logging;
pub mod rest;
pub mod suggest;

pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("proto_descriptor");

pub use auth::ApiKey;
pub use health::HealthService;
pub use pb::*;
pub use suggest::HistoryGate;
