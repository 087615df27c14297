//! # API gRPC
//!
//! gRPC server implementation for the triage service.
//!
//! Handles:
//! - gRPC service setup and authentication
//! - Service implementations using `triage-core` for the suggestion engine
//! - gRPC-specific concerns (interceptors, tonic integration, protobuf conversion)
//!
//! Uses `api-shared` for common types and utilities.

#![warn(rust_2018_idioms)]

pub use service::{pb, AuthInterceptor, TriageGrpcService};

pub mod service;
