//! Build script for the `api-shared` crate.
//!
//! Compiles `triage.proto` into server and client stubs. Every `triage.v1` message also derives
//! serde and `utoipa::ToSchema` so the REST API and its OpenAPI document can reuse them. The
//! descriptor set feeds gRPC reflection.

use std::path::PathBuf;

const PROTO: &str = "triage.proto";
const DESCRIPTOR: &str = "proto_descriptor.bin";
const MESSAGE_DERIVES: &str = "#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let proto = root.join(PROTO);

    println!("cargo:rerun-if-changed={}", proto.display());
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .type_attribute(".triage.v1", MESSAGE_DERIVES)
        .file_descriptor_set_path(out_dir.join(DESCRIPTOR))
        .compile_protos(&[proto], &[root])?;

    Ok(())
}
