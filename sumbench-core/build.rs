// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Build script generating the `ProcessService` gRPC client and server stubs.
//!
//! The service is described in Rust with tonic-build's manual builder, so no
//! `protoc` binary is required. Message types live in `src/proto.rs`.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let process = tonic_build::manual::Method::builder()
        .name("process")
        .route_name("Process")
        .input_type("crate::proto::ProcessRequest")
        .output_type("crate::proto::ProcessResponse")
        .codec_path("tonic::codec::ProstCodec")
        .build();

    let service = tonic_build::manual::Service::builder()
        .name("ProcessService")
        .package("process")
        .comment("Sums a list of 64-bit integers.")
        .method(process)
        .build();

    tonic_build::manual::Builder::new()
        .build_client(true)
        .build_server(true)
        .compile(&[service]);

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
