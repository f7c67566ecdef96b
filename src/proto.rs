//! Generated protobuf/gRPC bindings
//!
//! Compiled by `build.rs` from the schemas under `proto/engram/v1/`.

pub mod storage {
    tonic::include_proto!("engram.storage.v1");
}

pub mod state {
    tonic::include_proto!("engram.state.v1");
}
