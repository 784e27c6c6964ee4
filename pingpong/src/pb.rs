//! Wire messages for the `pingpong.PingPong` service, together with the
//! client and server stubs generated from the manual service definition in
//! `build.rs`.

use bytes::Bytes;

/// Request and response of `EmptyCall`.
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Empty {}

/// Request and response of `Echo`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct EchoMessage {
    #[prost(bytes = "bytes", tag = "1")]
    pub payload: Bytes,
}

impl EchoMessage {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        EchoMessage {
            payload: payload.into(),
        }
    }
}

#[allow(clippy::all, unreachable_pub)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/pingpong.PingPong.rs"));
}

pub use generated::{ping_pong_client, ping_pong_server};
