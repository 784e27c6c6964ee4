// Defines the pingpong.PingPong service by hand instead of through a .proto
// file. The generated client and server expect `crate::pb` to provide the
// `Empty` and `EchoMessage` prost messages.
fn main() {
    let ping_pong_service = tonic_build::manual::Service::builder()
        .name("PingPong")
        .package("pingpong")
        .method(
            tonic_build::manual::Method::builder()
                .name("empty_call")
                .route_name("EmptyCall")
                .input_type("crate::pb::Empty")
                .output_type("crate::pb::Empty")
                .codec_path("tonic_prost::ProstCodec")
                .build(),
        )
        .method(
            tonic_build::manual::Method::builder()
                .name("echo")
                .route_name("Echo")
                .input_type("crate::pb::EchoMessage")
                .output_type("crate::pb::EchoMessage")
                .codec_path("tonic_prost::ProstCodec")
                .build(),
        )
        .build();

    tonic_build::manual::Builder::new().compile(&[ping_pong_service]);
}
