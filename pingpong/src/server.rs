//! The echo side of the benchmark.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{transport::Server, Request, Response, Status};

use crate::config::Config;
use crate::pb::{
    ping_pong_server::{PingPong, PingPongServer},
    EchoMessage, Empty,
};
use crate::Error;

/// Answers every call with what it was given. Holds no state.
#[derive(Debug, Default, Clone)]
pub struct EchoService;

#[tonic::async_trait]
impl PingPong for EchoService {
    async fn empty_call(&self, _request: Request<Empty>) -> Result<Response<Empty>, Status> {
        Ok(Response::new(Empty {}))
    }

    async fn echo(&self, request: Request<EchoMessage>) -> Result<Response<EchoMessage>, Status> {
        let EchoMessage { payload } = request.into_inner();
        Ok(Response::new(EchoMessage { payload }))
    }
}

pub async fn bind(addr: &str) -> Result<TcpListener, Error> {
    TcpListener::bind(addr).await.map_err(|source| Error::Bind {
        addr: addr.to_string(),
        source,
    })
}

/// Serves [`EchoService`] on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    max_message_size: usize,
    shutdown: F,
) -> Result<(), Error>
where
    F: Future<Output = ()>,
{
    let svc = PingPongServer::new(EchoService)
        .max_decoding_message_size(max_message_size)
        .max_encoding_message_size(max_message_size);

    Server::builder()
        .add_service(svc)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
        .map_err(Error::Serve)
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn run(config: &Config) -> Result<(), Error> {
    let listener = bind(&config.server_address).await?;
    let local_addr: Option<SocketAddr> = listener.local_addr().ok();
    tracing::info!(addr = ?local_addr, "PingPong server listening");

    serve(listener, config.max_transport_message_size, async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "unable to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutting down");
    })
    .await
}
