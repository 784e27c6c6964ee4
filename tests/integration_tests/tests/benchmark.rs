use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use integration_tests::{client_config, trace_init, TestServer};
use pingpong::{
    client::Driver,
    pb::{
        ping_pong_server::{PingPong, PingPongServer},
        EchoMessage, Empty,
    },
    report::Report,
    Error,
};
use tokio::{net::TcpListener, sync::oneshot};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{transport::Server, Request, Response, Status};

#[tokio::test]
async fn small_sweep_reports_every_size() {
    trace_init();

    let server = TestServer::start(8 * 1024 * 1024).await;
    let config = client_config(
        server.addr,
        &["--iterations", "10", "--warmup=false", "--max_message_size", "4"],
    );

    let mut driver = Driver::connect(&config).await.unwrap();
    let mut report = Report::new(Vec::new()).unwrap();
    let samples = driver.run(&mut report).await.unwrap();

    let sizes: Vec<u64> = samples.iter().map(|s| s.size).collect();
    assert_eq!(sizes, vec![0, 1, 2, 4]);
    for sample in &samples {
        assert_eq!(sample.iterations, 10);
        assert_eq!(
            u128::from(sample.latency_ns),
            sample.elapsed.as_nanos() / 10
        );
    }

    let out = String::from_utf8(report.into_inner()).unwrap();
    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("bytes\tlatency"));
    for (line, sample) in lines.by_ref().zip(&samples) {
        let (size, latency) = line.split_once('\t').unwrap();
        assert_eq!(size.parse::<u64>().unwrap(), sample.size);
        assert_eq!(latency.parse::<u64>().unwrap(), sample.latency_ns);
    }
    assert_eq!(lines.next(), None);

    drop(driver);
    server.shutdown().await;
}

#[tokio::test]
async fn single_message_size_is_honored() {
    trace_init();

    let server = TestServer::start(8 * 1024 * 1024).await;
    let config = client_config(
        server.addr,
        &["--iterations", "3", "--warmup=false", "--message_size", "1000"],
    );

    let mut driver = Driver::connect(&config).await.unwrap();
    let mut report = Report::new(Vec::new()).unwrap();
    let samples = driver.run(&mut report).await.unwrap();

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].size, 1000);

    drop(driver);
    server.shutdown().await;
}

#[derive(Default, Clone)]
struct CountingEcho {
    echo_calls: Arc<AtomicU64>,
}

#[tonic::async_trait]
impl PingPong for CountingEcho {
    async fn empty_call(&self, _: Request<Empty>) -> Result<Response<Empty>, Status> {
        Ok(Response::new(Empty {}))
    }

    async fn echo(&self, req: Request<EchoMessage>) -> Result<Response<EchoMessage>, Status> {
        self.echo_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Response::new(req.into_inner()))
    }
}

#[tokio::test]
async fn warmup_calls_are_not_timed() {
    trace_init();

    let svc = CountingEcho::default();
    let echo_calls = svc.echo_calls.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let jh = tokio::spawn(async move {
        Server::builder()
            .add_service(PingPongServer::new(svc))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async {
                drop(rx.await)
            })
            .await
            .unwrap();
    });

    for (warmup, per_size) in [("true", 1 + 5 + 10), ("false", 1 + 10)] {
        echo_calls.store(0, Ordering::SeqCst);

        let config = client_config(
            addr,
            &[
                "--iterations",
                "10",
                "--warmup",
                warmup,
                "--warmup_iterations",
                "5",
                "--max_message_size",
                "2",
            ],
        );
        let mut driver = Driver::connect(&config).await.unwrap();
        let mut report = Report::new(Vec::new()).unwrap();
        let samples = driver.run(&mut report).await.unwrap();

        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| s.iterations == 10));
        assert_eq!(echo_calls.load(Ordering::SeqCst), 3 * per_size);
    }

    tx.send(()).unwrap();
    jh.await.unwrap();
}

#[tokio::test]
async fn unreachable_server_is_fatal() {
    trace_init();

    // Grab a free port, then release it so nothing is listening there.
    let addr = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap();

    let config = client_config(addr, &["--iterations", "1"]);

    match Driver::connect(&config).await {
        Err(Error::Connect { addr: reported, .. }) => assert_eq!(reported, addr.to_string()),
        Err(err) => panic!("expected connect error, got {err}"),
        Ok(_) => panic!("connected to a closed port"),
    }
}

#[tokio::test]
async fn oversized_payload_aborts_the_run() {
    trace_init();

    let server = TestServer::start(1024).await;
    let config = client_config(
        server.addr,
        &["--iterations", "1", "--warmup=false", "--message_size", "2048"],
    );

    let mut driver = Driver::connect(&config).await.unwrap();
    let mut report = Report::new(Vec::new()).unwrap();

    match driver.run(&mut report).await {
        Err(Error::Call { size, source }) => {
            assert_eq!(size, 2048);
            assert_eq!(source.code(), tonic::Code::OutOfRange);
        }
        other => panic!("expected call error, got {other:?}"),
    }

    let out = String::from_utf8(report.into_inner()).unwrap();
    assert_eq!(out, "bytes\tlatency\n");

    drop(driver);
    server.shutdown().await;
}
