use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use tokio::net::TcpListener;
use tonic::{
    transport::{server::TcpIncoming, Server},
    Code, Request, Response, Status,
};

use counter_client::{
    counter::{CounterApi, CounterApiServer, IncrementCounterRequest, IncrementCounterResponse},
    invoke_counter, serve, ClientConfig, Connection, CounterClient, CounterError, Deadline,
    ServerAddr,
};

#[derive(Default)]
struct Counter {
    value: AtomicU64,
    limit: Option<u64>,
}

#[tonic::async_trait]
impl CounterApi for Counter {
    async fn increment(
        &self,
        request: Request<IncrementCounterRequest>,
    ) -> Result<Response<IncrementCounterResponse>, Status> {
        let step = request.into_inner().step;
        let value = self.value.fetch_add(step, Ordering::SeqCst) + step;
        if self.limit.map_or(false, |limit| value > limit) {
            return Err(Status::resource_exhausted("counter limit reached"));
        }
        Ok(Response::new(IncrementCounterResponse { value }))
    }
}

async fn spawn_counter(counter: Counter) -> ServerAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let incoming = TcpIncoming::from_listener(listener, true, None).unwrap();
    tokio::spawn(
        Server::builder()
            .add_service(CounterApiServer::new(counter))
            .serve_with_incoming(incoming),
    );
    ServerAddr::parse(&format!("127.0.0.1:{}", port)).unwrap()
}

fn printed_values(out: &[u8]) -> Vec<u64> {
    String::from_utf8_lossy(out)
        .lines()
        .map(|line| line.rsplit_once("current value: ").unwrap().1.parse().unwrap())
        .collect()
}

#[tokio::test]
async fn three_increments_print_one_two_three() {
    let addr = spawn_counter(Counter::default()).await;
    let conn = Connection::open(addr, Deadline::after(Duration::from_secs(60)))
        .await
        .unwrap();
    let mut client = CounterClient::from_connection(Some(&conn)).unwrap();
    let mut out = Vec::new();

    let printed = invoke_counter(&mut client, 3, &mut out).await.unwrap();

    assert_eq!(printed, 3);
    assert_eq!(printed_values(&out), vec![1, 2, 3]);
}

#[tokio::test]
async fn remote_error_aborts_the_loop() {
    let addr = spawn_counter(Counter {
        limit: Some(2),
        ..Default::default()
    })
    .await;
    let conn = Connection::open(addr, Deadline::after(Duration::from_secs(60)))
        .await
        .unwrap();
    let mut client = CounterClient::from_connection(Some(&conn)).unwrap();
    let mut out = Vec::new();

    let res = invoke_counter(&mut client, 5, &mut out).await;

    match res {
        Err(CounterError::RemoteCall(status)) => {
            assert_eq!(status.code(), Code::ResourceExhausted);
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(printed_values(&out), vec![1, 2]);
}

#[tokio::test]
async fn serve_without_listener_reports_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ClientConfig {
        server: format!("127.0.0.1:{}", port),
        repeats: 3,
        timeout: Duration::from_secs(10),
    };
    let res = serve(&config).await;
    assert!(matches!(res, Err(CounterError::Connection { .. })));
}

#[tokio::test]
async fn serve_rejects_malformed_address() {
    let config = ClientConfig {
        server: "no-port-here".to_string(),
        ..Default::default()
    };
    let res = serve(&config).await;
    assert!(matches!(res, Err(CounterError::InvalidAddress { .. })));
}
