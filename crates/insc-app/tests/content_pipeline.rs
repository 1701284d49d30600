//! End-to-end flow through ClientServices with a mocked remote node.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use insc_app::{ClientDeps, ClientError, ClientServices, GatewayPolicy};
use insc_core::chunk::{chunk, content_hash, CHUNK_SIZE};
use insc_core::ports::{
    ClockPort, RateLimitEvent, RateLimitEventPort, ReadOnlyCall, ReadOnlyCallPort, SleepPort,
};
use insc_core::{CallError, ContractIdentity, Network, StructuredValue};
use mockall::mock;

mock! {
    pub Remote {}

    #[async_trait]
    impl ReadOnlyCallPort for Remote {
        async fn call_read_only(&self, call: &ReadOnlyCall) -> Result<StructuredValue, CallError>;
    }
}

const ADDRESS: &str = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";
const SENDER: &str = "SP000000000000000000002Q6VF78";

#[derive(Default)]
struct Events(Mutex<Vec<RateLimitEvent>>);

impl RateLimitEventPort for Events {
    fn publish(&self, event: RateLimitEvent) {
        self.0.lock().unwrap().push(event);
    }
}

struct Clock;

impl ClockPort for Clock {
    fn now_ms(&self) -> i64 {
        42
    }
}

struct NoSleep;

#[async_trait]
impl SleepPort for NoSleep {
    async fn sleep(&self, _duration: Duration) {}
}

fn services(remote: MockRemote, events: Arc<Events>) -> ClientServices {
    ClientServices::new(
        ClientDeps {
            remote: Arc::new(remote),
            cache: None,
            rate_limit_events: events,
            clock: Arc::new(Clock),
            sleeper: Arc::new(NoSleep),
        },
        GatewayPolicy {
            jitter: Duration::ZERO,
            ..GatewayPolicy::default()
        },
        SENDER,
    )
}

fn meta(total_size: u64, final_hash: [u8; 32]) -> StructuredValue {
    StructuredValue::ok(StructuredValue::some(StructuredValue::tuple([
        ("owner", StructuredValue::principal(SENDER)),
        ("creator", StructuredValue::none()),
        ("mime-type", StructuredValue::ascii("application/octet-stream")),
        ("total-size", StructuredValue::uint(total_size)),
        ("sealed", StructuredValue::Bool(true)),
        ("final-hash", StructuredValue::buffer(final_hash.to_vec())),
    ])))
}

fn index_of(value: &StructuredValue) -> usize {
    match value {
        StructuredValue::UInt(i) => *i as usize,
        other => panic!("unexpected index {other:?}"),
    }
}

#[tokio::test]
async fn batch_capable_contract_loads_and_verifies_content() {
    let data: Vec<u8> = (0..3 * CHUNK_SIZE - 100).map(|i| (i * 7 % 256) as u8).collect();
    let chunks = chunk(&data, CHUNK_SIZE).unwrap();
    let hash = content_hash(&data);
    let total_size = data.len() as u64;

    let mut remote = MockRemote::new();
    remote
        .expect_call_read_only()
        .withf(|call| call.function_name == "get-inscription-meta")
        .times(1)
        .returning(move |_| Ok(meta(total_size, hash)));
    let first = chunks[0].clone();
    remote
        .expect_call_read_only()
        .withf(|call| call.function_name == "get-chunk")
        .times(1)
        .returning(move |_| Ok(StructuredValue::some(StructuredValue::buffer(first.clone()))));
    let rest = chunks.clone();
    remote
        .expect_call_read_only()
        .withf(|call| call.function_name == "get-chunk-batch")
        .times(1)
        .returning(move |call| match &call.args[1] {
            StructuredValue::List(indices) => Ok(StructuredValue::list(indices.iter().map(|i| {
                StructuredValue::some(StructuredValue::buffer(rest[index_of(i)].clone()))
            }))),
            other => panic!("unexpected batch args {other:?}"),
        });

    let services = services(remote, Arc::new(Events::default()));
    let client = services.contract_client(ContractIdentity::new(
        ADDRESS,
        "inscriptions",
        Network::Mainnet,
        "2.0",
    ));

    let loaded = services.load_inscription().execute(&client, 5, true).await.unwrap();
    assert_eq!(loaded.content, data);
    assert!(loaded.verified);
    assert_eq!(loaded.meta.creator, None);
}

#[tokio::test]
async fn rate_limited_batch_notifies_once_then_falls_back() {
    let data: Vec<u8> = vec![3u8; 2 * CHUNK_SIZE + 1];
    let chunks = chunk(&data, CHUNK_SIZE).unwrap();

    let mut remote = MockRemote::new();
    remote
        .expect_call_read_only()
        .withf(|call| call.function_name == "get-chunk-batch")
        .times(3)
        .returning(|_| Err(CallError::new("HTTP 429 Too Many Requests")));
    let served = chunks.clone();
    remote
        .expect_call_read_only()
        .withf(|call| call.function_name == "get-chunk")
        .times(3)
        .returning(move |call| {
            Ok(StructuredValue::some(StructuredValue::buffer(
                served[index_of(&call.args[1])].clone(),
            )))
        });

    let events = Arc::new(Events::default());
    let services = services(remote, events.clone());
    let client = services.contract_client(ContractIdentity::new(
        ADDRESS,
        "inscriptions-v1-1",
        Network::Mainnet,
        "",
    ));

    let content = services
        .fetcher()
        .fetch_content(&client, 9, data.len() as u64, "application/octet-stream")
        .await
        .unwrap();
    assert_eq!(content, data);

    let events = events.0.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].function_name, "get-chunk-batch");
    assert_eq!(events[0].contract_id, format!("{ADDRESS}.inscriptions-v1-1"));
}

#[tokio::test]
async fn unknown_contract_fails_fast_with_gateway_error() {
    let mut remote = MockRemote::new();
    remote
        .expect_call_read_only()
        .times(1)
        .returning(|_| Err(CallError::new("NoSuchContract")));

    let services = services(remote, Arc::new(Events::default()));
    let client = services.contract_client(ContractIdentity::new(
        ADDRESS,
        "missing",
        Network::Testnet,
        "",
    ));

    let err = client.get_last_token_id().await.unwrap_err();
    assert!(matches!(err, ClientError::Gateway(_)));
    assert!(err.to_string().contains("NoSuchContract"));
}
