//! In-memory fakes for the core ports, shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use insc_core::ports::{
    CacheKey, ClockPort, ContentCachePort, RateLimitEvent, RateLimitEventPort, ReadOnlyCall,
    ReadOnlyCallPort, SleepPort,
};
use insc_core::{CallError, Capabilities, ContractIdentity, Network, StructuredValue};

use crate::client::ContractClient;
use crate::gateway::{GatewayPolicy, ReadOnlyGateway};

pub const CONTRACT_ADDRESS: &str = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";
pub const SENDER: &str = "SP000000000000000000002Q6VF78";

type Handler = dyn Fn(&ReadOnlyCall) -> Result<StructuredValue, CallError> + Send + Sync;

/// Remote node fake answering from a closure and recording every call.
pub struct FakeRemote {
    handler: Box<Handler>,
    calls: Mutex<Vec<ReadOnlyCall>>,
}

impl FakeRemote {
    pub fn new(
        handler: impl Fn(&ReadOnlyCall) -> Result<StructuredValue, CallError>
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ReadOnlyCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, function_name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.function_name == function_name)
            .count()
    }
}

#[async_trait]
impl ReadOnlyCallPort for FakeRemote {
    async fn call_read_only(&self, call: &ReadOnlyCall) -> Result<StructuredValue, CallError> {
        self.calls.lock().unwrap().push(call.clone());
        (self.handler)(call)
    }
}

/// Serves `get-chunk` and `get-chunk-batch` from `chunks`.
///
/// `batch_error` makes every batch call fail with that message.
pub fn chunk_remote(chunks: Vec<Vec<u8>>, batch_error: Option<&'static str>) -> Arc<FakeRemote> {
    chunk_remote_with(chunks, move |_, entries| match batch_error {
        Some(message) => Err(CallError::new(message)),
        None => Ok(entries),
    })
}

/// Like [`chunk_remote`], with `on_batch` deciding each batch answer from the
/// requested indices and the entries that would normally be returned.
pub fn chunk_remote_with(
    chunks: Vec<Vec<u8>>,
    on_batch: impl Fn(&[u128], Vec<StructuredValue>) -> Result<Vec<StructuredValue>, CallError>
        + Send
        + Sync
        + 'static,
) -> Arc<FakeRemote> {
    FakeRemote::new(move |call| {
        let chunk_at = |index: u128| match chunks.get(index as usize) {
            Some(bytes) => StructuredValue::some(StructuredValue::buffer(bytes.clone())),
            None => StructuredValue::none(),
        };
        match call.function_name.as_str() {
            "get-chunk" => match call.args[1] {
                StructuredValue::UInt(index) => Ok(chunk_at(index)),
                _ => Ok(StructuredValue::none()),
            },
            "get-chunk-batch" => match &call.args[1] {
                StructuredValue::List(items) => {
                    let indices: Vec<u128> = items
                        .iter()
                        .filter_map(|item| match item {
                            StructuredValue::UInt(index) => Some(*index),
                            _ => None,
                        })
                        .collect();
                    let entries = indices.iter().map(|&index| chunk_at(index)).collect();
                    on_batch(&indices, entries).map(StructuredValue::list)
                }
                _ => Err(CallError::new("bad batch args")),
            },
            other => Err(CallError::new(format!("unexpected function {other}"))),
        }
    })
}

#[derive(Default)]
pub struct NoopEvents;

impl RateLimitEventPort for NoopEvents {
    fn publish(&self, _event: RateLimitEvent) {}
}

pub struct FixedClock(pub i64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// Returns immediately; backoff is covered by the gateway tests.
pub struct InstantSleeper;

#[async_trait]
impl SleepPort for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

#[derive(Default)]
pub struct MemoryCache {
    pub entries: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl ContentCachePort for MemoryCache {
    async fn get(&self, key: &CacheKey) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().unwrap().get(&key.to_string()).cloned())
    }

    async fn set(&self, key: &CacheKey, bytes: &[u8]) -> anyhow::Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

pub struct BrokenCache;

#[async_trait]
impl ContentCachePort for BrokenCache {
    async fn get(&self, _key: &CacheKey) -> anyhow::Result<Option<Vec<u8>>> {
        Err(anyhow::anyhow!("cache offline"))
    }

    async fn set(&self, _key: &CacheKey, _bytes: &[u8]) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("cache offline"))
    }
}

pub fn test_gateway() -> Arc<ReadOnlyGateway> {
    Arc::new(ReadOnlyGateway::new(
        GatewayPolicy {
            jitter: Duration::ZERO,
            ..GatewayPolicy::default()
        },
        Arc::new(NoopEvents),
        Arc::new(FixedClock(0)),
        Arc::new(InstantSleeper),
    ))
}

pub fn identity() -> ContractIdentity {
    ContractIdentity::new(CONTRACT_ADDRESS, "inscriptions", Network::Mainnet, "")
}

pub fn client_with(remote: Arc<FakeRemote>, capabilities: Capabilities) -> ContractClient {
    ContractClient::new(identity(), SENDER, capabilities, remote, test_gateway())
}
