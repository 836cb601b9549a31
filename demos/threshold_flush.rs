use dispatch_pool::{AsyncPool, Dispatcher, OperationFuture, Request, Ticks};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::info;

#[derive(Debug, Error)]
#[error("{0}")]
struct PingError(String);

#[derive(Debug, Clone)]
struct PingRequest {
  sequence: u64,
}

impl Request for PingRequest {
  type Key = u64;

  fn identity(&self) -> u64 {
    self.sequence
  }
}

struct FakePingApi;

impl Dispatcher for FakePingApi {
  type Request = PingRequest;
  type Output = u64;
  type Error = PingError;

  fn dispatch(&self, request: &PingRequest) -> Result<OperationFuture<u64, PingError>, PingError> {
    let sequence = request.sequence;
    Ok(Box::pin(async move {
      tokio::time::sleep(Duration::from_millis(50)).await;
      Ok(sequence)
    }))
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_target(false)
    .init();

  info!("--- Threshold vs. Unbounded Example ---");

  let client = Arc::new(FakePingApi);

  // With a tick threshold, every second add settles the batch on its own.
  let mut bounded = AsyncPool::new(client.clone(), Ticks::Limit(2), Handle::current(), "bounded_pool");
  for sequence in 0..4 {
    bounded.add(PingRequest { sequence }).await.expect("dispatch failed");
    info!("[bounded] after add #{}: {} pending", sequence, bounded.len());
  }

  // Unbounded pools only settle when the caller says so.
  let mut unbounded = AsyncPool::new(client, Ticks::Unbounded, Handle::current(), "unbounded_pool");
  for sequence in 0..4 {
    unbounded.add(PingRequest { sequence }).await.expect("dispatch failed");
    info!("[unbounded] after add #{}: {} pending", sequence, unbounded.len());
  }

  let summary = unbounded.flush().await;
  info!(
    "[unbounded] explicit flush settled {} operation(s), {} now pending",
    summary.settled(),
    unbounded.len()
  );
  info!("--- Threshold vs. Unbounded Example End ---");
}
