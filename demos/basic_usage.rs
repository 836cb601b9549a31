use dispatch_pool::{AsyncPool, Dispatcher, OperationFuture, Request, Ticks};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::info;

#[derive(Debug, Error)]
#[error("{0}")]
struct ApiError(String);

/// A lookup against the simulated profile API, keyed by user id.
#[derive(Debug, Clone)]
struct ProfileRequest {
  user_id: u32,
}

impl Request for ProfileRequest {
  type Key = u32;

  fn identity(&self) -> u32 {
    self.user_id
  }
}

/// Stands in for an HTTP client: answers after a short latency, with user 4
/// scripted to fail so the failure path shows up in the output.
struct FakeProfileApi;

impl Dispatcher for FakeProfileApi {
  type Request = ProfileRequest;
  type Output = String;
  type Error = ApiError;

  fn dispatch(&self, request: &ProfileRequest) -> Result<OperationFuture<String, ApiError>, ApiError> {
    let user_id = request.user_id;
    let latency = Duration::from_millis(100 + u64::from(user_id % 3) * 150);
    Ok(Box::pin(async move {
      tokio::time::sleep(latency).await;
      if user_id == 4 {
        Err(ApiError(format!("profile {} not found", user_id)))
      } else {
        Ok(format!("profile-{}", user_id))
      }
    }))
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_target(false) // Disable module paths for cleaner example output
    .init();

  info!("--- Basic Usage Example ---");

  let client = Arc::new(FakeProfileApi);
  let mut pool = AsyncPool::new(client, Ticks::Limit(3), Handle::current(), "basic_pool");

  for user_id in 1..=5 {
    let result = pool
      .add_with(ProfileRequest { user_id }, move |outcome| match outcome.into_result() {
        Ok(profile) => info!("User {} resolved to {}", user_id, profile),
        Err(error) => info!("User {} failed: {}", user_id, error),
      })
      .await;

    if let Err(error) = result {
      tracing::error!("Failed to dispatch lookup for user {}: {}", user_id, error);
      continue;
    }

    // The third add reaches the tick threshold and settles the first batch
    // before returning; the remaining lookups collect into the next one.
    info!("User {} dispatched, {} operation(s) now pending", user_id, pool.len());
  }

  info!("Flushing the remaining operations explicitly.");
  let summary = pool.flush().await;
  info!(
    "Final flush settled {} operation(s): {} succeeded, {} failed",
    summary.settled(),
    summary.succeeded,
    summary.failed
  );
  info!("--- Basic Usage Example End ---");
}
