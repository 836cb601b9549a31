use crate::dispatch::{Dispatcher, Request};
use crate::error::PoolError;
use crate::outcome::{FlushSummary, Outcome, SettlementCallback};
use crate::ticks::Ticks;

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use futures::future::join_all;
use tokio::runtime::Handle as TokioHandle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info_span, trace, warn, Instrument};

lazy_static::lazy_static! {
  static ref NEXT_OPERATION_ID_COUNTER: AtomicU64 = AtomicU64::new(0);
}

type KeyOf<D> = <<D as Dispatcher>::Request as Request>::Key;

/// A dispatched operation the pool still tracks for settlement.
struct PendingOperation<T, E> {
  operation_id: u64,
  in_flight: JoinHandle<Result<T, E>>,
  on_settle: Option<SettlementCallback<T, E>>,
}

/// Collects in-flight API operations and settles them in batches.
///
/// Every operation is dispatched the moment it is added; only the wait for
/// its completion is deferred. The pending set is settled wholesale, either
/// automatically when it reaches the configured [`Ticks`] threshold or when
/// the caller flushes explicitly, amortizing the wait across the batch
/// instead of paying it per request.
///
/// `add` and `flush` take `&mut self`: pending-set mutation is a
/// check-then-act sequence, so the pool is built for a single logical caller
/// and leans on the borrow checker instead of a lock. The client handle is
/// shared and must itself tolerate concurrent in-flight operations.
pub struct AsyncPool<D: Dispatcher> {
  pool_name: Arc<String>,
  client: Arc<D>,
  ticks: Ticks,
  tokio_handle: TokioHandle,
  pending: HashMap<KeyOf<D>, PendingOperation<D::Output, D::Error>>,
}

impl<D: Dispatcher> AsyncPool<D> {
  pub fn new(client: Arc<D>, ticks: Ticks, tokio_handle: TokioHandle, pool_name: &str) -> Self {
    Self {
      pool_name: Arc::new(pool_name.to_string()),
      client,
      ticks,
      tokio_handle,
      pending: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.pool_name
  }

  pub fn ticks(&self) -> Ticks {
    self.ticks
  }

  /// Number of operations dispatched but not yet settled.
  pub fn len(&self) -> usize {
    self.pending.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pending.is_empty()
  }

  /// Dispatches `request` and tracks it without a settlement callback.
  ///
  /// The operation still settles during the next flush; its outcome is
  /// simply not observed, errors included. Callers that need strict failure
  /// handling should register a callback through `add_with`.
  pub async fn add(&mut self, request: D::Request) -> Result<(), PoolError<D::Error>> {
    self.add_inner(request, None).await
  }

  /// Dispatches `request` and registers `on_settle` to receive its outcome.
  ///
  /// Dispatch happens before this method returns; an `Err` here means the
  /// transport refused to begin the operation and nothing was tracked. The
  /// callback runs exactly once, during the flush that settles the
  /// operation.
  ///
  /// The request's identity must be unique among pending operations: adding
  /// a request whose key is already pending replaces the tracked entry. The
  /// superseded operation keeps running (dispatch cannot be undone) but its
  /// settlement is no longer observed and its callback never fires.
  ///
  /// If the pending set reaches the tick threshold after insertion, a full
  /// flush runs before this call returns.
  pub async fn add_with(
    &mut self,
    request: D::Request,
    on_settle: impl FnOnce(Outcome<D::Output, D::Error>) + Send + 'static,
  ) -> Result<(), PoolError<D::Error>> {
    self.add_inner(request, Some(Box::new(on_settle))).await
  }

  async fn add_inner(
    &mut self,
    request: D::Request,
    on_settle: Option<SettlementCallback<D::Output, D::Error>>,
  ) -> Result<(), PoolError<D::Error>> {
    let key = request.identity();
    let operation = self.client.dispatch(&request).map_err(PoolError::Dispatch)?;

    let operation_id = NEXT_OPERATION_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    debug!(
      pool_name = %self.pool_name,
      %operation_id,
      key = ?key,
      "Dispatched request, tracking operation."
    );

    let in_flight = self.tokio_handle.spawn(operation.instrument(info_span!(
      "pooled_operation",
      pool_name = %self.pool_name,
      %operation_id
    )));

    let superseded = self.pending.insert(
      key.clone(),
      PendingOperation {
        operation_id,
        in_flight,
        on_settle,
      },
    );
    if let Some(previous) = superseded {
      warn!(
        pool_name = %self.pool_name,
        key = ?key,
        superseded_operation_id = previous.operation_id,
        "Identity collision: the earlier operation keeps running but is no longer tracked, and its settlement will not be observed."
      );
    }

    if self.ticks.reached(self.pending.len()) {
      trace!(
        pool_name = %self.pool_name,
        pending = self.pending.len(),
        "Tick threshold reached, flushing."
      );
      self.flush().await;
    }

    Ok(())
  }

  /// Settles every pending operation and empties the pool.
  ///
  /// The pending set is captured and swapped for an empty one before any
  /// waiting starts, so operations added while settlement callbacks run
  /// land in the next batch rather than growing this one. The captured
  /// batch is awaited concurrently; callback invocation order within a
  /// batch is unspecified.
  ///
  /// A failed settlement never escapes this method: domain errors, panics
  /// and runtime aborts are all routed to the operation's callback as a
  /// `Failure` outcome, and one operation's failure does not interrupt the
  /// wait for the rest of the batch.
  ///
  /// Flushing an empty pool returns immediately.
  pub async fn flush(&mut self) -> FlushSummary {
    let batch = std::mem::take(&mut self.pending);
    if batch.is_empty() {
      trace!(pool_name = %self.pool_name, "Flush on an empty pool, nothing to settle.");
      return FlushSummary::default();
    }

    debug!(
      pool_name = %self.pool_name,
      batch_size = batch.len(),
      "Flushing pending operations."
    );

    let settlements = join_all(batch.into_iter().map(|(key, operation)| {
      let pool_name = self.pool_name.clone();
      async move {
        let PendingOperation {
          operation_id,
          in_flight,
          on_settle,
        } = operation;

        let outcome = match in_flight.await {
          Ok(Ok(value)) => Outcome::Success(value),
          Ok(Err(settlement_error)) => {
            debug!(
              pool_name = %pool_name,
              %operation_id,
              key = ?key,
              "Operation settled with an error."
            );
            Outcome::Failure(PoolError::Settlement(settlement_error))
          }
          Err(join_error) if join_error.is_panic() => {
            error!(
              pool_name = %pool_name,
              %operation_id,
              key = ?key,
              "Operation panicked while in flight."
            );
            Outcome::Failure(PoolError::OperationPanicked)
          }
          Err(_) => {
            warn!(
              pool_name = %pool_name,
              %operation_id,
              key = ?key,
              "Operation aborted by the runtime before settling."
            );
            Outcome::Failure(PoolError::OperationAborted)
          }
        };

        let succeeded = outcome.is_success();
        if let Some(callback) = on_settle {
          callback(outcome);
        }
        succeeded
      }
    }))
    .await;

    let mut summary = FlushSummary::default();
    for succeeded in settlements {
      if succeeded {
        summary.succeeded += 1;
      } else {
        summary.failed += 1;
      }
    }

    debug!(
      pool_name = %self.pool_name,
      succeeded = summary.succeeded,
      failed = summary.failed,
      "Flush complete, pool emptied."
    );
    summary
  }
}

/// Duplicating a pool copies its configuration, never its pending work.
///
/// The duplicate shares the client handle, threshold, runtime handle and
/// name, but always starts with an empty pending set; the original keeps
/// tracking its own in-flight operations.
impl<D: Dispatcher> Clone for AsyncPool<D> {
  fn clone(&self) -> Self {
    Self {
      pool_name: self.pool_name.clone(),
      client: self.client.clone(),
      ticks: self.ticks,
      tokio_handle: self.tokio_handle.clone(),
      pending: HashMap::new(),
    }
  }
}

impl<D: Dispatcher> fmt::Debug for AsyncPool<D> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AsyncPool")
      .field("pool_name", &self.pool_name)
      .field("ticks", &self.ticks)
      .field("pending", &self.pending.len())
      .finish_non_exhaustive()
  }
}

impl<D: Dispatcher> Drop for AsyncPool<D> {
  fn drop(&mut self) {
    if !self.pending.is_empty() {
      warn!(
        pool_name = %self.pool_name,
        pending = self.pending.len(),
        "Pool dropped with pending operations; they keep running detached and their settlements will not be observed."
      );
    }
  }
}
