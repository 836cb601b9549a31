//! A Tokio-based pool that batches outgoing API requests: every operation is
//! dispatched the moment it is added, while waiting for settlement is
//! deferred until a tick threshold is reached or the caller flushes.

mod dispatch;
mod error;
mod outcome;
mod pool;
mod pool_aware;
mod ticks;

pub use dispatch::{Dispatcher, OperationFuture, Request};
pub use error::PoolError;
pub use outcome::{FlushSummary, Outcome, SettlementCallback};
pub use pool::AsyncPool;
pub use pool_aware::PoolAware;
pub use ticks::{Ticks, DEFAULT_TICKS};
