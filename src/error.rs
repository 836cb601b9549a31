use thiserror::Error;

/// Per-operation failures surfaced by the pool, either synchronously from an
/// add or through a settlement callback during a flush.
#[derive(Error, Debug, PartialEq)]
pub enum PoolError<E> {
  /// The transport refused the request before the operation could start.
  #[error("failed to dispatch request: {0}")]
  Dispatch(E),

  /// The operation was dispatched but completed with a domain error.
  #[error("operation settled with an error: {0}")]
  Settlement(E),

  #[error("dispatched operation panicked before settling")]
  OperationPanicked,

  #[error("dispatched operation was aborted by the runtime before settling")]
  OperationAborted,
}
