use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;

/// The in-flight half of a dispatched operation. Resolves to the request's
/// mapped domain result once the transport settles it.
pub type OperationFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// A request the pool can track while it is in flight.
pub trait Request {
  /// Key the pool files the in-flight operation under.
  ///
  /// Must be stable and unique per logical request for as long as the
  /// request is pending. Two pending requests sharing a key collide; see
  /// `AsyncPool::add_with` for what that means.
  type Key: Eq + Hash + Clone + fmt::Debug + Send + 'static;

  fn identity(&self) -> Self::Key;
}

/// The transport capability requests are dispatched through.
///
/// Response mapping stays on the collaborator side: the returned operation
/// future already yields the request's mapped domain result, so the pool
/// only ever learns whether an operation settled successfully and what to
/// hand to the registered callback.
pub trait Dispatcher: Send + Sync + 'static {
  type Request: Request;

  /// Mapped domain value a settled operation produces.
  type Output: Send + 'static;

  /// Error type covering both dispatch refusals and failed settlements.
  type Error: std::error::Error + Send + 'static;

  /// Begins an asynchronous operation for `request`.
  ///
  /// Must not block. The pool spawns the returned future immediately, so
  /// the operation runs concurrently with its siblings from the moment it
  /// is added rather than from the flush. `Err` means the transport could
  /// not begin the operation at all; the pool surfaces that synchronously
  /// from the add that triggered it.
  fn dispatch(
    &self,
    request: &Self::Request,
  ) -> Result<OperationFuture<Self::Output, Self::Error>, Self::Error>;
}
