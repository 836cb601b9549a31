use crate::error::PoolError;

/// The terminal state of one dispatched operation: exactly one of these is
/// delivered to the operation's settlement callback, exactly once.
#[derive(Debug, PartialEq)]
pub enum Outcome<T, E> {
  /// The operation completed and its response mapped into a domain value.
  Success(T),
  /// The operation failed to settle cleanly.
  Failure(PoolError<E>),
}

impl<T, E> Outcome<T, E> {
  pub fn is_success(&self) -> bool {
    matches!(self, Outcome::Success(_))
  }

  pub fn is_failure(&self) -> bool {
    matches!(self, Outcome::Failure(_))
  }

  /// Unpacks the outcome for callers who prefer `Result` handling inside a
  /// settlement callback.
  pub fn into_result(self) -> Result<T, PoolError<E>> {
    match self {
      Outcome::Success(value) => Ok(value),
      Outcome::Failure(error) => Err(error),
    }
  }
}

/// Callback registered alongside a request, invoked exactly once with the
/// operation's outcome during the flush that settles it.
pub type SettlementCallback<T, E> = Box<dyn FnOnce(Outcome<T, E>) + Send + 'static>;

/// Settlement tally for one flushed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
  /// Operations that settled with a mapped domain value.
  pub succeeded: usize,
  /// Operations that settled with an error, panicked, or were aborted.
  pub failed: usize,
}

impl FlushSummary {
  /// Total number of operations the flush settled.
  pub fn settled(&self) -> usize {
    self.succeeded + self.failed
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn outcome_classification_and_unpacking() {
    let success: Outcome<u8, &str> = Outcome::Success(7);
    assert!(success.is_success());
    assert!(!success.is_failure());
    assert_eq!(success.into_result(), Ok(7));

    let failure: Outcome<u8, &str> = Outcome::Failure(PoolError::Settlement("boom"));
    assert!(failure.is_failure());
    assert_eq!(failure.into_result(), Err(PoolError::Settlement("boom")));
  }

  #[test]
  fn flush_summary_totals() {
    let summary = FlushSummary {
      succeeded: 3,
      failed: 2,
    };
    assert_eq!(summary.settled(), 5);
    assert_eq!(FlushSummary::default().settled(), 0);
  }
}
