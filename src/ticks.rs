/// Number of pending operations a pool tolerates by default before an add
/// triggers an automatic flush.
pub const DEFAULT_TICKS: usize = 100;

/// Capacity threshold for the pending set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ticks {
  /// Automatically flush as soon as the pending set holds at least this
  /// many operations. `Limit(0)` is legal and settles every operation
  /// right after it is added.
  Limit(usize),
  /// Never flush automatically; settlement only happens on an explicit
  /// flush.
  Unbounded,
}

impl Ticks {
  /// Whether a pending set of `pending` operations is due for an automatic
  /// flush.
  pub(crate) fn reached(self, pending: usize) -> bool {
    match self {
      Ticks::Limit(limit) => pending >= limit,
      Ticks::Unbounded => false,
    }
  }
}

impl Default for Ticks {
  fn default() -> Self {
    Ticks::Limit(DEFAULT_TICKS)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_is_the_documented_constant() {
    assert_eq!(Ticks::default(), Ticks::Limit(DEFAULT_TICKS));
    assert_eq!(DEFAULT_TICKS, 100);
  }

  #[test]
  fn limit_reached_at_and_above_threshold() {
    let ticks = Ticks::Limit(3);
    assert!(!ticks.reached(0));
    assert!(!ticks.reached(2));
    assert!(ticks.reached(3));
    assert!(ticks.reached(4));
  }

  #[test]
  fn zero_limit_is_always_due() {
    assert!(Ticks::Limit(0).reached(0));
    assert!(Ticks::Limit(0).reached(1));
  }

  #[test]
  fn unbounded_is_never_due() {
    assert!(!Ticks::Unbounded.reached(0));
    assert!(!Ticks::Unbounded.reached(usize::MAX));
  }
}
