use crate::dispatch::Dispatcher;
use crate::pool::AsyncPool;

/// Accessor contract for application components that carry an optional
/// request pool.
///
/// Hosts own the storage; the trait only fixes the access surface so that
/// code working against a component can reach its pool without knowing the
/// concrete type.
pub trait PoolAware<D: Dispatcher> {
  /// Returns the attached pool, if any.
  fn pool(&self) -> Option<&AsyncPool<D>>;

  /// Returns the attached pool mutably, if any.
  fn pool_mut(&mut self) -> Option<&mut AsyncPool<D>>;

  /// Attaches a pool, replacing a previously attached one.
  fn set_pool(&mut self, pool: AsyncPool<D>);
}
