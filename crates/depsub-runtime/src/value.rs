//! Type-erased replacement values.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased runtime value.
///
/// Registry entries, resolver fallbacks and spy arguments are all
/// `Value`s. Cloning shares the underlying allocation; typed access goes
/// through [`Value::downcast_ref`] or the resolver's typed helpers.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Wrap a concrete value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Type id of the wrapped value.
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    /// Full path of the wrapped value's type, captured at construction.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Typed view of the wrapped value.
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// True when the wrapped value is a `T`.
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.type_name).finish()
    }
}
