//! The dependency registry and resolver.

use crate::config;
use crate::error::{ResolveError, ResolveResult};
use crate::key::{Key, KeyRepr};
use crate::naming::SymbolLabel;
use crate::value::Value;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct State {
    entries: HashMap<KeyRepr, Value>,
    allowed: HashSet<KeyRepr>,
    enabled: bool,
}

/// A dependency registry: keyed replacements, an allow-list and an
/// interception flag.
///
/// Designed for single-threaded test setup. Each operation takes one lock
/// so a process-global instance is sound, but sequences of calls are not
/// atomic — coordinating setup across threads is the caller's
/// responsibility.
#[derive(Debug, Default)]
pub struct Registry {
    state: RwLock<State>,
}

impl Registry {
    /// New registry with interception disabled.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// New registry with interception preset from [`config::INTERCEPT_ENV_VAR`].
    #[must_use]
    pub fn from_env() -> Self {
        let registry = Self::new();
        registry.set_enabled(config::intercept_from_env());
        registry
    }

    /// Store or overwrite the replacement for `key`. Last registration
    /// wins silently.
    pub fn register(&self, key: impl Into<Key>, replacement: Value) {
        let key = key.into();
        tracing::debug!(key = %key.label(), "registering replacement");
        self.state
            .write()
            .entries
            .insert(key.repr().clone(), replacement);
    }

    /// Clear every entry and the allow-list. The interception flag is
    /// left as it was.
    pub fn reset(&self) {
        tracing::debug!("resetting registry");
        let mut state = self.state.write();
        state.entries.clear();
        state.allowed.clear();
    }

    /// Permit `key` to pass through unresolved without failing.
    pub fn allow(&self, key: impl Into<Key>) {
        let key = key.into();
        tracing::debug!(key = %key.label(), "allow-listing key");
        self.state.write().allowed.insert(key.repr().clone());
    }

    /// Turn interception on.
    pub fn enable(&self) {
        self.set_enabled(true);
    }

    /// Set the interception flag.
    pub fn set_enabled(&self, enabled: bool) {
        tracing::debug!(enabled, "setting interception");
        self.state.write().enabled = enabled;
    }

    /// Current interception flag.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state.read().enabled
    }

    /// Resolve `key`, falling back to `fallback`.
    ///
    /// Lookup order: interception disabled → the fallback unchanged;
    /// a replacement registered under `key`; a replacement registered
    /// under the fallback value's own type; an allow-listed key → the
    /// fallback; otherwise an unresolved-dependency error labeled for
    /// `key`.
    pub fn resolve(&self, key: impl Into<Key>, fallback: Value) -> ResolveResult<Value> {
        let key = key.into();
        let state = self.state.read();
        if !state.enabled {
            return Ok(fallback);
        }
        if let Some(replacement) = state.entries.get(key.repr()) {
            tracing::trace!(key = %key.label(), "resolved replacement");
            return Ok(replacement.clone());
        }
        if let Some(replacement) = state.entries.get(&KeyRepr::of_value(&fallback)) {
            tracing::trace!(key = %key.label(), "resolved replacement by fallback type");
            return Ok(replacement.clone());
        }
        if state.allowed.contains(key.repr()) {
            return Ok(fallback);
        }
        Err(ResolveError::unresolved(key.label()))
    }

    /// Single-argument resolution: the value doubles as its own key.
    pub fn resolve_self(&self, value: Value) -> ResolveResult<Value> {
        let state = self.state.read();
        if !state.enabled {
            return Ok(value);
        }
        let repr = KeyRepr::of_value(&value);
        if let Some(replacement) = state.entries.get(&repr) {
            return Ok(replacement.clone());
        }
        if state.allowed.contains(&repr) {
            return Ok(value);
        }
        Err(ResolveError::unresolved(SymbolLabel::for_value(&value)))
    }

    /// Typed resolution: resolves and downcasts to `T`.
    pub fn resolve_as<T: Any + Clone + Send + Sync>(
        &self,
        key: impl Into<Key>,
        fallback: T,
    ) -> ResolveResult<T> {
        let key = key.into();
        let label = key.label().clone();
        let resolved = self.resolve(key, Value::new(fallback))?;
        resolved
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| ResolveError::ReplacementType {
                key: label.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Resolve every value of `mapping` through [`Registry::resolve`],
    /// using the alias as the lookup key. The output has the same shape
    /// and order as the input; entries must not depend on one another.
    pub fn multi(&self, mapping: IndexMap<String, Value>) -> ResolveResult<IndexMap<String, Value>> {
        let mut resolved = IndexMap::with_capacity(mapping.len());
        for (alias, value) in mapping {
            let value = self.resolve(Key::name(alias.clone()), value)?;
            resolved.insert(alias, value);
        }
        Ok(resolved)
    }

    /// Runtime marker. Transformed files never call this; reaching it
    /// with interception enabled means the transform step was skipped,
    /// which is a fatal configuration error.
    pub fn injectable(&self, _mapping: IndexMap<String, Value>) -> ResolveResult<()> {
        if self.is_enabled() {
            return Err(ResolveError::TransformationNotApplied);
        }
        Ok(())
    }
}

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::from_env);

/// The process-global registry backing the free functions.
#[must_use]
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// Resolve against the global registry. See [`Registry::resolve`].
pub fn resolve(key: impl Into<Key>, fallback: Value) -> ResolveResult<Value> {
    global().resolve(key, fallback)
}

/// Single-argument resolution against the global registry.
pub fn resolve_self(value: Value) -> ResolveResult<Value> {
    global().resolve_self(value)
}

/// Typed resolution against the global registry.
pub fn resolve_as<T: Any + Clone + Send + Sync>(
    key: impl Into<Key>,
    fallback: T,
) -> ResolveResult<T> {
    global().resolve_as(key, fallback)
}

/// Register a replacement in the global registry.
pub fn register(key: impl Into<Key>, replacement: Value) {
    global().register(key, replacement);
}

/// Clear the global registry's entries and allow-list.
pub fn reset() {
    global().reset();
}

/// Allow-list a key in the global registry.
pub fn allow(key: impl Into<Key>) {
    global().allow(key);
}

/// Enable interception on the global registry.
pub fn enable() {
    global().enable();
}

/// Set the global registry's interception flag.
pub fn set_enabled(enabled: bool) {
    global().set_enabled(enabled);
}

/// Batch-resolve a mapping against the global registry.
pub fn multi(mapping: IndexMap<String, Value>) -> ResolveResult<IndexMap<String, Value>> {
    global().multi(mapping)
}

/// Global runtime marker. See [`Registry::injectable`].
pub fn injectable(mapping: IndexMap<String, Value>) -> ResolveResult<()> {
    global().injectable(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::Fake;

    #[test]
    fn disabled_resolution_is_identity() {
        let registry = Registry::new();
        registry.register("fetch", Value::new("replacement"));
        let resolved = registry.resolve("fetch", Value::new(7_i32)).unwrap();
        assert_eq!(resolved.downcast_ref::<i32>(), Some(&7));
    }

    #[test]
    fn registered_key_resolves_to_replacement() {
        let registry = Registry::new();
        registry.register("fetch", Value::new("replacement"));
        registry.enable();
        let resolved = registry.resolve("fetch", Value::new(7_i32)).unwrap();
        assert_eq!(resolved.downcast_ref::<&str>(), Some(&"replacement"));
    }

    #[test]
    fn fallback_type_is_looked_up_when_key_misses() {
        struct RealService;
        let registry = Registry::new();
        registry.register(Key::of::<RealService>(), Value::new("faked"));
        registry.enable();
        let resolved = registry
            .resolve("unrelated-but-allowed-to-miss", Value::new(RealService))
            .unwrap();
        assert_eq!(resolved.downcast_ref::<&str>(), Some(&"faked"));
    }

    #[test]
    fn allow_listed_key_passes_through() {
        let registry = Registry::new();
        registry.allow("fetch");
        registry.enable();
        let resolved = registry.resolve("fetch", Value::new(7_i32)).unwrap();
        assert_eq!(resolved.downcast_ref::<i32>(), Some(&7));
    }

    #[test]
    fn unregistered_key_fails_with_label() {
        let registry = Registry::new();
        registry.enable();
        let err = registry.resolve("fetch", Value::new(())).unwrap_err();
        assert_eq!(err.to_string(), "fetch not found in dependency registry");
    }

    #[test]
    fn named_function_key_fails_with_its_name() {
        let registry = Registry::new();
        registry.enable();
        let err = registry
            .resolve(Key::named_fn("callApi"), Value::new(()))
            .unwrap_err();
        assert!(err.to_string().contains("callApi"));
    }

    #[test]
    fn instance_key_fails_with_its_type() {
        struct QueryService;
        let registry = Registry::new();
        registry.enable();
        let err = registry
            .resolve(Key::of::<QueryService>(), Value::new(()))
            .unwrap_err();
        assert!(err.to_string().contains("Instance of QueryService"));
    }

    #[test]
    fn resolve_self_uses_the_value_type() {
        struct RealService;
        let registry = Registry::new();
        registry.register(Key::of::<RealService>(), Value::new("faked"));
        registry.enable();
        let resolved = registry.resolve_self(Value::new(RealService)).unwrap();
        assert_eq!(resolved.downcast_ref::<&str>(), Some(&"faked"));
    }

    #[test]
    fn last_registration_wins() {
        let registry = Registry::new();
        registry.register("fetch", Value::new(1_i32));
        registry.register("fetch", Value::new(2_i32));
        registry.enable();
        let resolved = registry.resolve("fetch", Value::new(0_i32)).unwrap();
        assert_eq!(resolved.downcast_ref::<i32>(), Some(&2));
    }

    #[test]
    fn reset_clears_entries_and_allow_list_only() {
        let registry = Registry::new();
        registry.register("fetch", Value::new(1_i32));
        registry.allow("post");
        registry.enable();
        registry.reset();
        assert!(registry.is_enabled());
        assert!(registry.resolve("fetch", Value::new(0_i32)).is_err());
        assert!(registry.resolve("post", Value::new(0_i32)).is_err());
    }

    #[test]
    fn resolve_as_downcasts() {
        let registry = Registry::new();
        registry.register("count", Value::new(5_i32));
        registry.enable();
        assert_eq!(registry.resolve_as("count", 0_i32).unwrap(), 5);
    }

    #[test]
    fn resolve_as_rejects_wrong_types() {
        let registry = Registry::new();
        registry.register("count", Value::new("five"));
        registry.enable();
        let err = registry.resolve_as("count", 0_i32).unwrap_err();
        assert!(matches!(err, ResolveError::ReplacementType { .. }));
    }

    #[test]
    fn multi_preserves_shape_and_resolves_each_alias() {
        let spy = Fake::new();
        let registry = Registry::new();
        registry.register("fetch", Value::new(spy.clone()));
        registry.allow("log");
        registry.enable();

        let mapping = IndexMap::from([
            ("fetch".to_owned(), Value::new(1_i32)),
            ("log".to_owned(), Value::new(2_i32)),
        ]);
        let resolved = registry.multi(mapping).unwrap();

        assert_eq!(
            resolved.keys().collect::<Vec<_>>(),
            vec!["fetch", "log"]
        );
        assert!(resolved["fetch"].is::<Fake>());
        assert_eq!(resolved["log"].downcast_ref::<i32>(), Some(&2));
    }

    #[test]
    fn multi_fails_on_first_unresolved_entry() {
        let registry = Registry::new();
        registry.enable();
        let mapping = IndexMap::from([("fetch".to_owned(), Value::new(1_i32))]);
        assert!(registry.multi(mapping).is_err());
    }

    #[test]
    fn injectable_is_a_noop_while_disabled() {
        let registry = Registry::new();
        assert!(registry.injectable(IndexMap::new()).is_ok());
    }

    #[test]
    fn injectable_fails_loudly_when_enabled() {
        let registry = Registry::new();
        registry.enable();
        let err = registry.injectable(IndexMap::new()).unwrap_err();
        assert!(matches!(err, ResolveError::TransformationNotApplied));
        assert!(err.to_string().contains("transformation was not applied"));
    }
}
