//! depsub-runtime — dependency registry, resolver and spies
//!
//! The runtime half of depsub: code rewritten by `depsub-transform` routes
//! its marked bindings through [`multi`], and test code decides what comes
//! out the other side by configuring the [`Registry`] first:
//!
//! ```
//! use depsub_runtime::{Fake, Registry, Value};
//!
//! let registry = Registry::new();
//! let spy = Fake::new();
//! registry.register("fetch", Value::new(spy.clone()));
//! registry.enable();
//!
//! let resolved = registry.resolve("fetch", Value::new(()))?;
//! resolved.downcast_ref::<Fake>().unwrap().call(vec![Value::new("url")]);
//! assert_eq!(spy.call_count(), 1);
//! # Ok::<(), depsub_runtime::ResolveError>(())
//! ```
//!
//! With interception disabled (the default), every resolution returns its
//! fallback untouched, so production code paths pay nothing.
//!
//! A process-global registry backs free-function mirrors of the whole
//! surface (`register`, `resolve`, `multi`, ...); its interception flag is
//! preset from the `DEPSUB_INTERCEPT` environment variable.

pub mod config;
pub mod error;
pub mod fake;
pub mod key;
pub mod naming;
pub mod registry;
pub mod value;

pub use error::{ResolveError, ResolveResult};
pub use fake::{fake, fake_with, CallRecord, Fake};
pub use key::Key;
pub use naming::SymbolLabel;
pub use registry::{
    allow, enable, global, injectable, multi, register, reset, resolve, resolve_as, resolve_self,
    set_enabled, Registry,
};
pub use value::Value;

// the mapping type `multi` operates on
pub use indexmap::IndexMap;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for test setup code
    pub use crate::{Fake, IndexMap, Key, Registry, ResolveError, ResolveResult, Value};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
