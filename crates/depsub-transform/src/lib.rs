//! depsub-transform — source-to-source dependency injection transform
//!
//! Rewrites marker calls of the form `dep.injectable({ fetch })` into an
//! indirection through a per-site namespace object, so test code can swap
//! the marked bindings at runtime without callers changing how they invoke
//! them:
//!
//! ```text
//! function load() {                 function load() {
//!   dep.injectable({ fetch })  →      var _injectedNS1 = dep.multi({ fetch })
//!   return fetch('/api')       →      return _injectedNS1['fetch']('/api')
//! }                                 }
//! ```
//!
//! The pass is purely syntactic: span edits are spliced into the original
//! buffer, so untouched code survives byte-for-byte and a file with no
//! marker is returned unchanged.
//!
//! # Example
//!
//! ```
//! let source = "function go() {\n  dep.injectable({ fetch })\n  return fetch('/api')\n}\n";
//! let out = depsub_transform::transform(source)?;
//! assert!(out.contains("dep.multi({ fetch })"));
//! assert!(out.contains("']('/api')"));
//! # Ok::<(), depsub_transform::TransformError>(())
//! ```

pub mod error;
pub mod lang;

mod edit;
mod equivalence;
mod marker;
mod namespace;
mod pass;
mod scope;
mod tree;

pub use error::{TransformError, TransformResult};
pub use lang::Lang;
pub use namespace::NAMESPACE_PREFIX;
pub use pass::{transform, TransformOptions, Transformer};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
