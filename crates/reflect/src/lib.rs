//! Reflection helpers for JSON-shaped data
//!
//! Read and write nested values by dotted path, and extend mappings without
//! clobbering what is already there.
//!
//! ## Core Design
//!
//! ```text
//! "foo.bar.0" → Path (parsed once) → lookup / get / set over serde_json::Value
//!
//! target ← merge(sources...)   (absent keys only, first writer wins)
//! ```
//!
//! No escaping: keys containing a literal `.` cannot be addressed by path.

pub mod accessor;
pub mod error;
pub mod merge;
pub mod types;

pub use accessor::{get, get_as, get_or_null, lookup, lookup_mut, set};
pub use error::{ReflectError, Result};
pub use merge::{merge, merge_owned, merge_value};
pub use types::Path;
