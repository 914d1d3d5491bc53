//! Foundation types shared by the lexer, parser, and evaluator: source
//! spans, diagnostic reporting, typed arena indices, and a common
//! source-level error type.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;

pub use diagnostic::{Diagnostic, Level};
pub use error::SourceError;
pub use index_vec::{Idx, IndexVec};
pub use span::Span;

/// Fast, non-DoS-resistant hash map used for environment scopes and
/// instance field maps, matching the rest of the toolchain's choice of
/// `rustc-hash` over the stdlib's SipHash-keyed `HashMap`.
pub use rustc_hash::{FxHashMap, FxHashSet};

