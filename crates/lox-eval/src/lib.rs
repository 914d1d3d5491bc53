//! The resolver, runtime value model, and tree-walking evaluator.
//!
//! This is the largest phase by design: it owns the environment chain, the
//! heap of arrays/instances/classes/functions, and the statement/expression
//! dispatch that actually runs a parsed program. Everything here is
//! single-threaded and synchronous — there is no scheduler, no async, no
//! locking.

mod builtins;
mod env;
mod error;
mod heap;
mod interpreter;
mod resolver;
mod value;

pub use env::{EnvId, Environment};
pub use error::RuntimeError;
pub use heap::{ArrayId, ClassId, FunctionId, InstanceId};
pub use interpreter::{Interpreter, Print};
pub use resolver::{resolve, ResolveError};
pub use value::Value;
