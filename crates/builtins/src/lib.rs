//! melon builtin registry.
//!
//! A builtin call in a melon program never runs bytecode: it asks the host
//! to perform an action. The registry maps each builtin name to a fixed
//! host action id and a pure normalizer that validates the call's arguments
//! and rewrites them into the host's expected shape.
//!
//! # Usage
//!
//! ```
//! use melon_builtins::{resolve, HostAction};
//! use melon_common::Value;
//!
//! let action = resolve("print", &[Value::string("total:"), Value::number(3.0)], 1).unwrap().unwrap();
//! assert_eq!(
//!     action,
//!     HostAction {
//!         name: "is.workflow.actions.showresult".into(),
//!         args: vec![Value::string("total: 3")],
//!     }
//! );
//! ```
//!
//! The same function serves a compiler that wants to validate calls with
//! constant arguments ahead of time and the interpreter resolving `CALL` at
//! runtime.

pub mod emoji;
pub mod error;
mod normalize;
pub mod registry;

pub use error::ValidationError;
pub use registry::{Arity, Builtin, HostAction, ALL_BUILTINS, SYSCALL_ACTION_ID};

use melon_common::Value;

/// Resolve a call to the builtin `name`.
///
/// Returns `None` when no builtin has that name.
pub fn resolve(name: &str, args: &[Value], line: u32) -> Option<Result<HostAction, ValidationError>> {
    Builtin::from_name(name).map(|builtin| builtin.request(args, line))
}
