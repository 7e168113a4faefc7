//! melon common types.
//!
//! This crate provides the data structures shared by the interpreter, the
//! builtin registry and the verifier:
//!
//! - [`Value`]: runtime values (number, text, boolean, list, tuple, builtin reference)
//! - [`ValueType`]: the variant tag of a value
//! - [`Opcode`] / [`Instruction`]: the instruction set
//! - [`Program`]: instruction sequence plus constant pool
//! - [`DecodeError`]: errors from decoding a program

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod value;
pub mod value_type;

pub use error::DecodeError;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use program::Program;
pub use value::Value;
pub use value_type::ValueType;
