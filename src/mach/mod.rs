/*!
## PostC Machine Module

This module is the compiler back end and virtual machine for PostC.

*/

pub type Address = usize;
pub type Symbol = isize;

mod codegen;
mod compile;
mod function;
mod link;
mod opcode;
mod operation;
mod program;
mod runtime;
mod stack;
mod val;

pub use compile::compile;
pub use function::Function;
pub use link::Link;
pub use opcode::Opcode;
pub use operation::Operation;
pub use program::Const;
pub use program::FunctionEntry;
pub use program::Program;
pub use runtime::Runtime;
pub use stack::Stack;
pub use val::Val;
