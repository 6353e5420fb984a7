//! # PostC
//!
//! A compiler and stack virtual machine for PostC, a small language
//! where every expression is written in reverse Polish notation.
//!
//! ```text
//! : add2 2 param + ;
//! 5 3 add2 print
//! ```
//!
//! Source is lexed and parsed by the [lang] module, then lowered to
//! bytecode and executed by the [mach] module. Compiled programs
//! serialize to a JSON artifact and reload without loss.

pub mod lang;
pub mod mach;
