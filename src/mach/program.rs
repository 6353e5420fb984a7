use super::{Address, Opcode, Val};
use crate::error;
use crate::lang::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type Result<T> = std::result::Result<T, Error>;

/// ## Compiled program
///
/// Instructions plus the constants pool and function table, exactly what
/// the artifact serializes. Built once by the code generator, then owned
/// by a Runtime or a persistence caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub constants: Vec<Const>,
    pub functions: BTreeMap<String, FunctionEntry>,
    pub instructions: Vec<Opcode>,
}

/// Constants-pool entry. Only scalar values are interned; arrays and
/// dictionaries are built at run time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Const {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub entry: Address,
    pub param_count: usize,
}

impl Program {
    /// Serialize to the persisted artifact text.
    pub fn to_text(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|_| error!(InternalError; "SERIALIZE"))
    }

    /// Load a persisted artifact.
    pub fn from_text(s: &str) -> Result<Program> {
        serde_json::from_str(s).map_err(|_| error!(IoError; "MALFORMED PROGRAM TEXT"))
    }
}

impl From<&Const> for Val {
    fn from(c: &Const) -> Val {
        match c {
            Const::Boolean(b) => Val::Boolean(*b),
            Const::Integer(n) => Val::Integer(*n),
            Const::Float(n) => Val::Float(*n),
            Const::String(s) => Val::String(s.as_str().into()),
        }
    }
}
