use super::Address;
use crate::error;
use crate::lang::Error;

/// ## Virtual machine instruction set
///
/// The machine has no registers; every operation works on the operand
/// stack. Operands are embedded in the variant and rendered in the
/// textual artifact form, e.g. `LOAD_CONST 3`.
///
/// See <https://en.wikipedia.org/wiki/Reverse_Polish_notation>
#[derive(Clone, PartialEq)]
pub enum Opcode {
    // *** Constants and variables
    /// Push a constants-pool entry.
    LoadConst(usize),
    LoadTrue,
    LoadFalse,
    /// Push the variable named by a string constant.
    LoadVar(usize),
    /// Pop into the variable named by a string constant. The flag
    /// records whether the binding was declared mutable.
    StoreVar(usize, bool),

    // *** Stack manipulation
    Dup,
    Drop,
    Swap,
    Over,
    Rot,

    // *** Arithmetic and logic
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Not,

    // *** Branch control
    Jump(Address),
    /// Pop a boolean and branch when false.
    JumpIfFalse(Address),
    /// Call the function named by a string constant.
    Call(usize),
    Return,

    // *** Built-ins
    Print,
    ArrayNew,
    ArrayLoad,
    ArrayStore,
    ArrayLen,
    DictNew,
    DictLoad,
    DictStore,
    DictHas,
    DictLen,
    StrConcat,
    StrLen,
    StrSubstr,
    StrIndexOf,
    ReadFile,
    ReadStdin,
    Halt,
}

impl std::fmt::Debug for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string())
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        match self {
            LoadConst(n) => write!(f, "LOAD_CONST {}", n),
            LoadTrue => write!(f, "LOAD_TRUE"),
            LoadFalse => write!(f, "LOAD_FALSE"),
            LoadVar(n) => write!(f, "LOAD_VAR {}", n),
            StoreVar(n, false) => write!(f, "STORE_VAR {}", n),
            StoreVar(n, true) => write!(f, "STORE_VAR {} MUT", n),

            Dup => write!(f, "DUP"),
            Drop => write!(f, "DROP"),
            Swap => write!(f, "SWAP"),
            Over => write!(f, "OVER"),
            Rot => write!(f, "ROT"),

            Add => write!(f, "ADD"),
            Sub => write!(f, "SUB"),
            Mul => write!(f, "MUL"),
            Div => write!(f, "DIV"),
            Eq => write!(f, "EQ"),
            Ne => write!(f, "NE"),
            Lt => write!(f, "LT"),
            Gt => write!(f, "GT"),
            Le => write!(f, "LE"),
            Ge => write!(f, "GE"),
            And => write!(f, "AND"),
            Or => write!(f, "OR"),
            Not => write!(f, "NOT"),

            Jump(a) => write!(f, "JUMP {}", a),
            JumpIfFalse(a) => write!(f, "JUMP_IF_FALSE {}", a),
            Call(n) => write!(f, "CALL {}", n),
            Return => write!(f, "RETURN"),

            Print => write!(f, "PRINT"),
            ArrayNew => write!(f, "ARRAY_NEW"),
            ArrayLoad => write!(f, "ARRAY_LOAD"),
            ArrayStore => write!(f, "ARRAY_STORE"),
            ArrayLen => write!(f, "ARRAY_LEN"),
            DictNew => write!(f, "DICT_NEW"),
            DictLoad => write!(f, "DICT_LOAD"),
            DictStore => write!(f, "DICT_STORE"),
            DictHas => write!(f, "DICT_HAS"),
            DictLen => write!(f, "DICT_LEN"),
            StrConcat => write!(f, "STR_CONCAT"),
            StrLen => write!(f, "STR_LEN"),
            StrSubstr => write!(f, "STR_SUBSTR"),
            StrIndexOf => write!(f, "STR_INDEXOF"),
            ReadFile => write!(f, "READ_FILE"),
            ReadStdin => write!(f, "READ_STDIN"),
            Halt => write!(f, "HALT"),
        }
    }
}

impl std::str::FromStr for Opcode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Opcode, Error> {
        use Opcode::*;
        let mut parts = s.split_whitespace();
        let mnemonic = parts.next().unwrap_or("");
        let mut operand = || -> Result<usize, Error> {
            match parts.next().map(str::parse) {
                Some(Ok(n)) => Ok(n),
                _ => Err(error!(IoError; "MALFORMED OPERAND")),
            }
        };
        let op = match mnemonic {
            "LOAD_CONST" => LoadConst(operand()?),
            "LOAD_TRUE" => LoadTrue,
            "LOAD_FALSE" => LoadFalse,
            "LOAD_VAR" => LoadVar(operand()?),
            "STORE_VAR" => StoreVar(operand()?, false),
            "DUP" => Dup,
            "DROP" => Drop,
            "SWAP" => Swap,
            "OVER" => Over,
            "ROT" => Rot,
            "ADD" => Add,
            "SUB" => Sub,
            "MUL" => Mul,
            "DIV" => Div,
            "EQ" => Eq,
            "NE" => Ne,
            "LT" => Lt,
            "GT" => Gt,
            "LE" => Le,
            "GE" => Ge,
            "AND" => And,
            "OR" => Or,
            "NOT" => Not,
            "JUMP" => Jump(operand()?),
            "JUMP_IF_FALSE" => JumpIfFalse(operand()?),
            "CALL" => Call(operand()?),
            "RETURN" => Return,
            "PRINT" => Print,
            "ARRAY_NEW" => ArrayNew,
            "ARRAY_LOAD" => ArrayLoad,
            "ARRAY_STORE" => ArrayStore,
            "ARRAY_LEN" => ArrayLen,
            "DICT_NEW" => DictNew,
            "DICT_LOAD" => DictLoad,
            "DICT_STORE" => DictStore,
            "DICT_HAS" => DictHas,
            "DICT_LEN" => DictLen,
            "STR_CONCAT" => StrConcat,
            "STR_LEN" => StrLen,
            "STR_SUBSTR" => StrSubstr,
            "STR_INDEXOF" => StrIndexOf,
            "READ_FILE" => ReadFile,
            "READ_STDIN" => ReadStdin,
            "HALT" => Halt,
            _ => return Err(error!(IoError; "UNKNOWN OPCODE")),
        };
        let op = match (op, parts.next()) {
            (StoreVar(n, false), Some("MUT")) => StoreVar(n, true),
            (op, None) => op,
            _ => return Err(error!(IoError; "MALFORMED OPCODE")),
        };
        Ok(op)
    }
}

impl serde::Serialize for Opcode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Opcode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Opcode, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
