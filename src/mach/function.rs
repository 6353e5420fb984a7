use super::Opcode;

/// ## Standard library surface
///
/// Words that compile straight to an opcode, plus the prelude: the part
/// of the standard library written in PostC itself and compiled through
/// the normal pipeline ahead of user code. A user function definition
/// with the same name as an opcode word shadows it.
pub struct Function {}

impl Function {
    pub const PRELUDE: &'static str = "\
: square 1 param dup * ;
: cube 1 param dup dup * * ;
: abs 1 param dup 0 < if 0 swap - ; ;
: max 2 param over over < if swap ; drop ;
: min 2 param over over > if swap ; drop ;
";

    /// The opcode a built-in word maps to, if the name is one.
    pub fn opcode(name: &str) -> Option<Opcode> {
        use Opcode::*;
        match name {
            "add" => Some(Add),
            "sub" => Some(Sub),
            "mul" => Some(Mul),
            "div" => Some(Div),
            "eq" => Some(Eq),
            "ne" => Some(Ne),
            "lt" => Some(Lt),
            "gt" => Some(Gt),
            "le" => Some(Le),
            "ge" => Some(Ge),
            "and" => Some(And),
            "or" => Some(Or),
            "not" => Some(Not),
            "dup" => Some(Dup),
            "drop" => Some(Drop),
            "swap" => Some(Swap),
            "over" => Some(Over),
            "rot" => Some(Rot),
            "print" => Some(Print),
            "create_array" => Some(ArrayNew),
            "load_array" => Some(ArrayLoad),
            "store_array" => Some(ArrayStore),
            "array_length" => Some(ArrayLen),
            "create_dict" => Some(DictNew),
            "load_dict" => Some(DictLoad),
            "store_dict" => Some(DictStore),
            "dict_has_key" => Some(DictHas),
            "dict_length" => Some(DictLen),
            "string_concat" => Some(StrConcat),
            "string_length" => Some(StrLen),
            "string_substring" => Some(StrSubstr),
            "string_indexof" => Some(StrIndexOf),
            "read_file" => Some(ReadFile),
            "read_stdin" => Some(ReadStdin),
            _ => None,
        }
    }
}
