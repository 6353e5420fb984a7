use super::Position;

pub struct Error {
    code: u16,
    position: Option<Position>,
    address: Option<usize>,
    message: &'static str,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $pos:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_position($pos)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $pos:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_position($pos)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            position: None,
            address: None,
            message: "",
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn in_position(&self, position: Position) -> Error {
        debug_assert!(self.position.is_none());
        Error {
            code: self.code,
            position: Some(position),
            address: self.address,
            message: self.message,
        }
    }

    pub fn in_address(&self, address: usize) -> Error {
        debug_assert!(self.address.is_none());
        Error {
            code: self.code,
            position: self.position,
            address: Some(address),
            message: self.message,
        }
    }

    pub fn message(&self, message: &'static str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            code: self.code,
            position: self.position,
            address: self.address,
            message,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ErrorCode {
    UnterminatedString = 1,
    UnexpectedChar = 2,
    UnexpectedToken = 3,
    UnexpectedEof = 4,
    UndefinedReference = 10,
    ArityMismatch = 11,
    DuplicateFunction = 12,
    ImmutableAssignment = 13,
    StackUnderflow = 20,
    StackOverflow = 21,
    TypeMismatch = 22,
    DivisionByZero = 23,
    UndefinedVariable = 24,
    UndefinedFunction = 25,
    ArrayIndexOutOfBounds = 26,
    DictKeyNotFound = 27,
    IoError = 28,
    Overflow = 29,
    InternalError = 51,
}

impl PartialEq<ErrorCode> for Error {
    fn eq(&self, other: &ErrorCode) -> bool {
        self.code == *other as u16
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            1 => "UNTERMINATED STRING",
            2 => "UNEXPECTED CHARACTER",
            3 => "UNEXPECTED TOKEN",
            4 => "UNEXPECTED END OF INPUT",
            10 => "UNDEFINED REFERENCE",
            11 => "ARITY MISMATCH",
            12 => "DUPLICATE FUNCTION",
            13 => "IMMUTABLE ASSIGNMENT",
            20 => "STACK UNDERFLOW",
            21 => "STACK OVERFLOW",
            22 => "TYPE MISMATCH",
            23 => "DIVISION BY ZERO",
            24 => "UNDEFINED VARIABLE",
            25 => "UNDEFINED FUNCTION",
            26 => "ARRAY INDEX OUT OF BOUNDS",
            27 => "DICT KEY NOT FOUND",
            28 => "I/O ERROR",
            29 => "OVERFLOW",
            51 => "INTERNAL ERROR",
            _ => "",
        };
        let mut suffix = String::new();
        if let Some((line, column)) = self.position {
            suffix.push_str(&format!(" AT {}:{}", line, column));
        }
        if let Some(address) = self.address {
            suffix.push_str(&format!(" AT PC {}", address));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if code_str.is_empty() {
            write!(f, "PROGRAM ERROR {}{}", self.code, suffix)
        } else {
            write!(f, "{}{}", code_str, suffix)
        }
    }
}
