use super::Position;
use std::rc::Rc;

/// One lexeme of PostC source with its location.
/// Created by the lexer; never mutated afterward.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn position(&self) -> Position {
        (self.line, self.column)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Literal(Literal),
    Ident(Rc<str>),
    Word(Word),
    Operator(Operator),
    Colon,
    Semicolon,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Eof,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(Rc<str>),
    Boolean(bool),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Word {
    Let,
    Var,
    If,
    Else,
    While,
    For,
    Param,
    Print,
    Dup,
    Drop,
    Swap,
    Over,
    Rot,
}

impl Word {
    pub fn from_ident(s: &str) -> Option<Word> {
        use Word::*;
        match s {
            "let" => Some(Let),
            "var" => Some(Var),
            "if" => Some(If),
            "else" => Some(Else),
            "while" => Some(While),
            "for" => Some(For),
            "param" => Some(Param),
            "print" => Some(Print),
            "dup" => Some(Dup),
            "drop" => Some(Drop),
            "swap" => Some(Swap),
            "over" => Some(Over),
            "rot" => Some(Rot),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Assign,
}
